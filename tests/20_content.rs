mod common;

use anyhow::Result;
use javelin_api::filter::Filter;
use reqwest::StatusCode;
use serde_json::json;

use common::{body, form, pdf, png, TestServer};

#[tokio::test]
async fn admin_routes_require_an_admin_token() -> Result<()> {
    let server = TestServer::start().await?;

    let resp = server.client.get(server.url("/api/team/admin/all")).send().await?;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);

    let resp = server
        .client
        .post(server.url("/api/sites"))
        .multipart(form(&[("name", "Depot")]))
        .send()
        .await?;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    Ok(())
}

#[tokio::test]
async fn team_member_without_photo_gets_placeholder() -> Result<()> {
    let server = TestServer::start().await?;
    let token = server.admin_token().await?;

    let fields = form(&[
        ("name", "Ada Obi"),
        ("position", "Head of Operations"),
        ("bio", "Twenty years in close protection."),
        ("order", "2"),
        ("socialLinks", r#"{"linkedin":"https://linkedin.com/in/ada"}"#),
    ]);
    let resp = server.client.post(server.url("/api/team")).bearer_auth(&token).multipart(fields).send().await?;
    let (status, json) = body(resp).await?;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(json["data"]["image"], server.state.config.content.default_team_image);
    assert_eq!(json["data"]["order"], 2);
    assert_eq!(json["data"]["socialLinks"]["linkedin"], "https://linkedin.com/in/ada");
    assert_eq!(json["data"]["isActive"], true);
    assert_eq!(server.storage.stored(), 0);
    Ok(())
}

#[tokio::test]
async fn invalid_team_member_is_rejected_before_upload() -> Result<()> {
    let server = TestServer::start().await?;
    let token = server.admin_token().await?;

    let fields = form(&[("name", "No Position")]).part("image", png("face.png"));
    let resp = server.client.post(server.url("/api/team")).bearer_auth(&token).multipart(fields).send().await?;
    let (status, json) = body(resp).await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["success"], false);
    assert!(json["errors"]["position"].is_string());

    assert_eq!(server.state.store.team.count(Filter::new()).await?, 0);
    assert_eq!(server.storage.stored(), 0);
    Ok(())
}

#[tokio::test]
async fn site_requires_an_image() -> Result<()> {
    let server = TestServer::start().await?;
    let token = server.admin_token().await?;

    let fields = form(&[("name", "Lekki Estate"), ("location", "Lagos"), ("description", "Gated estate")]);
    let resp = server.client.post(server.url("/api/sites")).bearer_auth(&token).multipart(fields).send().await?;
    let (status, json) = body(resp).await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["message"], "Please upload an image");
    assert_eq!(server.state.store.sites.count(Filter::new()).await?, 0);

    let fields = form(&[
        ("name", "Lekki Estate"),
        ("location", "Lagos"),
        ("description", "Gated estate"),
        ("services", "Armed Guards, CCTV Monitoring"),
    ])
    .part("image", pdf("site.pdf"));
    let resp = server.client.post(server.url("/api/sites")).bearer_auth(&token).multipart(fields).send().await?;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    assert_eq!(server.storage.stored(), 0);

    let fields = form(&[
        ("name", "Lekki Estate"),
        ("location", "Lagos"),
        ("description", "Gated estate"),
        ("services", "Armed Guards, CCTV Monitoring"),
    ])
    .part("image", png("site.png"));
    let resp = server.client.post(server.url("/api/sites")).bearer_auth(&token).multipart(fields).send().await?;
    let (status, json) = body(resp).await?;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(json["data"]["services"], json!(["Armed Guards", "CCTV Monitoring"]));
    assert_eq!(json["data"]["image"], "/uploads/image-1.png");
    Ok(())
}

#[tokio::test]
async fn public_lists_hide_inactive_rows() -> Result<()> {
    let server = TestServer::start().await?;
    let token = server.admin_token().await?;

    for (title, active) in [("Night patrol", "true"), ("Old photo", "false")] {
        let fields = form(&[("title", title), ("category", "team"), ("isActive", active)]).part("image", png("g.png"));
        let resp = server.client.post(server.url("/api/gallery")).bearer_auth(&token).multipart(fields).send().await?;
        assert_eq!(resp.status(), StatusCode::CREATED);
    }

    let (_, public) = body(server.client.get(server.url("/api/gallery")).send().await?).await?;
    assert_eq!(public["count"], 1);
    assert_eq!(public["data"][0]["title"], "Night patrol");

    let (_, filtered) = body(server.client.get(server.url("/api/gallery?category=events")).send().await?).await?;
    assert_eq!(filtered["count"], 0);

    let resp = server.client.get(server.url("/api/gallery/admin/all")).bearer_auth(&token).send().await?;
    let (_, all) = body(resp).await?;
    assert_eq!(all["count"], 2);

    let (_, categories) = body(server.client.get(server.url("/api/gallery/categories")).send().await?).await?;
    assert_eq!(categories["data"][0]["value"], "work-in-action");
    Ok(())
}

#[tokio::test]
async fn replacing_and_deleting_images_cleans_up_storage() -> Result<()> {
    let server = TestServer::start().await?;
    let token = server.admin_token().await?;

    let fields = form(&[("title", "Gate check")]).part("image", png("first.png"));
    let resp = server.client.post(server.url("/api/gallery")).bearer_auth(&token).multipart(fields).send().await?;
    let (_, created) = body(resp).await?;
    let id = created["data"]["_id"].as_str().unwrap().to_string();

    let fields = form(&[("description", "Morning shift")]).part("image", png("second.png"));
    let resp = server
        .client
        .put(server.url(&format!("/api/gallery/{}", id)))
        .bearer_auth(&token)
        .multipart(fields)
        .send()
        .await?;
    let (status, updated) = body(resp).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["data"]["image"], "/uploads/image-2.png");
    assert_eq!(updated["data"]["title"], "Gate check");
    assert_eq!(server.storage.deleted(), vec!["image-1.png".to_string()]);

    let resp = server.client.delete(server.url(&format!("/api/gallery/{}", id))).bearer_auth(&token).send().await?;
    let (status, json) = body(resp).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["message"], "Gallery item deleted successfully");
    assert_eq!(server.storage.deleted(), vec!["image-1.png".to_string(), "image-2.png".to_string()]);

    let resp = server.client.get(server.url(&format!("/api/gallery/{}", id))).send().await?;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    Ok(())
}

#[tokio::test]
async fn malformed_ids_are_not_found() -> Result<()> {
    let server = TestServer::start().await?;
    let (status, json) = body(server.client.get(server.url("/api/sites/not-a-uuid")).send().await?).await?;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(json["message"], "Site not found");
    Ok(())
}

#[tokio::test]
async fn reorder_updates_display_order() -> Result<()> {
    let server = TestServer::start().await?;
    let token = server.admin_token().await?;

    let mut ids = Vec::new();
    for name in ["First", "Second"] {
        let fields = form(&[("name", name), ("position", "Guard"), ("bio", "On duty")]);
        let resp = server.client.post(server.url("/api/team")).bearer_auth(&token).multipart(fields).send().await?;
        let (_, json) = body(resp).await?;
        ids.push(json["data"]["_id"].as_str().unwrap().to_string());
    }

    let updates = json!({ "orderUpdates": [
        { "id": ids[0], "order": 5 },
        { "id": ids[1], "order": 1 },
        { "id": "00000000-0000-0000-0000-000000000000", "order": 9 }
    ]});
    let resp = server.client.put(server.url("/api/team/reorder")).bearer_auth(&token).json(&updates).send().await?;
    let (status, json) = body(resp).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["message"], "Order updated successfully");

    let (_, listing) = body(server.client.get(server.url("/api/team")).send().await?).await?;
    assert_eq!(listing["data"][0]["name"], "Second");
    assert_eq!(listing["data"][1]["order"], 5);

    let empty = json!({ "orderUpdates": [] });
    let resp = server.client.put(server.url("/api/team/reorder")).bearer_auth(&token).json(&empty).send().await?;
    let (status, json) = body(resp).await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["errors"]["order_updates"], "Please provide orderUpdates");
    Ok(())
}
