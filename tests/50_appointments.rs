mod common;

use anyhow::Result;
use javelin_api::filter::Filter;
use reqwest::StatusCode;
use serde_json::{json, Value};

use common::{body, TestServer};

fn booking(date: &str) -> Value {
    json!({
        "clientName": "Funmi Adeyemi",
        "companyName": "Adeyemi Logistics",
        "email": "Funmi@Adeyemi.NG",
        "phone": "+234 802 000 1111",
        "meetingType": "video-call",
        "preferredDate": date,
        "preferredTime": "10:30 AM",
        "alternateDate": "",
        "alternateTime": "",
        "serviceInterest": "corporate-security",
        "message": "Warehouse coverage"
    })
}

#[tokio::test]
async fn booking_is_stored_pending_and_announced() -> Result<()> {
    let server = TestServer::start().await?;

    let resp = server.client.post(server.url("/api/appointments")).json(&booking("2026-12-01")).send().await?;
    let (status, json) = body(resp).await?;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(json["message"], "Appointment request submitted successfully. We will confirm shortly.");
    assert_eq!(json["data"]["status"], "pending");
    assert_eq!(json["data"]["email"], "funmi@adeyemi.ng");
    assert!(json["data"]["alternateDate"].is_null());

    let sent = server.mailer.sent();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].subject, "New Appointment Request: Funmi Adeyemi");
    Ok(())
}

#[tokio::test]
async fn past_dates_are_accepted() -> Result<()> {
    let server = TestServer::start().await?;
    let resp = server.client.post(server.url("/api/appointments")).json(&booking("2020-01-15")).send().await?;
    assert_eq!(resp.status(), StatusCode::CREATED);
    assert_eq!(server.state.store.appointments.count(Filter::new()).await?, 1);
    Ok(())
}

#[tokio::test]
async fn partial_booking_is_rejected_by_field() -> Result<()> {
    let server = TestServer::start().await?;

    let mut partial = booking("2026-12-01");
    partial["meetingType"] = json!("");
    partial["preferredTime"] = json!("");
    let resp = server.client.post(server.url("/api/appointments")).json(&partial).send().await?;
    let (status, json) = body(resp).await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["errors"]["meeting_type"], "Please select meeting type");
    assert_eq!(json["errors"]["preferred_time"], "Please provide preferred time");

    let mut bad_type = booking("2026-12-01");
    bad_type["meetingType"] = json!("carrier-pigeon");
    let resp = server.client.post(server.url("/api/appointments")).json(&bad_type).send().await?;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    assert_eq!(server.state.store.appointments.count(Filter::new()).await?, 0);
    assert!(server.mailer.sent().is_empty());
    Ok(())
}

#[tokio::test]
async fn admins_manage_bookings() -> Result<()> {
    let server = TestServer::start().await?;
    let token = server.admin_token().await?;

    for date in ["2026-12-01", "2026-12-02"] {
        server.client.post(server.url("/api/appointments")).json(&booking(date)).send().await?;
    }

    let resp = server.client.get(server.url("/api/appointments")).send().await?;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);

    let resp = server.client.get(server.url("/api/appointments")).bearer_auth(&token).send().await?;
    let (_, listing) = body(resp).await?;
    assert_eq!(listing["count"], 2);
    let id = listing["data"][0]["_id"].as_str().unwrap().to_string();

    let resp = server
        .client
        .put(server.url(&format!("/api/appointments/{}", id)))
        .bearer_auth(&token)
        .json(&json!({ "status": "confirmed", "preferredTime": "11:00 AM" }))
        .send()
        .await?;
    let (status, updated) = body(resp).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["data"]["status"], "confirmed");
    assert_eq!(updated["data"]["preferredTime"], "11:00 AM");
    assert_eq!(updated["data"]["clientName"], "Funmi Adeyemi");

    let resp = server.client.get(server.url("/api/appointments/stats")).bearer_auth(&token).send().await?;
    let (_, stats) = body(resp).await?;
    assert_eq!(
        stats["data"],
        json!({ "total": 2, "pending": 1, "confirmed": 1, "cancelled": 0, "completed": 0 })
    );

    let resp = server
        .client
        .get(server.url("/api/appointments?status=confirmed"))
        .bearer_auth(&token)
        .send()
        .await?;
    let (_, confirmed) = body(resp).await?;
    assert_eq!(confirmed["count"], 1);

    let resp = server
        .client
        .delete(server.url(&format!("/api/appointments/{}", id)))
        .bearer_auth(&token)
        .send()
        .await?;
    assert_eq!(resp.status(), StatusCode::OK);
    let resp = server
        .client
        .get(server.url(&format!("/api/appointments/{}", id)))
        .bearer_auth(&token)
        .send()
        .await?;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    Ok(())
}
