mod common;

use anyhow::Result;
use chrono::Utc;
use javelin_api::auth::{encode_claims, Claims};
use javelin_api::database::models::Role;
use javelin_api::filter::Filter;
use reqwest::StatusCode;
use serde_json::json;

use common::{body, TestServer, ADMIN_EMAIL, ADMIN_PASSWORD};

#[tokio::test]
async fn health_endpoint_reports_memory_store() -> Result<()> {
    let server = TestServer::start().await?;
    let (status, json) = body(server.client.get(server.url("/api/health")).send().await?).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["data"]["database"], "connected");
    assert_eq!(json["data"]["store"], "memory");
    assert_eq!(json["data"]["uploads"], "counting");
    Ok(())
}

#[tokio::test]
async fn login_returns_token_and_user() -> Result<()> {
    let server = TestServer::start().await?;
    server.create_user(ADMIN_EMAIL, ADMIN_PASSWORD, Role::Superadmin).await?;

    let resp = server
        .client
        .post(server.url("/api/auth/login"))
        .json(&json!({ "email": "ADMIN@javelin.com", "password": ADMIN_PASSWORD }))
        .send()
        .await?;
    let (status, json) = body(resp).await?;
    assert_eq!(status, StatusCode::OK);
    assert!(json["data"]["token"].as_str().unwrap().split('.').count() == 3);
    assert_eq!(json["data"]["user"]["email"], ADMIN_EMAIL);
    assert!(json["data"]["user"].get("password").is_none());

    let user = server.state.store.users.select_one(Filter::new()).await?.unwrap();
    assert!(user.last_login.is_some());
    Ok(())
}

#[tokio::test]
async fn wrong_password_and_unknown_user_look_the_same() -> Result<()> {
    let server = TestServer::start().await?;
    server.create_user(ADMIN_EMAIL, ADMIN_PASSWORD, Role::Admin).await?;

    for (email, password) in [(ADMIN_EMAIL, "wrong-pass"), ("nobody@javelin.com", ADMIN_PASSWORD)] {
        let resp = server
            .client
            .post(server.url("/api/auth/login"))
            .json(&json!({ "email": email, "password": password }))
            .send()
            .await?;
        let (status, json) = body(resp).await?;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(json["message"], "Invalid credentials");
    }
    Ok(())
}

#[tokio::test]
async fn me_accepts_valid_and_rejects_expired_or_altered_tokens() -> Result<()> {
    let server = TestServer::start().await?;
    let user = server.create_user(ADMIN_EMAIL, ADMIN_PASSWORD, Role::Admin).await?;
    let token = server.token_for(&user)?;

    let resp = server.client.get(server.url("/api/auth/me")).bearer_auth(&token).send().await?;
    let (status, json) = body(resp).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["data"]["_id"], user.id.to_string());

    let past = Utc::now().timestamp() - 3600;
    let expired = encode_claims(
        &server.state.config.security,
        &Claims { id: user.id, role: user.role, iat: past - 60, exp: past },
    )?;

    // Flip the first signature character.
    let (unsigned, signature) = token.rsplit_once('.').unwrap();
    let first = if signature.starts_with('A') { 'B' } else { 'A' };
    let altered = format!("{}.{}{}", unsigned, first, &signature[1..]);

    for bad in [expired.as_str(), altered.as_str(), "not-a-token"] {
        let resp = server.client.get(server.url("/api/auth/me")).bearer_auth(bad).send().await?;
        let (status, json) = body(resp).await?;
        assert_eq!(status, StatusCode::UNAUTHORIZED, "token {bad} was accepted");
        assert_eq!(json["message"], "Not authorized, token failed");
    }

    let resp = server.client.get(server.url("/api/auth/me")).send().await?;
    let (status, json) = body(resp).await?;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(json["message"], "Not authorized, no token");
    Ok(())
}

#[tokio::test]
async fn deactivated_users_are_locked_out() -> Result<()> {
    let server = TestServer::start().await?;
    let mut user = server.create_user(ADMIN_EMAIL, ADMIN_PASSWORD, Role::Admin).await?;
    let token = server.token_for(&user)?;
    user.is_active = false;
    server.state.store.users.update(user).await?;

    let resp = server.client.get(server.url("/api/auth/me")).bearer_auth(&token).send().await?;
    let (status, json) = body(resp).await?;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(json["message"], "User account is deactivated");
    Ok(())
}

#[tokio::test]
async fn first_registration_may_choose_role_then_registration_closes() -> Result<()> {
    let server = TestServer::start_with(|c| c.security.allow_registration = false).await?;

    let resp = server
        .client
        .post(server.url("/api/auth/register"))
        .json(&json!({ "name": "Owner", "email": "owner@javelin.com", "password": "secret1", "role": "superadmin" }))
        .send()
        .await?;
    let (status, json) = body(resp).await?;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(json["data"]["user"]["role"], "superadmin");
    let owner_token = json["data"]["token"].as_str().unwrap().to_string();

    let resp = server
        .client
        .post(server.url("/api/auth/register"))
        .json(&json!({ "name": "Guest", "email": "guest@javelin.com", "password": "secret1" }))
        .send()
        .await?;
    let (status, json) = body(resp).await?;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(json["message"], "Registration is disabled");

    // A superadmin can still add staff, and duplicates conflict.
    for expected in [StatusCode::CREATED, StatusCode::CONFLICT] {
        let resp = server
            .client
            .post(server.url("/api/auth/register"))
            .bearer_auth(&owner_token)
            .json(&json!({ "name": "Staff", "email": "staff@javelin.com", "password": "secret1" }))
            .send()
            .await?;
        assert_eq!(resp.status(), expected);
    }
    Ok(())
}

#[tokio::test]
async fn short_passwords_fail_validation() -> Result<()> {
    let server = TestServer::start().await?;
    let resp = server
        .client
        .post(server.url("/api/auth/register"))
        .json(&json!({ "name": "Short", "email": "short@javelin.com", "password": "123" }))
        .send()
        .await?;
    let (status, json) = body(resp).await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["code"], "VALIDATION_ERROR");
    assert_eq!(server.state.store.users.count(Filter::new()).await?, 0);
    Ok(())
}

#[tokio::test]
async fn password_change_requires_current_password() -> Result<()> {
    let server = TestServer::start().await?;
    let token = server.admin_token().await?;

    let resp = server
        .client
        .put(server.url("/api/auth/password"))
        .bearer_auth(&token)
        .json(&json!({ "currentPassword": "wrong", "newPassword": "newsecret" }))
        .send()
        .await?;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);

    let resp = server
        .client
        .put(server.url("/api/auth/password"))
        .bearer_auth(&token)
        .json(&json!({ "currentPassword": ADMIN_PASSWORD, "newPassword": "newsecret" }))
        .send()
        .await?;
    let (status, json) = body(resp).await?;
    assert_eq!(status, StatusCode::OK);
    assert!(json["data"]["token"].is_string());

    let resp = server
        .client
        .post(server.url("/api/auth/login"))
        .json(&json!({ "email": ADMIN_EMAIL, "password": "newsecret" }))
        .send()
        .await?;
    assert_eq!(resp.status(), StatusCode::OK);
    Ok(())
}

#[tokio::test]
async fn profile_update_trims_and_rejects_blank_names() -> Result<()> {
    let server = TestServer::start().await?;
    let user = server.create_user("guard@javelin.com", "secret123", Role::Admin).await?;
    let token = server.token_for(&user)?;

    let resp = server
        .client
        .put(server.url("/api/auth/profile"))
        .bearer_auth(&token)
        .json(&json!({ "name": "   " }))
        .send()
        .await?;
    let (status, json) = body(resp).await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["errors"]["name"], "Name cannot be empty");

    let resp = server
        .client
        .put(server.url("/api/auth/profile"))
        .bearer_auth(&token)
        .json(&json!({ "name": "  Night Supervisor " }))
        .send()
        .await?;
    let (status, json) = body(resp).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["data"]["name"], "Night Supervisor");
    assert_eq!(json["data"]["email"], "guard@javelin.com");

    let stored = server.state.store.users.find_by_id(user.id).await?.unwrap();
    assert_eq!(stored.name, "Night Supervisor");
    Ok(())
}
