mod common;

use std::sync::Arc;

use anyhow::Result;
use chrono::Utc;
use javelin_api::auth::{encode_claims, Claims};
use javelin_api::client::{
    ApiClient, BookingStep, BookingWizard, ClientError, ContactRequest, MemorySessionStore, SessionStore,
};
use javelin_api::database::models::{AppointmentStatus, MeetingType, Role};

use common::{TestServer, ADMIN_EMAIL, ADMIN_PASSWORD};

#[tokio::test]
async fn login_stores_session_and_unlocks_admin_calls() -> Result<()> {
    let server = TestServer::start().await?;
    server.create_user(ADMIN_EMAIL, ADMIN_PASSWORD, Role::Superadmin).await?;

    let sessions = Arc::new(MemorySessionStore::new());
    let client = ApiClient::new(server.api_url(), sessions.clone())?;

    let session = client.login(ADMIN_EMAIL, ADMIN_PASSWORD).await?;
    assert_eq!(sessions.load().await?.map(|s| s.token), Some(session.token.clone()));

    let me = client.me().await?;
    assert_eq!(me.email, ADMIN_EMAIL);

    let stats = client.appointment_stats().await?;
    assert_eq!(stats["total"], 0);

    client.logout().await?;
    assert!(sessions.load().await?.is_none());
    Ok(())
}

#[tokio::test]
async fn bad_credentials_surface_the_server_message() -> Result<()> {
    let server = TestServer::start().await?;
    let client = ApiClient::new(server.api_url(), Arc::new(MemorySessionStore::new()))?;

    match client.login("ghost@javelin.com", "nope").await {
        Err(ClientError::Api { status, message }) => {
            assert_eq!(status, 401);
            assert_eq!(message, "Invalid credentials");
        }
        other => panic!("unexpected result: {other:?}"),
    }
    Ok(())
}

#[tokio::test]
async fn expired_session_is_cleared_on_401() -> Result<()> {
    let server = TestServer::start().await?;
    let user = server.create_user(ADMIN_EMAIL, ADMIN_PASSWORD, Role::Admin).await?;
    let past = Utc::now().timestamp() - 60;
    let expired = encode_claims(
        &server.state.config.security,
        &Claims { id: user.id, role: user.role, iat: past - 60, exp: past },
    )?;

    let sessions = Arc::new(MemorySessionStore::with_token(expired));
    let client = ApiClient::new(server.api_url(), sessions.clone())?;

    assert!(matches!(client.me().await, Err(ClientError::SessionExpired)));
    assert!(sessions.load().await?.is_none());
    Ok(())
}

#[tokio::test]
async fn malformed_tokens_are_never_sent() -> Result<()> {
    let server = TestServer::start().await?;
    let sessions = Arc::new(MemorySessionStore::with_token("undefined"));
    let client = ApiClient::new(server.api_url(), sessions.clone())?;

    // No bearer goes out, so the 401 is an ordinary API error and the
    // stored value is left alone.
    match client.me().await {
        Err(ClientError::Api { status: 401, message }) => assert_eq!(message, "Not authorized, no token"),
        other => panic!("unexpected result: {other:?}"),
    }
    assert!(sessions.load().await?.is_some());
    Ok(())
}

#[tokio::test]
async fn booking_wizard_submits_once_every_step_is_complete() -> Result<()> {
    let server = TestServer::start().await?;
    let token = server.admin_token().await?;
    let client = ApiClient::new(server.api_url(), Arc::new(MemorySessionStore::new()))?;

    let mut wizard = BookingWizard::new();
    wizard.details.client_name = "Bisi Lawal".to_string();
    wizard.details.company_name = "Lawal Foods".to_string();
    wizard.details.email = "bisi@lawalfoods.ng".to_string();
    wizard.details.phone = "+234 809 000 2222".to_string();
    wizard.details.meeting_type = Some(MeetingType::InPerson);

    // Schedule is missing: nothing is sent.
    assert!(matches!(wizard.submit(&client).await, Err(ClientError::IncompleteStep("Schedule"))));
    assert_eq!(wizard.step(), BookingStep::Schedule);
    assert_eq!(server.state.store.appointments.count(Default::default()).await?, 0);

    wizard.details.preferred_date = "2026-11-20".to_string();
    wizard.details.preferred_time = "02:00 PM".to_string();
    wizard.details.service_interest = "event-security".to_string();
    let confirmation = wizard.submit(&client).await?;
    assert!(confirmation.reference.starts_with("JVL-"));
    assert_eq!(confirmation.appointment.status, AppointmentStatus::Pending);
    assert_eq!(confirmation.appointment.alternate_date, None);

    let admin = ApiClient::new(server.api_url(), Arc::new(MemorySessionStore::with_token(token)))?;
    let confirmed = admin
        .set_appointment_status(confirmation.appointment.id, AppointmentStatus::Confirmed)
        .await?;
    assert_eq!(confirmed.status, AppointmentStatus::Confirmed);
    assert_eq!(admin.appointments(Some("confirmed")).await?.len(), 1);
    Ok(())
}

#[tokio::test]
async fn public_content_and_contact_round_trip() -> Result<()> {
    let server = TestServer::start().await?;
    let token = server.admin_token().await?;
    let client = ApiClient::new(server.api_url(), Arc::new(MemorySessionStore::new()))?;

    assert!(client.team().await?.is_empty());
    assert!(client.sites().await?.is_empty());
    assert!(client.gallery(Some("events")).await?.is_empty());
    let news = client.news(1, 10).await?;
    assert_eq!((news.total, news.current_page), (0, 1));
    assert_eq!(client.contact_info().await?.company_name, "Javelin Security");

    let id = client
        .submit_contact(&ContactRequest {
            name: "Tunde".to_string(),
            email: "tunde@example.com".to_string(),
            phone: None,
            subject: "Patrol quote".to_string(),
            message: "Two vehicles, nightly.".to_string(),
        })
        .await?;

    let admin = ApiClient::new(server.api_url(), Arc::new(MemorySessionStore::with_token(token)))?;
    let inbox = admin.contacts(Some("new"), 1).await?;
    assert_eq!(inbox.items.len(), 1);
    assert_eq!(inbox.items[0].id, id);
    assert_eq!(admin.contact_stats().await?["unread"], 1);

    assert!(matches!(client.news_by_slug("missing").await, Err(ClientError::Api { status: 404, .. })));
    Ok(())
}
