use std::sync::Arc;

use chrono::Utc;
use eventhub_client::auth::{is_token_expired, AuthSession};
use eventhub_client::config::ClientOptions;
use eventhub_client::error::ApiErrorKind;
use eventhub_client::events::Event;
use eventhub_client::store::ClientState;
use eventhub_client::EventHub;
use jsonwebtoken::{encode, EncodingKey, Header};
use serde_json::json;
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn mint(expiry: i64, sub: &str) -> String {
    encode(
        &Header::default(),
        &json!({ "expiry": expiry, "sub": sub }),
        &EncodingKey::from_secret(b"test-secret"),
    )
    .unwrap()
}

fn fresh(sub: &str) -> String {
    mint(Utc::now().timestamp() + 3600, sub)
}

fn stale(sub: &str) -> String {
    mint(Utc::now().timestamp() - 3600, sub)
}

fn hub(server: &MockServer, session: AuthSession) -> EventHub {
    let state = Arc::new(ClientState::with_session(session));
    EventHub::with_state(&server.uri(), ClientOptions::default(), state).unwrap()
}

#[test]
fn test_is_token_expired_with_signed_tokens() {
    assert!(!is_token_expired(&fresh("u1")));
    assert!(is_token_expired(&stale("u1")));

    // A signed token without the expiry claim is unusable
    let no_expiry = encode(
        &Header::default(),
        &json!({ "sub": "u1" }),
        &EncodingKey::from_secret(b"test-secret"),
    )
    .unwrap();
    assert!(is_token_expired(&no_expiry));
}

#[tokio::test]
async fn test_login_then_current_user() {
    let mock_server = MockServer::start().await;
    let token = fresh("u1");

    Mock::given(method("POST"))
        .and(path("/auth/login"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "token": token,
            "refresh_token": "refresh",
            "user": { "id": "u1", "email": "ana@example.com" }
        })))
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/auth/me"))
        .and(header("Authorization", format!("Bearer {}", token).as_str()))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": "u1",
            "email": "ana@example.com",
            "name": "Ana"
        })))
        .mount(&mock_server)
        .await;

    let hub = hub(&mock_server, AuthSession::default());
    hub.auth().login("ana@example.com", "secret").await.unwrap();
    assert!(hub.guard().check_and_refresh().await);

    let user = hub.auth().current_user().await.unwrap();
    assert_eq!(user.name.as_deref(), Some("Ana"));
    assert_eq!(hub.state().user(), Some(user));
}

#[tokio::test]
async fn test_check_and_refresh_without_credentials() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/auth/refresh"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&mock_server)
        .await;

    let hub = hub(&mock_server, AuthSession::default());
    assert!(!hub.guard().check_and_refresh().await);

    let no_refresh = AuthSession {
        token: Some(stale("u1")),
        refresh_token: None,
    };
    let hub = self::hub(&mock_server, no_refresh);
    assert!(!hub.guard().check_and_refresh().await);
}

#[tokio::test]
async fn test_expired_token_is_refreshed() {
    let mock_server = MockServer::start().await;
    let renewed = fresh("u1");

    Mock::given(method("POST"))
        .and(path("/auth/refresh"))
        .and(body_json(json!({ "refresh_token": "r1" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "token": renewed,
            "refresh_token": "r2"
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let hub = hub(&mock_server, AuthSession::new(stale("u1"), "r1"));

    assert!(hub.guard().check_and_refresh().await);
    assert_eq!(hub.state().session(), AuthSession::new(renewed.clone(), "r2"));

    // The renewed token is used without another refresh
    assert!(hub.guard().check_and_refresh().await);
    assert_eq!(
        hub.guard().auth_header().get("Authorization"),
        Some(&format!("Bearer {}", renewed))
    );
}

#[tokio::test]
async fn test_rejected_refresh_logs_out() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/auth/refresh"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({
            "message": "Refresh token expired"
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let hub = hub(&mock_server, AuthSession::new(stale("u1"), "r1"));

    assert!(!hub.guard().check_and_refresh().await);
    assert!(!hub.state().is_authenticated());
    assert!(hub.guard().auth_header().is_empty());
}

#[tokio::test]
async fn test_unauthorized_request_is_refreshed_and_retried() {
    let mock_server = MockServer::start().await;
    let revoked = fresh("old");
    let renewed = fresh("new");

    Mock::given(method("GET"))
        .and(path("/events/e1"))
        .and(header("Authorization", format!("Bearer {}", revoked).as_str()))
        .respond_with(ResponseTemplate::new(401))
        .expect(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("POST"))
        .and(path("/auth/refresh"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "token": renewed
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/events/e1"))
        .and(header("Authorization", format!("Bearer {}", renewed).as_str()))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": "e1",
            "title": "RustConf",
            "start_date": "2030-09-10T08:00:00",
            "end_date": "2030-09-12T18:00:00"
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let hub = hub(&mock_server, AuthSession::new(revoked, "r1"));
    let event: Event = hub.events().get_event("e1").await.unwrap();

    assert_eq!(event.title, "RustConf");
    assert_eq!(hub.state().refresh_token().as_deref(), Some("r1"));
}

#[tokio::test]
async fn test_unauthorized_without_retry_surfaces_error() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/registrations/me"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({
            "message": "Token revoked"
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("POST"))
        .and(path("/auth/refresh"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&mock_server)
        .await;

    let state = Arc::new(ClientState::with_session(AuthSession::new(fresh("u1"), "r1")));
    let options = ClientOptions::default().with_retry_on_unauthorized(false);
    let hub = EventHub::with_state(&mock_server.uri(), options, state).unwrap();

    let err = hub.events().my_registrations().await.unwrap_err();
    assert_eq!(err.api_kind(), Some(ApiErrorKind::AuthenticationError));
    assert!(err.to_string().contains("Token revoked"));
}
