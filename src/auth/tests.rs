//! Tests for the auth module

use super::*;
use crate::config::Credentials;
use crate::error::Error;
use wiremock::matchers::{body_string_contains, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn authenticator(server: &MockServer) -> Authenticator {
    Authenticator::new(
        format!("{}/oauth/token", server.uri()),
        Credentials::new("my-client", "my-secret"),
    )
}

#[tokio::test]
async fn test_client_credentials_exchange() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/oauth/token"))
        .and(query_param("grant_type", "client_credentials"))
        .and(body_string_contains("client_id=my-client"))
        .and(body_string_contains("client_secret=my-secret"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "access_token": "oauth-token-123",
            "expires_in": 3600,
            "token_type": "bearer"
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let auth = authenticator(&mock_server);

    let client = reqwest::Client::new();
    let req = client.get("https://example.com/api");
    let req = auth.apply(req).await.unwrap();

    let built = req.build().unwrap();
    assert_eq!(
        built.headers().get("Authorization").unwrap(),
        "Bearer oauth-token-123"
    );
}

#[tokio::test]
async fn test_token_caching() {
    let mock_server = MockServer::start().await;

    // Only one token request per authenticator lifetime
    Mock::given(method("POST"))
        .and(path("/oauth/token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "access_token": "cached-token"
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let auth = authenticator(&mock_server);
    assert!(!auth.has_token().await);

    assert_eq!(auth.token().await.unwrap(), "cached-token");
    assert_eq!(auth.token().await.unwrap(), "cached-token");
    assert!(auth.has_token().await);
}

#[tokio::test]
async fn test_expired_token_is_refetched() {
    let mock_server = MockServer::start().await;

    // expires_in below the 30s buffer makes the token stale immediately
    Mock::given(method("POST"))
        .and(path("/oauth/token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "access_token": "short-lived",
            "expires_in": 5
        })))
        .expect(2)
        .mount(&mock_server)
        .await;

    let auth = authenticator(&mock_server);
    auth.token().await.unwrap();
    auth.token().await.unwrap();
}

#[tokio::test]
async fn test_clear_cache() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/oauth/token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "access_token": "token"
        })))
        .expect(2)
        .mount(&mock_server)
        .await;

    let auth = authenticator(&mock_server);
    auth.token().await.unwrap();
    auth.clear_cache().await;
    assert!(!auth.has_token().await);
    auth.token().await.unwrap();
}

#[tokio::test]
async fn test_non_success_status_is_auth_error() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/oauth/token"))
        .respond_with(ResponseTemplate::new(401).set_body_string("invalid_client"))
        .mount(&mock_server)
        .await;

    let auth = authenticator(&mock_server);
    let err = auth.token().await.unwrap_err();

    assert!(matches!(err, Error::Auth { .. }));
    let message = err.to_string();
    assert!(message.contains("401"));
    assert!(message.contains("invalid_client"));
}

#[tokio::test]
async fn test_missing_access_token_is_auth_error() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/oauth/token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "token_type": "bearer"
        })))
        .mount(&mock_server)
        .await;

    let auth = authenticator(&mock_server);
    let err = auth.token().await.unwrap_err();
    assert!(matches!(err, Error::Auth { .. }));
    assert!(err.to_string().contains("access_token"));
    assert!(!auth.has_token().await);
}

#[tokio::test]
async fn test_non_json_body_is_auth_error() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/oauth/token"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>maintenance</html>"))
        .mount(&mock_server)
        .await;

    let auth = authenticator(&mock_server);
    assert!(matches!(auth.token().await, Err(Error::Auth { .. })));
}

#[test]
fn test_debug_hides_secret() {
    let auth = Authenticator::new(
        "https://app.pingboard.com/oauth/token",
        Credentials::new("client", "hunter2"),
    );
    let debug = format!("{auth:?}");
    assert!(debug.contains("app.pingboard.com"));
    assert!(!debug.contains("hunter2"));
    assert_eq!(auth.token_url(), "https://app.pingboard.com/oauth/token");
}
