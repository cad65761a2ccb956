//! HTTP backend tests against a mock server.

use mockito::{Matcher, Server};
use serde_json::json;
use tether_core::{Credentials, IntegrationRoute, SessionIdentity};
use tether_fetch::{BackendError, HttpBackend, IntegrationBackend};

fn identity() -> SessionIdentity {
    SessionIdentity::new("u1", "o1").unwrap()
}

fn session_form() -> Matcher {
    Matcher::AllOf(vec![
        Matcher::UrlEncoded("user_id".into(), "u1".into()),
        Matcher::UrlEncoded("org_id".into(), "o1".into()),
    ])
}

#[tokio::test]
async fn test_authorize_returns_url() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("POST", "/integrations/hubspot/authorize")
        .match_body(session_form())
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#""https://auth.example/x""#)
        .create_async()
        .await;

    let backend = HttpBackend::new(&server.url()).unwrap();
    let url = backend
        .authorize(&IntegrationRoute::new("hubspot"), &identity())
        .await
        .unwrap();

    assert_eq!(url.as_str(), "https://auth.example/x");
    mock.assert_async().await;
}

#[tokio::test]
async fn test_authorize_surfaces_detail() {
    let mut server = Server::new_async().await;
    let _mock = server
        .mock("POST", "/integrations/hubspot/authorize")
        .with_status(400)
        .with_header("content-type", "application/json")
        .with_body(r#"{"detail":"bad org"}"#)
        .create_async()
        .await;

    let backend = HttpBackend::new(&server.url()).unwrap();
    let err = backend
        .authorize(&IntegrationRoute::new("hubspot"), &identity())
        .await
        .unwrap_err();

    assert!(matches!(err, BackendError::Server { status: 400, .. }));
    assert_eq!(err.user_message("fallback"), "bad org");
}

#[tokio::test]
async fn test_credentials_payload_passthrough() {
    let mut server = Server::new_async().await;
    let _mock = server
        .mock("POST", "/integrations/notion/credentials")
        .match_body(session_form())
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"token":"abc","workspace_id":"w1","expires_in":3600}"#)
        .create_async()
        .await;

    let backend = HttpBackend::new(&server.url()).unwrap();
    let payload = backend
        .credentials(&IntegrationRoute::new("notion"), &identity())
        .await
        .unwrap();

    assert_eq!(payload, json!({"token": "abc", "workspace_id": "w1", "expires_in": 3600}));
    assert_eq!(
        serde_json::to_string(&payload).unwrap(),
        r#"{"token":"abc","workspace_id":"w1","expires_in":3600}"#
    );
}

#[tokio::test]
async fn test_credentials_null() {
    let mut server = Server::new_async().await;
    let _mock = server
        .mock("POST", "/integrations/airtable/credentials")
        .with_status(200)
        .with_body("null")
        .create_async()
        .await;

    let backend = HttpBackend::new(&server.url()).unwrap();
    let payload = backend
        .credentials(&IntegrationRoute::new("airtable"), &identity())
        .await
        .unwrap();

    assert!(payload.is_null());
}

#[tokio::test]
async fn test_load_uses_route_override_and_encodes_credentials() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("POST", "/integrations/hubspot/get_hubspot_items")
        .match_body(Matcher::UrlEncoded(
            "credentials".into(),
            r#"{"access_token":"abc"}"#.into(),
        ))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"[{"id":"1","type":"hubspot_object","name":"Ada"}]"#)
        .create_async()
        .await;

    let backend = HttpBackend::new(&server.url()).unwrap();
    let route = IntegrationRoute::new("hubspot").with_load_action("get_hubspot_items");
    let creds = Credentials::from_payload(json!({"access_token": "abc"})).unwrap();

    let snapshot = backend.load(&route, &creds).await.unwrap();

    let items = snapshot.items().unwrap();
    assert_eq!(items.len(), 1);
    assert_eq!(items[0].display_name(), "Ada");
    mock.assert_async().await;
}

#[tokio::test]
async fn test_load_error_without_detail() {
    let mut server = Server::new_async().await;
    let _mock = server
        .mock("POST", "/integrations/notion/load")
        .with_status(500)
        .with_body("Internal Server Error")
        .create_async()
        .await;

    let backend = HttpBackend::new(&server.url()).unwrap();
    let creds = Credentials::from_payload(json!({"token": "abc"})).unwrap();
    let err = backend
        .load(&IntegrationRoute::new("notion"), &creds)
        .await
        .unwrap_err();

    assert_eq!(err.user_message("An error occurred"), "An error occurred");
    assert_eq!(err.status(), Some(500));
}

#[tokio::test]
async fn test_transport_error() {
    // Nothing listens on port 9 (discard) on test hosts
    let backend = HttpBackend::new("http://127.0.0.1:9").unwrap();
    let err = backend
        .credentials(&IntegrationRoute::new("notion"), &identity())
        .await
        .unwrap_err();

    assert!(matches!(err, BackendError::Transport(_)));
    assert_eq!(
        err.user_message("An error occurred while fetching credentials."),
        "An error occurred while fetching credentials."
    );
}
