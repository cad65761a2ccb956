//! End-to-end tests of the connection state machine with scripted fakes.

mod support;

use serde_json::json;
use std::sync::Arc;
use std::sync::atomic::Ordering;
use std::time::Duration;
use support::{Reply, ScriptedBackend, ScriptedWindows, WindowScript, context, fast_detector, identity};
use tether_connect::{
    AUTHORIZATION_FAILED, CREDENTIALS_FAILED, ChannelNotifier, ConnectOutcome,
    IntegrationConnection, NoticeStage,
};
use tether_core::{
    AffordanceTone, ConnectionStatus, Credentials, IntegrationParams, ProviderKind,
};
use tether_fetch::WindowSize;
use tether_store::ParamsSlot;

struct Harness {
    backend: Arc<ScriptedBackend>,
    windows: Arc<ScriptedWindows>,
    params: ParamsSlot,
    notices: tokio::sync::mpsc::UnboundedReceiver<tether_connect::Notice>,
    conn: IntegrationConnection,
}

fn harness(kind: ProviderKind, script: WindowScript, params: ParamsSlot) -> Harness {
    let backend = ScriptedBackend::new();
    let windows = ScriptedWindows::new(script);
    let (notifier, notices) = ChannelNotifier::new();
    let conn = IntegrationConnection::for_provider(
        identity(),
        kind,
        params.clone(),
        context(&backend, &windows),
    )
    .unwrap()
    .with_notifier(notifier)
    .with_detector(fast_detector());

    Harness {
        backend,
        windows,
        params,
        notices,
        conn,
    }
}

fn connected_params(kind: ProviderKind) -> IntegrationParams {
    IntegrationParams::new().with_connection(
        kind,
        Credentials::from_payload(json!({"token": "existing"})).unwrap(),
    )
}

// ============================================================================
// Full Flow
// ============================================================================

#[tokio::test]
async fn test_hubspot_connects_and_stores_credentials() {
    let mut h = harness(ProviderKind::Hubspot, WindowScript::ClosesAfter(1), ParamsSlot::new());
    h.backend.on_credentials(Reply::Json(json!({"token": "abc"})));

    assert_eq!(h.conn.status(), ConnectionStatus::Disconnected);
    let outcome = h.conn.connect().await;

    assert_eq!(outcome, ConnectOutcome::Connected);
    assert_eq!(h.conn.status(), ConnectionStatus::Connected);
    assert_eq!(
        serde_json::to_value(h.params.get()).unwrap(),
        json!({"type": "Hubspot", "credentials": {"token": "abc"}})
    );

    let opened = h.windows.opened();
    assert_eq!(opened.len(), 1);
    assert_eq!(opened[0].url, "https://auth.example/x");
    assert_eq!(opened[0].title, "Hubspot Authorization");
    assert_eq!(opened[0].size, WindowSize::default());
    assert_eq!(opened[0].checks.load(Ordering::SeqCst), 2);

    assert_eq!(
        h.backend.calls(),
        vec![
            "/integrations/hubspot/authorize".to_string(),
            "/integrations/hubspot/credentials".to_string(),
        ]
    );
    assert!(h.notices.try_recv().is_err());
}

#[tokio::test]
async fn test_credentials_pass_through_unchanged() {
    let h = harness(ProviderKind::Notion, WindowScript::ClosesAfter(0), ParamsSlot::new());
    let raw = r#"{"z":1,"access_token":"t-1","nested":{"b":[1,"x"],"a":null},"scope":"read"}"#;
    h.backend
        .on_credentials(Reply::Json(serde_json::from_str(raw).unwrap()));

    assert!(h.conn.connect().await.is_connected());

    let stored = h.conn.credentials().unwrap();
    assert_eq!(stored.to_json_string().unwrap(), raw);
}

#[tokio::test]
async fn test_missing_window_handle_goes_straight_to_exchange() {
    let h = harness(ProviderKind::Airtable, WindowScript::NoHandle, ParamsSlot::new());
    h.backend.on_credentials(Reply::Json(json!({"token": "abc"})));

    assert_eq!(h.conn.connect().await, ConnectOutcome::Connected);
    assert_eq!(h.windows.open_calls(), 1);
    assert!(h.windows.opened().is_empty());
}

// ============================================================================
// Abandoned and Failed Attempts
// ============================================================================

#[tokio::test]
async fn test_null_credentials_is_silent_abandon() {
    let mut h = harness(ProviderKind::Hubspot, WindowScript::ClosesAfter(1), ParamsSlot::new());
    h.backend.on_credentials(Reply::Json(json!(null)));
    let before = h.params.get();

    assert_eq!(h.conn.connect().await, ConnectOutcome::Abandoned);

    assert_eq!(h.conn.status(), ConnectionStatus::Disconnected);
    assert_eq!(h.params.get(), before);
    assert!(h.notices.try_recv().is_err());
}

#[tokio::test]
async fn test_falsy_payloads_abandon() {
    for payload in [json!(false), json!(""), json!(0)] {
        let h = harness(ProviderKind::Notion, WindowScript::ClosesAfter(0), ParamsSlot::new());
        h.backend.on_credentials(Reply::Json(payload.clone()));

        assert_eq!(h.conn.connect().await, ConnectOutcome::Abandoned, "{payload}");
        assert!(h.params.get().credentials.is_none());
    }
}

#[tokio::test]
async fn test_authorize_error_opens_no_window() {
    let mut h = harness(ProviderKind::Hubspot, WindowScript::ClosesAfter(0), ParamsSlot::new());
    h.backend.on_authorize(Reply::Status(400, Some("bad org")));

    let outcome = h.conn.connect().await;

    assert_eq!(outcome, ConnectOutcome::Failed("bad org".to_string()));
    assert_eq!(h.windows.open_calls(), 0);
    assert_eq!(h.conn.status(), ConnectionStatus::Disconnected);
    assert_eq!(h.backend.calls(), vec!["/integrations/hubspot/authorize".to_string()]);

    let notice = h.notices.try_recv().unwrap();
    assert_eq!(notice.message, "bad org");
    assert_eq!(notice.stage, NoticeStage::Authorization);
    assert_eq!(notice.provider, ProviderKind::Hubspot);
    assert!(h.notices.try_recv().is_err());
}

#[tokio::test]
async fn test_authorize_error_without_detail_uses_fallback() {
    let mut h = harness(ProviderKind::Notion, WindowScript::ClosesAfter(0), ParamsSlot::new());
    h.backend.on_authorize(Reply::Status(502, None));

    assert_eq!(
        h.conn.connect().await,
        ConnectOutcome::Failed(AUTHORIZATION_FAILED.to_string())
    );
    assert_eq!(h.notices.try_recv().unwrap().message, AUTHORIZATION_FAILED);
}

#[tokio::test]
async fn test_exchange_error_returns_to_disconnected() {
    let mut h = harness(ProviderKind::Airtable, WindowScript::ClosesAfter(0), ParamsSlot::new());
    h.backend.on_credentials(Reply::Status(500, None));

    assert_eq!(
        h.conn.connect().await,
        ConnectOutcome::Failed(CREDENTIALS_FAILED.to_string())
    );
    assert_eq!(h.conn.status(), ConnectionStatus::Disconnected);
    assert!(h.params.get().credentials.is_none());

    let notice = h.notices.try_recv().unwrap();
    assert_eq!(notice.stage, NoticeStage::Credentials);
    assert_eq!(notice.message, CREDENTIALS_FAILED);
}

#[tokio::test]
async fn test_exchange_is_not_retried() {
    let h = harness(ProviderKind::Notion, WindowScript::ClosesAfter(0), ParamsSlot::new());
    h.backend.on_credentials(Reply::Status(503, Some("try later")));

    h.conn.connect().await;

    let exchanges = h
        .backend
        .calls()
        .iter()
        .filter(|p| p.ends_with("/credentials"))
        .count();
    assert_eq!(exchanges, 1);
}

#[tokio::test]
async fn test_retry_after_abandon_launches_again() {
    let h = harness(ProviderKind::Hubspot, WindowScript::ClosesAfter(0), ParamsSlot::new());

    assert_eq!(h.conn.connect().await, ConnectOutcome::Abandoned);
    h.backend.on_credentials(Reply::Json(json!({"token": "abc"})));
    assert_eq!(h.conn.connect().await, ConnectOutcome::Connected);

    assert_eq!(h.windows.open_calls(), 2);
    assert_eq!(
        h.backend
            .calls()
            .iter()
            .filter(|p| p.ends_with("/authorize"))
            .count(),
        2
    );
}

// ============================================================================
// Derived Status
// ============================================================================

#[tokio::test]
async fn test_existing_credentials_start_connected() {
    for kind in ProviderKind::all() {
        let h = harness(
            *kind,
            WindowScript::ClosesAfter(0),
            ParamsSlot::with_params(connected_params(*kind)),
        );
        assert_eq!(h.conn.status(), ConnectionStatus::Connected);

        let affordance = h.conn.affordance();
        assert!(!affordance.enabled);
        assert_eq!(affordance.tone, AffordanceTone::Success);
        assert_eq!(affordance.label, format!("{} Connected", kind.display_name()));
    }
}

#[tokio::test]
async fn test_credentials_for_other_provider_do_not_count() {
    let h = harness(
        ProviderKind::Notion,
        WindowScript::ClosesAfter(0),
        ParamsSlot::with_params(connected_params(ProviderKind::Hubspot)),
    );
    assert_eq!(h.conn.status(), ConnectionStatus::Disconnected);
    assert!(h.conn.affordance().enabled);
    assert_eq!(h.conn.affordance().label, "Connect to Notion");
}

#[tokio::test]
async fn test_connect_when_connected_is_rejected() {
    let h = harness(
        ProviderKind::Hubspot,
        WindowScript::ClosesAfter(0),
        ParamsSlot::with_params(connected_params(ProviderKind::Hubspot)),
    );

    assert_eq!(
        h.conn.connect().await,
        ConnectOutcome::Rejected(ConnectionStatus::Connected)
    );
    assert!(h.backend.calls().is_empty());
    assert_eq!(h.windows.open_calls(), 0);
}

#[tokio::test]
async fn test_external_reset_rederives_status() {
    let h = harness(
        ProviderKind::Hubspot,
        WindowScript::ClosesAfter(0),
        ParamsSlot::with_params(connected_params(ProviderKind::Hubspot)),
    );
    assert_eq!(h.conn.status(), ConnectionStatus::Connected);

    h.params.reset(ProviderKind::Hubspot);

    assert_eq!(h.conn.status(), ConnectionStatus::Disconnected);
    assert!(h.conn.affordance().enabled);
}

#[tokio::test]
async fn test_instances_do_not_cross_talk() {
    let a = harness(ProviderKind::Notion, WindowScript::ClosesAfter(0), ParamsSlot::new());
    let b = harness(ProviderKind::Notion, WindowScript::ClosesAfter(0), ParamsSlot::new());
    a.backend.on_credentials(Reply::Json(json!({"token": "a"})));

    assert!(a.conn.connect().await.is_connected());

    assert_eq!(a.conn.status(), ConnectionStatus::Connected);
    assert_eq!(b.conn.status(), ConnectionStatus::Disconnected);
    assert!(b.backend.calls().is_empty());
}

// ============================================================================
// Concurrency and Cancellation
// ============================================================================

async fn wait_for_status(conn: &IntegrationConnection, status: ConnectionStatus) {
    let mut watch = conn.subscribe();
    while watch.current() != status {
        tokio::time::timeout(Duration::from_secs(2), watch.changed())
            .await
            .expect("status change")
            .expect("connection alive");
    }
}

#[tokio::test]
async fn test_second_connect_while_connecting_is_rejected() {
    let h = harness(ProviderKind::Hubspot, WindowScript::StaysOpen, ParamsSlot::new());
    let conn = Arc::new(h.conn);

    let first = tokio::spawn({
        let conn = conn.clone();
        async move { conn.connect().await }
    });
    wait_for_status(&conn, ConnectionStatus::Connecting).await;

    let affordance = conn.affordance();
    assert!(!affordance.enabled);
    assert!(affordance.busy);
    assert_eq!(
        conn.connect().await,
        ConnectOutcome::Rejected(ConnectionStatus::Connecting)
    );
    assert_eq!(h.windows.open_calls(), 1);

    conn.shutdown();
    assert_eq!(first.await.unwrap(), ConnectOutcome::Cancelled);
    assert_eq!(conn.status(), ConnectionStatus::Disconnected);
}

#[tokio::test]
async fn test_shutdown_stops_poll_without_exchange() {
    let h = harness(ProviderKind::Notion, WindowScript::StaysOpen, ParamsSlot::new());
    h.backend.on_credentials(Reply::Json(json!({"token": "abc"})));
    let conn = Arc::new(h.conn);

    let attempt = tokio::spawn({
        let conn = conn.clone();
        async move { conn.connect().await }
    });
    wait_for_status(&conn, ConnectionStatus::Connecting).await;
    tokio::time::sleep(Duration::from_millis(20)).await;

    conn.shutdown();
    assert_eq!(attempt.await.unwrap(), ConnectOutcome::Cancelled);

    let window = &h.windows.opened()[0];
    let checks = window.checks.load(Ordering::SeqCst);
    tokio::time::sleep(Duration::from_millis(40)).await;
    assert_eq!(window.checks.load(Ordering::SeqCst), checks);
    assert!(window.closed_by_host.load(Ordering::SeqCst));

    assert!(!h.backend.calls().iter().any(|p| p.ends_with("/credentials")));
    assert!(h.params.get().credentials.is_none());
}

#[tokio::test]
async fn test_interrupt_closes_window_before_returning() {
    let h = harness(ProviderKind::Hubspot, WindowScript::StaysOpen, ParamsSlot::new());
    h.backend.on_credentials(Reply::Json(json!({"token": "abc"})));

    let outcome = h
        .conn
        .connect_until(tokio::time::sleep(Duration::from_millis(30)))
        .await;

    assert_eq!(outcome, ConnectOutcome::Cancelled);
    // No grace period: the window is closed by the time the attempt returns
    assert!(h.windows.opened()[0].closed_by_host.load(Ordering::SeqCst));
    assert!(h.conn.is_shut_down());
    assert_eq!(h.conn.status(), ConnectionStatus::Disconnected);
    assert!(!h.backend.calls().iter().any(|p| p.ends_with("/credentials")));
}

#[tokio::test]
async fn test_connect_until_finishes_without_interrupt() {
    let h = harness(ProviderKind::Notion, WindowScript::ClosesAfter(1), ParamsSlot::new());
    h.backend.on_credentials(Reply::Json(json!({"token": "abc"})));

    let outcome = h.conn.connect_until(std::future::pending()).await;

    assert_eq!(outcome, ConnectOutcome::Connected);
    assert!(!h.conn.is_shut_down());
}

#[tokio::test]
async fn test_connect_after_shutdown_does_nothing() {
    let h = harness(ProviderKind::Notion, WindowScript::ClosesAfter(0), ParamsSlot::new());
    h.conn.shutdown();

    assert_eq!(h.conn.connect().await, ConnectOutcome::Cancelled);
    assert!(h.conn.is_shut_down());
    assert!(h.backend.calls().is_empty());
}

#[tokio::test]
async fn test_dropping_attempt_clears_in_flight() {
    let h = harness(ProviderKind::Airtable, WindowScript::StaysOpen, ParamsSlot::new());

    let attempt = tokio::time::timeout(Duration::from_millis(50), h.conn.connect()).await;

    assert!(attempt.is_err());
    assert_eq!(h.conn.status(), ConnectionStatus::Disconnected);
}

#[tokio::test]
async fn test_subscribe_sees_connecting_then_connected() {
    let h = harness(ProviderKind::Hubspot, WindowScript::ClosesAfter(2), ParamsSlot::new());
    h.backend.on_credentials(Reply::Json(json!({"token": "abc"})));
    let conn = Arc::new(h.conn);
    let mut watch = conn.subscribe();
    assert_eq!(watch.current(), ConnectionStatus::Disconnected);

    let attempt = tokio::spawn({
        let conn = conn.clone();
        async move { conn.connect().await }
    });

    assert_eq!(watch.changed().await, Some(ConnectionStatus::Connecting));
    assert_eq!(watch.changed().await, Some(ConnectionStatus::Connected));
    assert_eq!(attempt.await.unwrap(), ConnectOutcome::Connected);
}
