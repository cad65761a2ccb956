//! The shared integration-params slot.
//!
//! The host owns one [`ParamsSlot`] per session and hands clones to whoever
//! needs it. Every clone sees the same record; separate slots never share
//! anything.

use std::sync::Arc;
use tether_core::{Credentials, IntegrationParams, ProviderKind};
use tokio::sync::watch;
use tracing::debug;

/// Caller-owned source of truth for [`IntegrationParams`].
#[derive(Debug, Clone)]
pub struct ParamsSlot {
    tx: Arc<watch::Sender<IntegrationParams>>,
}

impl Default for ParamsSlot {
    fn default() -> Self {
        Self::new()
    }
}

impl ParamsSlot {
    /// Creates an empty slot.
    pub fn new() -> Self {
        Self::with_params(IntegrationParams::default())
    }

    /// Creates a slot holding `params`.
    pub fn with_params(params: IntegrationParams) -> Self {
        let (tx, _) = watch::channel(params);
        Self { tx: Arc::new(tx) }
    }

    /// Returns a copy of the current record.
    pub fn get(&self) -> IntegrationParams {
        self.tx.borrow().clone()
    }

    /// Returns the credentials if they belong to `kind`.
    pub fn credentials_for(&self, kind: ProviderKind) -> Option<Credentials> {
        self.tx.borrow().credentials_for(kind).cloned()
    }

    /// Replaces the record.
    pub fn set(&self, params: IntegrationParams) {
        self.tx.send_replace(params);
    }

    /// Read-modify-write under the channel lock.
    ///
    /// Observers see the record before or after `f`, never in between.
    pub fn update<F>(&self, f: F)
    where
        F: FnOnce(&mut IntegrationParams),
    {
        self.tx.send_modify(f);
    }

    /// Records a successful connection: provider and credentials together.
    pub fn record_connection(&self, kind: ProviderKind, credentials: Credentials) {
        self.update(|params| *params = params.with_connection(kind, credentials));
        debug!(provider = %kind, "Stored credentials");
    }

    /// External reset, e.g. the host switched provider.
    ///
    /// Selects `kind` and drops any credentials. Extra fields survive.
    pub fn reset(&self, kind: ProviderKind) {
        self.update(|params| {
            params.kind = Some(kind);
            params.credentials = None;
        });
        debug!(provider = %kind, "Params reset");
    }

    /// Subscribes to changes.
    pub fn subscribe(&self) -> watch::Receiver<IntegrationParams> {
        self.tx.subscribe()
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn creds(token: &str) -> Credentials {
        Credentials::from_payload(json!({ "token": token })).unwrap()
    }

    #[test]
    fn test_new_slot_is_empty() {
        let slot = ParamsSlot::new();
        let params = slot.get();
        assert!(params.kind.is_none());
        assert!(params.credentials.is_none());
    }

    #[test]
    fn test_clones_share_record() {
        let slot = ParamsSlot::new();
        let other = slot.clone();

        other.record_connection(ProviderKind::Notion, creds("abc"));

        assert!(slot.get().is_connected_to(ProviderKind::Notion));
        assert_eq!(
            slot.credentials_for(ProviderKind::Notion),
            Some(creds("abc"))
        );
    }

    #[test]
    fn test_separate_slots_isolated() {
        let a = ParamsSlot::new();
        let b = ParamsSlot::new();

        a.record_connection(ProviderKind::Hubspot, creds("abc"));

        assert!(a.get().is_connected_to(ProviderKind::Hubspot));
        assert!(!b.get().is_connected_to(ProviderKind::Hubspot));
    }

    #[test]
    fn test_record_connection_keeps_extra_fields() {
        let mut params = IntegrationParams::new();
        params.extra.insert("note".into(), json!("keep"));
        let slot = ParamsSlot::with_params(params);

        slot.record_connection(ProviderKind::Airtable, creds("t"));

        let params = slot.get();
        assert_eq!(params.kind, Some(ProviderKind::Airtable));
        assert_eq!(params.extra.get("note"), Some(&json!("keep")));
    }

    #[test]
    fn test_reset_clears_credentials() {
        let slot = ParamsSlot::new();
        slot.record_connection(ProviderKind::Hubspot, creds("abc"));

        slot.reset(ProviderKind::Notion);

        let params = slot.get();
        assert_eq!(params.kind, Some(ProviderKind::Notion));
        assert!(params.credentials.is_none());
    }

    #[test]
    fn test_credentials_for_other_provider() {
        let slot = ParamsSlot::new();
        slot.record_connection(ProviderKind::Hubspot, creds("abc"));
        assert!(slot.credentials_for(ProviderKind::Notion).is_none());
    }

    #[tokio::test]
    async fn test_subscribe_sees_update() {
        let slot = ParamsSlot::new();
        let mut rx = slot.subscribe();

        slot.record_connection(ProviderKind::Notion, creds("abc"));

        rx.changed().await.unwrap();
        assert!(rx.borrow().is_connected_to(ProviderKind::Notion));
    }

    #[tokio::test]
    async fn test_update_is_single_notification() {
        let slot = ParamsSlot::new();
        let mut rx = slot.subscribe();

        slot.update(|p| {
            p.kind = Some(ProviderKind::Hubspot);
            p.credentials = Some(creds("x"));
        });

        rx.changed().await.unwrap();
        let seen = rx.borrow_and_update().clone();
        assert!(seen.is_connected_to(ProviderKind::Hubspot));
        assert!(!rx.has_changed().unwrap());
    }
}
