//! Retrieves a data snapshot with stored credentials.
//!
//! The retriever owns the display panel: the last snapshot and whether the
//! panel is expanded. A successful load replaces the snapshot and expands
//! the panel; a failed one leaves both untouched.

use std::sync::Arc;
use tether_core::{CoreError, Credentials, ProviderKind, RetrievedSnapshot};
use tether_fetch::IntegrationBackend;
use tether_providers::ProviderRegistry;
use tether_store::ParamsSlot;
use tokio::sync::watch;
use tracing::{debug, info, instrument, warn};

use crate::error::ConnectError;
use crate::notice::{LogNotifier, Notice, NoticeStage, Notifier};

/// What the display region shows.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DataPanel {
    /// Last retrieved snapshot.
    pub snapshot: Option<RetrievedSnapshot>,
    /// Whether the panel is expanded.
    pub expanded: bool,
}

/// How a load ended.
#[derive(Debug, Clone, PartialEq)]
pub enum LoadOutcome {
    /// The snapshot was stored and the panel expanded.
    Loaded(RetrievedSnapshot),
    /// The request failed; the message was shown to the user.
    Failed(String),
}

/// Loads snapshots for any provider through its route.
pub struct DataRetriever {
    backend: Arc<dyn IntegrationBackend>,
    notifier: Arc<dyn Notifier>,
    panel: watch::Sender<DataPanel>,
}

impl std::fmt::Debug for DataRetriever {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DataRetriever")
            .field("panel", &*self.panel.borrow())
            .finish_non_exhaustive()
    }
}

impl DataRetriever {
    /// Creates a retriever with an empty, collapsed panel.
    pub fn new(backend: Arc<dyn IntegrationBackend>) -> Self {
        let (panel, _) = watch::channel(DataPanel::default());
        Self {
            backend,
            notifier: Arc::new(LogNotifier),
            panel,
        }
    }

    /// Sets where user-visible notices go. Defaults to the log.
    #[must_use]
    pub fn with_notifier(mut self, notifier: impl Notifier + 'static) -> Self {
        self.notifier = Arc::new(notifier);
        self
    }

    /// Loads a snapshot for `kind`.
    ///
    /// Calling this without credentials is a programming error and returns
    /// [`CoreError::MissingCredentials`] without touching the network.
    #[instrument(skip(self, credentials))]
    pub async fn load(
        &self,
        kind: ProviderKind,
        credentials: Option<&Credentials>,
    ) -> Result<LoadOutcome, CoreError> {
        let credentials = credentials.ok_or(CoreError::MissingCredentials(kind))?;
        let descriptor = ProviderRegistry::get(kind)
            .ok_or_else(|| CoreError::UnknownProvider(kind.to_string()))?;

        match self.backend.load(&descriptor.route, credentials).await {
            Ok(snapshot) => {
                info!(empty = snapshot.is_empty(), "Snapshot loaded");
                self.panel.send_replace(DataPanel {
                    snapshot: Some(snapshot.clone()),
                    expanded: true,
                });
                Ok(LoadOutcome::Loaded(snapshot))
            }
            Err(e) => {
                let message = ConnectError::Load(e).user_message();
                warn!(%message, "Snapshot load failed");
                self.notifier
                    .notify(Notice::new(kind, NoticeStage::Load, message.clone()));
                Ok(LoadOutcome::Failed(message))
            }
        }
    }

    /// Loads using whatever credentials `params` holds for `kind`.
    pub async fn load_from(
        &self,
        params: &ParamsSlot,
        kind: ProviderKind,
    ) -> Result<LoadOutcome, CoreError> {
        let credentials = params.credentials_for(kind);
        self.load(kind, credentials.as_ref()).await
    }

    /// Discards the snapshot and collapses the panel. No-op when already
    /// clear.
    pub fn clear(&self) {
        let changed = self.panel.send_if_modified(|panel| {
            if *panel == DataPanel::default() {
                false
            } else {
                *panel = DataPanel::default();
                true
            }
        });
        if changed {
            debug!("Panel cleared");
        }
    }

    /// Flips the panel between expanded and collapsed.
    pub fn toggle_expanded(&self) -> bool {
        let mut expanded = false;
        self.panel.send_modify(|panel| {
            panel.expanded = !panel.expanded;
            expanded = panel.expanded;
        });
        expanded
    }

    /// Current panel state.
    pub fn panel(&self) -> DataPanel {
        self.panel.borrow().clone()
    }

    /// Current snapshot.
    pub fn snapshot(&self) -> Option<RetrievedSnapshot> {
        self.panel.borrow().snapshot.clone()
    }

    /// Watches panel changes.
    pub fn subscribe(&self) -> watch::Receiver<DataPanel> {
        self.panel.subscribe()
    }
}
