//! The integration connection state machine.
//!
//! One [`IntegrationConnection`] per provider instance. The status is never
//! stored: it is re-derived from the caller's [`ParamsSlot`] and the
//! in-flight flag every time it is observed, so a slot that already holds
//! credentials for the provider reads as `Connected` from the start.
//!
//! ```text
//! Disconnected --connect--> Connecting --credentials--> Connected
//!                               |
//!                               +--abandoned / failed / cancelled--> Disconnected
//! ```

use serde::Serialize;
use std::sync::Arc;
use tether_core::{
    ConnectAffordance, ConnectionStatus, CoreError, Credentials, IntegrationParams, ProviderKind,
    SessionIdentity,
};
use tether_fetch::FetchContext;
use tether_providers::{ProviderDescriptor, ProviderRegistry};
use tether_store::ParamsSlot;
use tokio::sync::watch;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, instrument, warn};

use crate::detector::{Completion, WindowCompletionDetector};
use crate::error::ConnectError;
use crate::exchanger::{CredentialExchanger, Exchange};
use crate::launcher::AuthorizationLauncher;
use crate::notice::{LogNotifier, Notice, NoticeStage, Notifier};

// ============================================================================
// Outcome
// ============================================================================

/// How a call to [`IntegrationConnection::connect`] ended.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", content = "detail", rename_all = "snake_case")]
pub enum ConnectOutcome {
    /// Credentials were stored in the params slot.
    Connected,
    /// The window closed without the user finishing. No notice was shown.
    Abandoned,
    /// A request failed. The message was shown to the user.
    Failed(String),
    /// The connection was shut down mid-attempt.
    Cancelled,
    /// Not started: an attempt is in flight or the provider is connected.
    Rejected(ConnectionStatus),
}

impl ConnectOutcome {
    /// Returns true if the attempt produced credentials.
    pub fn is_connected(&self) -> bool {
        matches!(self, Self::Connected)
    }
}

// ============================================================================
// Connection
// ============================================================================

/// Connection flow for one provider, bound to one session and params slot.
pub struct IntegrationConnection {
    identity: SessionIdentity,
    descriptor: ProviderDescriptor,
    params: ParamsSlot,
    launcher: AuthorizationLauncher,
    detector: WindowCompletionDetector,
    exchanger: CredentialExchanger,
    notifier: Arc<dyn Notifier>,
    connecting: watch::Sender<bool>,
    shutdown: CancellationToken,
}

impl std::fmt::Debug for IntegrationConnection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("IntegrationConnection")
            .field("provider", &self.descriptor.id)
            .field("identity", &self.identity)
            .field("status", &self.status())
            .finish_non_exhaustive()
    }
}

impl IntegrationConnection {
    /// Creates a connection for `descriptor`.
    pub fn new(
        identity: SessionIdentity,
        descriptor: ProviderDescriptor,
        params: ParamsSlot,
        ctx: FetchContext,
    ) -> Self {
        let (connecting, _) = watch::channel(false);
        Self {
            identity,
            descriptor,
            params,
            exchanger: CredentialExchanger::new(ctx.backend.clone()),
            launcher: AuthorizationLauncher::new(ctx),
            detector: WindowCompletionDetector::default(),
            notifier: Arc::new(LogNotifier),
            connecting,
            shutdown: CancellationToken::new(),
        }
    }

    /// Creates a connection for a registered provider.
    pub fn for_provider(
        identity: SessionIdentity,
        kind: ProviderKind,
        params: ParamsSlot,
        ctx: FetchContext,
    ) -> Result<Self, ConnectError> {
        let descriptor = ProviderRegistry::get(kind)
            .ok_or_else(|| CoreError::UnknownProvider(kind.to_string()))?;
        Ok(Self::new(identity, descriptor.clone(), params, ctx))
    }

    /// Sets where user-visible notices go. Defaults to the log.
    #[must_use]
    pub fn with_notifier(mut self, notifier: impl Notifier + 'static) -> Self {
        self.notifier = Arc::new(notifier);
        self
    }

    /// Sets the window detector (poll interval).
    #[must_use]
    pub fn with_detector(mut self, detector: WindowCompletionDetector) -> Self {
        self.detector = detector;
        self
    }

    /// Provider this connection is for.
    pub fn provider(&self) -> ProviderKind {
        self.descriptor.id
    }

    /// Descriptor this connection is driven by.
    pub fn descriptor(&self) -> &ProviderDescriptor {
        &self.descriptor
    }

    /// Session identity.
    pub fn identity(&self) -> &SessionIdentity {
        &self.identity
    }

    /// The caller's params slot.
    pub fn params(&self) -> &ParamsSlot {
        &self.params
    }

    /// Credentials stored for this provider, if connected.
    pub fn credentials(&self) -> Option<Credentials> {
        self.params.credentials_for(self.descriptor.id)
    }

    /// Current status, derived from the params slot and the in-flight flag.
    pub fn status(&self) -> ConnectionStatus {
        ConnectionStatus::derive(&self.params.get(), self.descriptor.id, *self.connecting.borrow())
    }

    /// The connect control as it should be rendered now.
    pub fn affordance(&self) -> ConnectAffordance {
        ConnectAffordance::render(self.descriptor.id, self.status())
    }

    /// Watches status changes.
    pub fn subscribe(&self) -> StatusWatch {
        StatusWatch::new(
            self.descriptor.id,
            self.params.subscribe(),
            self.connecting.subscribe(),
        )
    }

    /// Tears the connection down. Any in-flight poll stops and the attempt
    /// ends as [`ConnectOutcome::Cancelled`]; later calls to `connect` do
    /// nothing.
    pub fn shutdown(&self) {
        if !self.shutdown.is_cancelled() {
            debug!(provider = %self.descriptor.id, "Shutting down connection");
            self.shutdown.cancel();
        }
    }

    /// Returns true after [`shutdown`](Self::shutdown).
    pub fn is_shut_down(&self) -> bool {
        self.shutdown.is_cancelled()
    }

    /// Runs one connection attempt to the end.
    ///
    /// Launch, wait for the window to close, then exchange once. Only a
    /// successful exchange writes to the params slot; every other ending
    /// returns to `Disconnected`.
    #[instrument(skip(self), fields(provider = %self.descriptor.id))]
    pub async fn connect(&self) -> ConnectOutcome {
        if self.shutdown.is_cancelled() {
            return ConnectOutcome::Cancelled;
        }
        if let Some(current) = self.begin_attempt() {
            debug!(%current, "Connect rejected");
            return ConnectOutcome::Rejected(current);
        }
        let _in_flight = InFlight(&self.connecting);
        info!("Connecting");

        let outcome = self.run_attempt().await;
        match &outcome {
            ConnectOutcome::Connected => info!("Connected"),
            ConnectOutcome::Abandoned => info!("Authorization abandoned"),
            ConnectOutcome::Cancelled => info!("Connection attempt cancelled"),
            ConnectOutcome::Failed(_) | ConnectOutcome::Rejected(_) => {}
        }
        outcome
    }

    /// Runs [`connect`](Self::connect) until `interrupt` resolves.
    ///
    /// On interrupt the connection is shut down and the same attempt is
    /// driven to its end, so an open window has been closed by the time
    /// this returns.
    pub async fn connect_until(&self, interrupt: impl Future<Output = ()>) -> ConnectOutcome {
        let attempt = self.connect();
        tokio::pin!(attempt);

        tokio::select! {
            outcome = &mut attempt => outcome,
            () = interrupt => {
                debug!(provider = %self.descriptor.id, "Interrupted");
                self.shutdown();
                attempt.await
            }
        }
    }

    /// Raises the in-flight flag if a new attempt may start. Returns the
    /// blocking status otherwise.
    fn begin_attempt(&self) -> Option<ConnectionStatus> {
        let kind = self.descriptor.id;
        let mut blocked = None;
        self.connecting.send_if_modified(|in_flight| {
            let current = ConnectionStatus::derive(&self.params.get(), kind, *in_flight);
            match current.transition(ConnectionStatus::Connecting) {
                Ok(_) => {
                    *in_flight = true;
                    true
                }
                Err(_) => {
                    blocked = Some(current);
                    false
                }
            }
        });
        blocked
    }

    async fn run_attempt(&self) -> ConnectOutcome {
        let launched = tokio::select! {
            () = self.shutdown.cancelled() => return ConnectOutcome::Cancelled,
            launched = self.launcher.launch(&self.identity, &self.descriptor) => launched,
        };
        let handle = match launched {
            Ok(handle) => handle,
            Err(e) => return self.fail(NoticeStage::Authorization, &e),
        };

        let watch = self.detector.watch(handle, &self.shutdown);
        if watch.wait().await == Completion::Cancelled {
            return ConnectOutcome::Cancelled;
        }

        match self.exchanger.exchange(&self.identity, &self.descriptor).await {
            Ok(Exchange::Authorized(credentials)) => {
                self.params.record_connection(self.descriptor.id, credentials);
                ConnectOutcome::Connected
            }
            Ok(Exchange::Abandoned) => ConnectOutcome::Abandoned,
            Err(e) => self.fail(NoticeStage::Credentials, &e),
        }
    }

    fn fail(&self, stage: NoticeStage, err: &ConnectError) -> ConnectOutcome {
        let message = err.user_message();
        warn!(%stage, error = %err, "Connection attempt failed");
        self.notifier
            .notify(Notice::new(self.descriptor.id, stage, message.clone()));
        ConnectOutcome::Failed(message)
    }
}

/// Lowers the in-flight flag when the attempt ends, however it ends.
struct InFlight<'a>(&'a watch::Sender<bool>);

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        self.0.send_replace(false);
    }
}

// ============================================================================
// Status Watch
// ============================================================================

/// Observes the derived status of one connection.
#[derive(Debug)]
pub struct StatusWatch {
    kind: ProviderKind,
    params: watch::Receiver<IntegrationParams>,
    connecting: watch::Receiver<bool>,
    last: ConnectionStatus,
}

impl StatusWatch {
    fn new(
        kind: ProviderKind,
        params: watch::Receiver<IntegrationParams>,
        connecting: watch::Receiver<bool>,
    ) -> Self {
        let mut watch = Self {
            kind,
            params,
            connecting,
            last: ConnectionStatus::Disconnected,
        };
        watch.last = watch.derive();
        watch
    }

    fn derive(&mut self) -> ConnectionStatus {
        let params = self.params.borrow_and_update().clone();
        let connecting = *self.connecting.borrow_and_update();
        ConnectionStatus::derive(&params, self.kind, connecting)
    }

    /// The status as last seen.
    pub fn current(&self) -> ConnectionStatus {
        self.last
    }

    /// Waits until the status differs from the last one seen.
    ///
    /// Returns `None` once the connection or the params slot is gone.
    pub async fn changed(&mut self) -> Option<ConnectionStatus> {
        loop {
            tokio::select! {
                changed = self.params.changed() => changed.ok()?,
                changed = self.connecting.changed() => changed.ok()?,
            }
            let status = self.derive();
            if status != self.last {
                self.last = status;
                return Some(status);
            }
        }
    }
}
