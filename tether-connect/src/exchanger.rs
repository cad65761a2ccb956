//! Exchanges a completed authorization flow for credentials.

use std::sync::Arc;
use tether_core::{Credentials, SessionIdentity};
use tether_fetch::IntegrationBackend;
use tether_providers::ProviderDescriptor;
use tracing::{debug, instrument};

use crate::error::ConnectError;

/// Result of a credential exchange that reached the backend.
#[derive(Debug, Clone, PartialEq)]
pub enum Exchange {
    /// The backend returned credentials.
    Authorized(Credentials),
    /// The backend returned a falsy payload: the user closed the window
    /// without finishing.
    Abandoned,
}

/// Asks the backend for the credentials of a session.
#[derive(Clone)]
pub struct CredentialExchanger {
    backend: Arc<dyn IntegrationBackend>,
}

impl std::fmt::Debug for CredentialExchanger {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CredentialExchanger").finish_non_exhaustive()
    }
}

impl CredentialExchanger {
    /// Creates an exchanger over `backend`.
    pub fn new(backend: Arc<dyn IntegrationBackend>) -> Self {
        Self { backend }
    }

    /// Performs one exchange. Never retries.
    ///
    /// The payload is passed through untouched when truthy.
    #[instrument(skip_all, fields(provider = %descriptor.id))]
    pub async fn exchange(
        &self,
        identity: &SessionIdentity,
        descriptor: &ProviderDescriptor,
    ) -> Result<Exchange, ConnectError> {
        let payload = self
            .backend
            .credentials(&descriptor.route, identity)
            .await
            .map_err(ConnectError::Exchange)?;

        Ok(match Credentials::from_payload(payload) {
            Some(credentials) => {
                debug!(?credentials, "Credentials received");
                Exchange::Authorized(credentials)
            }
            None => {
                debug!("Empty credentials payload");
                Exchange::Abandoned
            }
        })
    }
}
