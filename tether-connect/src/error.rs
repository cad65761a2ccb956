//! Connection error types.

use tether_core::CoreError;
use tether_fetch::{BackendError, WindowError};
use thiserror::Error;

/// Message shown when the authorization step fails without server detail.
pub const AUTHORIZATION_FAILED: &str = "An error occurred during authorization.";

/// Message shown when the credential exchange fails without server detail.
pub const CREDENTIALS_FAILED: &str = "An error occurred while fetching credentials.";

/// Message shown when retrieval fails without server detail.
pub const LOAD_FAILED: &str = "An error occurred";

/// Errors raised while connecting or retrieving.
#[derive(Debug, Error)]
pub enum ConnectError {
    /// Domain error (bad identifiers, missing credentials, ...).
    #[error(transparent)]
    Core(#[from] CoreError),

    /// The authorization URL request failed.
    #[error("Authorization request failed: {0}")]
    Authorize(#[source] BackendError),

    /// The authorization window could not be opened.
    #[error("Could not open authorization window: {0}")]
    Window(#[from] WindowError),

    /// The credential exchange failed.
    #[error("Credential exchange failed: {0}")]
    Exchange(#[source] BackendError),

    /// Snapshot retrieval failed.
    #[error("Retrieval failed: {0}")]
    Load(#[source] BackendError),
}

impl ConnectError {
    /// The message to show the user: the server's `detail` when there is
    /// one, otherwise the generic message for the failing step.
    pub fn user_message(&self) -> String {
        match self {
            Self::Core(e) => e.to_string(),
            Self::Authorize(e) => e.user_message(AUTHORIZATION_FAILED),
            Self::Window(_) => AUTHORIZATION_FAILED.to_string(),
            Self::Exchange(e) => e.user_message(CREDENTIALS_FAILED),
            Self::Load(e) => e.user_message(LOAD_FAILED),
        }
    }
}
