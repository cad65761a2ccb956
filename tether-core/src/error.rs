//! Core error types for Tether.

use thiserror::Error;

use crate::models::{ConnectionStatus, ProviderKind};

/// Core error type for Tether operations.
#[derive(Debug, Error)]
pub enum CoreError {
    /// A user or organization identifier was empty.
    #[error("Invalid identifier: {0} must not be empty")]
    InvalidIdentifier(&'static str),

    /// Provider name did not match any known provider.
    #[error("Unknown provider: {0}")]
    UnknownProvider(String),

    /// A connection state change that the state machine forbids.
    #[error("Invalid transition from {from} to {to}")]
    InvalidTransition {
        /// State the connection was in.
        from: ConnectionStatus,
        /// State that was requested.
        to: ConnectionStatus,
    },

    /// Retrieval was invoked without credentials for the provider.
    #[error("No credentials available for {0}; connect before loading data")]
    MissingCredentials(ProviderKind),

    /// Serialization/deserialization error.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
