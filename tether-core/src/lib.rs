// Lint configuration for this crate
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]

//! # Tether Core
//!
//! Core types and models shared by every Tether crate.
//!
//! ## Key Types
//!
//! ### Providers
//! - [`ProviderKind`] - Closed set of linkable third-party providers
//! - [`IntegrationRoute`] - Backend route segment plus per-provider overrides
//!
//! ### Session State
//! - [`SessionIdentity`] - The (user, organization) pair an attempt belongs to
//! - [`Credentials`] - Opaque provider credentials, passed through untouched
//! - [`IntegrationParams`] - The shared record the connection writes on success
//!
//! ### Connection
//! - [`ConnectionStatus`] - `Disconnected -> Connecting -> Connected`
//! - [`ConnectAffordance`] - What the connect control should look like
//!
//! ### Retrieval
//! - [`RetrievedSnapshot`] - One-shot data pulled from a linked account
//! - [`IntegrationItem`] - Typed view over the common item shape

pub mod error;
pub mod models;

pub use error::CoreError;

pub use models::{
    // Connection
    AffordanceTone,
    ConnectAffordance,
    ConnectionStatus,
    // Session state
    Credentials,
    IntegrationParams,
    SessionIdentity,
    // Providers
    IntegrationRoute,
    ProviderKind,
    // Retrieval
    IntegrationItem,
    RetrievedSnapshot,
};
