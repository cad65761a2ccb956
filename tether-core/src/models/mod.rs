//! Domain models for Tether.
//!
//! ## Submodules
//!
//! - [`provider`] - Provider identity and backend routes
//! - [`session`] - Session identity, credentials, and integration params
//! - [`connection`] - Connection status and the connect affordance
//! - [`snapshot`] - Retrieved data snapshots

mod connection;
mod provider;
mod session;
mod snapshot;

pub use connection::{AffordanceTone, ConnectAffordance, ConnectionStatus};
pub use provider::{IntegrationRoute, ProviderKind};
pub use session::{Credentials, IntegrationParams, SessionIdentity};
pub use snapshot::{IntegrationItem, RetrievedSnapshot};
