// Lint configuration for this crate
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]

//! # Tether Connect
//!
//! Links a provider account to a session and retrieves its data.
//!
//! - **AuthorizationLauncher**: requests the consent URL and opens it
//! - **WindowCompletionDetector**: polls the window until it closes
//! - **CredentialExchanger**: trades the finished flow for credentials
//! - **IntegrationConnection**: the state machine tying the three together
//! - **DataRetriever**: loads a snapshot with the stored credentials
//!
//! ## Usage
//!
//! ```ignore
//! use tether_connect::{ChannelNotifier, DataRetriever, IntegrationConnection};
//! use tether_core::{ProviderKind, SessionIdentity};
//! use tether_fetch::FetchContext;
//! use tether_store::ParamsSlot;
//!
//! let ctx = FetchContext::builder().build()?;
//! let params = ParamsSlot::new();
//! let identity = SessionIdentity::new("u1", "o1")?;
//! let (notifier, mut notices) = ChannelNotifier::new();
//!
//! let conn = IntegrationConnection::for_provider(identity, ProviderKind::Hubspot, params.clone(), ctx.clone())?
//!     .with_notifier(notifier);
//! conn.connect().await;
//!
//! let retriever = DataRetriever::new(ctx.backend.clone());
//! retriever.load_from(&params, ProviderKind::Hubspot).await?;
//! ```

pub mod connection;
pub mod detector;
pub mod error;
pub mod exchanger;
pub mod launcher;
pub mod notice;
pub mod retriever;

pub use connection::{ConnectOutcome, IntegrationConnection, StatusWatch};
pub use detector::{Completion, CompletionWatch, DEFAULT_POLL_INTERVAL, WindowCompletionDetector};
pub use error::{AUTHORIZATION_FAILED, CREDENTIALS_FAILED, ConnectError, LOAD_FAILED};
pub use exchanger::{CredentialExchanger, Exchange};
pub use launcher::AuthorizationLauncher;
pub use notice::{ChannelNotifier, LogNotifier, Notice, NoticeStage, Notifier};
pub use retriever::{DataPanel, DataRetriever, LoadOutcome};
