// Lint configuration for this crate
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]

//! # Tether Fetch
//!
//! Talks to the world outside the connection state machine.
//!
//! ## Backend
//!
//! - [`backend::IntegrationBackend`] - The three integration endpoints
//! - [`backend::HttpBackend`] - Form-encoded HTTP implementation
//!
//! ## Host APIs
//!
//! - [`host::http`] - HTTP client with tracing and error-detail decoding
//! - [`host::window`] - Detached authorization windows
//!
//! ## Example
//!
//! ```ignore
//! use tether_fetch::{FetchContext, HttpBackend, BrowserWindowHost};
//!
//! let ctx = FetchContext::builder()
//!     .backend(HttpBackend::new("http://localhost:8000")?)
//!     .windows(BrowserWindowHost::new())
//!     .build();
//!
//! let url = ctx.backend.authorize(&route, &identity).await?;
//! let window = ctx.windows.open(&url, "Hubspot Authorization", WindowSize::default())?;
//! ```

pub mod backend;
pub mod context;
pub mod error;
pub mod host;

// Errors
pub use error::{BackendError, WindowError};

// Backend
pub use backend::{DEFAULT_BASE_URL, HttpBackend, IntegrationBackend};

// Host APIs
pub use host::{
    http::HttpClient,
    window::{BrowserWindowHost, PromptWindowHost, WindowHandle, WindowHost, WindowSize},
};

// Context
pub use context::{FetchContext, FetchContextBuilder};
