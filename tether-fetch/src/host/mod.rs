//! Host APIs used by the connection flow.
//!
//! - [`http`] - HTTP client with tracing and error-detail decoding
//! - [`window`] - Detached authorization windows

pub mod http;
pub mod window;

pub use http::HttpClient;
pub use window::{BrowserWindowHost, PromptWindowHost, WindowHandle, WindowHost, WindowSize};
