//! Fetch error types.

use thiserror::Error;

// ============================================================================
// Backend Error
// ============================================================================

/// Error type for integration backend calls.
#[derive(Debug, Error)]
pub enum BackendError {
    /// The request never produced a response.
    #[error("Request failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// The backend answered with an error status.
    #[error("Server returned {status}: {}", .detail.as_deref().unwrap_or("no detail"))]
    Server {
        /// HTTP status code.
        status: u16,
        /// The `detail` field of the error body, if any.
        detail: Option<String>,
    },

    /// The response body did not have the expected shape.
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// A URL could not be built or parsed.
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    /// Core error.
    #[error("Core error: {0}")]
    Core(#[from] tether_core::CoreError),
}

impl BackendError {
    /// Message to show the user.
    ///
    /// The server's `detail` is shown verbatim when present; everything else
    /// collapses to `fallback`.
    pub fn user_message(&self, fallback: &str) -> String {
        match self {
            Self::Server {
                detail: Some(detail),
                ..
            } => detail.clone(),
            _ => fallback.to_string(),
        }
    }

    /// Returns the HTTP status if the backend answered.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Server { status, .. } => Some(*status),
            Self::Transport(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }
}

// ============================================================================
// Window Error
// ============================================================================

/// Error type for opening authorization windows.
#[derive(Debug, Error)]
pub enum WindowError {
    /// No browser able to host a dedicated window was found.
    #[error("No supported browser found (tried: {0})")]
    BrowserNotFound(String),

    /// The browser process could not be started.
    #[error("Failed to launch browser: {0}")]
    Launch(#[from] std::io::Error),
}

// ============================================================================
// Tests
// ============================================================================
