//! HTTP client with tracing and error-detail decoding.
//!
//! Wraps `reqwest` with:
//! - A base URL that endpoint paths are resolved against
//! - Form-encoded POSTs (the backend's only request shape)
//! - Decoding of `{"detail": "..."}` error bodies

use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;
use tracing::{debug, instrument, warn};
use url::Url;

use crate::error::BackendError;

/// Default request timeout.
const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// User agent string for Tether.
const USER_AGENT: &str = concat!("Tether/", env!("CARGO_PKG_VERSION"));

// ============================================================================
// HTTP Client
// ============================================================================

/// HTTP client bound to one backend base URL.
#[derive(Debug, Clone)]
pub struct HttpClient {
    inner: Client,
    base_url: Url,
}

impl HttpClient {
    /// Creates a client with the default timeout.
    pub fn new(base_url: &str) -> Result<Self, BackendError> {
        Self::with_timeout(base_url, Duration::from_secs(DEFAULT_TIMEOUT_SECS))
    }

    /// Creates a client with a custom timeout.
    pub fn with_timeout(base_url: &str, timeout: Duration) -> Result<Self, BackendError> {
        let mut base_url =
            Url::parse(base_url).map_err(|e| BackendError::InvalidUrl(format!("{base_url}: {e}")))?;

        // Joining relative paths keeps any prefix only when the base ends in '/'
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }

        let inner = Client::builder()
            .timeout(timeout)
            .user_agent(USER_AGENT)
            .build()?;

        Ok(Self { inner, base_url })
    }

    /// Returns the base URL.
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Resolves an endpoint path against the base URL.
    pub fn endpoint(&self, path: &str) -> Result<Url, BackendError> {
        self.base_url
            .join(path.trim_start_matches('/'))
            .map_err(|e| BackendError::InvalidUrl(format!("{path}: {e}")))
    }

    /// Performs a form-encoded POST and returns the body of a 2xx response.
    ///
    /// Non-2xx responses become [`BackendError::Server`] carrying the
    /// body's `detail` string when there is one.
    #[instrument(skip(self, form), fields(path = %path))]
    pub async fn post_form(&self, path: &str, form: &[(&str, &str)]) -> Result<String, BackendError> {
        let url = self.endpoint(path)?;
        debug!(url = %url, "POST request with form data");

        let response = self.inner.post(url).form(form).send().await?;
        let status = response.status();
        debug!(status = %status, "Response received");

        let body = response.text().await?;

        if !status.is_success() {
            let detail = error_detail(&body);
            warn!(status = %status, detail = ?detail, "Backend returned an error");
            return Err(BackendError::Server {
                status: status.as_u16(),
                detail,
            });
        }

        Ok(body)
    }

    /// Returns the inner reqwest client for advanced operations.
    pub fn inner(&self) -> &Client {
        &self.inner
    }
}

// ============================================================================
// Error Bodies
// ============================================================================

#[derive(Deserialize)]
struct ErrorBody {
    detail: serde_json::Value,
}

/// Extracts the `detail` string from an error body.
///
/// Only string details count; structured details (validation error lists)
/// are not user-facing text.
fn error_detail(body: &str) -> Option<String> {
    let parsed: ErrorBody = serde_json::from_str(body).ok()?;
    match parsed.detail {
        serde_json::Value::String(detail) if !detail.is_empty() => Some(detail),
        _ => None,
    }
}

// ============================================================================
// Tests
// ============================================================================
