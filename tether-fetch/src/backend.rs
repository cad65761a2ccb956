//! The integration backend contract.
//!
//! Three endpoints per provider, all form-encoded POSTs under
//! `/integrations/{segment}/`:
//!
//! - `authorize` (`user_id`, `org_id`) returns the provider's consent URL
//! - `credentials` (`user_id`, `org_id`) returns credentials, or a falsy
//!   value while the user has not finished authorizing
//! - `load` or a per-provider override (`credentials` as a JSON string)
//!   returns an arbitrary JSON snapshot
//!
//! Errors come back as an HTTP error status with `{"detail": "..."}`.

use async_trait::async_trait;
use serde_json::Value;
use std::time::Duration;
use tether_core::{Credentials, IntegrationRoute, RetrievedSnapshot, SessionIdentity};
use tracing::{debug, instrument};
use url::Url;

use crate::error::BackendError;
use crate::host::http::HttpClient;

/// Base URL used when none is configured.
pub const DEFAULT_BASE_URL: &str = "http://localhost:8000";

// ============================================================================
// Backend Trait
// ============================================================================

/// The backend endpoints the connection flow consumes.
#[async_trait]
pub trait IntegrationBackend: Send + Sync {
    /// Requests the provider's authorization URL.
    async fn authorize(
        &self,
        route: &IntegrationRoute,
        identity: &SessionIdentity,
    ) -> Result<Url, BackendError>;

    /// Requests the credentials stored for this session, as raw JSON.
    ///
    /// The caller decides whether the payload counts as credentials.
    async fn credentials(
        &self,
        route: &IntegrationRoute,
        identity: &SessionIdentity,
    ) -> Result<Value, BackendError>;

    /// Retrieves a data snapshot using the given credentials.
    async fn load(
        &self,
        route: &IntegrationRoute,
        credentials: &Credentials,
    ) -> Result<RetrievedSnapshot, BackendError>;
}

// ============================================================================
// HTTP Backend
// ============================================================================

/// [`IntegrationBackend`] over HTTP.
#[derive(Debug, Clone)]
pub struct HttpBackend {
    http: HttpClient,
}

impl HttpBackend {
    /// Creates a backend client for `base_url`.
    pub fn new(base_url: &str) -> Result<Self, BackendError> {
        Ok(Self {
            http: HttpClient::new(base_url)?,
        })
    }

    /// Creates a backend client with a custom request timeout.
    pub fn with_timeout(base_url: &str, timeout: Duration) -> Result<Self, BackendError> {
        Ok(Self {
            http: HttpClient::with_timeout(base_url, timeout)?,
        })
    }

    /// Creates a backend client for the default local backend.
    pub fn local() -> Result<Self, BackendError> {
        Self::new(DEFAULT_BASE_URL)
    }

    /// Returns the underlying HTTP client.
    pub fn http(&self) -> &HttpClient {
        &self.http
    }
}

#[async_trait]
impl IntegrationBackend for HttpBackend {
    #[instrument(skip(self, identity), fields(provider = route.segment))]
    async fn authorize(
        &self,
        route: &IntegrationRoute,
        identity: &SessionIdentity,
    ) -> Result<Url, BackendError> {
        let body = self
            .http
            .post_form(&route.authorize_path(), &identity.form_fields())
            .await?;

        let url = parse_authorization_url(&body)?;
        debug!(host = ?url.host_str(), "Got authorization URL");
        Ok(url)
    }

    #[instrument(skip(self, identity), fields(provider = route.segment))]
    async fn credentials(
        &self,
        route: &IntegrationRoute,
        identity: &SessionIdentity,
    ) -> Result<Value, BackendError> {
        let body = self
            .http
            .post_form(&route.credentials_path(), &identity.form_fields())
            .await?;

        let payload = parse_json_body(&body)?;
        debug!(present = !payload.is_null(), "Got credentials response");
        Ok(payload)
    }

    #[instrument(skip(self, credentials), fields(provider = route.segment, action = route.load_action))]
    async fn load(
        &self,
        route: &IntegrationRoute,
        credentials: &Credentials,
    ) -> Result<RetrievedSnapshot, BackendError> {
        let encoded = credentials.to_json_string()?;
        let body = self
            .http
            .post_form(&route.load_path(), &[("credentials", encoded.as_str())])
            .await?;

        let snapshot = RetrievedSnapshot::new(parse_json_body(&body)?);
        debug!(len = body.len(), "Got snapshot");
        Ok(snapshot)
    }
}

// ============================================================================
// Body Parsing
// ============================================================================

/// Parses a JSON response body. An empty body is `null`.
fn parse_json_body(body: &str) -> Result<Value, BackendError> {
    if body.trim().is_empty() {
        return Ok(Value::Null);
    }
    serde_json::from_str(body)
        .map_err(|e| BackendError::InvalidResponse(format!("JSON parse error: {e}")))
}

/// Parses the authorization response: a JSON string, or the bare URL.
fn parse_authorization_url(body: &str) -> Result<Url, BackendError> {
    let raw = match serde_json::from_str::<Value>(body) {
        Ok(Value::String(s)) => s,
        Ok(Value::Null) => {
            return Err(BackendError::InvalidResponse(
                "empty authorization URL".to_string(),
            ));
        }
        Ok(other) => {
            return Err(BackendError::InvalidResponse(format!(
                "expected authorization URL, got {other}"
            )));
        }
        Err(_) => body.trim().to_string(),
    };

    if raw.is_empty() {
        return Err(BackendError::InvalidResponse(
            "empty authorization URL".to_string(),
        ));
    }

    Url::parse(&raw).map_err(|e| BackendError::InvalidUrl(format!("{raw}: {e}")))
}

// ============================================================================
// Tests
// ============================================================================
