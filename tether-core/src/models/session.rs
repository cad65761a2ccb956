//! Session-scoped state: who is connecting, and what the connection produced.
//!
//! - [`SessionIdentity`] - The (user, organization) pair
//! - [`Credentials`] - Opaque credential payload from the backend
//! - [`IntegrationParams`] - Shared record written on a successful exchange

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;

use crate::error::CoreError;
use crate::models::ProviderKind;

// ============================================================================
// Session Identity
// ============================================================================

/// The user and organization a connection attempt is made for.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SessionIdentity {
    user_id: String,
    org_id: String,
}

impl SessionIdentity {
    /// Creates an identity, rejecting empty identifiers.
    pub fn new(user_id: impl Into<String>, org_id: impl Into<String>) -> Result<Self, CoreError> {
        let user_id = user_id.into();
        let org_id = org_id.into();

        if user_id.trim().is_empty() {
            return Err(CoreError::InvalidIdentifier("user_id"));
        }
        if org_id.trim().is_empty() {
            return Err(CoreError::InvalidIdentifier("org_id"));
        }

        Ok(Self { user_id, org_id })
    }

    /// Returns the user identifier.
    pub fn user_id(&self) -> &str {
        &self.user_id
    }

    /// Returns the organization identifier.
    pub fn org_id(&self) -> &str {
        &self.org_id
    }

    /// Form fields identifying this session on the backend.
    pub fn form_fields(&self) -> [(&'static str, &str); 2] {
        [("user_id", &self.user_id), ("org_id", &self.org_id)]
    }
}

// ============================================================================
// Credentials
// ============================================================================

/// Opaque, provider-defined credential payload.
///
/// Tether never looks inside: the value the backend returned is the value
/// the caller receives, key order included. `Debug` output is redacted.
#[derive(Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Credentials(Value);

impl Credentials {
    /// Wraps a backend payload, returning `None` when it is falsy.
    ///
    /// Falsiness follows the backend's client conventions: `null`, `false`,
    /// zero, and the empty string mean "not authorized yet". Empty objects
    /// and arrays are still payloads.
    pub fn from_payload(payload: Value) -> Option<Self> {
        if is_truthy(&payload) {
            Some(Self(payload))
        } else {
            None
        }
    }

    /// Returns the raw payload.
    pub fn as_value(&self) -> &Value {
        &self.0
    }

    /// Consumes the credentials, returning the raw payload.
    pub fn into_value(self) -> Value {
        self.0
    }

    /// Encodes the payload as a JSON string (the retrieval form field).
    pub fn to_json_string(&self) -> Result<String, CoreError> {
        Ok(serde_json::to_string(&self.0)?)
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.0 {
            Value::Object(map) => write!(f, "Credentials(<redacted, {} keys>)", map.len()),
            _ => f.write_str("Credentials(<redacted>)"),
        }
    }
}

fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0 && !f.is_nan()),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

// ============================================================================
// Integration Params
// ============================================================================

/// The record shared between the connection and the data retriever.
///
/// Created by the caller, written only when a credential exchange succeeds,
/// and read everywhere else. Keys the caller stored alongside are preserved.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct IntegrationParams {
    /// Provider the credentials belong to.
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<ProviderKind>,
    /// Credentials from the last successful exchange.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub credentials: Option<Credentials>,
    /// Any other state the caller keeps in the same record.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl IntegrationParams {
    /// Creates empty params.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates params with a provider selected but no credentials yet.
    pub fn for_provider(kind: ProviderKind) -> Self {
        Self {
            kind: Some(kind),
            ..Self::default()
        }
    }

    /// Returns true if credentials are present for the given provider.
    pub fn is_connected_to(&self, kind: ProviderKind) -> bool {
        self.credentials.is_some() && self.kind == Some(kind)
    }

    /// Returns the credentials if they belong to the given provider.
    pub fn credentials_for(&self, kind: ProviderKind) -> Option<&Credentials> {
        if self.kind == Some(kind) {
            self.credentials.as_ref()
        } else {
            None
        }
    }

    /// Returns a copy with the connection result merged in.
    ///
    /// Provider and credentials are written together; everything else is kept.
    #[must_use]
    pub fn with_connection(&self, kind: ProviderKind, credentials: Credentials) -> Self {
        Self {
            kind: Some(kind),
            credentials: Some(credentials),
            extra: self.extra.clone(),
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
