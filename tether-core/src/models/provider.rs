//! Provider-related types.
//!
//! - [`ProviderKind`] - Enum of supported providers
//! - [`IntegrationRoute`] - How a provider is addressed on the backend

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::CoreError;

// ============================================================================
// Provider Kind
// ============================================================================

/// Supported third-party providers.
///
/// Serialized as the display name (`"Hubspot"`), which is the value the
/// surrounding session stores in the `type` field of its integration params.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ProviderKind {
    /// Notion workspace
    Notion,
    /// Airtable bases
    Airtable,
    /// HubSpot CRM
    Hubspot,
}

impl ProviderKind {
    /// Returns the display name for this provider.
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::Notion => "Notion",
            Self::Airtable => "Airtable",
            Self::Hubspot => "Hubspot",
        }
    }

    /// Returns the CLI name for this provider (lowercase, no spaces).
    pub fn cli_name(&self) -> &'static str {
        match self {
            Self::Notion => "notion",
            Self::Airtable => "airtable",
            Self::Hubspot => "hubspot",
        }
    }

    /// Returns short alternative names accepted on the command line.
    pub fn aliases(&self) -> &'static [&'static str] {
        match self {
            Self::Notion => &[],
            Self::Airtable => &["at"],
            Self::Hubspot => &["hs"],
        }
    }

    /// Returns all available provider kinds.
    pub fn all() -> &'static [ProviderKind] {
        &[Self::Notion, Self::Airtable, Self::Hubspot]
    }
}

impl fmt::Display for ProviderKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

impl FromStr for ProviderKind {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let needle = s.trim();
        Self::all()
            .iter()
            .copied()
            .find(|kind| {
                kind.cli_name().eq_ignore_ascii_case(needle)
                    || kind.display_name().eq_ignore_ascii_case(needle)
                    || kind.aliases().iter().any(|a| a.eq_ignore_ascii_case(needle))
            })
            .ok_or_else(|| CoreError::UnknownProvider(s.to_string()))
    }
}

// ============================================================================
// Integration Route
// ============================================================================

/// Default action name for the data retrieval step.
pub const DEFAULT_LOAD_ACTION: &str = "load";

/// Backend routing for one provider.
///
/// Every provider lives under `/integrations/{segment}/`. The retrieval action
/// is usually `load`, but a provider may override it; the override is data,
/// so callers never branch on provider identity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct IntegrationRoute {
    /// Path segment identifying the provider on the backend.
    pub segment: &'static str,
    /// Action name of the retrieval endpoint.
    pub load_action: &'static str,
}

impl IntegrationRoute {
    /// Creates a route using the default `load` action.
    pub const fn new(segment: &'static str) -> Self {
        Self {
            segment,
            load_action: DEFAULT_LOAD_ACTION,
        }
    }

    /// Overrides the retrieval action name.
    pub const fn with_load_action(mut self, action: &'static str) -> Self {
        self.load_action = action;
        self
    }

    /// Path of the authorization-URL endpoint.
    pub fn authorize_path(&self) -> String {
        self.path("authorize")
    }

    /// Path of the credential exchange endpoint.
    pub fn credentials_path(&self) -> String {
        self.path("credentials")
    }

    /// Path of the data retrieval endpoint.
    pub fn load_path(&self) -> String {
        self.path(self.load_action)
    }

    fn path(&self, action: &str) -> String {
        format!("/integrations/{}/{}", self.segment, action)
    }
}

// ============================================================================
// Tests
// ============================================================================
