//! JSON output formatting.

use anyhow::Result;
use chrono::{DateTime, Utc};
use serde::{Serialize, Serializer};
use tether_connect::ConnectOutcome;
use tether_core::{ConnectAffordance, ConnectionStatus, IntegrationParams, RetrievedSnapshot};
use tether_providers::ProviderDescriptor;

// ============================================================================
// Output Types
// ============================================================================

/// Result of a connect command.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConnectionReport {
    pub provider: String,
    pub display_name: String,
    pub status: ConnectionStatus,
    pub outcome: ConnectOutcome,
    pub affordance: ConnectAffordance,
    #[serde(serialize_with = "serialize_datetime")]
    pub finished_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub params: Option<IntegrationParams>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub snapshot: Option<RetrievedSnapshot>,
}

impl ConnectionReport {
    /// Creates a report for a finished attempt.
    pub fn new(desc: &ProviderDescriptor, outcome: &ConnectOutcome, status: ConnectionStatus) -> Self {
        Self {
            provider: desc.cli_name().to_string(),
            display_name: desc.display_name().to_string(),
            status,
            outcome: outcome.clone(),
            affordance: ConnectAffordance::render(desc.id, status),
            finished_at: Utc::now(),
            params: None,
            snapshot: None,
        }
    }

    /// Attaches the params record, credentials included.
    pub fn with_params(mut self, params: IntegrationParams) -> Self {
        self.params = Some(params);
        self
    }

    /// Attaches a loaded snapshot.
    pub fn with_snapshot(mut self, snapshot: RetrievedSnapshot) -> Self {
        self.snapshot = Some(snapshot);
        self
    }
}

/// JSON output for one provider listing entry.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProviderOutput {
    pub provider: String,
    pub display_name: String,
    pub aliases: Vec<String>,
    pub description: String,
    pub window_title: String,
    pub routes: RoutesOutput,
}

/// Backend paths of a provider.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RoutesOutput {
    pub authorize: String,
    pub credentials: String,
    pub load: String,
}

impl From<&ProviderDescriptor> for ProviderOutput {
    fn from(desc: &ProviderDescriptor) -> Self {
        Self {
            provider: desc.cli_name().to_string(),
            display_name: desc.display_name().to_string(),
            aliases: desc
                .metadata
                .aliases
                .iter()
                .map(|a| (*a).to_string())
                .collect(),
            description: desc.metadata.description.clone(),
            window_title: desc.window_title.clone(),
            routes: RoutesOutput {
                authorize: desc.route.authorize_path(),
                credentials: desc.route.credentials_path(),
                load: desc.route.load_path(),
            },
        }
    }
}

fn serialize_datetime<S>(dt: &DateTime<Utc>, s: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    s.serialize_str(&dt.to_rfc3339())
}

// ============================================================================
// JSON Formatter
// ============================================================================

/// JSON formatter.
pub struct JsonFormatter {
    pretty: bool,
}

impl JsonFormatter {
    /// Creates a new JSON formatter.
    pub fn new(pretty: bool) -> Self {
        Self { pretty }
    }

    /// Formats any serializable value.
    pub fn format<T: Serialize>(&self, data: &T) -> Result<String> {
        let json = if self.pretty {
            serde_json::to_string_pretty(data)?
        } else {
            serde_json::to_string(data)?
        };
        Ok(json)
    }

    /// Formats the provider list.
    pub fn format_providers(&self, providers: &[ProviderDescriptor]) -> Result<String> {
        let output: Vec<ProviderOutput> = providers.iter().map(ProviderOutput::from).collect();
        self.format(&output)
    }
}
