//! Connection status and the connect affordance derived from it.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::CoreError;
use crate::models::{IntegrationParams, ProviderKind};

// ============================================================================
// Connection Status
// ============================================================================

/// Where a provider connection stands.
///
/// Moves forward along `Disconnected -> Connecting -> Connected`, or back
/// from `Connecting` to `Disconnected` when an attempt ends without
/// credentials. `Connected` only ends through an external reset of the
/// integration params.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConnectionStatus {
    /// No credentials and no attempt in flight.
    #[default]
    Disconnected,
    /// An authorization attempt is in flight.
    Connecting,
    /// Credentials for the provider are present.
    Connected,
}

impl ConnectionStatus {
    /// Derives the status from the shared params and the in-flight flag.
    ///
    /// Credentials in the params always win: a record that already carries
    /// credentials for `kind` is `Connected` no matter what else is going on.
    pub fn derive(params: &IntegrationParams, kind: ProviderKind, connecting: bool) -> Self {
        if params.is_connected_to(kind) {
            Self::Connected
        } else if connecting {
            Self::Connecting
        } else {
            Self::Disconnected
        }
    }

    /// Returns true if a new connection attempt may start.
    pub fn can_connect(&self) -> bool {
        matches!(self, Self::Disconnected)
    }

    /// Returns true if the transition `self -> next` is allowed.
    pub fn can_transition_to(&self, next: ConnectionStatus) -> bool {
        matches!(
            (self, next),
            (Self::Disconnected, Self::Connecting)
                | (Self::Connecting, Self::Connected)
                | (Self::Connecting, Self::Disconnected)
        )
    }

    /// Validates and performs a transition.
    pub fn transition(self, next: ConnectionStatus) -> Result<ConnectionStatus, CoreError> {
        if self.can_transition_to(next) {
            Ok(next)
        } else {
            Err(CoreError::InvalidTransition {
                from: self,
                to: next,
            })
        }
    }

    /// Returns a short lowercase label.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Disconnected => "disconnected",
            Self::Connecting => "connecting",
            Self::Connected => "connected",
        }
    }
}

impl fmt::Display for ConnectionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

// ============================================================================
// Connect Affordance
// ============================================================================

/// Visual tone of the connect control.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AffordanceTone {
    /// Call to action.
    Primary,
    /// Already linked.
    Success,
}

/// Observable state of the connect control for one provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConnectAffordance {
    /// Text shown on the control. Empty while busy.
    pub label: String,
    /// Whether the control accepts a click.
    pub enabled: bool,
    /// Whether a progress indicator replaces the label.
    pub busy: bool,
    /// Visual tone.
    pub tone: AffordanceTone,
}

impl ConnectAffordance {
    /// Renders the affordance for a provider in a given status.
    ///
    /// The control is disabled while connecting and once connected, so a
    /// second authorization window can never be launched for one attempt.
    pub fn render(kind: ProviderKind, status: ConnectionStatus) -> Self {
        let name = kind.display_name();
        match status {
            ConnectionStatus::Disconnected => Self {
                label: format!("Connect to {name}"),
                enabled: true,
                busy: false,
                tone: AffordanceTone::Primary,
            },
            ConnectionStatus::Connecting => Self {
                label: String::new(),
                enabled: false,
                busy: true,
                tone: AffordanceTone::Primary,
            },
            ConnectionStatus::Connected => Self {
                label: format!("{name} Connected"),
                enabled: false,
                busy: false,
                tone: AffordanceTone::Success,
            },
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
