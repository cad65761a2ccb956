//! Text output formatting with colors.

use anyhow::Result;
use tether_connect::ConnectOutcome;
use tether_core::{ConnectionStatus, IntegrationItem, RetrievedSnapshot};
use tether_providers::ProviderDescriptor;
use tether_store::Config;

use super::json::ConnectionReport;

// ============================================================================
// ANSI Colors
// ============================================================================

const RESET: &str = "\x1b[0m";
const BOLD: &str = "\x1b[1m";
const DIM: &str = "\x1b[2m";
const GREEN: &str = "\x1b[32m";
const YELLOW: &str = "\x1b[33m";
const RED: &str = "\x1b[31m";
const CYAN: &str = "\x1b[36m";

/// Text formatter with optional colors.
pub struct TextFormatter {
    use_colors: bool,
}

impl TextFormatter {
    /// Creates a new text formatter.
    pub fn new(use_colors: bool) -> Self {
        Self { use_colors }
    }

    // ========================================================================
    // Providers
    // ========================================================================

    /// Header line of the provider table.
    pub fn format_providers_header(&self) -> String {
        self.bold(&format!(
            "{:<12} {:<10} {:<10} {}",
            "Provider", "CLI", "Aliases", "Load route"
        ))
    }

    /// One row of the provider table.
    pub fn format_provider_line(&self, desc: &ProviderDescriptor) -> String {
        let aliases = if desc.metadata.aliases.is_empty() {
            self.dim("−")
        } else {
            desc.metadata.aliases.join(",")
        };

        format!(
            "{:<12} {:<10} {:<10} {}",
            desc.display_name(),
            desc.cli_name(),
            aliases,
            self.cyan(&desc.route.load_path())
        )
    }

    // ========================================================================
    // Connection
    // ========================================================================

    /// Formats the result of a connect command.
    pub fn format_connection(&self, report: &ConnectionReport) -> Result<String> {
        let mut lines = Vec::new();

        let status = match report.status {
            ConnectionStatus::Connected => self.green(&report.affordance.label),
            ConnectionStatus::Connecting => self.yellow("Connecting"),
            ConnectionStatus::Disconnected => self.dim(&report.affordance.label),
        };
        lines.push(format!("{}: {}", self.bold(&report.display_name), status));

        let detail = match &report.outcome {
            ConnectOutcome::Connected => None,
            ConnectOutcome::Abandoned => Some(self.yellow("Authorization was not completed")),
            ConnectOutcome::Failed(message) => Some(self.red(message)),
            ConnectOutcome::Cancelled => Some(self.yellow("Cancelled")),
            ConnectOutcome::Rejected(current) => {
                Some(self.yellow(&format!("Not started: already {current}")))
            }
        };
        if let Some(detail) = detail {
            lines.push(detail);
        }

        if let Some(params) = &report.params {
            lines.push(String::new());
            lines.push(self.bold("Params:"));
            lines.push(serde_json::to_string_pretty(params)?);
        }

        if let Some(snapshot) = &report.snapshot {
            lines.push(String::new());
            lines.push(self.format_snapshot(snapshot)?);
        }

        Ok(lines.join("\n"))
    }

    // ========================================================================
    // Snapshot
    // ========================================================================

    /// Formats a snapshot: a table for item lists, indented JSON otherwise.
    pub fn format_snapshot(&self, snapshot: &RetrievedSnapshot) -> Result<String> {
        if snapshot.is_empty() {
            return Ok(self.dim("(no data)"));
        }
        match snapshot.items() {
            Some(items) => Ok(self.format_items(&items)),
            None => Ok(snapshot.to_pretty_string()?),
        }
    }

    fn format_items(&self, items: &[IntegrationItem]) -> String {
        let mut lines = vec![self.bold(&format!(
            "{:<30} {:<20} {}",
            "Name", "Type", "ID"
        ))];

        for item in items {
            lines.push(format!(
                "{:<30} {:<20} {}",
                item.display_name(),
                item.item_type.as_deref().unwrap_or("−"),
                self.dim(item.id.as_deref().unwrap_or("−"))
            ));
        }

        lines.push(String::new());
        lines.push(format!("{} items", items.len()));
        lines.join("\n")
    }

    // ========================================================================
    // Config
    // ========================================================================

    /// Formats the effective configuration.
    pub fn format_config(&self, config: &Config) -> String {
        let browser = config
            .window
            .browser
            .as_ref()
            .map_or_else(|| "auto".to_string(), |p| p.display().to_string());

        [
            self.bold("Tether Configuration"),
            "─".repeat(40),
            format!("Backend URL:     {}", self.cyan(&config.backend.base_url)),
            format!("Timeout:         {}s", config.backend.timeout_secs),
            format!(
                "Window:          {}x{}",
                config.window.width, config.window.height
            ),
            format!("Poll interval:   {}ms", config.window.poll_interval_ms),
            format!("Browser:         {browser}"),
            format!("Log level:       {}", config.general.log_level),
        ]
        .join("\n")
    }

    // ========================================================================
    // Colors
    // ========================================================================

    fn paint(&self, color: &str, text: &str) -> String {
        if self.use_colors {
            format!("{color}{text}{RESET}")
        } else {
            text.to_string()
        }
    }

    fn bold(&self, text: &str) -> String {
        self.paint(BOLD, text)
    }

    fn dim(&self, text: &str) -> String {
        self.paint(DIM, text)
    }

    fn green(&self, text: &str) -> String {
        self.paint(GREEN, text)
    }

    fn yellow(&self, text: &str) -> String {
        self.paint(YELLOW, text)
    }

    fn red(&self, text: &str) -> String {
        self.paint(RED, text)
    }

    fn cyan(&self, text: &str) -> String {
        self.paint(CYAN, text)
    }
}
