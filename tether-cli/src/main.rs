// Lint configuration for this crate
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]

//! Tether CLI - link provider accounts and pull their data from the command line.
//!
//! # Examples
//!
//! ```bash
//! # List providers
//! tether providers
//!
//! # Connect a Hubspot account and load its items right away
//! tether connect --provider hubspot --user u1 --org o1 --load
//!
//! # Headless: print the URL and confirm on stdin instead of opening a browser
//! tether connect --provider notion --user u1 --org o1 --prompt
//!
//! # Load with credentials from a file (or '-' for stdin)
//! tether load --provider airtable --credentials creds.json
//!
//! # JSON output
//! tether providers --format json --pretty
//! ```

mod commands;
mod output;

use anyhow::Result;
use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;
use tether_core::CoreError;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

use commands::{config, connect, load, providers};

// ============================================================================
// CLI Definition
// ============================================================================

/// Tether CLI - link provider accounts and retrieve their data.
#[derive(Parser)]
#[command(name = "tether")]
#[command(about = "Link third-party accounts and pull their records")]
#[command(long_about = r#"
Tether links a third-party account to a user/organization session through the
provider's own authorization page, then loads records with the credentials the
backend hands back. Credentials are kept in memory only.

Supported providers:
  • Notion (notion)
  • Airtable (airtable)
  • Hubspot (hubspot)

Examples:
  tether providers
  tether connect --provider hubspot --user u1 --org o1 --load
  tether load --provider notion --credentials creds.json
"#)]
#[command(version)]
pub struct Cli {
    /// Subcommand to run.
    #[command(subcommand)]
    pub command: Commands,

    /// Output format (text or json).
    #[arg(long, short = 'f', default_value = "text", global = true)]
    pub format: OutputFormat,

    /// Pretty-print JSON output.
    #[arg(long, global = true)]
    pub pretty: bool,

    /// Configuration file (defaults to the user config directory).
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Backend base URL, overriding the configuration.
    #[arg(long, global = true)]
    pub backend: Option<String>,

    /// Verbose output (show debug info).
    #[arg(long, short, global = true)]
    pub verbose: bool,

    /// Disable colored output.
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Quiet mode (minimal output).
    #[arg(long, short, global = true)]
    pub quiet: bool,
}

/// CLI commands.
#[derive(Subcommand)]
pub enum Commands {
    /// List available providers.
    #[command(visible_alias = "p")]
    Providers,

    /// Connect a provider account.
    #[command(visible_alias = "c")]
    Connect(connect::ConnectArgs),

    /// Load a data snapshot with existing credentials.
    #[command(visible_alias = "l")]
    Load(load::LoadArgs),

    /// Manage configuration.
    Config(config::ConfigArgs),
}

/// Output format options.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum, Default)]
pub enum OutputFormat {
    /// Human-readable text with colors.
    #[default]
    Text,
    /// JSON output for scripting.
    Json,
}

/// CLI exit codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(i32)]
pub enum ExitCode {
    /// Success.
    Success = 0,
    /// General error.
    Error = 1,
    /// Provider name not recognized.
    UnknownProvider = 2,
    /// The connection attempt ended without credentials.
    NotConnected = 3,
}

impl ExitCode {
    /// Exit code for an error that escaped a command.
    fn for_error(err: &anyhow::Error) -> Self {
        match err.downcast_ref::<CoreError>() {
            Some(CoreError::UnknownProvider(_)) => Self::UnknownProvider,
            _ => Self::Error,
        }
    }
}

// ============================================================================
// Logging Setup
// ============================================================================

fn setup_logging(verbose: bool, quiet: bool, level: &str) {
    if quiet {
        return;
    }

    let filter = if verbose {
        EnvFilter::new("tether=debug,info")
    } else {
        EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(format!("tether={level}")))
    };

    tracing_subscriber::registry()
        .with(
            fmt::layer()
                .with_target(false)
                .without_time()
                .with_writer(std::io::stderr),
        )
        .with(filter)
        .init();
}

// ============================================================================
// Main Entry Point
// ============================================================================

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    // A broken config file is reported by the command itself
    let log_level = commands::load_config(&cli)
        .map_or_else(|_| "warn".to_string(), |c| c.general.log_level);
    setup_logging(cli.verbose, cli.quiet, &log_level);

    let result = match &cli.command {
        Commands::Providers => providers::run(&cli).map(|()| ExitCode::Success),
        Commands::Connect(args) => connect::run(args, &cli).await,
        Commands::Load(args) => load::run(args, &cli).await,
        Commands::Config(args) => config::run(args, &cli).map(|()| ExitCode::Success),
    };

    let code = match result {
        Ok(code) => code,
        Err(e) => {
            if !cli.quiet {
                eprintln!("Error: {e:#}");
            }
            ExitCode::for_error(&e)
        }
    };

    if code != ExitCode::Success {
        std::process::exit(code as i32);
    }
}
