//! Config command - manage configuration.

use anyhow::{Result, bail};
use clap::{Args, Subcommand};
use tether_store::{Config, default_config_dir};
use tracing::info;

use super::{config_path, load_config};
use crate::output::{JsonFormatter, TextFormatter};
use crate::{Cli, OutputFormat};

/// Arguments for the config command.
#[derive(Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub action: ConfigAction,
}

/// Config subcommands.
#[derive(Subcommand)]
pub enum ConfigAction {
    /// Show configuration paths.
    Path,

    /// Show the effective configuration.
    Show,

    /// Write a default configuration file.
    Init {
        /// Overwrite an existing file.
        #[arg(long)]
        force: bool,
    },
}

/// Runs the config command.
pub fn run(args: &ConfigArgs, cli: &Cli) -> Result<()> {
    match &args.action {
        ConfigAction::Path => show_paths(cli),
        ConfigAction::Show => show_config(cli),
        ConfigAction::Init { force } => init_config(*force, cli),
    }
}

fn show_paths(cli: &Cli) -> Result<()> {
    let config_dir = default_config_dir();
    let config_file = config_path(cli);

    match cli.format {
        OutputFormat::Text => {
            println!("Configuration Paths");
            println!("{}", "─".repeat(40));
            println!();
            println!("Config dir:  {}", config_dir.display());
            println!("Config file: {}", config_file.display());
        }
        OutputFormat::Json => {
            let paths = serde_json::json!({
                "config_dir": config_dir.display().to_string(),
                "config_file": config_file.display().to_string(),
            });
            println!("{}", JsonFormatter::new(cli.pretty).format(&paths)?);
        }
    }

    Ok(())
}

fn show_config(cli: &Cli) -> Result<()> {
    let config = load_config(cli)?;

    match cli.format {
        OutputFormat::Text => {
            let formatter = TextFormatter::new(!cli.no_color);
            println!("{}", formatter.format_config(&config));
        }
        OutputFormat::Json => {
            println!("{}", JsonFormatter::new(cli.pretty).format(&config)?);
        }
    }

    Ok(())
}

fn init_config(force: bool, cli: &Cli) -> Result<()> {
    let path = config_path(cli);
    if path.exists() && !force {
        bail!(
            "Config file already exists at {} (use --force to overwrite)",
            path.display()
        );
    }

    Config::default().save_to(&path)?;
    info!(path = %path.display(), "Config initialized");
    if !cli.quiet {
        println!("Wrote default configuration to {}", path.display());
    }

    Ok(())
}
