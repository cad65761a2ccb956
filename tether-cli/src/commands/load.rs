//! Load command - retrieve a snapshot with caller-supplied credentials.

use anyhow::{Context, Result, bail};
use clap::Args;
use serde_json::Value;
use std::io::Read;
use tether_connect::{DataRetriever, LoadOutcome, LogNotifier};
use tether_core::Credentials;

use super::{build_context, load_config, resolve_provider};
use crate::output::{JsonFormatter, TextFormatter};
use crate::{Cli, ExitCode, OutputFormat};

/// Arguments for the load command.
#[derive(Args)]
pub struct LoadArgs {
    /// Provider to load from.
    #[arg(long, short)]
    pub provider: String,

    /// Credentials JSON file, or '-' to read stdin.
    #[arg(long, short)]
    pub credentials: String,
}

/// Runs the load command.
pub async fn run(args: &LoadArgs, cli: &Cli) -> Result<ExitCode> {
    let config = load_config(cli)?;
    let desc = resolve_provider(&args.provider)?;
    let credentials = read_credentials(&args.credentials)?;
    let ctx = build_context(&config, false)?;

    let retriever = DataRetriever::new(ctx.backend.clone()).with_notifier(LogNotifier);
    let snapshot = match retriever.load(desc.id, Some(&credentials)).await? {
        LoadOutcome::Loaded(snapshot) => snapshot,
        LoadOutcome::Failed(message) => {
            if !cli.quiet {
                eprintln!("{}: {message}", desc.display_name());
            }
            return Ok(ExitCode::Error);
        }
    };

    match cli.format {
        OutputFormat::Text => {
            let formatter = TextFormatter::new(!cli.no_color);
            println!("{}", formatter.format_snapshot(&snapshot)?);
        }
        OutputFormat::Json => {
            println!("{}", JsonFormatter::new(cli.pretty).format(&snapshot)?);
        }
    }

    Ok(ExitCode::Success)
}

/// Reads credentials JSON from a file, or stdin for `-`.
fn read_credentials(source: &str) -> Result<Credentials> {
    let text = if source == "-" {
        let mut buf = String::new();
        std::io::stdin()
            .read_to_string(&mut buf)
            .context("Failed to read credentials from stdin")?;
        buf
    } else {
        std::fs::read_to_string(source)
            .with_context(|| format!("Failed to read credentials from {source}"))?
    };

    parse_credentials(&text)
}

fn parse_credentials(text: &str) -> Result<Credentials> {
    let value: Value = serde_json::from_str(text).context("Credentials are not valid JSON")?;
    match Credentials::from_payload(value) {
        Some(credentials) => Ok(credentials),
        None => bail!("Credentials are empty"),
    }
}
