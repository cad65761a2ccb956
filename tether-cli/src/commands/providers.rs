//! Providers command - list available providers.

use anyhow::Result;
use tether_providers::ProviderRegistry;
use tracing::info;

use crate::output::{JsonFormatter, TextFormatter};
use crate::{Cli, OutputFormat};

/// Runs the providers command.
pub fn run(cli: &Cli) -> Result<()> {
    info!("Listing providers");

    let providers = ProviderRegistry::all();

    match cli.format {
        OutputFormat::Text => {
            let formatter = TextFormatter::new(!cli.no_color);

            println!("{}", formatter.format_providers_header());
            println!("{}", "─".repeat(70));

            for desc in providers {
                println!("{}", formatter.format_provider_line(desc));
            }

            println!();
            println!(
                "{} providers. Connect one with `tether connect --provider <name> --user <id> --org <id>`.",
                providers.len()
            );
        }
        OutputFormat::Json => {
            let formatter = JsonFormatter::new(cli.pretty);
            println!("{}", formatter.format_providers(providers)?);
        }
    }

    Ok(())
}
