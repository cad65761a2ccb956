//! CLI command implementations.

pub mod config;
pub mod connect;
pub mod load;
pub mod providers;

use anyhow::{Context, Result};
use std::path::PathBuf;
use tether_core::CoreError;
use tether_fetch::{BrowserWindowHost, FetchContext, HttpBackend, PromptWindowHost};
use tether_providers::{ProviderDescriptor, ProviderRegistry};
use tether_store::Config;
use tracing::debug;

use crate::Cli;

/// Path of the config file in use.
pub fn config_path(cli: &Cli) -> PathBuf {
    cli.config.clone().unwrap_or_else(Config::default_path)
}

/// Loads the configuration and applies command-line overrides.
pub fn load_config(cli: &Cli) -> Result<Config> {
    let path = config_path(cli);
    let mut config = Config::load_from(&path)
        .with_context(|| format!("Failed to load config from {}", path.display()))?;

    if let Some(base_url) = &cli.backend {
        config.backend.base_url.clone_from(base_url);
        config.validate()?;
    }
    Ok(config)
}

/// Looks a provider up by CLI name, alias or display name.
pub fn resolve_provider(name: &str) -> Result<&'static ProviderDescriptor> {
    ProviderRegistry::get_by_cli_name(name)
        .ok_or_else(|| CoreError::UnknownProvider(name.to_string()).into())
}

/// Builds the host APIs from the configuration.
///
/// `prompt` swaps the browser window for a stdin confirmation.
pub fn build_context(config: &Config, prompt: bool) -> Result<FetchContext> {
    let backend = HttpBackend::with_timeout(&config.backend.base_url, config.backend.timeout())?;
    debug!(base_url = %config.backend.base_url, prompt, "Building fetch context");

    let builder = FetchContext::builder()
        .backend(backend)
        .window_size(config.window.size());

    let builder = if prompt {
        builder.windows(PromptWindowHost::new())
    } else {
        let mut host = BrowserWindowHost::new();
        if let Some(browser) = &config.window.browser {
            host = host.with_browser(browser.clone());
        }
        builder.windows(host)
    };

    Ok(builder.build()?)
}
