pub mod classify;
pub mod config;

use std::path::Path;

use anyhow::Context as _;
use clap::{Parser, Subcommand};

use ab_domain::config::Config;

/// Environment variable naming the config file.
pub const CONFIG_ENV: &str = "AB_CONFIG";
pub const DEFAULT_CONFIG_PATH: &str = "config.toml";

/// assistant-bridge: chat widget gateway to the Assistants API.
#[derive(Debug, Parser)]
#[command(name = "assistant-bridge", version, about)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Start the HTTP server (default when no subcommand is given).
    Serve,
    /// Configuration utilities.
    #[command(subcommand)]
    Config(ConfigCommand),
    /// Print the page / mode classification of a widget URL as JSON.
    Classify {
        /// Host page URL as the widget would report it.
        url: String,
    },
    /// Print version information.
    Version,
}

#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Parse the config file and report any errors.
    Validate,
    /// Dump the resolved configuration (with defaults) as TOML.
    Show,
}

/// Load the configuration from `AB_CONFIG` (or `config.toml`).
///
/// A missing file yields the defaults. Returns the config and the path used.
pub fn load_config() -> anyhow::Result<(Config, String)> {
    let path = std::env::var(CONFIG_ENV).unwrap_or_else(|_| DEFAULT_CONFIG_PATH.into());
    let config = load_config_from(Path::new(&path))?;
    Ok((config, path))
}

pub fn load_config_from(path: &Path) -> anyhow::Result<Config> {
    if !path.exists() {
        return Ok(Config::default());
    }
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("reading {}", path.display()))?;
    toml::from_str(&raw).with_context(|| format!("parsing {}", path.display()))
}
