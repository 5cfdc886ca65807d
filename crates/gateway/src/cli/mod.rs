pub mod config;

use clap::{Parser, Subcommand};

/// sandman — a conversational bedtime-story engine.
#[derive(Debug, Parser)]
#[command(name = "sandman", version, about)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Start the server (default when no subcommand is given).
    Serve,
    /// Configuration utilities.
    #[command(subcommand)]
    Config(ConfigCommand),
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

// ── Config loading helper ─────────────────────────────────────────────

/// Load the configuration from the path specified by `SANDMAN_CONFIG`
/// (or `config.toml` by default). A missing file yields the built-in
/// defaults. Returns the parsed [`Config`] and the path that was used.
pub fn load_config() -> anyhow::Result<(sm_domain::config::Config, String)> {
    let config_path =
        std::env::var("SANDMAN_CONFIG").unwrap_or_else(|_| "config.toml".into());

    let config = if std::path::Path::new(&config_path).exists() {
        let raw = std::fs::read_to_string(&config_path)
            .map_err(|e| anyhow::anyhow!("reading {config_path}: {e}"))?;
        toml::from_str(&raw)
            .map_err(|e| anyhow::anyhow!("parsing {config_path}: {e}"))?
    } else {
        sm_domain::config::Config::default()
    };

    Ok((config, config_path))
}
