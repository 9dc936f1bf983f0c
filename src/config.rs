//! Configuration management for AlertRelay
//!
//! This module defines the main `Config` struct and its sub-structs. It uses
//! the `figment` crate to layer defaults, an `alertrelay.toml` file,
//! `ALERTRELAY_` environment variables and command-line arguments.

use crate::cli::Cli;
use anyhow::Result;
use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::net::SocketAddr;
use std::path::PathBuf;

/// The configuration file used when none is given on the command line.
pub const DEFAULT_CONFIG_PATH: &str = "alertrelay.toml";

/// The main configuration struct for the application.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct Config {
    /// The logging level for the application.
    pub log_level: String,
    /// Configuration for the Slack output.
    pub slack: SlackConfig,
    /// Configuration for metrics export.
    pub metrics: MetricsConfig,
}

/// Which parts of an alert the Slack output renders.
///
/// `Default` (an empty string), `All` and `Fields` render the alert fields
/// as attachment fields. `Text` and any unrecognized value only send the
/// summary.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum OutputFormat {
    #[default]
    Default,
    All,
    Fields,
    Text,
    Other(String),
}

impl OutputFormat {
    /// Returns true if alert fields should be rendered into the attachment.
    pub fn renders_fields(&self) -> bool {
        matches!(
            self,
            OutputFormat::Default | OutputFormat::All | OutputFormat::Fields
        )
    }
}

impl From<String> for OutputFormat {
    fn from(value: String) -> Self {
        match value.trim().to_lowercase().as_str() {
            "" => OutputFormat::Default,
            "all" => OutputFormat::All,
            "fields" => OutputFormat::Fields,
            "text" => OutputFormat::Text,
            _ => OutputFormat::Other(value),
        }
    }
}

impl From<OutputFormat> for String {
    fn from(value: OutputFormat) -> Self {
        value.to_string()
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OutputFormat::Default => Ok(()),
            OutputFormat::All => f.write_str("all"),
            OutputFormat::Fields => f.write_str("fields"),
            OutputFormat::Text => f.write_str("text"),
            OutputFormat::Other(s) => f.write_str(s),
        }
    }
}

/// Configuration for the Slack output.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct SlackConfig {
    /// The Slack incoming webhook URL. The output is disabled when empty.
    pub webhook_url: String,
    /// The display name the message is posted as.
    pub username: String,
    /// URL of the icon shown next to the message.
    pub icon: String,
    /// Attachment footer. The built-in footer is used when empty.
    pub footer: String,
    /// Which parts of the alert are rendered.
    pub output_format: OutputFormat,
    /// Optional template for the overall message text.
    pub message_format: String,
    /// Request timeout for the webhook call.
    pub timeout_seconds: u64,
}

impl Default for SlackConfig {
    fn default() -> Self {
        Self {
            webhook_url: String::new(),
            username: "AlertRelay".to_string(),
            icon: String::new(),
            footer: String::new(),
            output_format: OutputFormat::All,
            message_format: String::new(),
            timeout_seconds: 10,
        }
    }
}

/// Configuration for metrics export.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct MetricsConfig {
    /// Serve Prometheus metrics on `listen_address`.
    pub enabled: bool,
    /// The address the `/metrics` endpoint binds to.
    pub listen_address: SocketAddr,
    /// DogStatsD collector (`host:port`). Aggregate metrics are dropped when empty.
    pub statsd_address: String,
    /// Prefix prepended to every aggregate metric name.
    pub statsd_prefix: String,
}

impl Default for MetricsConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            listen_address: SocketAddr::from(([127, 0, 0, 1], 9898)),
            statsd_address: String::new(),
            statsd_prefix: "alertrelay.".to_string(),
        }
    }
}

impl Config {
    /// Loads the application configuration by layering sources.
    ///
    /// Later sources win: defaults, the TOML file, `ALERTRELAY_` environment
    /// variables (nested keys separated by `__`), then CLI arguments.
    pub fn load(cli: &Cli) -> Result<Self> {
        let config_path = cli
            .config
            .clone()
            .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_PATH));

        let config: Config = Figment::new()
            .merge(Serialized::defaults(Config::default()))
            .merge(Toml::file(config_path))
            // e.g. ALERTRELAY_SLACK__WEBHOOK_URL=https://...
            .merge(Env::prefixed("ALERTRELAY_").split("__"))
            .merge(cli.clone())
            .extract()?;
        Ok(config)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            slack: SlackConfig::default(),
            metrics: MetricsConfig::default(),
        }
    }
}
