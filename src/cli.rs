//! Command-Line Interface (CLI) argument parsing.
//!
//! This module defines the command-line arguments for the application using the
//! `clap` crate. These arguments are parsed at startup and then merged with
//! the configuration from the `alertrelay.toml` file and environment variables.

use clap::Parser;
use figment::{
    value::{Dict, Map, Tag, Value},
    Error, Metadata, Profile, Provider,
};
use std::path::PathBuf;

/// Relays security alerts to Slack.
#[derive(Parser, Debug, Default, Clone)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Path to the TOML configuration file.
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// File of newline-delimited alert JSON. Reads stdin when omitted.
    #[arg(short, long, value_name = "FILE")]
    pub alerts: Option<PathBuf>,

    /// Slack incoming webhook URL.
    #[arg(long, value_name = "URL")]
    pub webhook_url: Option<String>,

    /// Slack output format: all, fields or text.
    #[arg(long, value_name = "FORMAT")]
    pub output_format: Option<String>,

    /// The logging level (e.g. "info", "debug").
    #[arg(long, value_name = "LEVEL")]
    pub log_level: Option<String>,
}

impl Provider for Cli {
    fn metadata(&self) -> Metadata {
        Metadata::named("Command-Line Arguments")
    }

    fn data(&self) -> Result<Map<Profile, Dict>, Error> {
        let mut dict = Dict::new();

        if let Some(level) = &self.log_level {
            dict.insert("log_level".into(), Value::from(level.clone()));
        }

        let mut slack = Dict::new();
        if let Some(url) = &self.webhook_url {
            slack.insert("webhook_url".into(), Value::from(url.clone()));
        }
        if let Some(format) = &self.output_format {
            slack.insert("output_format".into(), Value::from(format.clone()));
        }
        if !slack.is_empty() {
            dict.insert("slack".into(), Value::Dict(Tag::Default, slack));
        }

        let mut map = Map::new();
        map.insert(Profile::Default, dict);
        Ok(map)
    }
}
