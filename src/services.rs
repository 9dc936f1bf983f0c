//! Encapsulation for setting up the Slack output and its collaborators.

use crate::{
    config::Config,
    core::AggregateMetrics,
    internal_metrics::{
        statsd::{NoopAggregateMetrics, StatsdClient},
        Metrics,
    },
    notification::{OutputSinks, SlackClient, SlackOutput, SlackSettings},
    stats::OutputStats,
};
use anyhow::{Context, Result};
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};

/// Connects the aggregate metrics sink, falling back to a no-op sink when
/// no collector is configured.
pub async fn setup_aggregate_metrics(config: &Config) -> Result<Arc<dyn AggregateMetrics>> {
    if config.metrics.statsd_address.is_empty() {
        return Ok(Arc::new(NoopAggregateMetrics));
    }
    let client = StatsdClient::connect(
        &config.metrics.statsd_address,
        config.metrics.statsd_prefix.clone(),
    )
    .await?;
    info!("Sending aggregate metrics to {}", config.metrics.statsd_address);
    Ok(Arc::new(client))
}

/// Builds the Slack output if a webhook URL is configured.
///
/// Returns `Ok(None)` when Slack is not configured, and an error if the
/// message template does not compile or the HTTP client cannot be built.
pub async fn setup_slack_output(
    config: &Config,
    stats: Arc<OutputStats>,
) -> Result<Option<SlackOutput>> {
    let slack_config = &config.slack;
    if slack_config.webhook_url.is_empty() {
        warn!("No Slack webhook URL was provided. Slack output is disabled.");
        return Ok(None);
    }

    let settings = SlackSettings::from_config(slack_config)
        .context("Invalid Slack message_format template")?;
    let client = SlackClient::new(
        slack_config.webhook_url.clone(),
        Duration::from_secs(slack_config.timeout_seconds),
    )?;

    let sinks = OutputSinks {
        stats,
        aggregate: setup_aggregate_metrics(config).await?,
        monitoring: Arc::new(Metrics::new()),
    };

    info!(format = %slack_config.output_format, "Slack output enabled.");
    Ok(Some(SlackOutput::new(settings, Arc::new(client), sinks)))
}
