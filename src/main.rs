//! AlertRelay - Slack output for security alerts.
//!
//! Reads newline-delimited alert JSON from a file or stdin and delivers each
//! alert to the configured Slack webhook.

use alertrelay::{
    app::relay_alerts,
    cli::Cli,
    config::Config,
    internal_metrics::MetricsBuilder,
    notification::adapter::DESTINATION,
    services::setup_slack_output,
    stats::{OutputStats, ERROR, OK, TOTAL},
};
use anyhow::{Context, Result};
use clap::Parser;
use std::sync::Arc;
use tokio::io::{AsyncBufRead, BufReader};
use tokio::sync::watch;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Load configuration by layering sources: defaults, file, environment, and CLI args.
    let config = match Config::load(&cli) {
        Ok(config) => config,
        Err(err) => {
            tracing_subscriber::fmt().init();
            error!("Failed to load configuration: {}", err);
            std::process::exit(1);
        }
    };

    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.log_level)),
        )
        .init();

    info!("AlertRelay starting up...");
    info!("-------------------- Configuration --------------------");
    info!("Log Level: {}", config.log_level);
    info!(
        "Slack Output: {}",
        if config.slack.webhook_url.is_empty() {
            "Disabled"
        } else {
            "Enabled"
        }
    );
    info!("Slack Output Format: {}", config.slack.output_format);
    info!("Prometheus Metrics: {}", config.metrics.enabled);
    info!("-------------------------------------------------------");

    let (shutdown_tx, shutdown_rx) = watch::channel(());

    let metrics_task = match MetricsBuilder::new(config.metrics.clone())
        .build(shutdown_rx)
        .await?
    {
        Some((server, _addr)) => Some(tokio::spawn(server.run())),
        None => None,
    };

    let stats = Arc::new(OutputStats::new());
    let output = setup_slack_output(&config, stats.clone())
        .await?
        .context("Slack output is not configured; set slack.webhook_url")?;

    let reader: Box<dyn AsyncBufRead + Unpin + Send> = match &cli.alerts {
        Some(path) => {
            let file = tokio::fs::File::open(path)
                .await
                .with_context(|| format!("Failed to open alerts file {}", path.display()))?;
            Box::new(BufReader::new(file))
        }
        None => Box::new(BufReader::new(tokio::io::stdin())),
    };

    let summary = relay_alerts(reader, Arc::new(output)).await?;

    info!(
        "Slack stats: total={} ok={} error={}",
        stats.get(DESTINATION, TOTAL),
        stats.get(DESTINATION, OK),
        stats.get(DESTINATION, ERROR)
    );

    let _ = shutdown_tx.send(());
    if let Some(task) = metrics_task {
        let _ = task.await;
    }

    if summary.failed > 0 {
        anyhow::bail!("{} alert(s) could not be delivered", summary.failed);
    }
    Ok(())
}
