//! # Internal Metrics Module
//!
//! ## Components:
//!
//! - **`Metrics`**: Registers descriptions for every metric the relay emits
//!   and implements the labeled `MonitoringSink` on top of the `metrics` crate.
//!
//! - **`MetricsBuilder`**: Installs the Prometheus recorder and prepares the
//!   `MetricsServer` when metrics are enabled.
//!
//! - **`MetricsServer`**: (Defined in `server.rs`) An `axum`-based web server
//!   that exposes the `/metrics` endpoint for Prometheus to scrape.
//!
//! - **`StatsdClient`**: (Defined in `statsd.rs`) A DogStatsD client used as
//!   the fire-and-forget aggregate sink.

use crate::config::MetricsConfig;
use crate::core::MonitoringSink;
use crate::internal_metrics::server::MetricsServer;
use anyhow::{Context, Result};
use metrics::Unit;
use metrics_exporter_prometheus::PrometheusBuilder;
use std::net::SocketAddr;
use tokio::net::TcpListener;
use tokio::sync::watch;
use tracing::info;

pub mod server;
pub mod statsd;

/// Name of the labeled delivery counter.
pub const OUTPUTS_TOTAL: &str = "outputs_total";

/// Handle for the monitoring counters.
#[derive(Clone, Debug, Default)]
pub struct Metrics;

impl Metrics {
    /// Creates a new `Metrics` instance and registers descriptions for all
    /// supported metrics with the global recorder.
    pub fn new() -> Self {
        metrics::describe_counter!(
            OUTPUTS_TOTAL,
            Unit::Count,
            "Total number of alert deliveries, labeled by destination and status."
        );
        Self
    }
}

impl MonitoringSink for Metrics {
    fn increment(&self, destination: &str, status: &str) {
        metrics::counter!(
            OUTPUTS_TOTAL,
            "destination" => destination.to_string(),
            "status" => status.to_string()
        )
        .increment(1);
    }
}

/// Builder for the metrics system.
pub struct MetricsBuilder {
    config: MetricsConfig,
}

impl MetricsBuilder {
    /// Creates a new `MetricsBuilder` with the given configuration.
    pub fn new(config: MetricsConfig) -> Self {
        Self { config }
    }

    /// Installs the Prometheus recorder and binds the metrics listener.
    ///
    /// Returns `None` when metrics are disabled. The returned server is not
    /// yet running; spawn `MetricsServer::run` to start serving.
    pub async fn build(
        self,
        shutdown_rx: watch::Receiver<()>,
    ) -> Result<Option<(MetricsServer, SocketAddr)>> {
        if !self.config.enabled {
            return Ok(None);
        }

        let recorder = PrometheusBuilder::new().build_recorder();
        let handle = recorder.handle();

        // Bind before installing the recorder so a bad address leaves no global state behind.
        let listener = TcpListener::bind(self.config.listen_address)
            .await
            .with_context(|| {
                format!(
                    "Failed to bind metrics server to {}",
                    self.config.listen_address
                )
            })?;
        let addr = listener.local_addr()?;

        metrics::set_global_recorder(recorder)
            .map_err(|e| anyhow::anyhow!("Failed to install Prometheus recorder: {}", e))?;
        info!("Serving Prometheus metrics on http://{}/metrics", addr);

        Ok(Some((MetricsServer::new(listener, handle, shutdown_rx), addr)))
    }
}
