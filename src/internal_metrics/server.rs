//! # Metrics Server
//!
//! An `axum` server exposing a single `/metrics` endpoint in the Prometheus
//! exposition format. It stops when the shutdown channel fires.

use axum::{routing::get, Router};
use metrics_exporter_prometheus::PrometheusHandle;
use std::future::Future;
use tokio::net::TcpListener;
use tokio::sync::watch;
use tracing::{error, trace};

/// A server that exposes metrics to a Prometheus scraper.
pub struct MetricsServer {
    listener: TcpListener,
    prom_handle: PrometheusHandle,
    shutdown_rx: watch::Receiver<()>,
}

impl MetricsServer {
    /// Creates a new `MetricsServer` but does not spawn it.
    ///
    /// # Arguments
    ///
    /// * `listener` - A `TcpListener` that has already been bound to an address.
    /// * `prom_handle` - A `PrometheusHandle` used to render the metrics.
    /// * `shutdown_rx` - A watch channel receiver for graceful shutdown.
    pub fn new(
        listener: TcpListener,
        prom_handle: PrometheusHandle,
        shutdown_rx: watch::Receiver<()>,
    ) -> Self {
        Self {
            listener,
            prom_handle,
            shutdown_rx,
        }
    }

    /// Returns a future that runs the server until a shutdown signal is received.
    pub fn run(self) -> impl Future<Output = ()> {
        let MetricsServer {
            listener,
            prom_handle,
            mut shutdown_rx,
        } = self;
        let app = Router::new().route(
            "/metrics",
            get(move || {
                let handle = prom_handle.clone();
                async move { handle.render() }
            }),
        );

        async move {
            tokio::select! {
                biased;
                _ = shutdown_rx.changed() => {
                    trace!("Metrics server received shutdown signal.");
                }
                result = axum::serve(listener, app.into_make_service()) => {
                    if let Err(e) = result {
                        error!("Metrics server error: {}", e);
                    }
                }
            }
            trace!("Metrics server task finished.");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::MonitoringSink;
    use crate::internal_metrics::{Metrics, OUTPUTS_TOTAL};
    use metrics_exporter_prometheus::PrometheusBuilder;

    #[tokio::test]
    async fn test_metrics_endpoint_serves_rendered_counters() {
        let recorder = PrometheusBuilder::new().build_recorder();
        let handle = recorder.handle();
        metrics::with_local_recorder(&recorder, || {
            Metrics::new().increment("slack", "error");
        });

        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let (shutdown_tx, shutdown_rx) = watch::channel(());
        let server = tokio::spawn(MetricsServer::new(listener, handle, shutdown_rx).run());

        let body = reqwest::get(format!("http://{}/metrics", addr))
            .await
            .unwrap()
            .text()
            .await
            .unwrap();
        assert!(body.contains(OUTPUTS_TOTAL), "unexpected body:\n{}", body);
        assert!(body.contains("status=\"error\""));

        shutdown_tx.send(()).unwrap();
        tokio::time::timeout(std::time::Duration::from_secs(1), server)
            .await
            .expect("server did not stop")
            .unwrap();
    }
}
