//! The Slack output: renders, delivers and reports one alert at a time.

use crate::core::{AggregateMetrics, Alert, MonitoringSink, Outcome, Output, StatsSink};
use crate::notification::payload::{build_payload, SlackSettings};
use crate::notification::slack::Transport;
use crate::stats::TOTAL;
use async_trait::async_trait;
use std::sync::Arc;
use tokio::runtime::Handle;
use tracing::{debug, error, info, instrument};

/// Destination name used in logs and every metrics sink.
pub const DESTINATION: &str = "slack";
/// Aggregate metric category for output deliveries.
pub const OUTPUTS_CATEGORY: &str = "outputs";

/// The observability sinks an output reports every delivery to.
#[derive(Clone)]
pub struct OutputSinks {
    pub stats: Arc<dyn StatsSink>,
    pub aggregate: Arc<dyn AggregateMetrics>,
    pub monitoring: Arc<dyn MonitoringSink>,
}

/// Sends alerts to a Slack webhook.
pub struct SlackOutput {
    settings: SlackSettings,
    transport: Arc<dyn Transport>,
    sinks: OutputSinks,
}

impl SlackOutput {
    pub fn new(settings: SlackSettings, transport: Arc<dyn Transport>, sinks: OutputSinks) -> Self {
        Self {
            settings,
            transport,
            sinks,
        }
    }

    /// Builds the message for `alert`, posts it once and records the outcome.
    #[instrument(skip_all, fields(rule = %alert.rule))]
    pub async fn deliver(&self, alert: &Alert) -> Outcome {
        self.sinks.stats.add(DESTINATION, TOTAL, 1);

        let message = build_payload(alert, &self.settings);

        match self.transport.post(&message).await {
            Err(e) => {
                self.record(Outcome::Error);
                error!("Slack - {}", e);
                Outcome::Error
            }
            Ok(()) => {
                self.record(Outcome::Ok);
                info!("Slack - Publish OK");
                Outcome::Ok
            }
        }
    }

    fn record(&self, outcome: Outcome) {
        let status = outcome.as_label();

        // Not awaited: the aggregate sink owns its own failures.
        match Handle::try_current() {
            Ok(handle) => {
                let aggregate = self.sinks.aggregate.clone();
                let tags = vec![
                    format!("output:{}", DESTINATION),
                    format!("status:{}", status),
                ];
                handle.spawn(async move {
                    aggregate.count_metric(OUTPUTS_CATEGORY, 1, tags).await;
                });
            }
            Err(e) => {
                debug!("Slack - Skipping aggregate metric, no runtime: {}", e);
            }
        }

        self.sinks.stats.add(DESTINATION, status, 1);
        self.sinks.monitoring.increment(DESTINATION, status);
    }
}

#[async_trait]
impl Output for SlackOutput {
    fn name(&self) -> &str {
        DESTINATION
    }

    async fn send_alert(&self, alert: &Alert) -> Outcome {
        self.deliver(alert).await
    }
}
