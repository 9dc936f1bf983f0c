//! In-memory sinks for observing what a delivery reported.

use alertrelay::core::{AggregateMetrics, MonitoringSink};
use alertrelay::notification::OutputSinks;
use alertrelay::stats::OutputStats;
use async_trait::async_trait;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::sync::mpsc;

#[derive(Debug, Clone, PartialEq)]
pub struct AggregateCount {
    pub category: String,
    pub delta: i64,
    pub tags: Vec<String>,
}

/// An aggregate sink that forwards every counter over a channel.
pub struct ChannelAggregate {
    tx: mpsc::UnboundedSender<AggregateCount>,
}

#[async_trait]
impl AggregateMetrics for ChannelAggregate {
    async fn count_metric(&self, category: &str, delta: i64, tags: Vec<String>) {
        let _ = self.tx.send(AggregateCount {
            category: category.to_string(),
            delta,
            tags,
        });
    }
}

/// A monitoring sink that remembers every `(destination, status)` increment.
#[derive(Default)]
pub struct RecordingMonitor {
    pub increments: Mutex<Vec<(String, String)>>,
}

impl MonitoringSink for RecordingMonitor {
    fn increment(&self, destination: &str, status: &str) {
        self.increments
            .lock()
            .unwrap()
            .push((destination.to_string(), status.to_string()));
    }
}

/// All three sinks, with handles for assertions.
pub struct TestSinks {
    pub stats: Arc<OutputStats>,
    pub monitor: Arc<RecordingMonitor>,
    pub aggregate_rx: mpsc::UnboundedReceiver<AggregateCount>,
    sinks: OutputSinks,
}

impl TestSinks {
    pub fn new() -> Self {
        let stats = Arc::new(OutputStats::new());
        let monitor = Arc::new(RecordingMonitor::default());
        let (tx, aggregate_rx) = mpsc::unbounded_channel();
        let sinks = OutputSinks {
            stats: stats.clone(),
            aggregate: Arc::new(ChannelAggregate { tx }),
            monitoring: monitor.clone(),
        };
        Self {
            stats,
            monitor,
            aggregate_rx,
            sinks,
        }
    }

    pub fn sinks(&self) -> OutputSinks {
        self.sinks.clone()
    }

    pub fn monitor_statuses(&self) -> Vec<String> {
        self.monitor
            .increments
            .lock()
            .unwrap()
            .iter()
            .map(|(_, status)| status.clone())
            .collect()
    }

    /// Waits for the next detached aggregate counter.
    pub async fn next_aggregate(&mut self) -> AggregateCount {
        tokio::time::timeout(Duration::from_secs(1), self.aggregate_rx.recv())
            .await
            .expect("timed out waiting for aggregate metric")
            .expect("aggregate channel closed")
    }
}
