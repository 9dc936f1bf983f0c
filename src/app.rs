//! The relay loop, decoupled from the entry point.
//!
//! Reads newline-delimited alert JSON and hands every alert to an output on
//! its own task. Deliveries run concurrently and each one is independent.

use crate::core::{Alert, Outcome, Output};
use anyhow::Result;
use futures::future::join_all;
use std::sync::Arc;
use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use tracing::{debug, error, info, warn};

/// Counts of what happened to each input line.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RelaySummary {
    pub delivered: usize,
    pub failed: usize,
    pub malformed: usize,
}

/// Relays every alert read from `reader` to `output`.
///
/// Blank lines are ignored and lines that are not valid alerts are logged
/// and counted as malformed. Returns once every spawned delivery finished.
pub async fn relay_alerts<R>(reader: R, output: Arc<dyn Output>) -> Result<RelaySummary>
where
    R: AsyncBufRead + Unpin,
{
    let mut summary = RelaySummary::default();
    let mut handles = Vec::new();
    let mut lines = reader.lines();
    let mut line_no = 0usize;

    while let Some(line) = lines.next_line().await? {
        line_no += 1;
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        let alert: Alert = match serde_json::from_str(line) {
            Ok(alert) => alert,
            Err(e) => {
                warn!(line = line_no, error = %e, "Skipping malformed alert");
                summary.malformed += 1;
                continue;
            }
        };

        debug!(line = line_no, rule = %alert.rule, "Dispatching alert to {}", output.name());
        let output = output.clone();
        handles.push(tokio::spawn(async move { output.send_alert(&alert).await }));
    }

    for result in join_all(handles).await {
        match result {
            Ok(Outcome::Ok) => summary.delivered += 1,
            Ok(Outcome::Error) => summary.failed += 1,
            Err(e) => {
                error!("Delivery task panicked: {}", e);
                summary.failed += 1;
            }
        }
    }

    info!(
        delivered = summary.delivered,
        failed = summary.failed,
        malformed = summary.malformed,
        "Finished relaying alerts."
    );
    Ok(summary)
}
