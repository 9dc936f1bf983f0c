//! A DogStatsD client for aggregate delivery counters.
//!
//! Each call sends one UDP datagram of the form
//! `<prefix><category>:<delta>|c|#tag1,tag2`. Send failures are logged and
//! otherwise ignored.

use crate::core::AggregateMetrics;
use anyhow::{Context, Result};
use async_trait::async_trait;
use std::net::{Ipv4Addr, Ipv6Addr, SocketAddr};
use tokio::net::UdpSocket;
use tracing::{debug, warn};

/// Sends counters to a DogStatsD-compatible collector.
#[derive(Debug)]
pub struct StatsdClient {
    socket: UdpSocket,
    prefix: String,
}

impl StatsdClient {
    /// Resolves `address` and connects a UDP socket to it.
    pub async fn connect(address: &str, prefix: impl Into<String>) -> Result<Self> {
        let target = tokio::net::lookup_host(address)
            .await
            .with_context(|| format!("Failed to resolve statsd address {}", address))?
            .next()
            .with_context(|| format!("No addresses found for statsd address {}", address))?;

        let local: SocketAddr = if target.is_ipv4() {
            (Ipv4Addr::UNSPECIFIED, 0).into()
        } else {
            (Ipv6Addr::UNSPECIFIED, 0).into()
        };
        let socket = UdpSocket::bind(local).await?;
        socket.connect(target).await?;

        Ok(Self {
            socket,
            prefix: prefix.into(),
        })
    }
}

fn format_count(prefix: &str, category: &str, delta: i64, tags: &[String]) -> String {
    let mut line = format!("{}{}:{}|c", prefix, category, delta);
    if !tags.is_empty() {
        line.push_str("|#");
        line.push_str(&tags.join(","));
    }
    line
}

#[async_trait]
impl AggregateMetrics for StatsdClient {
    async fn count_metric(&self, category: &str, delta: i64, tags: Vec<String>) {
        let line = format_count(&self.prefix, category, delta, &tags);
        match self.socket.send(line.as_bytes()).await {
            Ok(_) => debug!(metric = %line, "Sent statsd counter"),
            Err(e) => warn!(error = %e, metric = %line, "Failed to send statsd counter"),
        }
    }
}

/// Discards every aggregate counter. Used when no collector is configured.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopAggregateMetrics;

#[async_trait]
impl AggregateMetrics for NoopAggregateMetrics {
    async fn count_metric(&self, _category: &str, _delta: i64, _tags: Vec<String>) {}
}
