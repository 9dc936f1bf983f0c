//! A client for posting messages to a Slack incoming webhook.

use crate::error::DeliveryError;
use crate::notification::payload::SlackMessage;
use async_trait::async_trait;
use std::time::Duration;
use tracing::{debug, instrument};

/// Delivers a rendered message to its destination.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn post(&self, message: &SlackMessage) -> Result<(), DeliveryError>;
}

/// A client for sending messages to a Slack webhook.
#[derive(Debug, Clone)]
pub struct SlackClient {
    webhook_url: String,
    client: reqwest::Client,
}

impl SlackClient {
    /// Creates a new `SlackClient` whose requests give up after `timeout`.
    pub fn new(webhook_url: String, timeout: Duration) -> Result<Self, DeliveryError> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            webhook_url,
            client,
        })
    }
}

#[async_trait]
impl Transport for SlackClient {
    #[instrument(skip_all)]
    async fn post(&self, message: &SlackMessage) -> Result<(), DeliveryError> {
        let response = self
            .client
            .post(&self.webhook_url)
            .json(message)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(DeliveryError::Status {
                status: status.as_u16(),
                body,
            });
        }

        debug!(status = %status, "Slack webhook accepted message");
        Ok(())
    }
}
