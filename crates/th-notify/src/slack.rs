//! Slack notification channel.
//!
//! Posts the rendered message text to a Slack incoming webhook as a JSON
//! body with a single `text` field.

use crate::{ChangeMessage, NotificationError, Notifier};
use async_trait::async_trait;
use serde::Serialize;
use tracing::{debug, error, instrument};

/// A notifier that sends messages to Slack via webhook.
pub struct SlackNotifier {
    /// The Slack webhook URL.
    webhook_url: String,
    /// HTTP client for sending requests.
    #[cfg(not(test))]
    client: reqwest::Client,
}

impl SlackNotifier {
    /// Creates a new Slack notifier.
    pub fn new(webhook_url: impl Into<String>) -> Result<Self, NotificationError> {
        let url = webhook_url.into();
        if url.is_empty() {
            return Err(NotificationError::InvalidConfig(
                "Slack webhook URL cannot be empty".to_string(),
            ));
        }

        Ok(Self {
            webhook_url: url,
            #[cfg(not(test))]
            client: reqwest::Client::new(),
        })
    }

    /// Sends the payload to Slack (actual HTTP call).
    #[cfg(not(test))]
    async fn send_to_slack(&self, payload: &SlackPayload) -> Result<(), NotificationError> {
        let response = self
            .client
            .post(&self.webhook_url)
            .json(payload)
            .send()
            .await
            .map_err(|e| NotificationError::SendFailed(format!("HTTP request failed: {}", e)))?;

        if response.status().is_success() {
            Ok(())
        } else if response.status() == reqwest::StatusCode::TOO_MANY_REQUESTS {
            Err(NotificationError::RateLimited(
                "Slack rate limit exceeded".to_string(),
            ))
        } else {
            let status = response.status();
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "Unable to read response body".to_string());
            Err(NotificationError::SendFailed(format!(
                "Slack returned {}: {}",
                status, body
            )))
        }
    }

    /// Mock send for testing.
    #[cfg(test)]
    async fn send_to_slack(&self, _payload: &SlackPayload) -> Result<(), NotificationError> {
        Ok(())
    }
}

#[async_trait]
impl Notifier for SlackNotifier {
    #[instrument(skip(self, message), fields(webhook_url = %self.webhook_url))]
    async fn send(&self, message: &ChangeMessage) -> Result<(), NotificationError> {
        let payload = SlackPayload {
            text: message.render(),
        };
        debug!(message_id = %message.id, "Sending notification to Slack");

        match self.send_to_slack(&payload).await {
            Ok(()) => {
                debug!(message_id = %message.id, "Successfully sent notification to Slack");
                Ok(())
            }
            Err(e) => {
                error!(
                    message_id = %message.id,
                    error = %e,
                    "Failed to send notification to Slack"
                );
                Err(e)
            }
        }
    }

    fn name(&self) -> &str {
        "slack"
    }
}

/// The webhook payload: one `text` field.
#[derive(Debug, Serialize)]
struct SlackPayload {
    text: String,
}
