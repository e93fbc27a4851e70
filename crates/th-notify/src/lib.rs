//! # th-notify
//!
//! Notification channels and orchestration for Trail Herald.
//!
//! A [`ChangeHandler`] takes one inbound change event, applies the
//! notification filter, renders a [`ChangeMessage`], and delivers it
//! through a [`Notifier`] with a single best-effort attempt. Channels
//! implement the `Notifier` trait; [`SlackNotifier`] posts to an
//! incoming webhook and [`LogNotifier`] writes to the log for tests and
//! dry runs.

mod handler;
mod message;
mod slack;

pub use handler::{ChangeHandler, DeliveryOutcome, HandlerConfig, HandlerResponse};
pub use message::ChangeMessage;
pub use slack::SlackNotifier;

use async_trait::async_trait;
use thiserror::Error;
use tracing::{debug, info, instrument};

/// Errors that can occur when sending notifications.
#[derive(Error, Debug)]
pub enum NotificationError {
    /// Failed to send the notification.
    #[error("Failed to send notification: {0}")]
    SendFailed(String),

    /// Invalid configuration.
    #[error("Invalid notification configuration: {0}")]
    InvalidConfig(String),

    /// Rate limited by the notification service.
    #[error("Rate limited: {0}")]
    RateLimited(String),
}

/// Trait for notification channels.
#[async_trait]
pub trait Notifier: Send + Sync {
    /// Sends a rendered change message.
    async fn send(&self, message: &ChangeMessage) -> Result<(), NotificationError>;

    /// Returns the name of the notifier.
    fn name(&self) -> &str;
}

/// A notifier that logs messages via tracing (useful for tests and dry runs).
#[derive(Debug, Default)]
pub struct LogNotifier {
    name: String,
}

impl LogNotifier {
    /// Creates a new log notifier.
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

#[async_trait]
impl Notifier for LogNotifier {
    #[instrument(skip(self, message), fields(notifier = %self.name))]
    async fn send(&self, message: &ChangeMessage) -> Result<(), NotificationError> {
        info!(
            message_id = %message.id,
            event_name = %message.event_name,
            actor = %message.actor,
            "Notification sent via LogNotifier"
        );
        debug!(text = %message.render(), "Notification details");
        Ok(())
    }

    fn name(&self) -> &str {
        &self.name
    }
}
