//! Top-level change event handling.
//!
//! [`ChangeHandler::handle`] is the invocation boundary: it parses the
//! envelope, applies the notification filter, renders the message, and
//! makes one best-effort delivery attempt. Nothing propagates past it -
//! every failure becomes a well-formed [`HandlerResponse`].

use crate::{ChangeMessage, Notifier, SlackNotifier};
use serde::Serialize;
use serde_json::Value;
use std::sync::Arc;
use tracing::{error, info, instrument};
use th_core::ChangeEvent;

/// Configuration for the change handler, injected explicitly rather
/// than read from ambient process state.
#[derive(Debug, Clone)]
pub struct HandlerConfig {
    /// Substring the resolved actor must contain to be notified about.
    pub notify_domain: String,
    /// Webhook destination URL. Empty means unconfigured, which is a
    /// valid degraded state: messages are rendered but not delivered.
    pub webhook_url: String,
}

/// What happened to the notification for one invocation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DeliveryOutcome {
    /// Message accepted by the webhook endpoint.
    Delivered,
    /// Actor did not match the notification filter; nothing was sent.
    Skipped,
    /// No webhook endpoint configured; message rendered but not sent.
    NotConfigured,
    /// Delivery was attempted and failed, or the invocation itself
    /// failed before a message could be rendered.
    Failed,
}

/// The invocation result returned to the trigger infrastructure.
#[derive(Debug, Clone, Serialize)]
pub struct HandlerResponse {
    /// 200 for normal processing including filtered skips, 500 for an
    /// internal failure.
    pub status_code: u16,
    /// Description of the outcome; echoes the rendered message text when
    /// one was produced.
    pub body: String,
    /// Distinguishes the delivery outcomes the status code folds together.
    pub outcome: DeliveryOutcome,
}

/// Processes change events: filter, extract, render, deliver.
pub struct ChangeHandler {
    notify_domain: String,
    notifier: Option<Arc<dyn Notifier>>,
}

impl ChangeHandler {
    /// Creates a handler that delivers to the configured Slack webhook.
    ///
    /// A missing webhook URL is logged as a misconfiguration, not a
    /// startup failure; the handler still filters, extracts, and renders.
    pub fn new(config: HandlerConfig) -> Self {
        let notifier: Option<Arc<dyn Notifier>> = match SlackNotifier::new(config.webhook_url) {
            Ok(notifier) => Some(Arc::new(notifier)),
            Err(e) => {
                error!(error = %e, "Webhook URL not configured, notifications will be dropped");
                None
            }
        };

        Self {
            notify_domain: config.notify_domain,
            notifier,
        }
    }

    /// Creates a handler that delivers through an arbitrary channel.
    pub fn with_notifier(notify_domain: impl Into<String>, notifier: Arc<dyn Notifier>) -> Self {
        Self {
            notify_domain: notify_domain.into(),
            notifier: Some(notifier),
        }
    }

    /// Handles one inbound event.
    ///
    /// At most one message is rendered and at most one delivery attempt
    /// is made per call. Delivery failure does not change the 200 status
    /// already earned by successful processing; only a failure to parse
    /// the envelope yields a 500.
    #[instrument(skip(self, event))]
    pub async fn handle(&self, event: &Value) -> HandlerResponse {
        let change = match ChangeEvent::from_value(event) {
            Ok(change) => change,
            Err(e) => {
                error!(error = %e, "Error processing change event");
                return HandlerResponse {
                    status_code: 500,
                    body: format!("Error processing event: {}", e),
                    outcome: DeliveryOutcome::Failed,
                };
            }
        };

        let actor = change.actor();
        if !change.actor_matches(&self.notify_domain) {
            info!(%actor, "Actor does not match notification criteria, skipping");
            return HandlerResponse {
                status_code: 200,
                body: "User not in notify list.".to_string(),
                outcome: DeliveryOutcome::Skipped,
            };
        }

        let message = ChangeMessage::from_event(&change);
        info!(
            message_id = %message.id,
            %actor,
            event_name = %message.event_name,
            "Sending change notification"
        );

        let (outcome, summary) = match &self.notifier {
            None => {
                error!(
                    message_id = %message.id,
                    "No webhook endpoint configured, notification dropped"
                );
                (DeliveryOutcome::NotConfigured, "Webhook not configured")
            }
            Some(notifier) => match notifier.send(&message).await {
                Ok(()) => (DeliveryOutcome::Delivered, "Notification sent"),
                Err(e) => {
                    error!(
                        message_id = %message.id,
                        notifier = %notifier.name(),
                        error = %e,
                        "Failed to deliver change notification"
                    );
                    (DeliveryOutcome::Failed, "Notification delivery failed")
                }
            },
        };

        HandlerResponse {
            status_code: 200,
            body: serde_json::json!({
                "message": summary,
                "text": message.render(),
            })
            .to_string(),
            outcome,
        }
    }
}
