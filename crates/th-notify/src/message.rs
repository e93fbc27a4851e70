//! Rendering of change events into chat messages.

use chrono::{DateTime, Utc};
use th_core::{extract_resource, ChangeEvent, ResourceIdentifier};
use uuid::Uuid;

/// A change notification, rendered once and sent at most once.
///
/// The id and creation time exist for log correlation only; they are not
/// part of the delivered payload.
#[derive(Debug, Clone)]
pub struct ChangeMessage {
    /// Unique identifier for this notification.
    pub id: Uuid,
    /// The resolved actor attributed to the change.
    pub actor: String,
    /// The originating service.
    pub event_source: String,
    /// The audit event name.
    pub event_name: String,
    /// The extracted resource identifier, possibly empty.
    pub resource: ResourceIdentifier,
    /// The region the change occurred in.
    pub region: String,
    /// The event timestamp string, passed through verbatim.
    pub event_time: String,
    /// When this message was constructed.
    pub created_at: DateTime<Utc>,
}

impl ChangeMessage {
    /// Builds a message from an inbound change event.
    pub fn from_event(event: &ChangeEvent) -> Self {
        Self {
            id: Uuid::new_v4(),
            actor: event.actor(),
            event_source: event.event_source().to_string(),
            event_name: event.event_name().to_string(),
            resource: extract_resource(event.event_name(), &event.detail),
            region: event.aws_region().to_string(),
            event_time: event.event_time().to_string(),
            created_at: Utc::now(),
        }
    }

    /// Renders the fixed multi-line message text.
    ///
    /// The resource line is included only when an identifier was
    /// extracted. Field values are interpolated verbatim.
    pub fn render(&self) -> String {
        let mut text = String::new();
        text.push_str("*AWS Infrastructure Change Detected! \u{1f6a8}*\n");
        text.push_str(&format!("\u{1f464} User: `{}`\n", self.actor));
        text.push_str(&format!("\u{1f6e0} Event Source: `{}`\n", self.event_source));
        text.push_str(&format!("\u{1f6e0} Event: `{}`\n", self.event_name));
        if !self.resource.is_empty() {
            text.push_str(&format!(
                "\u{1f6e0} {}: `{}`\n",
                self.resource.key, self.resource.value
            ));
        }
        text.push_str(&format!("\u{1f30d} Region: `{}`\n", self.region));
        text.push_str(&format!("\u{1f552} Time: `{}`\n", self.event_time));
        text
    }
}
