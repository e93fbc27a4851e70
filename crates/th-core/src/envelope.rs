//! Change event envelope parsing and actor resolution.
//!
//! The trigger delivers an outer object whose only interesting field is
//! `detail`: a CloudTrail-style audit record with a loose, per-event-type
//! schema. Every accessor degrades to a default rather than failing, so a
//! partially-populated record still produces a usable notification.

use serde::Deserialize;
use serde_json::Value;

/// Default event name when the record carries none.
pub const UNKNOWN_EVENT: &str = "UnknownEvent";
/// Default for missing region/time/source fields.
pub const UNKNOWN: &str = "Unknown";
/// Default actor when no identity can be resolved.
pub const UNKNOWN_USER: &str = "UnknownUser";

/// The inbound change event envelope.
///
/// The outer object is otherwise opaque; only `detail` is read.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ChangeEvent {
    /// The audit record. Shape varies by event type.
    #[serde(default)]
    pub detail: Value,
}

impl ChangeEvent {
    /// Parses an envelope from a raw trigger value.
    ///
    /// Fails only when the outer value is not an object; a missing or
    /// malformed `detail` is fine and yields defaulted accessors.
    pub fn from_value(value: &Value) -> Result<Self, serde_json::Error> {
        serde_json::from_value(value.clone())
    }

    fn detail_str(&self, key: &str) -> Option<&str> {
        self.detail.get(key).and_then(Value::as_str)
    }

    /// The audit event name, e.g. `RunInstances`.
    pub fn event_name(&self) -> &str {
        self.detail_str("eventName").unwrap_or(UNKNOWN_EVENT)
    }

    /// The region the change occurred in.
    pub fn aws_region(&self) -> &str {
        self.detail_str("awsRegion").unwrap_or(UNKNOWN)
    }

    /// The timestamp string from the audit record, passed through verbatim.
    pub fn event_time(&self) -> &str {
        self.detail_str("eventTime").unwrap_or(UNKNOWN)
    }

    /// The originating service, e.g. `ec2.amazonaws.com`.
    pub fn event_source(&self) -> &str {
        self.detail_str("eventSource").unwrap_or(UNKNOWN)
    }

    /// Resolves the actor attributed to the change.
    ///
    /// Prefers `userIdentity.userName`, falls back to
    /// `userIdentity.principalId`, then to [`UNKNOWN_USER`]. Role-style
    /// identities carry a colon-delimited namespace
    /// (`arn:...:role/actual-name`); only the part after the last colon
    /// is kept.
    pub fn actor(&self) -> String {
        let identity = self.detail.get("userIdentity");
        let raw = identity
            .and_then(|id| id.get("userName"))
            .and_then(Value::as_str)
            .filter(|name| !name.is_empty())
            .or_else(|| {
                identity
                    .and_then(|id| id.get("principalId"))
                    .and_then(Value::as_str)
                    .filter(|id| !id.is_empty())
            })
            .unwrap_or(UNKNOWN_USER);

        match raw.rsplit(':').next() {
            Some(tail) => tail.to_string(),
            None => raw.to_string(),
        }
    }

    /// The notification filter predicate: does the resolved actor carry
    /// the configured domain marker?
    pub fn actor_matches(&self, marker: &str) -> bool {
        self.actor().contains(marker)
    }
}
