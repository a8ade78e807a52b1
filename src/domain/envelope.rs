//! Normalized event record handed to theme subscribers.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Coarse classification of an event.
///
/// Serializes to the strings `"error"`, `"info"` and `""` so envelopes keep the
/// shape theme code expects when they are logged or exported as JSON.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EventType {
    /// Event name carried the `error:` prefix.
    #[serde(rename = "error")]
    Error,
    /// Event name carried the `info:` prefix.
    #[serde(rename = "info")]
    Info,
    /// Plain lifecycle event.
    #[default]
    #[serde(rename = "")]
    Plain,
}

impl EventType {
    /// Channel name used when re-publishing on the general channel, if any.
    #[must_use]
    pub const fn channel(self) -> Option<&'static str> {
        match self {
            Self::Error => Some("error"),
            Self::Info => Some("info"),
            Self::Plain => None,
        }
    }
}

/// Event envelope `{event, type, message, data}`.
///
/// Built once by the classifier and never mutated afterwards. `data` is the
/// payload the application core emitted, passed through untouched.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EventEnvelope {
    /// Event name with its `error:`/`info:` prefix removed.
    pub event: String,
    /// Channel the envelope is published on.
    #[serde(rename = "type")]
    pub event_type: EventType,
    /// Human-readable message; empty when there is none.
    pub message: String,
    /// Payload emitted by the application core.
    pub data: Value,
}

impl EventEnvelope {
    /// Envelope for a plain lifecycle event with no message.
    #[must_use]
    pub fn plain(event: impl Into<String>, data: Value) -> Self {
        Self {
            event: event.into(),
            event_type: EventType::Plain,
            message: String::new(),
            data,
        }
    }

    /// `true` for envelopes published on the `error` channel.
    #[must_use]
    pub fn is_error(&self) -> bool {
        self.event_type == EventType::Error
    }

    /// `true` for envelopes published on the `info` channel.
    #[must_use]
    pub fn is_info(&self) -> bool {
        self.event_type == EventType::Info
    }
}
