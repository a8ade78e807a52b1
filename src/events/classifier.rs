//! Event classification.
//!
//! Maps a raw event name emitted by the application core, plus its payload, to
//! an [`EventEnvelope`]. Classification is total: unknown payload shapes fall
//! back to the generic or empty message and never produce an error.
//!
//! | raw name      | `type`  | `event`         | `message`                        |
//! |---------------|---------|-----------------|----------------------------------|
//! | `error:<x>`   | error   | `<x>`           | by `payload.type` (`ajax`/other) |
//! | `info:<x>`    | info    | `<x>`           | by `<x>` (`no-content`/other)    |
//! | anything else | (empty) | unchanged       | empty                            |

use crate::domain::{EventEnvelope, EventType};
use serde_json::Value;

/// Prefix marking error events.
pub const ERROR_PREFIX: &str = "error:";

/// Prefix marking informational events.
pub const INFO_PREFIX: &str = "info:";

/// Message for errors whose payload type is `ajax`.
pub const CONNECTIVITY_FAILURE_MESSAGE: &str = "Remote connexion to website failed";

/// Message for every other error.
pub const GENERIC_FAILURE_MESSAGE: &str = "Oops, an error occured...";

/// Message for `info:no-content`.
pub const NO_CONTENT_MESSAGE: &str =
    "The application couldn't retrieve any content, please check your internet connexion!";

/// Classifies a raw core event.
///
/// # Example
///
/// ```
/// use themeapp::events::classify;
/// use themeapp::EventType;
/// use serde_json::json;
///
/// let envelope = classify("error:sync", json!({"type": "ajax"}));
/// assert_eq!(envelope.event, "sync");
/// assert_eq!(envelope.event_type, EventType::Error);
/// ```
#[must_use]
pub fn classify(event_name: &str, payload: Value) -> EventEnvelope {
    if let Some(stripped) = event_name.strip_prefix(ERROR_PREFIX) {
        return error_envelope(stripped, payload);
    }

    if let Some(stripped) = event_name.strip_prefix(INFO_PREFIX) {
        let message = match stripped {
            "no-content" => NO_CONTENT_MESSAGE,
            _ => "",
        };
        return EventEnvelope {
            event: stripped.to_string(),
            event_type: EventType::Info,
            message: message.to_string(),
            data: payload,
        };
    }

    EventEnvelope::plain(event_name, payload)
}

/// Builds an error envelope for `event` regardless of its prefix.
///
/// Used where the failure is known out of band, such as a failed content sync,
/// so the error type is forced instead of inferred from the name.
#[must_use]
pub fn error_envelope(event: &str, payload: Value) -> EventEnvelope {
    tracing::trace!(event = %event, "classifying error event");
    EventEnvelope {
        event: event.to_string(),
        event_type: EventType::Error,
        message: error_message(&payload).to_string(),
        data: payload,
    }
}

/// Error payload types the core is known to emit are `ajax`, `ws-data`,
/// `not-found` and `wrong-data`; only `ajax` has a dedicated message.
fn error_message(payload: &Value) -> &'static str {
    match payload.get("type").and_then(Value::as_str) {
        Some("ajax") => CONNECTIVITY_FAILURE_MESSAGE,
        _ => GENERIC_FAILURE_MESSAGE,
    }
}
