//! Event classification and the theme event bus.
//!
//! ```text
//! core event ──▶ classify ──▶ EventBus::relay ──▶ "error:sync" listeners
//!                                            └──▶ "error" listeners
//! ```
//!
//! - [`classifier`]: Raw event name + payload → [`crate::EventEnvelope`]
//! - [`bus`]: Reserved/general subscription routing and fan-out
//! - [`reserved`]: The region manager's lifecycle events

pub mod bus;
pub mod classifier;
pub mod reserved;

pub use bus::{EventBus, Listener, Subscription, SubscriptionTarget};
pub use classifier::{classify, error_envelope};
pub use reserved::ReservedEvent;

/// Emitted on the general channel when a refresh starts.
pub const REFRESH_START: &str = "refresh:start";

/// Emitted on the general channel when a refresh ends, successfully or not.
pub const REFRESH_END: &str = "refresh:end";
