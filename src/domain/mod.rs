//! Domain layer for the theme extension layer.
//!
//! Core value types shared by every other layer, independent of the host
//! application.
//!
//! # Organization
//!
//! - [`error`]: Error type and result alias
//! - [`envelope`]: Normalized event envelope
//! - [`screen`]: Screen descriptors read from the application core

pub mod envelope;
pub mod error;
pub mod screen;

pub use envelope::{EventEnvelope, EventType};
pub use error::{Result, ThemeError};
pub use screen::{ScreenDescriptor, ScreenType};
