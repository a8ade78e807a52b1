//! Extensibility hooks registered by theme code.
//!
//! - [`registry`]: Filter/action collections with guarded invocation

pub mod registry;

pub use registry::{FailurePolicy, HookFailure, HookOutcome, HookRegistry};

/// Extension point fired for every screen change when the theme renders
/// transitions itself.
pub const SCREEN_TRANSITION: &str = "screen-transition";
