//! Content refresh orchestration.
//!
//! - [`orchestrator`]: Sync → menu rebuild → route reset workflow with a
//!   per-instance in-flight counter

pub mod orchestrator;

pub use orchestrator::{OnError, OnSuccess, RefreshContext, RefreshMode, RefreshOrchestrator};
