//! Application layer: the API theme code is written against.
//!
//! # Architecture
//!
//! ```text
//! core events ──▶ ThemeApp::relay ──▶ EventBus ──▶ theme listeners
//! theme code  ──▶ ThemeApp::{filter, action} ──▶ HookRegistry ◀── host extension points
//! theme code  ──▶ ThemeApp::refresh ──▶ RefreshOrchestrator ──▶ core / regions / router
//! ```
//!
//! # Modules
//!
//! - [`theme_app`]: [`ThemeApp`] facade and the [`Host`] bundle

pub mod theme_app;

pub use theme_app::{Host, ThemeApp, CUSTOM_SCREEN_RENDERING, DEFAULT_CUSTOM_TEMPLATE};
