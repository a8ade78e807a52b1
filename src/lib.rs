//! Themeapp: the theme extension layer of a mobile-web application shell.
//!
//! Theme code uses this crate to:
//! - Subscribe to application lifecycle, error and info events
//! - Register filters (value transformers) and actions (side effects) at named
//!   extension points
//! - Refresh content without racing the application core
//! - Drive screen transitions and back button behaviour from app history
//!
//! The application core, router, region renderer and DOM stay outside the
//! crate, behind the traits in [`host`].
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────┐
//! │  Theme code                                         │
//! └─────────────────────────────────────────────────────┘
//!                        │
//! ┌─────────────────────────────────────────────────────┐
//! │  Application Layer (app/)                           │  ← ThemeApp facade
//! └─────────────────────────────────────────────────────┘
//!         │                    │                    │
//! ┌───────────────┐   ┌───────────────┐   ┌───────────────┐
//! │ events/       │   │ hooks/        │   │ navigation/   │
//! │ - Classifier  │   │ - Filters     │   │ - Transitions │
//! │ - Event bus   │   │ - Actions     │   │ - Back button │
//! └───────────────┘   └───────────────┘   └───────────────┘
//!         │                                       │
//! ┌─────────────────────────────────────────────────────┐
//! │  refresh/  - sync → menu → routes, in-flight count  │
//! └─────────────────────────────────────────────────────┘
//!                        │
//! ┌─────────────────────────────────────────────────────┐
//! │  host/ traits  →  application core, router, regions │
//! └─────────────────────────────────────────────────────┘
//! ```
//!
//! # Modules
//!
//! - [`app`]: Theme-facing facade
//! - [`domain`]: Envelopes, screen descriptors, errors
//! - [`events`]: Classification and the event bus
//! - [`hooks`]: Filter/action registry
//! - [`navigation`]: Transition table, back button, context classes
//! - [`refresh`]: Refresh orchestrator
//! - [`host`]: Host collaborator traits
//! - [`infrastructure`]: Data directory resolution
//! - `observability`: OpenTelemetry tracing with file export
//!
//! # Configuration
//!
//! ```toml
//! trace_level = "debug"
//! hook_failures = "isolate"       # or "fail-fast"
//! refresh_mode = "single-flight"  # or "concurrent"
//! data_dir = "~/.local/share/themeapp"
//! ```

#![allow(clippy::multiple_crate_versions)]

pub mod app;
pub mod domain;
pub mod events;
pub mod hooks;
pub mod host;
pub mod infrastructure;
pub mod navigation;
pub mod refresh;

pub mod observability;

pub use app::{Host, ThemeApp};
pub use domain::{EventEnvelope, EventType, Result, ScreenDescriptor, ScreenType, ThemeError};
pub use hooks::FailurePolicy;
pub use refresh::RefreshMode;

use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::Path;

/// Theme layer configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Config {
    /// Tracing filter directive such as `info` or `themeapp=debug`.
    /// Default: `"info"`
    pub trace_level: Option<String>,

    /// How hook callback failures are handled. Default: isolate.
    pub failure_policy: FailurePolicy,

    /// How overlapping refresh calls are handled. Default: single-flight.
    pub refresh_mode: RefreshMode,

    /// Directory for trace files. Default: see [`infrastructure::data_dir`].
    pub data_dir: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct ConfigFile {
    trace_level: Option<String>,
    hook_failures: Option<String>,
    refresh_mode: Option<String>,
    data_dir: Option<String>,
}

impl Config {
    /// Parses configuration from a host key/value map.
    ///
    /// Malformed values fall back to their defaults.
    ///
    /// ```rust
    /// use std::collections::BTreeMap;
    /// use themeapp::{Config, RefreshMode};
    ///
    /// let mut map = BTreeMap::new();
    /// map.insert("refresh_mode".to_string(), "concurrent".to_string());
    /// map.insert("hook_failures".to_string(), "sometimes".to_string());
    ///
    /// let config = Config::from_map(&map);
    /// assert_eq!(config.refresh_mode, RefreshMode::Concurrent);
    /// assert_eq!(config.failure_policy, Default::default());
    /// ```
    #[must_use]
    pub fn from_map(map: &BTreeMap<String, String>) -> Self {
        let failure_policy = map
            .get("hook_failures")
            .and_then(|v| FailurePolicy::parse(v))
            .unwrap_or_default();

        let refresh_mode = map
            .get("refresh_mode")
            .and_then(|v| RefreshMode::parse(v))
            .unwrap_or_default();

        Self {
            trace_level: non_empty(map.get("trace_level")),
            failure_policy,
            refresh_mode,
            data_dir: non_empty(map.get("data_dir")),
        }
    }

    /// Parses a TOML configuration document.
    ///
    /// # Errors
    ///
    /// Returns [`ThemeError::Toml`] for malformed TOML or unknown keys and
    /// [`ThemeError::Config`] for unknown policy or mode values.
    pub fn from_toml_str(source: &str) -> Result<Self> {
        let file: ConfigFile = toml::from_str(source)?;

        let failure_policy = match file.hook_failures.as_deref() {
            None => FailurePolicy::default(),
            Some(value) => FailurePolicy::parse(value).ok_or_else(|| {
                ThemeError::Config(format!("unknown hook_failures value '{value}'"))
            })?,
        };

        let refresh_mode = match file.refresh_mode.as_deref() {
            None => RefreshMode::default(),
            Some(value) => RefreshMode::parse(value).ok_or_else(|| {
                ThemeError::Config(format!("unknown refresh_mode value '{value}'"))
            })?,
        };

        Ok(Self {
            trace_level: file.trace_level,
            failure_policy,
            refresh_mode,
            data_dir: file.data_dir,
        })
    }

    /// Reads and parses a TOML configuration file.
    ///
    /// # Errors
    ///
    /// I/O errors reading the file, plus everything [`Config::from_toml_str`]
    /// reports.
    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self> {
        let source = std::fs::read_to_string(path.as_ref())?;
        Self::from_toml_str(&source)
    }
}

fn non_empty(value: Option<&String>) -> Option<String> {
    value.map(|s| s.trim()).filter(|s| !s.is_empty()).map(String::from)
}

/// Builds the theme app for `host`.
///
/// Tracing is not initialized here; hosts that want trace files call
/// [`observability::init_tracing`] first.
#[must_use]
pub fn initialize(host: Host, config: &Config) -> ThemeApp {
    tracing::debug!("initializing theme layer");
    ThemeApp::new(host, config)
}
