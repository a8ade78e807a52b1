//! Error types for the theme layer.
//!
//! This module defines the centralized error type [`ThemeError`] and a type alias
//! [`Result`] used throughout the crate. Hook callbacks written by theme code also
//! return this type, so a failing filter or action is just another variant here.

use thiserror::Error;

/// The main error type for theme layer operations.
///
/// # Examples
///
/// ```
/// use themeapp::ThemeError;
///
/// fn strict_filter(value: &str) -> Result<String, ThemeError> {
///     if value.is_empty() {
///         return Err(ThemeError::callback("empty title"));
///     }
///     Ok(value.to_uppercase())
/// }
///
/// assert!(strict_filter("").is_err());
/// ```
#[derive(Debug, Error)]
pub enum ThemeError {
    /// A theme-supplied callback reported a failure.
    #[error("Callback error: {0}")]
    Callback(String),

    /// A hook callback panicked while being invoked.
    ///
    /// The registry catches the unwind and converts it into this variant so the
    /// remaining callbacks of the chain can still run.
    #[error("Hook '{point}' panicked: {message}")]
    HookPanicked {
        /// Extension point the callback was registered under.
        point: String,
        /// Panic payload, when it was a string.
        message: String,
    },

    /// A hook was registered with value or argument types that differ from the
    /// ones the extension point is invoked with.
    #[error("Hook '{point}' was registered for a different value or argument type")]
    HookTypeMismatch {
        /// Extension point name.
        point: String,
    },

    /// Configuration is invalid or missing.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Filesystem or I/O operation failed.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// A TOML configuration file could not be parsed.
    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),

    /// One line of a JSON-lines input could not be parsed.
    #[error("JSON error on line {line}: {source}")]
    JsonLine {
        /// 1-based line number.
        line: usize,
        /// Parser error for that line.
        #[source]
        source: serde_json::Error,
    },
}

impl ThemeError {
    /// Shorthand for [`ThemeError::Callback`].
    pub fn callback(message: impl Into<String>) -> Self {
        Self::Callback(message.into())
    }
}

/// A specialized `Result` type for theme layer operations.
pub type Result<T> = std::result::Result<T, ThemeError>;
