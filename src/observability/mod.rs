//! OpenTelemetry-based observability with file-based trace export.
//!
//! ```text
//! tracing spans → tracing-opentelemetry → SDK tracer → JsonLinesExporter → RotatingFile
//! ```
//!
//! - Traces land in `<data_dir>/themeapp-otlp.json`, one OTLP-JSON batch per line
//! - The file rotates at 10 MB and keeps 3 timestamped backups
//! - The filter level comes from `Config::trace_level`, default `info`
//!
//! ```rust,no_run
//! use themeapp::observability::init_tracing;
//! use themeapp::Config;
//!
//! init_tracing(&Config::default());
//! tracing::debug!("theme layer ready");
//! ```

mod exporter;
mod init;
mod rotating;

pub use init::{init_tracing, TRACE_FILE_NAME};
pub use rotating::RotatingFile;
