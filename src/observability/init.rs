//! Tracing subscriber setup.

use super::exporter;
use crate::infrastructure::data_dir;
use crate::Config;
use opentelemetry::trace::TracerProvider as _;
use opentelemetry::KeyValue;
use opentelemetry_sdk::resource::Resource;
use tracing_opentelemetry::OpenTelemetryLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// File name of the OTLP trace log inside the data directory.
pub const TRACE_FILE_NAME: &str = "themeapp-otlp.json";

/// Installs the global tracing subscriber.
///
/// Spans pass an [`EnvFilter`] built from `config.trace_level` (default
/// `"info"`) and are exported to `<data_dir>/themeapp-otlp.json`.
///
/// Observability is optional: when the data directory cannot be created this
/// returns without installing anything. Calling it again after a subscriber
/// is installed has no effect.
pub fn init_tracing(config: &Config) {
    let level = config.trace_level.as_deref().unwrap_or("info");

    let dir = data_dir(config.data_dir.as_deref());
    if std::fs::create_dir_all(&dir).is_err() {
        return;
    }

    let resource = Resource::new(vec![
        KeyValue::new("service.name", "themeapp"),
        KeyValue::new("service.version", env!("CARGO_PKG_VERSION")),
    ]);
    let provider = exporter::tracer_provider(dir.join(TRACE_FILE_NAME), resource);
    let otel_layer = OpenTelemetryLayer::new(provider.tracer(exporter::SCOPE_NAME));

    let _ = tracing_subscriber::registry()
        .with(EnvFilter::new(level))
        .with(otel_layer)
        .try_init();
}
