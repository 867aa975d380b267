//! Observability wiring: `tracing-subscriber` on stderr plus an optional
//! OpenTelemetry OTLP span exporter.
//!
//! The exporter is attached only when `OTEL_EXPORTER_OTLP_ENDPOINT` is set; the
//! tonic exporter reads the endpoint from that variable itself. Buffered spans
//! are flushed when the returned [`TelemetryGuard`] is dropped.

use anyhow::Context as _;
use opentelemetry::trace::TracerProvider as _;
use opentelemetry::KeyValue;
use opentelemetry_sdk::trace::TracerProvider;
use opentelemetry_sdk::{runtime, Resource};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;
use uuid::Uuid;

use crate::args::LogFormat;

const SERVICE_NAME: &str = "informaniak";
const OTLP_ENDPOINT_VAR: &str = "OTEL_EXPORTER_OTLP_ENDPOINT";
const DEFAULT_FILTER: &str = "warn";

/// Correlates every span and event of one CLI run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct InvocationId(Uuid);

impl InvocationId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for InvocationId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for InvocationId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Keeps the span exporter alive; flushes it on drop.
#[must_use = "dropping the guard shuts down span export"]
pub struct TelemetryGuard {
    provider: Option<TracerProvider>,
}

impl Drop for TelemetryGuard {
    fn drop(&mut self) {
        if let Some(provider) = self.provider.take() {
            if let Err(e) = provider.shutdown() {
                eprintln!("warning: flushing spans failed: {e}");
            }
        }
    }
}

/// Installs the global subscriber.
///
/// `level` takes precedence over `RUST_LOG`; without either only warnings and
/// errors are shown.
pub fn init(level: Option<&str>, format: LogFormat) -> anyhow::Result<TelemetryGuard> {
    let filter = env_filter(level, std::env::var(EnvFilter::DEFAULT_ENV).ok())?;

    let provider = match std::env::var(OTLP_ENDPOINT_VAR) {
        Ok(endpoint) if !endpoint.is_empty() => Some(otlp_provider()?),
        _ => None,
    };
    let otel_layer = provider
        .as_ref()
        .map(|p| tracing_opentelemetry::layer().with_tracer(p.tracer(SERVICE_NAME)));

    let human_layer = (format == LogFormat::Human)
        .then(|| tracing_subscriber::fmt::layer().with_writer(std::io::stderr));
    let json_layer = (format == LogFormat::Json).then(|| {
        tracing_subscriber::fmt::layer()
            .json()
            .with_writer(std::io::stderr)
    });

    tracing_subscriber::registry()
        .with(filter)
        .with(human_layer)
        .with(json_layer)
        .with(otel_layer)
        .try_init()
        .context("install tracing subscriber")?;

    Ok(TelemetryGuard { provider })
}

fn otlp_provider() -> anyhow::Result<TracerProvider> {
    let exporter = opentelemetry_otlp::SpanExporter::builder()
        .with_tonic()
        .build()
        .context("build OTLP span exporter")?;

    Ok(TracerProvider::builder()
        .with_batch_exporter(exporter, runtime::Tokio)
        .with_resource(Resource::new([
            KeyValue::new("service.name", SERVICE_NAME),
            KeyValue::new("service.version", env!("CARGO_PKG_VERSION")),
        ]))
        .build())
}

/// An explicit filter must parse; an unusable `RUST_LOG` falls back to the default.
fn env_filter(explicit: Option<&str>, from_env: Option<String>) -> anyhow::Result<EnvFilter> {
    if let Some(directives) = explicit {
        return EnvFilter::try_new(directives)
            .with_context(|| format!("invalid --log-level '{directives}'"));
    }
    Ok(from_env
        .and_then(|directives| EnvFilter::try_new(directives).ok())
        .unwrap_or_else(|| EnvFilter::new(DEFAULT_FILTER)))
}
