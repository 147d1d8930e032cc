//! Telemetry initialization: structured logging and metric descriptions

pub mod metrics;

use crate::config::TelemetryConfig;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Initialise logging and register metric descriptions.
///
/// Safe to call once per process; a second call fails to install the global
/// subscriber and is ignored.
pub fn init(config: &TelemetryConfig) {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "nexapro_core=info,nexapro=info".into());

    let registry = tracing_subscriber::registry().with(env_filter);

    let result = if config.log_format == "json" {
        // Flatten event fields so `message` is top-level in each JSON line.
        let fmt_layer = tracing_subscriber::fmt::layer()
            .json()
            .flatten_event(true)
            .with_writer(std::io::stderr);
        registry.with(fmt_layer).try_init()
    } else {
        let fmt_layer = tracing_subscriber::fmt::layer().with_writer(std::io::stderr);
        registry.with(fmt_layer).try_init()
    };

    if let Err(e) = result {
        eprintln!("WARN: tracing subscriber already installed: {}", e);
    }

    metrics::describe_metrics();
}
