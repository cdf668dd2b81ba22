//! ## havsvakt-telemetry::logging
//! **Structured logging with tracing**
//!
//! `EventLogger::init` installs the global `fmt` subscriber once at startup.
//! Audit records (transitions, deliveries) go through
//! `EventLogger::log_event` so they share one span name and carry their
//! metadata as OpenTelemetry key/values.

use opentelemetry::KeyValue;
use tracing::{info_span, Instrument};
use tracing_subscriber::fmt::format::FmtSpan;
use tracing_subscriber::{fmt, EnvFilter};

#[derive(Clone)]
pub struct EventLogger;

impl EventLogger {
    /// Installs the global subscriber. `RUST_LOG` wins over `default_filter`.
    /// Calling it twice is a no-op.
    pub fn init(default_filter: &str, json: bool) {
        let filter = EnvFilter::try_from_default_env()
            .or_else(|_| EnvFilter::try_new(default_filter))
            .unwrap_or_else(|_| EnvFilter::new("info"));

        let builder = fmt()
            .with_env_filter(filter)
            .with_thread_names(true)
            .with_span_events(FmtSpan::NONE);

        let _ = if json {
            builder.json().try_init()
        } else {
            builder.try_init()
        };
    }

    #[inline]
    pub async fn log_event(event_type: &str, metadata: Vec<KeyValue>) {
        let span = info_span!("geofence_event", event_type = event_type, otel.kind = "INTERNAL");

        async {
            tracing::info!(metadata = ?metadata, "Geofence event recorded");
        }
        .instrument(span)
        .await
    }
}
