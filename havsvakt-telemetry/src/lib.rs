//! # Havsvakt Telemetry
//!
//! Crate for logging and metrics shared by the evaluator, the notifier and
//! the command line.

pub mod logging;
pub mod metrics;

pub use logging::EventLogger;
pub use metrics::MetricsRecorder;
