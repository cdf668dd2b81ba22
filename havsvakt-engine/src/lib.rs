//! # havsvakt-engine
//!
//! Periodic geofence evaluation: fleet sources, the alert evaluator, the
//! scheduler that drives it, and the runtime wiring shared by frontends.

pub mod engine;
pub mod runtime;

pub use engine::{
    AlertEvaluator, CycleReport, EvaluationError, EvaluatorOptions, FileSource, FleetSource,
    InMemorySource, Scheduler, SchedulerSummary, SourceError,
};
// Re-export the runtime functions so frontends can simply do:
pub use runtime::{build_evaluator, check_point, run_service, run_single_cycle, PointCheck};
