mod error;
mod evaluator;
mod file_source;
mod memory_source;
mod scheduler;
mod source;

pub use self::{
    error::{EvaluationError, SourceError},
    evaluator::{AlertEvaluator, CycleReport, EvaluatorOptions},
    file_source::{read_document, FileSource},
    memory_source::InMemorySource,
    scheduler::{Scheduler, SchedulerSummary},
    source::{FleetSnapshot, FleetSource},
};

pub mod prelude {
    pub use super::{
        AlertEvaluator, CycleReport, EvaluationError, EvaluatorOptions, FileSource, FleetSource,
        InMemorySource, Scheduler, SourceError,
    };
}
