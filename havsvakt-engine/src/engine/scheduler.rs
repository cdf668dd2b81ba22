//! Periodic driver for [`AlertEvaluator::run_cycle`].
//!
//! Each tick awaits its cycle before the next one can start; ticks missed
//! while a slow cycle runs are skipped rather than replayed.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use tokio::time::{self, MissedTickBehavior};
use tracing::{error, info, warn};

use super::error::EvaluationError;
use super::evaluator::AlertEvaluator;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SchedulerSummary {
    pub cycles_completed: u64,
    pub cycles_failed: u64,
}

pub struct Scheduler {
    evaluator: Arc<AlertEvaluator>,
    interval: Duration,
}

impl Scheduler {
    pub fn new(evaluator: Arc<AlertEvaluator>, interval: Duration) -> Self {
        Self {
            evaluator,
            interval,
        }
    }

    /// Runs a cycle immediately and then once per interval until `shutdown`
    /// resolves. A cycle in flight when shutdown fires is finished first.
    pub async fn run_until<F>(&self, shutdown: F) -> SchedulerSummary
    where
        F: Future<Output = ()>,
    {
        let mut ticker = time::interval(self.interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
        tokio::pin!(shutdown);

        let mut summary = SchedulerSummary::default();
        info!("Evaluating every {:?}", self.interval);

        loop {
            tokio::select! {
                biased;
                _ = &mut shutdown => {
                    info!("Shutdown requested, stopping scheduler");
                    break;
                }
                _ = ticker.tick() => {
                    match self.evaluator.run_cycle().await {
                        Ok(_) => summary.cycles_completed += 1,
                        Err(EvaluationError::CycleInProgress) => {
                            warn!("Previous cycle still running, skipping tick");
                        }
                        Err(e) => {
                            error!("Cycle failed: {e}");
                            summary.cycles_failed += 1;
                        }
                    }
                }
            }
        }

        summary
    }
}
