//! Evaluation cycle configuration.
//!
//! Controls how often membership is re-evaluated, when a vessel position is
//! too old to trust, and where membership state is persisted.

use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use validator::{self, Validate};

#[derive(Debug, Serialize, Deserialize, Validate, Clone)]
pub struct EvaluatorConfig {
    /// Seconds between evaluation cycles.
    #[validate(range(min = 1, max = 86400))]
    #[serde(default = "default_interval")]
    pub interval_secs: u64,

    /// Positions older than this are treated as "not reporting".
    #[validate(range(min = 1))]
    #[serde(default)]
    pub max_position_age_secs: Option<u64>,

    /// Keep membership flags for selected vessels missing from the snapshot.
    #[serde(default = "default_true")]
    pub retain_absent_vessels: bool,

    /// JSON snapshot of membership state. Unset keeps state in memory only.
    #[serde(default)]
    pub state_path: Option<PathBuf>,
}

fn default_interval() -> u64 {
    60
}

fn default_true() -> bool {
    true
}

impl EvaluatorConfig {
    pub fn interval(&self) -> Duration {
        Duration::from_secs(self.interval_secs)
    }

    pub fn max_position_age(&self) -> Option<Duration> {
        self.max_position_age_secs.map(Duration::from_secs)
    }
}

impl Default for EvaluatorConfig {
    fn default() -> Self {
        Self {
            interval_secs: default_interval(),
            max_position_age_secs: None,
            retain_absent_vessels: default_true(),
            state_path: None,
        }
    }
}
