//! Fleet document source configuration.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use validator::Validate;

/// Location of the vessel, alert and geofence documents.
#[derive(Debug, Serialize, Deserialize, Validate, Clone)]
pub struct SourceConfig {
    /// Directory holding `vessels`, `alerts` and `geofences` documents
    /// (`.yaml`, `.yml` or `.json`).
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,
}

fn default_data_dir() -> PathBuf {
    PathBuf::from("data")
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
        }
    }
}
