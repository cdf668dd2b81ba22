use std::path::PathBuf;

use havsvakt_geometry::{GeofenceKey, GeometryError};
use thiserror::Error;

/// Failure to read vessels, alerts or geofences.
#[derive(Debug, Error)]
pub enum SourceError {
    #[error("Fleet source unavailable: {0}")]
    Unavailable(String),

    #[error("Cannot read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Cannot parse {path}: {reason}")]
    Parse { path: PathBuf, reason: String },
}

/// Errors raised while evaluating alerts.
///
/// Only `DataSourceUnavailable` and `CycleInProgress` abort a cycle; the
/// others are collected in the cycle report and evaluation continues.
#[derive(Debug, Error)]
pub enum EvaluationError {
    #[error("Alert '{alert}' references missing geofence {geofence}")]
    GeofenceNotFound { alert: String, geofence: GeofenceKey },

    #[error("Geofence {geofence} has no containment test")]
    UnsupportedGeofenceKind { geofence: GeofenceKey },

    #[error("Geofence {geofence} is invalid: {reason}")]
    InvalidGeofence { geofence: GeofenceKey, reason: String },

    #[error("Vessel {vessel} selected by '{alert}' is not reporting")]
    VesselNotReporting { alert: String, vessel: String },

    #[error("Data source unavailable: {0}")]
    DataSourceUnavailable(#[from] SourceError),

    #[error("Another evaluation cycle is still running")]
    CycleInProgress,
}

impl EvaluationError {
    pub(crate) fn from_geometry(geofence: GeofenceKey, err: GeometryError) -> Self {
        match err {
            GeometryError::UnsupportedGeofenceKind(_) => Self::UnsupportedGeofenceKind { geofence },
            other => Self::InvalidGeofence {
                geofence,
                reason: other.to_string(),
            },
        }
    }

    /// Whether the error abandons the whole cycle.
    pub fn is_fatal(&self) -> bool {
        matches!(self, Self::DataSourceUnavailable(_) | Self::CycleInProgress)
    }
}
