//! Defines the FleetSource trait for reading the documents the evaluator
//! works from.

use async_trait::async_trait;
use havsvakt_core::{Alert, Vessel};
use havsvakt_geometry::Geofence;

use super::error::SourceError;

/// Read-only, pull-based access to the current fleet documents.
#[async_trait]
pub trait FleetSource: Send + Sync {
    /// Latest position report of every tracked vessel.
    async fn vessels(&self) -> Result<Vec<Vessel>, SourceError>;

    async fn alerts(&self) -> Result<Vec<Alert>, SourceError>;

    async fn geofences(&self) -> Result<Vec<Geofence>, SourceError>;
}

/// Everything one cycle evaluates, fetched together before any state is
/// touched.
#[derive(Debug, Clone, Default)]
pub struct FleetSnapshot {
    pub vessels: Vec<Vessel>,
    pub alerts: Vec<Alert>,
    pub geofences: Vec<Geofence>,
}

impl FleetSnapshot {
    pub async fn fetch(source: &dyn FleetSource) -> Result<Self, SourceError> {
        let (vessels, alerts, geofences) =
            tokio::try_join!(source.vessels(), source.alerts(), source.geofences())?;
        Ok(Self {
            vessels,
            alerts,
            geofences,
        })
    }
}
