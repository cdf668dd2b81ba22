//! On-disk JSON layout of the state store.

use chrono::{DateTime, Utc};
use havsvakt_geometry::GeofenceKey;
use serde::{Deserialize, Serialize};

use crate::model::VesselKey;

pub(crate) const SNAPSHOT_VERSION: u32 = 1;

#[derive(Debug, Serialize, Deserialize)]
pub(crate) struct StateSnapshot {
    pub version: u32,
    pub saved_at: DateTime<Utc>,
    pub entries: Vec<SnapshotEntry>,
}

#[derive(Debug, Serialize, Deserialize)]
pub(crate) struct SnapshotEntry {
    pub vessel: VesselKey,
    pub geofence: GeofenceKey,
    pub inside: bool,
}
