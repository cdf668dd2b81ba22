use std::collections::HashMap;
use std::fmt;
use std::fs;
use std::path::Path;

use chrono::Utc;
use havsvakt_geometry::GeofenceKey;
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use super::snapshot::{SnapshotEntry, StateSnapshot, SNAPSHOT_VERSION};
use crate::error::StateError;
use crate::model::VesselKey;

/// Key of one membership flag.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct MembershipKey {
    pub vessel: VesselKey,
    pub geofence: GeofenceKey,
}

impl MembershipKey {
    pub fn new(vessel: VesselKey, geofence: GeofenceKey) -> Self {
        Self { vessel, geofence }
    }
}

impl fmt::Display for MembershipKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} @ {}", self.vessel, self.geofence)
    }
}

/// In-memory membership store, optionally mirrored to a JSON snapshot.
#[derive(Debug, Default)]
pub struct VesselStateStore {
    entries: RwLock<HashMap<MembershipKey, bool>>,
}

impl VesselStateStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a store pre-seeded with known flags.
    pub fn seeded(entries: impl IntoIterator<Item = (MembershipKey, bool)>) -> Self {
        Self {
            entries: RwLock::new(entries.into_iter().collect()),
        }
    }

    /// Stored flag for `key`; `false` when never observed.
    pub fn get(&self, key: &MembershipKey) -> bool {
        self.entries.read().get(key).copied().unwrap_or(false)
    }

    /// Stores `inside` for `key`, returning the previous flag.
    pub fn set(&self, key: MembershipKey, inside: bool) -> bool {
        self.entries.write().insert(key, inside).unwrap_or(false)
    }

    pub fn contains_key(&self, key: &MembershipKey) -> bool {
        self.entries.read().contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }

    /// Sorted copy of every entry.
    pub fn entries(&self) -> Vec<(MembershipKey, bool)> {
        let mut entries: Vec<_> = self
            .entries
            .read()
            .iter()
            .map(|(k, v)| (k.clone(), *v))
            .collect();
        entries.sort();
        entries
    }

    /// Drops every entry for which `keep` returns false. Returns the number
    /// of entries removed.
    pub fn reconcile<F>(&self, mut keep: F) -> usize
    where
        F: FnMut(&MembershipKey) -> bool,
    {
        let mut entries = self.entries.write();
        let before = entries.len();
        entries.retain(|key, _| keep(key));
        before - entries.len()
    }

    /// Loads a snapshot written by [`VesselStateStore::save`]. A missing file
    /// yields an empty store.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, StateError> {
        let path = path.as_ref();
        if !path.exists() {
            info!("No state snapshot at {}, starting empty", path.display());
            return Ok(Self::new());
        }

        let raw = fs::read_to_string(path)?;
        let snapshot: StateSnapshot = serde_json::from_str(&raw)?;
        if snapshot.version != SNAPSHOT_VERSION {
            return Err(StateError::UnsupportedVersion(snapshot.version));
        }

        info!(
            "Loaded {} membership entries saved at {}",
            snapshot.entries.len(),
            snapshot.saved_at
        );
        Ok(Self::seeded(snapshot.entries.into_iter().map(|e| {
            (MembershipKey::new(e.vessel, e.geofence), e.inside)
        })))
    }

    /// Writes the store to `path` through a temporary sibling file so a
    /// crash never leaves a truncated snapshot behind.
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<(), StateError> {
        let path = path.as_ref();
        let snapshot = StateSnapshot {
            version: SNAPSHOT_VERSION,
            saved_at: Utc::now(),
            entries: self
                .entries()
                .into_iter()
                .map(|(key, inside)| SnapshotEntry {
                    vessel: key.vessel,
                    geofence: key.geofence,
                    inside,
                })
                .collect(),
        };

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        let tmp = path.with_extension("tmp");
        fs::write(&tmp, serde_json::to_vec_pretty(&snapshot)?)?;
        fs::rename(&tmp, path)?;

        debug!("Saved {} membership entries to {}", snapshot.entries.len(), path.display());
        Ok(())
    }
}
