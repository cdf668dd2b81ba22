//! Vessel positions as supplied by the AIS ingestion side.

use std::fmt;
use std::time::Duration;

use chrono::{DateTime, Utc};
use havsvakt_geometry::LatLng;
use serde::{Deserialize, Serialize};

/// Identity of a vessel within the fleet: its name.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct VesselKey(pub String);

impl VesselKey {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for VesselKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for VesselKey {
    fn from(name: &str) -> Self {
        Self(name.to_string())
    }
}

/// Latest AIS report for one tracked vessel.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Vessel {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub imo: Option<u32>,
    /// Missing until the first position report arrives.
    #[serde(default, alias = "latitude", skip_serializing_if = "Option::is_none")]
    pub lat: Option<f64>,
    #[serde(
        default,
        alias = "longitude",
        alias = "lon",
        skip_serializing_if = "Option::is_none"
    )]
    pub lng: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub heading: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub speed: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub destination: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_update: Option<DateTime<Utc>>,
}

impl Vessel {
    pub fn new(name: impl Into<String>, position: LatLng) -> Self {
        Self {
            name: name.into(),
            imo: None,
            lat: Some(position.lat),
            lng: Some(position.lng),
            heading: None,
            speed: None,
            destination: None,
            last_update: None,
        }
    }

    pub fn with_imo(mut self, imo: u32) -> Self {
        self.imo = Some(imo);
        self
    }

    pub fn with_last_update(mut self, at: DateTime<Utc>) -> Self {
        self.last_update = Some(at);
        self
    }

    pub fn key(&self) -> VesselKey {
        VesselKey(self.name.clone())
    }

    pub fn position(&self) -> Option<LatLng> {
        Some(LatLng::new(self.lat?, self.lng?))
    }

    /// A vessel is reporting when it has a usable position that is not older
    /// than `max_age`. Reports without a timestamp are taken as current.
    pub fn is_reporting(&self, now: DateTime<Utc>, max_age: Option<Duration>) -> bool {
        if !self.position().is_some_and(|p| p.is_valid()) {
            return false;
        }
        match (max_age, self.last_update) {
            (Some(max_age), Some(at)) => now
                .signed_duration_since(at)
                .to_std()
                .map(|age| age <= max_age)
                .unwrap_or(true),
            _ => true,
        }
    }
}
