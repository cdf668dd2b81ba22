use std::fmt;

use chrono::{DateTime, Utc};
use havsvakt_geometry::{GeofenceKey, LatLng};
use serde::{Deserialize, Serialize};

use crate::model::VesselKey;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    Enter,
    Exit,
}

impl Direction {
    /// Past-tense verb for message bodies.
    pub fn verb(&self) -> &'static str {
        match self {
            Self::Enter => "entered",
            Self::Exit => "departed",
        }
    }

    /// Verb used in subject lines.
    pub fn headline_verb(&self) -> &'static str {
        match self {
            Self::Enter => "arrived at",
            Self::Exit => "departed",
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Enter => "enter",
            Self::Exit => "exit",
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A vessel crossed a geofence boundary relative to its stored state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransitionEvent {
    pub vessel: VesselKey,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub imo: Option<u32>,
    pub geofence: GeofenceKey,
    pub direction: Direction,
    /// Position that triggered the transition.
    pub position: LatLng,
    pub timestamp: DateTime<Utc>,
}

impl fmt::Display for TransitionEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "\"{}\" {} \"{}\" at {}",
            self.vessel,
            self.direction.verb(),
            self.geofence.name,
            self.position
        )
    }
}
