//! Alert subscriptions: which vessels to watch against which geofence, and
//! who to tell.

use std::fmt;

use havsvakt_geometry::GeofenceKey;
use serde::{Deserialize, Deserializer, Serialize};

use super::vessel::Vessel;

/// Selects a vessel by IMO number or by name.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum VesselSelector {
    Imo(u32),
    Name(String),
}

impl VesselSelector {
    pub fn matches(&self, vessel: &Vessel) -> bool {
        match self {
            Self::Imo(imo) => vessel.imo == Some(*imo),
            Self::Name(name) => vessel.name == *name,
        }
    }
}

impl fmt::Display for VesselSelector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Imo(imo) => write!(f, "IMO {imo}"),
            Self::Name(name) => f.write_str(name),
        }
    }
}

/// An operator-defined alert subscription.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Alert {
    /// Optional label used in logs.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    #[serde(alias = "vesselSelected")]
    pub vessels: Vec<VesselSelector>,

    pub geofence: GeofenceKey,

    /// Recipient addresses. A single comma-separated string is accepted too.
    #[serde(alias = "email", deserialize_with = "deserialize_recipients")]
    pub recipients: Vec<String>,

    /// Free text appended verbatim to every notification.
    #[serde(default)]
    pub message: String,
}

impl Alert {
    pub fn new(
        vessels: Vec<VesselSelector>,
        geofence: GeofenceKey,
        recipients: Vec<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            id: None,
            vessels,
            geofence,
            recipients,
            message: message.into(),
        }
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    pub fn label(&self) -> String {
        match &self.id {
            Some(id) => id.clone(),
            None => format!("alert on {}", self.geofence),
        }
    }

    /// Alerts with nobody to notify or nothing to watch are not evaluated.
    pub fn is_active(&self) -> bool {
        !self.recipients.is_empty() && !self.vessels.is_empty()
    }

    pub fn selects(&self, vessel: &Vessel) -> bool {
        self.vessels.iter().any(|selector| selector.matches(vessel))
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RecipientsValue {
    List(Vec<String>),
    Joined(String),
}

fn deserialize_recipients<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = match RecipientsValue::deserialize(deserializer)? {
        RecipientsValue::List(list) => list,
        RecipientsValue::Joined(joined) => joined.split(',').map(str::to_string).collect(),
    };

    let mut recipients: Vec<String> = Vec::with_capacity(raw.len());
    for address in raw {
        let address = address.trim();
        if !address.is_empty() && !recipients.iter().any(|r| r == address) {
            recipients.push(address.to_string());
        }
    }
    Ok(recipients)
}
