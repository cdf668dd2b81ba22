//! ## havsvakt-geometry::geofence
//! **Geofence definitions and kind dispatch**
//!
//! A geofence is identified by its name together with its kind: two
//! geofences of different kinds may share a name. References to a geofence
//! are accepted either as `{ name, kind }` or in the older single-string form
//! `"Port X | Circle"`; a bare `"Port X"` names the circle.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::circle::contains_circle;
use crate::coord::LatLng;
use crate::error::GeometryError;
use crate::polygon::contains_polygon;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GeofenceKind {
    #[serde(alias = "Circle")]
    Circle,
    #[serde(alias = "Polygon")]
    Polygon,
    #[serde(alias = "Polyline")]
    Polyline,
}

impl GeofenceKind {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Circle => "Circle",
            Self::Polygon => "Polygon",
            Self::Polyline => "Polyline",
        }
    }
}

impl fmt::Display for GeofenceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for GeofenceKind {
    type Err = GeometryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "circle" => Ok(Self::Circle),
            "polygon" => Ok(Self::Polygon),
            "polyline" => Ok(Self::Polyline),
            other => Err(GeometryError::UnsupportedGeofenceKind(other.to_string())),
        }
    }
}

/// Identity of a geofence: name plus kind.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "GeofenceKeyRepr")]
pub struct GeofenceKey {
    pub name: String,
    pub kind: GeofenceKind,
}

impl GeofenceKey {
    pub fn new(name: impl Into<String>, kind: GeofenceKind) -> Self {
        Self {
            name: name.into(),
            kind,
        }
    }
}

impl fmt::Display for GeofenceKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} | {}", self.name, self.kind)
    }
}

impl FromStr for GeofenceKey {
    type Err = GeometryError;

    /// A bare name without `| Kind` refers to a circle.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (name, kind) = match s.rsplit_once('|') {
            Some((name, kind)) => (name.trim(), kind.parse()?),
            None => (s.trim(), GeofenceKind::Circle),
        };
        if name.is_empty() {
            return Err(GeometryError::MalformedReference(s.to_string()));
        }
        Ok(Self::new(name, kind))
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum GeofenceKeyRepr {
    Legacy(String),
    Structured { name: String, kind: GeofenceKind },
}

impl TryFrom<GeofenceKeyRepr> for GeofenceKey {
    type Error = GeometryError;

    fn try_from(repr: GeofenceKeyRepr) -> Result<Self, Self::Error> {
        match repr {
            GeofenceKeyRepr::Legacy(s) => s.parse(),
            GeofenceKeyRepr::Structured { name, kind } => Ok(Self { name, kind }),
        }
    }
}

/// Geofence geometry, tagged by `kind` when serialized.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum GeofenceShape {
    #[serde(alias = "Circle")]
    Circle {
        center: LatLng,
        #[serde(alias = "radius")]
        radius_meters: f64,
    },
    #[serde(alias = "Polygon")]
    Polygon { vertices: Vec<LatLng> },
    /// Stored for display only; a line encloses no area.
    #[serde(alias = "Polyline")]
    Polyline { points: Vec<LatLng> },
}

/// A named geofence.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Geofence {
    pub name: String,
    #[serde(flatten)]
    pub shape: GeofenceShape,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub remarks: Option<String>,
}

impl Geofence {
    pub fn circle(name: impl Into<String>, center: LatLng, radius_meters: f64) -> Self {
        Self {
            name: name.into(),
            shape: GeofenceShape::Circle {
                center,
                radius_meters,
            },
            remarks: None,
        }
    }

    pub fn polygon(name: impl Into<String>, vertices: Vec<LatLng>) -> Self {
        Self {
            name: name.into(),
            shape: GeofenceShape::Polygon { vertices },
            remarks: None,
        }
    }

    pub fn polyline(name: impl Into<String>, points: Vec<LatLng>) -> Self {
        Self {
            name: name.into(),
            shape: GeofenceShape::Polyline { points },
            remarks: None,
        }
    }

    pub fn kind(&self) -> GeofenceKind {
        match self.shape {
            GeofenceShape::Circle { .. } => GeofenceKind::Circle,
            GeofenceShape::Polygon { .. } => GeofenceKind::Polygon,
            GeofenceShape::Polyline { .. } => GeofenceKind::Polyline,
        }
    }

    pub fn key(&self) -> GeofenceKey {
        GeofenceKey::new(self.name.clone(), self.kind())
    }

    /// Checks the structural rules for the shape: a positive finite radius,
    /// at least three polygon vertices, two polyline points, and in-range
    /// coordinates throughout.
    pub fn validate(&self) -> Result<(), GeometryError> {
        let invalid = |reason: &str| GeometryError::InvalidGeofence {
            name: self.name.clone(),
            reason: reason.to_string(),
        };

        match &self.shape {
            GeofenceShape::Circle {
                center,
                radius_meters,
            } => {
                if !center.is_valid() {
                    return Err(invalid("center out of range"));
                }
                if !radius_meters.is_finite() || *radius_meters <= 0.0 {
                    return Err(invalid("radius must be positive"));
                }
            }
            GeofenceShape::Polygon { vertices } => {
                if vertices.len() < 3 {
                    return Err(invalid("polygon needs at least 3 vertices"));
                }
                if !vertices.iter().all(LatLng::is_valid) {
                    return Err(invalid("vertex out of range"));
                }
            }
            GeofenceShape::Polyline { points } => {
                if points.len() < 2 {
                    return Err(invalid("polyline needs at least 2 points"));
                }
                if !points.iter().all(LatLng::is_valid) {
                    return Err(invalid("point out of range"));
                }
            }
        }
        Ok(())
    }

    /// Whether `point` lies inside this geofence.
    ///
    /// Polylines are rejected with `UnsupportedGeofenceKind` rather than
    /// reported as "outside".
    pub fn contains(&self, point: LatLng) -> Result<bool, GeometryError> {
        match &self.shape {
            GeofenceShape::Polyline { .. } => Err(GeometryError::UnsupportedGeofenceKind(
                self.kind().label().to_string(),
            )),
            GeofenceShape::Circle {
                center,
                radius_meters,
            } => {
                self.validate()?;
                Ok(contains_circle(point, *center, *radius_meters))
            }
            GeofenceShape::Polygon { vertices } => {
                self.validate()?;
                Ok(contains_polygon(point, vertices))
            }
        }
    }
}

/// Uniform containment entry point across geofence kinds.
pub fn contains(point: LatLng, geofence: &Geofence) -> Result<bool, GeometryError> {
    geofence.contains(point)
}
