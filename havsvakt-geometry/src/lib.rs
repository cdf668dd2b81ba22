//! # Havsvakt Geofence Geometry
//!
//! Pure containment tests for geofences: great-circle distance for circles,
//! ray casting for polygons, and a single `contains` entry point that
//! dispatches on the geofence kind.
//!
//! Nothing in this crate performs I/O or holds shared state, so every
//! function is safe to call from any thread.

pub mod circle;
pub mod coord;
pub mod error;
pub mod geofence;
pub mod polygon;

pub use circle::{contains_circle, haversine_km, EARTH_RADIUS_KM};
pub use coord::LatLng;
pub use error::GeometryError;
pub use geofence::{contains, Geofence, GeofenceKey, GeofenceKind, GeofenceShape};
pub use polygon::contains_polygon;
