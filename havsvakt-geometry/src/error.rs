use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum GeometryError {
    /// The geofence kind has no containment semantics (polylines) or is not
    /// recognised at all.
    #[error("Unsupported geofence kind: {0}")]
    UnsupportedGeofenceKind(String),

    #[error("Invalid geofence '{name}': {reason}")]
    InvalidGeofence { name: String, reason: String },

    /// A geofence reference with an empty name.
    #[error("Malformed geofence reference: {0:?}")]
    MalformedReference(String),
}
