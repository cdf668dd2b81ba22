//! # havsvakt-core
//!
//! Domain model and membership state for the Havsvakt geofence alerting
//! engine.
//!
//! ### Key Submodules:
//! - `model`: vessels, alert subscriptions and their selectors
//! - `events`: enter/exit transition events handed to notifiers
//! - `state`: the `(vessel, geofence) -> inside` store with JSON snapshots

pub mod error;
pub mod events;
pub mod model;
pub mod state;

pub mod prelude {
    pub use crate::error::*;
    pub use crate::events::*;
    pub use crate::model::*;
    pub use crate::state::*;
}

pub use error::StateError;
pub use events::{Direction, TransitionEvent};
pub use model::{Alert, Vessel, VesselKey, VesselSelector};
pub use state::{MembershipKey, VesselStateStore};
