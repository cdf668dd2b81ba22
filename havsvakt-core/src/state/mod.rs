//! ## havsvakt-core::state
//! **Per-(vessel, geofence) membership flags**
//!
//! The store is the single authority on whether a vessel was last seen
//! inside a geofence. A missing entry means "outside". Only the evaluator
//! writes to it; snapshots let a restarted process resume without replaying
//! enter events.

mod snapshot;
mod store;

pub use store::{MembershipKey, VesselStateStore};
