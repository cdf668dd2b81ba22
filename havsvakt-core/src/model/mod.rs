//! Entities read by the evaluator. All of them are owned by external
//! collaborators; the engine never mutates them.

mod alert;
mod vessel;

pub use alert::{Alert, VesselSelector};
pub use vessel::{Vessel, VesselKey};
