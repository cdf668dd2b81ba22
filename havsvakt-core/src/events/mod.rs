//! ## havsvakt-core::events
//! **Geofence crossing events**
//!
//! Events are produced by the evaluator and handed to notifiers as
//! structured data, so each channel can format them its own way. They are
//! never persisted.

mod transition;

pub use transition::{Direction, TransitionEvent};
