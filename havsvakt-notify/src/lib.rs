//! # Havsvakt Notification Dispatch
//!
//! Turns transition events into messages and hands them to a delivery
//! transport, one independent send per recipient.
//!
//! ### Modules:
//! - `message`: subject/body rendering for enter and exit events
//! - `transport`: the `Notifier` trait plus log and SMTP transports
//! - `dispatcher`: concurrent, timeout-bounded fan-out with failure isolation

pub mod dispatcher;
pub mod error;
pub mod message;
pub mod transport;

pub use dispatcher::{DispatchReport, NotificationDispatcher};
pub use error::DeliveryError;
pub use message::{MessageTemplate, Notification};
pub use transport::{build_notifier, LogNotifier, Notifier, RecordingNotifier, SmtpNotifier};
