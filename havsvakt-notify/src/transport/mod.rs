//! ## havsvakt-notify::transport
//! **Delivery channels**
//!
//! A `Notifier` sends one notification to one recipient. The dispatcher
//! owns fan-out, timeouts and failure accounting, so transports stay
//! simple.

use std::sync::Arc;

use async_trait::async_trait;
use havsvakt_config::NotifierConfig;
use tracing::info;

use crate::error::DeliveryError;
use crate::message::Notification;

mod logging;
mod recording;
mod smtp;

pub use logging::LogNotifier;
pub use recording::RecordingNotifier;
pub use smtp::SmtpNotifier;

#[async_trait]
pub trait Notifier: Send + Sync {
    /// Short transport name used in logs.
    fn name(&self) -> &'static str;

    async fn send(&self, recipient: &str, notification: &Notification) -> Result<(), DeliveryError>;
}

/// Builds the transport selected by `config.transport`.
pub fn build_notifier(config: &NotifierConfig) -> Result<Arc<dyn Notifier>, DeliveryError> {
    if config.uses_smtp() {
        let smtp = config
            .smtp
            .as_ref()
            .ok_or_else(|| DeliveryError::Setup("smtp transport without relay settings".into()))?;
        info!("Delivering notifications through SMTP relay {}:{}", smtp.host, smtp.port);
        Ok(Arc::new(SmtpNotifier::new(smtp, &config.sender)?))
    } else {
        info!("Delivering notifications to the log");
        Ok(Arc::new(LogNotifier))
    }
}
