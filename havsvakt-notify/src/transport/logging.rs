use async_trait::async_trait;
use havsvakt_telemetry::EventLogger;
use opentelemetry::KeyValue;

use super::Notifier;
use crate::error::DeliveryError;
use crate::message::Notification;

/// Writes notifications to the structured log instead of delivering them.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogNotifier;

#[async_trait]
impl Notifier for LogNotifier {
    fn name(&self) -> &'static str {
        "log"
    }

    async fn send(&self, recipient: &str, notification: &Notification) -> Result<(), DeliveryError> {
        let event = &notification.event;
        EventLogger::log_event(
            "notification",
            vec![
                KeyValue::new("recipient", recipient.to_string()),
                KeyValue::new("vessel", event.vessel.to_string()),
                KeyValue::new("geofence", event.geofence.to_string()),
                KeyValue::new("direction", event.direction.as_str()),
                KeyValue::new("subject", notification.subject.clone()),
            ],
        )
        .await;
        Ok(())
    }
}
