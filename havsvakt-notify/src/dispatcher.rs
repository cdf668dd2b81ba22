//! ## havsvakt-notify::dispatcher
//! **Per-recipient fan-out**
//!
//! Every recipient gets its own task and its own timeout. A failed or slow
//! recipient is logged and counted; it never blocks the others, and nothing
//! here can undo a state change the evaluator already committed.

use std::sync::Arc;
use std::time::Duration;

use havsvakt_telemetry::MetricsRecorder;
use tokio::task::JoinSet;
use tracing::{debug, instrument, warn};

use crate::error::DeliveryError;
use crate::message::Notification;
use crate::transport::Notifier;

/// Outcome of one dispatch.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DispatchReport {
    pub delivered: Vec<String>,
    pub failed: Vec<DeliveryError>,
}

impl DispatchReport {
    pub fn merge(&mut self, other: DispatchReport) {
        self.delivered.extend(other.delivered);
        self.failed.extend(other.failed);
    }

    pub fn is_clean(&self) -> bool {
        self.failed.is_empty()
    }
}

pub struct NotificationDispatcher {
    notifier: Arc<dyn Notifier>,
    send_timeout: Duration,
    metrics: Option<Arc<MetricsRecorder>>,
}

impl NotificationDispatcher {
    pub fn new(notifier: Arc<dyn Notifier>, send_timeout: Duration) -> Self {
        Self {
            notifier,
            send_timeout,
            metrics: None,
        }
    }

    pub fn with_metrics(mut self, metrics: Arc<MetricsRecorder>) -> Self {
        self.metrics = Some(metrics);
        self
    }

    /// Sends `notification` to every recipient concurrently and waits at
    /// most one send timeout for the slowest of them.
    #[instrument(skip_all, fields(transport = self.notifier.name(), event = %notification.event))]
    pub async fn dispatch(&self, notification: &Notification, recipients: &[String]) -> DispatchReport {
        let notification = Arc::new(notification.clone());
        let mut sends = JoinSet::new();

        for recipient in recipients {
            let notifier = Arc::clone(&self.notifier);
            let notification = Arc::clone(&notification);
            let recipient = recipient.clone();
            let timeout = self.send_timeout;

            sends.spawn(async move {
                let outcome = tokio::time::timeout(timeout, notifier.send(&recipient, &notification))
                    .await
                    .unwrap_or_else(|_| {
                        Err(DeliveryError::Timeout {
                            recipient: recipient.clone(),
                            after_ms: timeout.as_millis(),
                        })
                    });
                (recipient, outcome)
            });
        }

        let mut report = DispatchReport::default();
        while let Some(joined) = sends.join_next().await {
            match joined {
                Ok((recipient, Ok(()))) => {
                    debug!("Delivered to {recipient}");
                    report.delivered.push(recipient);
                }
                Ok((_, Err(e))) => {
                    warn!("{e}");
                    report.failed.push(e);
                }
                Err(e) => {
                    warn!("Delivery task aborted: {e}");
                    report.failed.push(DeliveryError::transport("unknown", e));
                }
            }
        }

        if let Some(metrics) = &self.metrics {
            metrics.failed_deliveries.inc_by(report.failed.len() as u64);
        }
        report
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::message::MessageTemplate;
    use crate::transport::RecordingNotifier;
    use chrono::Utc;
    use havsvakt_core::{Direction, TransitionEvent, VesselKey};
    use havsvakt_geometry::{GeofenceKey, GeofenceKind, LatLng};
    use tracing_test::traced_test;

    fn notification() -> Notification {
        let event = TransitionEvent {
            vessel: VesselKey::from("MV TEST"),
            imo: None,
            geofence: GeofenceKey::new("Port X", GeofenceKind::Circle),
            direction: Direction::Enter,
            position: LatLng::new(10.0005, 10.0),
            timestamp: Utc::now(),
        };
        MessageTemplate::default().render(&event, "berth-watch", "Berth 4")
    }

    fn recipients(list: &[&str]) -> Vec<String> {
        list.iter().map(|r| r.to_string()).collect()
    }

    #[tokio::test]
    async fn delivers_to_every_recipient() {
        let notifier = Arc::new(RecordingNotifier::new());
        let dispatcher = NotificationDispatcher::new(notifier.clone(), Duration::from_secs(1));

        let report = dispatcher
            .dispatch(&notification(), &recipients(&["a@example.com", "b@example.com"]))
            .await;

        assert!(report.is_clean());
        assert_eq!(report.delivered.len(), 2);
        assert_eq!(notifier.delivered().len(), 2);
    }

    #[tokio::test]
    #[traced_test]
    async fn one_failing_recipient_does_not_block_others() {
        let notifier = Arc::new(RecordingNotifier::new().failing_for("bad@example.com"));
        let metrics = Arc::new(MetricsRecorder::new().unwrap());
        let dispatcher = NotificationDispatcher::new(notifier.clone(), Duration::from_secs(1))
            .with_metrics(metrics.clone());

        let report = dispatcher
            .dispatch(
                &notification(),
                &recipients(&["bad@example.com", "good@example.com"]),
            )
            .await;

        assert_eq!(report.delivered, vec!["good@example.com".to_string()]);
        assert_eq!(report.failed.len(), 1);
        assert_eq!(metrics.failed_deliveries.get(), 1);
        assert!(logs_contain("bad@example.com"));
    }

    #[tokio::test]
    async fn slow_recipient_times_out() {
        let notifier = Arc::new(
            RecordingNotifier::new().stalling_for("slow@example.com", Duration::from_secs(30)),
        );
        let dispatcher = NotificationDispatcher::new(notifier.clone(), Duration::from_millis(50));

        let started = std::time::Instant::now();
        let report = dispatcher
            .dispatch(
                &notification(),
                &recipients(&["slow@example.com", "fast@example.com"]),
            )
            .await;

        assert!(started.elapsed() < Duration::from_secs(5));
        assert_eq!(report.delivered, vec!["fast@example.com".to_string()]);
        assert!(matches!(
            report.failed.as_slice(),
            [DeliveryError::Timeout { recipient, .. }] if recipient == "slow@example.com"
        ));
    }
}
