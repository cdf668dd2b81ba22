//! In-process transport that keeps every delivered notification.
//!
//! Used to embed the engine in other services and to observe deliveries in
//! tests. Individual recipients can be made to fail or stall.

use std::collections::HashSet;
use std::time::Duration;

use async_trait::async_trait;
use parking_lot::Mutex;

use super::Notifier;
use crate::error::DeliveryError;
use crate::message::Notification;

#[derive(Debug, Default)]
pub struct RecordingNotifier {
    delivered: Mutex<Vec<(String, Notification)>>,
    failing: HashSet<String>,
    stalled: HashSet<String>,
    stall: Duration,
}

impl RecordingNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sends to `recipient` fail with a transport error.
    pub fn failing_for(mut self, recipient: &str) -> Self {
        self.failing.insert(recipient.to_string());
        self
    }

    /// Sends to `recipient` sleep for `stall` before succeeding.
    pub fn stalling_for(mut self, recipient: &str, stall: Duration) -> Self {
        self.stalled.insert(recipient.to_string());
        self.stall = stall;
        self
    }

    pub fn delivered(&self) -> Vec<(String, Notification)> {
        self.delivered.lock().clone()
    }
}

#[async_trait]
impl Notifier for RecordingNotifier {
    fn name(&self) -> &'static str {
        "recording"
    }

    async fn send(&self, recipient: &str, notification: &Notification) -> Result<(), DeliveryError> {
        if self.stalled.contains(recipient) {
            tokio::time::sleep(self.stall).await;
        }
        if self.failing.contains(recipient) {
            return Err(DeliveryError::transport(recipient, "mailbox unavailable"));
        }
        self.delivered
            .lock()
            .push((recipient.to_string(), notification.clone()));
        Ok(())
    }
}
