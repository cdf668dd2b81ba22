//! Human-readable rendering of transition events.

use havsvakt_config::NotifierConfig;
use havsvakt_core::TransitionEvent;

/// Date layout used in message bodies, e.g. `16 Oct 26`.
pub const DATE_FORMAT: &str = "%d %b %y";

/// A rendered notification. The structured event travels with the text so
/// a transport may format it its own way.
#[derive(Debug, Clone, PartialEq)]
pub struct Notification {
    pub event: TransitionEvent,
    /// Label of the alert that asked for this notification.
    pub alert: String,
    /// The alert's free text, verbatim.
    pub alert_message: String,
    pub subject: String,
    pub body: String,
}

/// Subject prefix and signature applied to every message.
#[derive(Debug, Clone)]
pub struct MessageTemplate {
    subject_prefix: String,
    signature: String,
}

impl MessageTemplate {
    pub fn new(subject_prefix: impl Into<String>, signature: impl Into<String>) -> Self {
        Self {
            subject_prefix: subject_prefix.into(),
            signature: signature.into(),
        }
    }

    pub fn from_config(config: &NotifierConfig) -> Self {
        Self::new(config.subject_prefix.clone(), config.signature.clone())
    }

    pub fn render(&self, event: &TransitionEvent, alert: &str, alert_message: &str) -> Notification {
        let vessel = match event.imo {
            Some(imo) => format!("\"{}\" (IMO {})", event.vessel, imo),
            None => format!("\"{}\"", event.vessel),
        };

        let subject = format!(
            "{}: \"{}\" has {} \"{}\"",
            self.subject_prefix,
            event.vessel,
            event.direction.headline_verb(),
            event.geofence.name
        );

        let mut body = format!(
            "{} has {} \"{}\" ({}) on {}.\nPosition: {}\n",
            vessel,
            event.direction.verb(),
            event.geofence.name,
            event.geofence.kind,
            event.timestamp.format(DATE_FORMAT),
            event.position,
        );
        if !alert_message.is_empty() {
            body.push_str("\nAlert Details:\n");
            body.push_str(alert_message);
            body.push('\n');
        }
        if !self.signature.is_empty() {
            body.push('\n');
            body.push_str(&self.signature);
            body.push('\n');
        }

        Notification {
            event: event.clone(),
            alert: alert.to_string(),
            alert_message: alert_message.to_string(),
            subject,
            body,
        }
    }
}

impl Default for MessageTemplate {
    fn default() -> Self {
        Self::from_config(&NotifierConfig::default())
    }
}
