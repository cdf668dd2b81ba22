//! Notification delivery configuration.
//!
//! Selects the transport used to deliver enter/exit messages and the
//! presentation applied to every message.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use validator::{self, Validate};

use crate::validation;

#[derive(Debug, Serialize, Deserialize, Validate, Clone)]
pub struct NotifierConfig {
    /// Delivery transport (log, smtp).
    #[validate(custom(function = validation::validate_transport))]
    #[serde(default = "default_transport")]
    pub transport: String,

    /// From address of outgoing messages.
    #[validate(email)]
    #[serde(default = "default_sender")]
    pub sender: String,

    /// Prefix of every subject line.
    #[validate(length(min = 1, max = 64))]
    #[serde(default = "default_subject_prefix")]
    pub subject_prefix: String,

    /// Closing lines appended after the alert details.
    #[serde(default = "default_signature")]
    pub signature: String,

    /// Upper bound for a single recipient send (milliseconds).
    #[validate(range(min = 100, max = 60000))]
    #[serde(default = "default_send_timeout")]
    pub send_timeout_ms: u64,

    /// SMTP relay settings, required for the smtp transport.
    #[validate(nested)]
    #[serde(default)]
    pub smtp: Option<SmtpConfig>,
}

fn default_transport() -> String {
    "log".into()
}

fn default_sender() -> String {
    "alerts@havsvakt.example".into()
}

fn default_subject_prefix() -> String {
    "Havsvakt Alert".into()
}

fn default_signature() -> String {
    "This message was sent automatically by Havsvakt geofence monitoring.".into()
}

fn default_send_timeout() -> u64 {
    10_000
}

impl NotifierConfig {
    pub fn send_timeout(&self) -> Duration {
        Duration::from_millis(self.send_timeout_ms)
    }

    pub fn uses_smtp(&self) -> bool {
        self.transport.eq_ignore_ascii_case("smtp")
    }
}

impl Default for NotifierConfig {
    fn default() -> Self {
        Self {
            transport: default_transport(),
            sender: default_sender(),
            subject_prefix: default_subject_prefix(),
            signature: default_signature(),
            send_timeout_ms: default_send_timeout(),
            smtp: None,
        }
    }
}

/// SMTP relay connection parameters.
#[derive(Debug, Serialize, Deserialize, Validate, Clone)]
pub struct SmtpConfig {
    #[validate(custom(function = validation::validate_host))]
    pub host: String,

    #[validate(range(min = 1))]
    #[serde(default = "default_smtp_port")]
    pub port: u16,

    #[serde(default)]
    pub username: Option<String>,

    #[serde(default)]
    pub password: Option<String>,

    /// Upgrade the connection with STARTTLS (otherwise implicit TLS).
    #[serde(default = "default_starttls")]
    pub starttls: bool,
}

fn default_smtp_port() -> u16 {
    587
}

fn default_starttls() -> bool {
    true
}
