use thiserror::Error;

/// Failure to deliver one notification to one recipient.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum DeliveryError {
    #[error("Delivery to {recipient} timed out after {after_ms} ms")]
    Timeout { recipient: String, after_ms: u128 },

    #[error("Invalid recipient address {recipient}: {reason}")]
    InvalidAddress { recipient: String, reason: String },

    #[error("Delivery to {recipient} failed: {reason}")]
    Transport { recipient: String, reason: String },

    /// The transport itself could not be constructed.
    #[error("Notifier setup failed: {0}")]
    Setup(String),
}

impl DeliveryError {
    pub fn transport(recipient: &str, reason: impl ToString) -> Self {
        Self::Transport {
            recipient: recipient.to_string(),
            reason: reason.to_string(),
        }
    }
}
