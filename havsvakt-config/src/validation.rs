//! Custom validation functions for configuration.

use validator::ValidationError;

pub const TRANSPORTS: [&str; 2] = ["log", "smtp"];

/// Validate the notification transport name.
pub fn validate_transport(name: &str) -> Result<(), ValidationError> {
    if TRANSPORTS.contains(&name.to_lowercase().as_str()) {
        Ok(())
    } else {
        Err(ValidationError::new("unknown_transport"))
    }
}

/// Validate that a log filter directive is not blank.
pub fn validate_filter(filter: &str) -> Result<(), ValidationError> {
    if filter.trim().is_empty() {
        Err(ValidationError::new("empty_log_filter"))
    } else {
        Ok(())
    }
}

/// Validate an SMTP host name: non-empty, no whitespace or scheme.
pub fn validate_host(host: &str) -> Result<(), ValidationError> {
    let valid = !host.is_empty()
        && !host.contains("://")
        && host
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '.' || c == '-');
    if valid {
        Ok(())
    } else {
        Err(ValidationError::new("invalid_host"))
    }
}
