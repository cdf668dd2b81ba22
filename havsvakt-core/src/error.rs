use thiserror::Error;

#[derive(Debug, Error)]
pub enum StateError {
    #[error("State snapshot I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("State snapshot is not valid JSON: {0}")]
    Serde(#[from] serde_json::Error),

    #[error("Unsupported state snapshot version {0}")]
    UnsupportedVersion(u32),
}
