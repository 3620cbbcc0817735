//! Error types for the recap studio client.

/// Top-level error type for the studio client.
#[derive(Debug, thiserror::Error)]
pub enum StudioError {
    /// Configuration error.
    #[error("config error: {0}")]
    Config(String),

    /// HTTP request construction or dispatch error.
    #[error("request error: {0}")]
    Request(String),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Convenience result type.
pub type Result<T> = std::result::Result<T, StudioError>;
