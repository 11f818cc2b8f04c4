use thiserror::Error;

/// Top-level error type for Herald.
#[derive(Debug, Error)]
pub enum HeraldError {
    /// Configuration error.
    #[error("config error: {0}")]
    Config(String),

    /// Locale catalogue or language lookup error.
    #[error("locale error: {0}")]
    Locale(String),

    /// I/O error.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization error.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
