use thiserror::Error;

/// Top-level error type for Customer Pulse.
///
/// The assistant itself never fails on user input; these errors come from
/// the edges: loading configuration, reading snapshot files, and validating
/// the records a data source hands over.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum PulseError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Invalid snapshot: {0}")]
    InvalidSnapshot(String),
}

impl From<toml::de::Error> for PulseError {
    fn from(err: toml::de::Error) -> Self {
        PulseError::Config(err.to_string())
    }
}

impl From<toml::ser::Error> for PulseError {
    fn from(err: toml::ser::Error) -> Self {
        PulseError::Config(err.to_string())
    }
}

impl From<serde_json::Error> for PulseError {
    fn from(err: serde_json::Error) -> Self {
        PulseError::Serialization(err.to_string())
    }
}

/// A specialized `Result` type for Customer Pulse operations.
pub type Result<T> = std::result::Result<T, PulseError>;
