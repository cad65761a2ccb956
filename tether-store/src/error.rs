//! Store error types.

use thiserror::Error;

/// Errors raised while reading or writing Tether's on-disk state.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The config file could not be read or written.
    #[error("Config file I/O failed: {0}")]
    Io(#[from] std::io::Error),

    /// The config file is not valid JSON for [`Config`](crate::Config).
    #[error("Config file is malformed: {0}")]
    Serialization(#[from] serde_json::Error),

    /// A config value is out of range.
    #[error("Invalid config value: {0}")]
    Config(String),
}
