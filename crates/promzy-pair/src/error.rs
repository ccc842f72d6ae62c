//! Error types for promzy-pair

use thiserror::Error;

/// promzy-pair error type
#[derive(Error, Debug)]
pub enum PairError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Could not find an unused pair code after {0} attempts")]
    CodeSpaceExhausted(usize),

    #[error("Invalid message payload: {0}")]
    InvalidPayload(String),
}

impl From<serde_json::Error> for PairError {
    fn from(err: serde_json::Error) -> Self {
        PairError::InvalidPayload(err.to_string())
    }
}

/// Result type alias
pub type Result<T> = std::result::Result<T, PairError>;
