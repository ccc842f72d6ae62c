//! Error types for promzy-core

use thiserror::Error;

use crate::game::GameError;

/// Main error type for promzy-core
#[derive(Error, Debug)]
pub enum Error {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("TOML parsing error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias for promzy-core
pub type Result<T> = std::result::Result<T, Error>;

/// User-facing command failure.
///
/// These never leave the dispatcher as faults; their `Display` output is sent
/// back to the chat as an ordinary reply.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CommandError {
    /// A command received an argument it cannot use.
    #[error("{0}")]
    InvalidArgument(String),

    /// The command is not allowed in the current game state.
    #[error(transparent)]
    IllegalState(#[from] GameError),
}
