//! Errors raised while decoding server data, tokens and configuration.

use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

/// Failures that are not tied to a particular transport or store.
#[derive(Debug, Error)]
pub enum Error {
    #[error("Configuration error: {0}")]
    Config(String),

    /// Bearer token could not be decoded
    #[error("Invalid token: {0}")]
    Token(String),

    /// Server payload did not match the expected schema
    #[error("Malformed server payload: {0}")]
    Payload(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
