//! Common error types for Longbox

use thiserror::Error;

/// Common result type for Longbox operations
pub type Result<T> = std::result::Result<T, Error>;

/// Common error types across the Longbox tools
#[derive(Error, Debug)]
pub enum Error {
    /// I/O operation error (wraps std::io::Error)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON encoding or decoding error (wraps serde_json::Error)
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Configuration loading or validation error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Malformed or missing mandatory cell value, with sheet/row context
    #[error("Invalid input in sheet '{sheet}' row {row}: {message}")]
    Input {
        sheet: String,
        row: u32,
        message: String,
    },

    /// A counter exceeded the 3-digit code space
    #[error("Cannot allocate code higher than 999 (got {0})")]
    CodeRange(usize),

    /// Malformed filter expression
    #[error("Invalid query: {0}")]
    Query(String),

    /// Requested resource not found
    #[error("Not found: {0}")]
    NotFound(String),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),
}
