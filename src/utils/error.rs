//! Error types for the entire application.
//!
//! We use `thiserror` for library-style errors with custom types,
//! and `anyhow` for application-level error propagation in main.rs and commands.
//!
//! Truncated or inconsistent logs are not errors: they surface as
//! truncation events in the parse result.

use thiserror::Error;

/// Errors that abort a parse call
#[derive(Error, Debug)]
pub enum ParseError {
    #[error("Malformed {field} on log line {line}: '{value}'")]
    MalformedField {
        /// Physical line index, relative to the start marker
        line: usize,
        field: &'static str,
        value: String,
    },

    #[error("Resource limit exceeded: {limit} reached {value}")]
    ResourceLimit { limit: &'static str, value: usize },
}

impl ParseError {
    pub(crate) fn malformed(line: usize, field: &'static str, value: &str) -> Self {
        Self::MalformedField {
            line,
            field,
            value: value.to_string(),
        }
    }
}

/// Errors that can occur during file output
#[derive(Error, Debug)]
pub enum OutputError {
    #[error("Failed to write file: {0}")]
    WriteFailed(#[from] std::io::Error),

    #[error("Failed to serialize JSON: {0}")]
    SerializationFailed(#[from] serde_json::Error),

    #[error("Invalid output path: {0}")]
    InvalidPath(String),
}
