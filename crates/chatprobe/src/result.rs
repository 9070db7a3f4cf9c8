//! Result and error types for chatprobe.
//!
//! Check outcomes are never errors: an absent control is a FAIL line in the
//! report. These errors cover harness misuse and I/O only.

use thiserror::Error;

/// Result type for chatprobe operations
pub type ProbeResult<T> = Result<T, ProbeError>;

/// Errors that can occur while preparing or running a battery
#[derive(Debug, Error)]
pub enum ProbeError {
    /// A policy pattern failed to compile
    #[error("Invalid pattern for {field}: {message}")]
    InvalidPattern {
        /// Policy field holding the pattern
        field: String,
        /// Compiler message
        message: String,
    },

    /// A node handle does not belong to the document
    #[error("Unknown node #{index}")]
    UnknownNode {
        /// Arena index of the handle
        index: usize,
    },

    /// Policy file could not be parsed
    #[error("Policy parse error: {0}")]
    Policy(#[from] serde_yaml_ng::Error),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl ProbeError {
    /// Create an invalid pattern error
    #[must_use]
    pub fn invalid_pattern(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidPattern {
            field: field.into(),
            message: message.into(),
        }
    }
}
