//! Error types for deployment validation.
//!
//! Only configuration problems are fatal to a run. Every other variant is caught
//! by the validator that triggered it and turned into a failed expectation.

use std::time::Duration;
use thiserror::Error;

/// Result type for gate operations.
pub type Result<T> = std::result::Result<T, GateError>;

/// Main error type for gate operations.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum GateError {
    /// Malformed expectation or missing run parameter
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// The platform reported that a resource does not exist
    #[error("Resource not found: {0}")]
    NotFound(String),

    /// The platform reported a failed statement
    #[error("Statement {statement_id} failed: {message}")]
    Execution {
        /// Platform statement identifier
        statement_id: String,
        /// Diagnostic payload reported by the platform
        message: String,
    },

    /// A response matched none of the known shapes
    #[error("Unrecognized platform response: {0}")]
    Protocol(String),

    /// Network or authentication failure
    #[error("Transport error: {0}")]
    Transport(String),

    /// Statement polling exceeded its deadline
    #[error("Statement {statement_id} did not finish within {elapsed:?}")]
    Timeout {
        /// Platform statement identifier
        statement_id: String,
        /// Time spent waiting before giving up
        elapsed: Duration,
    },

    /// The run was cancelled before the statement or table finished
    #[error("Cancelled before completion: {0}")]
    Cancelled(String),
}

impl GateError {
    /// Creates a new configuration error.
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration(message.into())
    }

    /// Creates a new protocol error.
    pub fn protocol(message: impl Into<String>) -> Self {
        Self::Protocol(message.into())
    }

    /// Creates a new transport error.
    pub fn transport(message: impl Into<String>) -> Self {
        Self::Transport(message.into())
    }

    /// Returns true when the platform reported the resource as absent.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_))
    }
}

impl From<serde_json::Error> for GateError {
    fn from(err: serde_json::Error) -> Self {
        GateError::Protocol(err.to_string())
    }
}
