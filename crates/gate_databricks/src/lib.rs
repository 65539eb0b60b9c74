//! Databricks integration for the Deployment Gate.
//!
//! This crate implements [`gate_core::Platform`] over the Databricks REST APIs:
//!
//! - Unity Catalog tables API for existence lookups
//! - SQL Statement Execution API for row counts
//! - Jobs API for the job listing
//!
//! # Example
//!
//! ```no_run
//! use gate_databricks::{DatabricksClient, DatabricksConfig};
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = DatabricksConfig::builder()
//!     .host("https://adb-1234567890123456.7.azuredatabricks.net")
//!     .token("dapi-example")
//!     .build()?;
//!
//! let client = DatabricksClient::new(config)?;
//! # Ok(())
//! # }
//! ```

use gate_core::GateError;
use thiserror::Error;

mod client;
mod config;

pub use client::DatabricksClient;
pub use config::{DatabricksConfig, DatabricksConfigBuilder};

/// Error types specific to the Databricks REST APIs.
#[derive(Error, Debug)]
pub enum DatabricksError {
    /// Invalid connection configuration
    #[error("Invalid Databricks configuration: {0}")]
    ConfigurationError(String),

    /// Request could not be sent or the response could not be read
    #[error("Network error: {0}")]
    NetworkError(String),

    /// Credentials rejected
    #[error("Authentication failed ({status}): {message}")]
    AuthenticationError {
        /// HTTP status code
        status: u16,
        /// Response body
        message: String,
    },

    /// Resource does not exist
    #[error("Databricks resource not found: {0}")]
    NotFound(String),

    /// Any other non-success response
    #[error("Databricks API error ({status}): {message}")]
    ApiError {
        /// HTTP status code
        status: u16,
        /// Platform error code, when present
        error_code: Option<String>,
        /// Platform error message or raw body
        message: String,
    },

    /// Response body did not match the expected structure
    #[error("Failed to decode Databricks response: {0}")]
    DecodeError(String),
}

impl From<reqwest::Error> for DatabricksError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            DatabricksError::DecodeError(err.to_string())
        } else {
            DatabricksError::NetworkError(err.to_string())
        }
    }
}

impl From<DatabricksError> for GateError {
    fn from(err: DatabricksError) -> Self {
        match err {
            DatabricksError::ConfigurationError(message) => GateError::Configuration(message),
            DatabricksError::NotFound(resource) => GateError::NotFound(resource),
            DatabricksError::DecodeError(message) => GateError::Protocol(message),
            other => GateError::Transport(other.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = DatabricksError::NotFound("dev.sales.orders".to_string());
        assert_eq!(
            err.to_string(),
            "Databricks resource not found: dev.sales.orders"
        );
    }

    #[test]
    fn test_error_into_gate_error() {
        let not_found: GateError = DatabricksError::NotFound("t".to_string()).into();
        assert!(not_found.is_not_found());

        let auth: GateError = DatabricksError::AuthenticationError {
            status: 401,
            message: "invalid token".to_string(),
        }
        .into();
        assert!(matches!(auth, GateError::Transport(_)));

        let decode: GateError = DatabricksError::DecodeError("missing field".to_string()).into();
        assert!(matches!(decode, GateError::Protocol(_)));
    }
}
