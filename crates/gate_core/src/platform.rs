//! The platform adapter contract.
//!
//! Validators talk to the platform only through [`Platform`]. Implementations hide
//! transport details and response-shape differences; the one exception is the
//! statement result payload, which is handed over raw so the statement executor
//! can look for the shapes it knows.

use crate::{GateError, Result, TableRef};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Lifecycle state of a submitted statement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum StatementState {
    /// Queued, not yet running
    Pending,
    /// Executing on the warehouse
    Running,
    /// Finished with a result
    Succeeded,
    /// Finished without a result
    Failed,
}

impl StatementState {
    /// Returns true once the statement will not change state anymore.
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Succeeded | Self::Failed)
    }

    /// Maps a platform state string onto the four states the gate tracks.
    ///
    /// `CANCELED` and `CLOSED` end a statement without a usable result and are
    /// treated as `Failed`.
    pub fn from_api(state: &str) -> Result<Self> {
        match state {
            "PENDING" => Ok(Self::Pending),
            "RUNNING" => Ok(Self::Running),
            "SUCCEEDED" => Ok(Self::Succeeded),
            "FAILED" | "CANCELED" | "CLOSED" => Ok(Self::Failed),
            other => Err(GateError::Protocol(format!(
                "unknown statement state '{}'",
                other
            ))),
        }
    }
}

impl fmt::Display for StatementState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Pending => "PENDING",
            Self::Running => "RUNNING",
            Self::Succeeded => "SUCCEEDED",
            Self::Failed => "FAILED",
        };
        f.write_str(s)
    }
}

/// A submitted statement and its last observed state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatementHandle {
    /// Platform statement identifier
    pub id: String,
    /// Last observed state
    pub state: StatementState,
    /// Error payload reported with a failed state
    pub error: Option<String>,
}

impl StatementHandle {
    /// Creates a handle without error details.
    pub fn new(id: impl Into<String>, state: StatementState) -> Self {
        Self {
            id: id.into(),
            state,
            error: None,
        }
    }

    /// Attaches the platform's error payload.
    pub fn with_error(mut self, error: impl Into<String>) -> Self {
        self.error = Some(error.into());
        self
    }
}

/// A SQL statement to run on a warehouse.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatementRequest {
    /// SQL text
    pub statement: String,
    /// Compute resource that executes the statement
    pub warehouse_id: String,
    /// Default catalog for the session
    pub catalog: String,
    /// Default schema for the session
    pub schema: String,
}

/// A job registered on the platform.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobSummary {
    /// Platform job identifier
    pub job_id: i64,
    /// Name from the job settings, absent for unnamed jobs
    pub name: Option<String>,
}

impl JobSummary {
    /// Creates a named job summary.
    pub fn new(job_id: i64, name: impl Into<String>) -> Self {
        Self {
            job_id,
            name: Some(name.into()),
        }
    }
}

/// Uniform interface over the transport that reaches the platform.
///
/// A single instance is acquired per run and shared by every check, so
/// implementations must be safe for concurrent read-only use.
#[async_trait]
pub trait Platform: Send + Sync {
    /// Looks up table metadata.
    ///
    /// Returns `GateError::NotFound` when the table does not exist.
    async fn get_table(&self, table: &TableRef) -> Result<()>;

    /// Submits a statement without waiting for it to finish.
    async fn submit_statement(&self, request: &StatementRequest) -> Result<StatementHandle>;

    /// Fetches the current state of a submitted statement.
    async fn get_statement(&self, statement_id: &str) -> Result<StatementHandle>;

    /// Fetches the raw result payload of a finished statement.
    async fn get_statement_result(&self, statement_id: &str) -> Result<serde_json::Value>;

    /// Asks the platform to stop a statement that is no longer awaited.
    async fn cancel_statement(&self, statement_id: &str) -> Result<()>;

    /// Lists every job registered on the platform.
    async fn list_jobs(&self) -> Result<Vec<JobSummary>>;
}
