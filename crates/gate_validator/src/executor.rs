//! Row-count statement execution.
//!
//! A count statement is submitted without waiting and then driven through an
//! explicit state machine:
//!
//! ```text
//! Submitted ──► Polling ──► Succeeded
//!     │            │ ▲
//!     │            └─┘ (PENDING / RUNNING: sleep, re-fetch)
//!     └──────────► Failed
//! ```
//!
//! Polling sleeps a fixed interval between status fetches, through an injected
//! [`Clock`]. It stops early when the run's cancel flag is set or, if a
//! statement timeout is configured, when the deadline has passed. A statement
//! abandoned that way is cancelled on the platform so the warehouse stops
//! working on it. Nothing is submitted once the flag is already set.

use crate::{Clock, extract_count};
use gate_core::{
    CancelFlag, GateError, Platform, Result, StatementHandle, StatementRequest, StatementState,
    TableRef, ValidationContext,
};
use std::time::Duration;
use tracing::{debug, warn};

enum Phase {
    Submitted(StatementHandle),
    Polling(StatementHandle),
    Succeeded(String),
    Failed(StatementHandle),
}

impl Phase {
    fn observe(handle: StatementHandle) -> Self {
        match handle.state {
            StatementState::Succeeded => Phase::Succeeded(handle.id),
            StatementState::Failed => Phase::Failed(handle),
            StatementState::Pending | StatementState::Running => Phase::Polling(handle),
        }
    }
}

/// Runs `SELECT COUNT(*)` statements on a warehouse.
pub struct StatementExecutor<'a> {
    platform: &'a dyn Platform,
    clock: &'a dyn Clock,
    warehouse_id: &'a str,
    poll_interval: Duration,
    timeout: Option<Duration>,
    cancel: CancelFlag,
}

impl<'a> StatementExecutor<'a> {
    /// Creates an executor using the warehouse and polling options of `context`.
    pub fn new(
        platform: &'a dyn Platform,
        clock: &'a dyn Clock,
        context: &'a ValidationContext,
    ) -> Self {
        Self {
            platform,
            clock,
            warehouse_id: &context.warehouse_id,
            poll_interval: context.poll_interval,
            timeout: context.statement_timeout,
            cancel: context.cancel.clone(),
        }
    }

    /// Builds the counting query for `table`.
    pub fn count_statement(table: &TableRef) -> String {
        format!("SELECT COUNT(*) AS c FROM {}", table.quoted())
    }

    /// Counts the rows of `table`.
    ///
    /// # Errors
    ///
    /// * `GateError::Execution` if the platform reports the statement failed
    /// * `GateError::Protocol` if the result matches no known shape
    /// * `GateError::Timeout` / `GateError::Cancelled` if polling was cut short
    /// * `GateError::Cancelled` without any platform call if the run is already cancelled
    /// * any transport error raised by the platform
    pub async fn execute_count(&self, table: &TableRef) -> Result<u64> {
        if self.cancel.is_cancelled() {
            return Err(GateError::Cancelled(table.full_name()));
        }

        let request = StatementRequest {
            statement: Self::count_statement(table),
            warehouse_id: self.warehouse_id.to_string(),
            catalog: table.catalog.clone(),
            schema: table.schema.clone(),
        };

        let statement_id = self.run_to_completion(&request).await?;
        let payload = self.platform.get_statement_result(&statement_id).await?;
        let count = extract_count(&payload)?;

        debug!("Statement {} counted {} rows in {}", statement_id, count, table);
        Ok(count)
    }

    async fn run_to_completion(&self, request: &StatementRequest) -> Result<String> {
        let started = self.clock.now();
        let mut phase = Phase::Submitted(self.platform.submit_statement(request).await?);

        loop {
            phase = match phase {
                Phase::Submitted(handle) => {
                    debug!("Submitted statement {} ({})", handle.id, handle.state);
                    Phase::observe(handle)
                }
                Phase::Polling(handle) => {
                    if self.cancel.is_cancelled() {
                        self.abandon(&handle.id).await;
                        return Err(GateError::Cancelled(handle.id));
                    }

                    let elapsed = self.clock.now().saturating_duration_since(started);
                    if self.timeout.is_some_and(|limit| elapsed >= limit) {
                        self.abandon(&handle.id).await;
                        return Err(GateError::Timeout {
                            statement_id: handle.id,
                            elapsed,
                        });
                    }

                    self.clock.sleep(self.poll_interval).await;
                    let refreshed = self.platform.get_statement(&handle.id).await?;
                    debug!("Statement {} is {}", refreshed.id, refreshed.state);
                    Phase::observe(refreshed)
                }
                Phase::Succeeded(statement_id) => return Ok(statement_id),
                Phase::Failed(handle) => {
                    return Err(GateError::Execution {
                        message: handle
                            .error
                            .unwrap_or_else(|| "statement reported FAILED".to_string()),
                        statement_id: handle.id,
                    });
                }
            };
        }
    }

    async fn abandon(&self, statement_id: &str) {
        match self.platform.cancel_statement(statement_id).await {
            Ok(()) => debug!("Cancelled statement {}", statement_id),
            Err(e) => warn!("Failed to cancel statement {}: {}", statement_id, e),
        }
    }
}
