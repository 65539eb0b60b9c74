//! Run options, diagnostics and reports.
//!
//! Validators never log findings on their own; they hand every finding to a
//! [`DiagnosticSink`] passed in by the caller. This keeps the core free of
//! process-wide state, so a run can be repeated in tests with isolated capture.

use crate::{GateError, Result};
use chrono::{DateTime, Utc};
use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// Default delay between two statement status polls.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(1);

/// How serious a diagnostic is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Severity {
    /// A check passed
    Info,
    /// Something the gate could not verify, without failing the run
    Warning,
    /// A failed expectation
    Error,
}

/// Which validation category produced a diagnostic.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Category {
    /// Table existence and row counts
    Table,
    /// Job registration
    Job,
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Table => f.write_str("table"),
            Self::Job => f.write_str("job"),
        }
    }
}

/// One finding about one resource.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    /// How serious the finding is
    pub severity: Severity,
    /// Category that produced it
    pub category: Category,
    /// Qualified resource name the finding is about
    pub resource: String,
    /// Human-readable description
    pub message: String,
}

impl Diagnostic {
    /// Creates a diagnostic.
    pub fn new(
        severity: Severity,
        category: Category,
        resource: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            severity,
            category,
            resource: resource.into(),
            message: message.into(),
        }
    }

    /// Creates an informational diagnostic.
    pub fn info(
        category: Category,
        resource: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self::new(Severity::Info, category, resource, message)
    }

    /// Creates a warning diagnostic.
    pub fn warning(
        category: Category,
        resource: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self::new(Severity::Warning, category, resource, message)
    }

    /// Creates an error diagnostic.
    pub fn error(
        category: Category,
        resource: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self::new(Severity::Error, category, resource, message)
    }

    /// Returns true if this diagnostic records a failed expectation.
    pub fn is_error(&self) -> bool {
        self.severity == Severity::Error
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}: {}", self.category, self.resource, self.message)
    }
}

/// Receives diagnostics as a run produces them.
pub trait DiagnosticSink: Send + Sync {
    /// Records one diagnostic.
    fn emit(&self, diagnostic: Diagnostic);
}

/// Keeps every diagnostic in memory, in emission order.
#[derive(Debug, Default)]
pub struct CollectingSink {
    diagnostics: Mutex<Vec<Diagnostic>>,
}

impl CollectingSink {
    /// Creates an empty sink.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a copy of everything recorded so far.
    pub fn diagnostics(&self) -> Vec<Diagnostic> {
        self.lock().clone()
    }

    /// Returns the recorded error diagnostics.
    pub fn errors(&self) -> Vec<Diagnostic> {
        self.lock().iter().filter(|d| d.is_error()).cloned().collect()
    }

    /// Consumes the sink and returns its diagnostics.
    pub fn into_diagnostics(self) -> Vec<Diagnostic> {
        self.diagnostics
            .into_inner()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Vec<Diagnostic>> {
        self.diagnostics
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl DiagnosticSink for CollectingSink {
    fn emit(&self, diagnostic: Diagnostic) {
        self.lock().push(diagnostic);
    }
}

/// Forwards diagnostics to `tracing` at the level matching their severity.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingSink;

impl DiagnosticSink for TracingSink {
    fn emit(&self, diagnostic: Diagnostic) {
        match diagnostic.severity {
            Severity::Info => tracing::info!("{}", diagnostic),
            Severity::Warning => tracing::warn!("{}", diagnostic),
            Severity::Error => tracing::error!("{}", diagnostic),
        }
    }
}

/// Shared flag used to stop statement polling from outside a run.
#[derive(Debug, Default, Clone)]
pub struct CancelFlag(Arc<AtomicBool>);

impl CancelFlag {
    /// Creates a flag that is not cancelled.
    pub fn new() -> Self {
        Self::default()
    }

    /// Requests cancellation; every clone observes it.
    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    /// Returns true once cancellation was requested.
    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

/// Parameters of one validation run.
///
/// The catalog and warehouse are supplied from outside and stay fixed for the
/// lifetime of the run.
#[derive(Debug, Clone)]
pub struct ValidationContext {
    /// Catalog every table name is resolved against
    pub catalog: String,

    /// Warehouse that executes row-count statements
    pub warehouse_id: String,

    /// Delay between two status polls
    pub poll_interval: Duration,

    /// Maximum time to wait for one statement; `None` waits indefinitely
    pub statement_timeout: Option<Duration>,

    /// Maximum number of table checks in flight
    pub concurrency: usize,

    /// Stops statement polling when set
    pub cancel: CancelFlag,
}

impl ValidationContext {
    /// Creates a context with default polling and sequential checks.
    pub fn new(catalog: impl Into<String>, warehouse_id: impl Into<String>) -> Self {
        Self {
            catalog: catalog.into(),
            warehouse_id: warehouse_id.into(),
            poll_interval: DEFAULT_POLL_INTERVAL,
            statement_timeout: None,
            concurrency: 1,
            cancel: CancelFlag::new(),
        }
    }

    /// Sets the delay between status polls.
    pub fn with_poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = interval;
        self
    }

    /// Bounds how long a single statement may take.
    pub fn with_statement_timeout(mut self, timeout: Duration) -> Self {
        self.statement_timeout = Some(timeout);
        self
    }

    /// Sets how many table checks may run at once (at least one).
    pub fn with_concurrency(mut self, concurrency: usize) -> Self {
        self.concurrency = concurrency.max(1);
        self
    }

    /// Shares a cancellation flag with the caller.
    pub fn with_cancel_flag(mut self, cancel: CancelFlag) -> Self {
        self.cancel = cancel;
        self
    }

    /// Checks that every required run parameter is present.
    pub fn validate(&self) -> Result<()> {
        if self.catalog.trim().is_empty() {
            return Err(GateError::configuration("catalog cannot be empty"));
        }
        if self.warehouse_id.trim().is_empty() {
            return Err(GateError::configuration("warehouse_id cannot be empty"));
        }
        Ok(())
    }
}

/// Aggregated verdict of one run.
#[derive(Debug, Clone)]
pub struct ValidationReport {
    /// Whether every expectation passed
    pub passed: bool,

    /// Verdict of the table category
    pub tables_passed: bool,

    /// Verdict of the job category
    pub jobs_passed: bool,

    /// One line per failed expectation
    pub errors: Vec<String>,

    /// Things the gate could not verify
    pub warnings: Vec<String>,

    /// Run statistics
    pub stats: ValidationStats,

    /// When the run finished
    pub checked_at: DateTime<Utc>,
}

/// Statistics about a run.
#[derive(Debug, Clone, Default)]
pub struct ValidationStats {
    /// Number of table expectations checked
    pub tables_checked: usize,

    /// Number of job expectations checked
    pub jobs_checked: usize,

    /// Run duration in milliseconds
    pub duration_ms: u64,
}

impl ValidationReport {
    /// Builds a report from the per-category verdicts and recorded diagnostics.
    pub fn from_diagnostics(
        tables_passed: bool,
        jobs_passed: bool,
        diagnostics: &[Diagnostic],
        stats: ValidationStats,
    ) -> Self {
        let render = |severity: Severity| {
            diagnostics
                .iter()
                .filter(|d| d.severity == severity)
                .map(|d| d.to_string())
                .collect::<Vec<_>>()
        };

        Self {
            passed: tables_passed && jobs_passed,
            tables_passed,
            jobs_passed,
            errors: render(Severity::Error),
            warnings: render(Severity::Warning),
            stats,
            checked_at: Utc::now(),
        }
    }

    /// Maps the verdict onto a process exit code.
    pub fn exit_code(&self) -> i32 {
        if self.passed { 0 } else { 1 }
    }
}
