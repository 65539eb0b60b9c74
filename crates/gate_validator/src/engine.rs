//! Main validation engine.
//!
//! This module provides the `DeploymentValidator` that runs the table and job
//! validation passes and reduces them to one verdict.

use crate::{Clock, JobValidator, TableValidator, TokioClock};
use gate_core::{
    CollectingSink, Diagnostic, DiagnosticSink, Platform, Result, ValidationConfig,
    ValidationContext, ValidationReport, ValidationStats,
};
use std::sync::Arc;
use std::time::Instant;
use tracing::{error, info};

/// Forwards to the caller's sink while keeping a copy for the report.
struct Recorder<'a> {
    inner: &'a dyn DiagnosticSink,
    collected: CollectingSink,
}

impl DiagnosticSink for Recorder<'_> {
    fn emit(&self, diagnostic: Diagnostic) {
        self.collected.emit(diagnostic.clone());
        self.inner.emit(diagnostic);
    }
}

/// Main validation engine for deployment expectations.
///
/// Holds the platform handle for the whole run. Both categories always run, so
/// one invocation surfaces every problem instead of stopping at the first
/// failing category.
///
/// # Example
///
/// ```rust,no_run
/// use gate_core::{CollectingSink, Platform, ValidationConfig, ValidationContext};
/// use gate_validator::DeploymentValidator;
/// use std::sync::Arc;
///
/// # async fn example(platform: Arc<dyn Platform>, config: ValidationConfig) {
/// let validator = DeploymentValidator::new(platform, ValidationContext::new("dev", "wh-1"));
/// let sink = CollectingSink::new();
///
/// match validator.run(&config, &sink).await {
///     Ok(report) if report.passed => println!("Validation passed!"),
///     Ok(report) => {
///         for error in &report.errors {
///             println!("Error: {}", error);
///         }
///     }
///     Err(e) => println!("Invalid configuration: {}", e),
/// }
/// # }
/// ```
pub struct DeploymentValidator {
    platform: Arc<dyn Platform>,
    clock: Arc<dyn Clock>,
    context: ValidationContext,
}

impl DeploymentValidator {
    /// Creates a validator using the wall clock.
    pub fn new(platform: Arc<dyn Platform>, context: ValidationContext) -> Self {
        Self {
            platform,
            clock: Arc::new(TokioClock),
            context,
        }
    }

    /// Replaces the clock used for statement polling.
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// Validates `config` against the platform.
    ///
    /// Every diagnostic is forwarded to `sink` as it is produced and also
    /// collected into the returned report.
    ///
    /// # Errors
    ///
    /// Returns `GateError::Configuration` before any platform call if a run
    /// parameter is missing or an expectation cannot be resolved. Every other
    /// problem is reported as a failed expectation in the report.
    pub async fn run(
        &self,
        config: &ValidationConfig,
        sink: &dyn DiagnosticSink,
    ) -> Result<ValidationReport> {
        let start = Instant::now();

        self.context.validate()?;
        config.validate(&self.context.catalog)?;

        info!(
            "Validating {} tables and {} jobs in catalog {}",
            config.tables.len(),
            config.jobs.len(),
            self.context.catalog
        );

        let recorder = Recorder {
            inner: sink,
            collected: CollectingSink::new(),
        };

        let tables_passed =
            TableValidator::new(self.platform.as_ref(), self.clock.as_ref(), &self.context)
                .validate(&config.tables, &recorder)
                .await;

        let jobs_passed = JobValidator::new(self.platform.as_ref())
            .validate(&config.jobs, &recorder)
            .await;

        let stats = ValidationStats {
            tables_checked: config.tables.len(),
            jobs_checked: config.jobs.len(),
            duration_ms: start.elapsed().as_millis() as u64,
        };
        let report = ValidationReport::from_diagnostics(
            tables_passed,
            jobs_passed,
            &recorder.collected.into_diagnostics(),
            stats,
        );

        if report.passed {
            info!("All validations passed");
        } else {
            error!(
                "Validation failed with {} errors (tables: {}, jobs: {})",
                report.errors.len(),
                if tables_passed { "ok" } else { "failed" },
                if jobs_passed { "ok" } else { "failed" }
            );
        }

        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ManualClock;
    use crate::test_support::FakePlatform;
    use gate_core::{GateError, TableRef, ValidationConfigBuilder};
    use pretty_assertions::assert_eq;
    use std::sync::atomic::Ordering;

    fn validator(platform: Arc<FakePlatform>) -> DeploymentValidator {
        DeploymentValidator::new(platform, ValidationContext::new("dev", "wh-1"))
            .with_clock(Arc::new(ManualClock::new()))
    }

    #[tokio::test]
    async fn test_both_categories_run_after_table_failure() {
        let platform = Arc::new(FakePlatform::new().with_jobs(&["nightly_etl"]));
        let config = ValidationConfigBuilder::new()
            .table("sales.orders", 1)
            .job("nightly_etl")
            .build();

        let report = validator(platform.clone())
            .run(&config, &CollectingSink::new())
            .await
            .unwrap();

        assert!(!report.passed);
        assert!(!report.tables_passed);
        assert!(report.jobs_passed);
        assert_eq!(platform.job_list_calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_job_listing_failure_leaves_table_verdict_intact() {
        let platform = Arc::new(
            FakePlatform::new()
                .with_table(&TableRef::new("dev", "sales", "orders"), 150)
                .with_job_list_error(GateError::transport("503 Service Unavailable")),
        );
        let config = ValidationConfigBuilder::new()
            .table("sales.orders", 100)
            .job("nightly_etl")
            .build();

        let report = validator(platform.clone())
            .run(&config, &CollectingSink::new())
            .await
            .unwrap();

        assert!(!report.passed);
        assert!(report.tables_passed);
        assert!(!report.jobs_passed);
        assert_eq!(report.errors.len(), 1);
        assert!(report.errors[0].contains("503"));
        assert_eq!(platform.submits(), 1);
    }

    #[tokio::test]
    async fn test_invalid_config_aborts_before_platform_calls() {
        let platform = Arc::new(FakePlatform::new());
        let config = ValidationConfigBuilder::new()
            .table("sales.orders", 1)
            .table("orders", 1)
            .job("nightly_etl")
            .build();

        let err = validator(platform.clone())
            .run(&config, &CollectingSink::new())
            .await
            .unwrap_err();

        assert!(matches!(err, GateError::Configuration(_)));
        assert_eq!(platform.lookup_calls.load(Ordering::SeqCst), 0);
        assert_eq!(platform.job_list_calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_missing_warehouse_is_fatal() {
        let platform = Arc::new(FakePlatform::new());
        let validator = DeploymentValidator::new(platform, ValidationContext::new("dev", ""));

        let err = validator
            .run(&ValidationConfig::default(), &CollectingSink::new())
            .await
            .unwrap_err();

        assert!(err.to_string().contains("warehouse_id"));
    }

    #[tokio::test]
    async fn test_sink_and_report_see_same_diagnostics() {
        let platform = Arc::new(
            FakePlatform::new()
                .with_table(&TableRef::new("dev", "sales", "orders"), 5)
                .with_jobs(&[]),
        );
        let config = ValidationConfigBuilder::new()
            .table("sales.orders", 10)
            .job("nightly_etl")
            .build();
        let sink = CollectingSink::new();

        let report = validator(platform).run(&config, &sink).await.unwrap();

        let rendered: Vec<String> = sink.errors().iter().map(|d| d.to_string()).collect();
        assert_eq!(report.errors, rendered);
        assert_eq!(report.errors.len(), 2);
        assert_eq!(report.stats.tables_checked, 1);
        assert_eq!(report.stats.jobs_checked, 1);
    }

    #[tokio::test]
    async fn test_empty_config_passes() {
        let platform = Arc::new(FakePlatform::new());
        let report = validator(platform)
            .run(&ValidationConfig::default(), &CollectingSink::new())
            .await
            .unwrap();
        assert!(report.passed);
    }
}
