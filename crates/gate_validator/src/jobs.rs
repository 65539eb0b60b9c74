//! Job validation: registration by exact name.

use gate_core::{Category, Diagnostic, DiagnosticSink, JobExpectation, Platform};
use tracing::info;

/// Validates job expectations against a single job listing.
pub struct JobValidator<'a> {
    platform: &'a dyn Platform,
}

impl<'a> JobValidator<'a> {
    /// Creates a job validator.
    pub fn new(platform: &'a dyn Platform) -> Self {
        Self { platform }
    }

    /// Checks every expectation and returns true only if all passed.
    ///
    /// The platform is asked for its jobs once, and each expected name is matched
    /// against that listing (exact, case-sensitive). A listing failure fails the
    /// whole category with a single diagnostic.
    ///
    /// `must_be_active` is not verified: a matching job passes regardless, with a
    /// warning saying so.
    pub async fn validate(
        &self,
        expectations: &[JobExpectation],
        sink: &dyn DiagnosticSink,
    ) -> bool {
        if expectations.is_empty() {
            return true;
        }

        let jobs = match self.platform.list_jobs().await {
            Ok(jobs) => jobs,
            Err(e) => {
                sink.emit(Diagnostic::error(
                    Category::Job,
                    "jobs",
                    format!("Failed to list jobs: {}", e),
                ));
                return false;
            }
        };

        info!("Fetched {} jobs from platform", jobs.len());

        let mut ok = true;
        for expectation in expectations {
            info!("Checking job: {}", expectation.name);

            let found = jobs
                .iter()
                .find(|job| job.name.as_deref() == Some(expectation.name.as_str()));

            match found {
                Some(job) => {
                    sink.emit(Diagnostic::info(
                        Category::Job,
                        &expectation.name,
                        format!("Job registered (job_id {})", job.job_id),
                    ));
                    if expectation.must_be_active {
                        sink.emit(Diagnostic::warning(
                            Category::Job,
                            &expectation.name,
                            "must_be_active is not verified; only registration was checked",
                        ));
                    }
                }
                None => {
                    sink.emit(Diagnostic::error(
                        Category::Job,
                        &expectation.name,
                        "Job not found",
                    ));
                    ok = false;
                }
            }
        }

        ok
    }
}
