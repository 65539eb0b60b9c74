//! Table validation: existence plus minimum row count.

use crate::{Clock, StatementExecutor, TableExistenceChecker};
use futures::StreamExt;
use futures::{future, stream};
use gate_core::{
    Category, Diagnostic, DiagnosticSink, GateError, Platform, TableExpectation,
    ValidationContext,
};
use tracing::info;

/// Validates table expectations against the platform.
///
/// Every expectation is checked even after a failure; the verdict is only
/// reduced once all of them have been seen. Checks may overlap up to the
/// context's concurrency, but diagnostics are emitted in configuration order
/// as soon as each check and those before it have finished. Once the run is
/// cancelled, remaining expectations fail without touching the platform.
pub struct TableValidator<'a> {
    platform: &'a dyn Platform,
    clock: &'a dyn Clock,
    context: &'a ValidationContext,
}

impl<'a> TableValidator<'a> {
    /// Creates a table validator.
    pub fn new(
        platform: &'a dyn Platform,
        clock: &'a dyn Clock,
        context: &'a ValidationContext,
    ) -> Self {
        Self {
            platform,
            clock,
            context,
        }
    }

    /// Checks every expectation and returns true only if all passed.
    ///
    /// Emits one diagnostic per expectation to `sink`.
    pub async fn validate(
        &self,
        expectations: &[TableExpectation],
        sink: &dyn DiagnosticSink,
    ) -> bool {
        let mut ok = true;
        stream::iter(expectations)
            .map(|expectation| self.check(expectation))
            .buffered(self.context.concurrency.max(1))
            .for_each(|diagnostic| {
                ok &= !diagnostic.is_error();
                sink.emit(diagnostic);
                future::ready(())
            })
            .await;
        ok
    }

    /// Checks one expectation.
    pub async fn check(&self, expectation: &TableExpectation) -> Diagnostic {
        let table = match expectation.resolve(&self.context.catalog) {
            Ok(table) => table,
            Err(e) => return Diagnostic::error(Category::Table, &expectation.name, e.to_string()),
        };
        let resource = table.full_name();

        if self.context.cancel.is_cancelled() {
            return Diagnostic::error(
                Category::Table,
                &resource,
                format!("Not checked: {}", GateError::Cancelled(resource.clone())),
            );
        }

        info!("Checking table: {}", resource);

        let checker = TableExistenceChecker::new(self.platform);
        if !checker.exists(&table).await {
            return Diagnostic::error(Category::Table, resource, "Table does not exist");
        }

        let executor = StatementExecutor::new(self.platform, self.clock, self.context);
        match executor.execute_count(&table).await {
            Ok(count) if count < expectation.min_rows => Diagnostic::error(
                Category::Table,
                resource,
                format!(
                    "Row count too low: {} rows, expected at least {}",
                    count, expectation.min_rows
                ),
            ),
            Ok(count) => Diagnostic::info(
                Category::Table,
                resource,
                format!(
                    "{} rows, minimum {} satisfied",
                    count, expectation.min_rows
                ),
            ),
            Err(e) => Diagnostic::error(
                Category::Table,
                resource,
                format!("Error in row count check: {}", e),
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ManualClock;
    use crate::test_support::FakePlatform;
    use gate_core::{CollectingSink, StatementState, TableRef};
    use pretty_assertions::assert_eq;
    use serde_json::json;
    use std::sync::Mutex;
    use std::sync::atomic::Ordering;

    /// Records how many lookups the platform had served at each emission.
    struct LookupWatermarkSink<'a> {
        platform: &'a FakePlatform,
        watermarks: Mutex<Vec<usize>>,
    }

    impl DiagnosticSink for LookupWatermarkSink<'_> {
        fn emit(&self, _diagnostic: Diagnostic) {
            let lookups = self.platform.lookup_calls.load(Ordering::SeqCst);
            self.watermarks.lock().unwrap().push(lookups);
        }
    }

    fn table(name: &str) -> TableRef {
        TableRef::parse("dev", name).unwrap()
    }

    #[tokio::test]
    async fn test_count_meets_threshold() {
        let platform = FakePlatform::new().with_table(&table("sales.orders"), 150);
        let clock = ManualClock::new();
        let context = ValidationContext::new("dev", "wh-1");
        let sink = CollectingSink::new();

        let ok = TableValidator::new(&platform, &clock, &context)
            .validate(&[TableExpectation::new("sales.orders", 100)], &sink)
            .await;

        assert!(ok);
        assert!(sink.errors().is_empty());
    }

    #[tokio::test]
    async fn test_count_equal_to_threshold_passes() {
        let platform = FakePlatform::new().with_table(&table("sales.orders"), 100);
        let clock = ManualClock::new();
        let context = ValidationContext::new("dev", "wh-1");
        let sink = CollectingSink::new();

        let ok = TableValidator::new(&platform, &clock, &context)
            .validate(&[TableExpectation::new("sales.orders", 100)], &sink)
            .await;

        assert!(ok);
    }

    #[tokio::test]
    async fn test_count_below_threshold_fails() {
        let platform = FakePlatform::new().with_table(&table("sales.orders"), 50);
        let clock = ManualClock::new();
        let context = ValidationContext::new("dev", "wh-1");
        let sink = CollectingSink::new();

        let ok = TableValidator::new(&platform, &clock, &context)
            .validate(&[TableExpectation::new("sales.orders", 100)], &sink)
            .await;

        assert!(!ok);
        let errors = sink.errors();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].resource, "dev.sales.orders");
        assert!(errors[0].message.contains("50"));
    }

    #[tokio::test]
    async fn test_missing_table_skips_count() {
        let platform = FakePlatform::new();
        let clock = ManualClock::new();
        let context = ValidationContext::new("dev", "wh-1");
        let sink = CollectingSink::new();

        let ok = TableValidator::new(&platform, &clock, &context)
            .validate(&[TableExpectation::new("sales.orders", 0)], &sink)
            .await;

        assert!(!ok);
        assert_eq!(platform.submits(), 0);
        assert_eq!(sink.errors()[0].message, "Table does not exist");
    }

    #[tokio::test]
    async fn test_lookup_error_skips_count() {
        let platform = FakePlatform::new()
            .with_lookup_error(&table("sales.orders"), GateError::transport("timeout"));
        let clock = ManualClock::new();
        let context = ValidationContext::new("dev", "wh-1");
        let sink = CollectingSink::new();

        let ok = TableValidator::new(&platform, &clock, &context)
            .validate(&[TableExpectation::new("sales.orders", 0)], &sink)
            .await;

        assert!(!ok);
        assert_eq!(platform.submits(), 0);
    }

    #[tokio::test]
    async fn test_errors_do_not_stop_remaining_tables() {
        let platform = FakePlatform::new()
            .with_script(
                &table("raw.broken"),
                vec![StatementState::Succeeded],
                json!({"unexpected": true}),
            )
            .with_failing_statement(&table("raw.denied"), "PERMISSION_DENIED")
            .with_table(&table("sales.orders"), 10);
        let clock = ManualClock::new();
        let context = ValidationContext::new("dev", "wh-1");
        let sink = CollectingSink::new();

        let ok = TableValidator::new(&platform, &clock, &context)
            .validate(
                &[
                    TableExpectation::new("raw.broken", 0),
                    TableExpectation::new("raw.denied", 0),
                    TableExpectation::new("sales.orders", 5),
                ],
                &sink,
            )
            .await;

        assert!(!ok);
        let diagnostics = sink.diagnostics();
        assert_eq!(diagnostics.len(), 3);
        assert!(diagnostics[0].message.contains("Unrecognized platform response"));
        assert!(diagnostics[1].message.contains("PERMISSION_DENIED"));
        assert!(!diagnostics[2].is_error());
    }

    #[tokio::test]
    async fn test_malformed_name_fails_entry_only() {
        let platform = FakePlatform::new().with_table(&table("sales.orders"), 10);
        let clock = ManualClock::new();
        let context = ValidationContext::new("dev", "wh-1");
        let sink = CollectingSink::new();

        let ok = TableValidator::new(&platform, &clock, &context)
            .validate(
                &[
                    TableExpectation::new("orders", 0),
                    TableExpectation::new("sales.orders", 0),
                ],
                &sink,
            )
            .await;

        assert!(!ok);
        let diagnostics = sink.diagnostics();
        assert_eq!(diagnostics[0].resource, "orders");
        assert!(diagnostics[0].message.contains("Configuration error"));
        assert!(!diagnostics[1].is_error());
    }

    #[tokio::test]
    async fn test_concurrent_checks_keep_config_order() {
        let names = ["a.one", "b.two", "c.three", "d.four"];
        let platform = names.iter().fold(FakePlatform::new(), |platform, name| {
            platform.with_script(
                &table(name),
                vec![StatementState::Running, StatementState::Succeeded],
                json!({"result": [[1]]}),
            )
        });
        let clock = ManualClock::new();
        let context = ValidationContext::new("dev", "wh-1").with_concurrency(3);
        let sink = CollectingSink::new();

        let expectations: Vec<_> = names
            .iter()
            .map(|name| TableExpectation::new(*name, 2))
            .collect();
        let ok = TableValidator::new(&platform, &clock, &context)
            .validate(&expectations, &sink)
            .await;

        assert!(!ok);
        let resources: Vec<_> = sink.diagnostics().into_iter().map(|d| d.resource).collect();
        assert_eq!(
            resources,
            vec!["dev.a.one", "dev.b.two", "dev.c.three", "dev.d.four"]
        );
    }

    #[tokio::test]
    async fn test_cancelled_run_touches_no_table() {
        let names = ["sales.orders", "sales.customers", "raw.events"];
        let platform = names.iter().fold(FakePlatform::new(), |platform, name| {
            platform.with_table(&table(name), 10)
        });
        let clock = ManualClock::new();
        let context = ValidationContext::new("dev", "wh-1");
        context.cancel.cancel();
        let sink = CollectingSink::new();

        let expectations: Vec<_> = names
            .iter()
            .map(|name| TableExpectation::new(*name, 0))
            .collect();
        let ok = TableValidator::new(&platform, &clock, &context)
            .validate(&expectations, &sink)
            .await;

        assert!(!ok);
        assert_eq!(platform.submits(), 0);
        assert_eq!(platform.lookup_calls.load(Ordering::SeqCst), 0);
        let errors = sink.errors();
        assert_eq!(errors.len(), 3);
        assert!(errors.iter().all(|d| d.message.contains("Cancelled")));
    }

    #[tokio::test]
    async fn test_diagnostics_emitted_as_checks_finish() {
        let names = ["sales.orders", "sales.customers", "raw.events"];
        let platform = names.iter().fold(FakePlatform::new(), |platform, name| {
            platform.with_table(&table(name), 10)
        });
        let clock = ManualClock::new();
        let context = ValidationContext::new("dev", "wh-1");
        let sink = LookupWatermarkSink {
            platform: &platform,
            watermarks: Mutex::new(Vec::new()),
        };

        let expectations: Vec<_> = names
            .iter()
            .map(|name| TableExpectation::new(*name, 0))
            .collect();
        let ok = TableValidator::new(&platform, &clock, &context)
            .validate(&expectations, &sink)
            .await;

        assert!(ok);
        assert_eq!(sink.watermarks.into_inner().unwrap(), vec![1, 2, 3]);
    }
}
