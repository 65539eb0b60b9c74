//! Builder pattern for creating validation configs.
//!
//! This module provides a fluent API for assembling a [`ValidationConfig`] in
//! code, mostly useful for tests and embedding.

use crate::{JobExpectation, TableExpectation, ValidationConfig};

/// Builder for creating a `ValidationConfig`.
///
/// # Example
///
/// ```rust
/// use gate_core::ValidationConfigBuilder;
///
/// let config = ValidationConfigBuilder::new()
///     .table("sales.orders", 100)
///     .table("sales.customers", 0)
///     .active_job("nightly_etl")
///     .build();
///
/// assert_eq!(config.tables.len(), 2);
/// assert!(config.jobs[0].must_be_active);
/// ```
#[derive(Debug, Default)]
pub struct ValidationConfigBuilder {
    tables: Vec<TableExpectation>,
    jobs: Vec<JobExpectation>,
}

impl ValidationConfigBuilder {
    /// Creates an empty builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a table expectation.
    ///
    /// # Arguments
    ///
    /// * `name` - Table name formatted `<schema>.<table>`
    /// * `min_rows` - Minimum row count
    pub fn table(mut self, name: impl Into<String>, min_rows: u64) -> Self {
        self.tables.push(TableExpectation::new(name, min_rows));
        self
    }

    /// Adds a job expectation.
    pub fn job(mut self, name: impl Into<String>) -> Self {
        self.jobs.push(JobExpectation::new(name));
        self
    }

    /// Adds a job expectation flagged `must_be_active`.
    pub fn active_job(mut self, name: impl Into<String>) -> Self {
        self.jobs.push(JobExpectation::new(name).with_must_be_active(true));
        self
    }

    /// Builds the config.
    pub fn build(self) -> ValidationConfig {
        ValidationConfig {
            tables: self.tables,
            jobs: self.jobs,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_builder_preserves_order() {
        let config = ValidationConfigBuilder::new()
            .table("b.second", 1)
            .table("a.first", 2)
            .job("z_job")
            .job("a_job")
            .build();

        let names: Vec<_> = config.tables.iter().map(|t| t.name.as_str()).collect();
        assert_eq!(names, vec!["b.second", "a.first"]);
        assert_eq!(config.jobs[0].name, "z_job");
        assert!(!config.jobs[0].must_be_active);
    }

    #[test]
    fn test_empty_builder() {
        assert!(ValidationConfigBuilder::new().build().is_empty());
    }
}
