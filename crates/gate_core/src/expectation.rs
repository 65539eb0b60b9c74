//! Expectation types and qualified table names.
//!
//! A deployment declares what it expects to find on the platform as a
//! [`ValidationConfig`]: an ordered list of tables and an ordered list of jobs.
//! Table names are written relative to the run's catalog and resolved into a
//! [`TableRef`] once the catalog is known.

use crate::{GateError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;

/// The declarative list of resources a deployment must have produced.
///
/// # Example
///
/// ```rust
/// use gate_core::{JobExpectation, TableExpectation, ValidationConfig};
///
/// let config = ValidationConfig {
///     tables: vec![TableExpectation::new("sales.orders", 100)],
///     jobs: vec![JobExpectation::new("nightly_etl")],
/// };
/// assert!(config.validate("dev").is_ok());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ValidationConfig {
    /// Tables that must exist, in the order they are checked
    #[serde(default)]
    pub tables: Vec<TableExpectation>,

    /// Jobs that must be registered, in the order they are checked
    #[serde(default)]
    pub jobs: Vec<JobExpectation>,
}

impl ValidationConfig {
    /// Returns true when the config declares nothing to check.
    pub fn is_empty(&self) -> bool {
        self.tables.is_empty() && self.jobs.is_empty()
    }

    /// Checks that every expectation can be resolved against `catalog`.
    ///
    /// All problems are reported at once so a broken config can be fixed in a
    /// single pass.
    pub fn validate(&self, catalog: &str) -> Result<()> {
        let mut problems = Vec::new();

        for table in &self.tables {
            if let Err(e) = table.resolve(catalog) {
                problems.push(e.to_string());
            }
        }

        for job in &self.jobs {
            if job.name.trim().is_empty() {
                problems.push("job name cannot be empty".to_string());
            }
        }

        if problems.is_empty() {
            Ok(())
        } else {
            Err(GateError::Configuration(problems.join("; ")))
        }
    }

    /// Resolves every table expectation against `catalog`.
    pub fn resolve_tables(&self, catalog: &str) -> Result<Vec<TableRef>> {
        self.tables.iter().map(|t| t.resolve(catalog)).collect()
    }
}

/// A table that must exist with at least `min_rows` rows.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TableExpectation {
    /// Table name relative to the catalog, formatted `<schema>.<table>`
    pub name: String,

    /// Minimum number of rows the table must hold
    #[serde(default)]
    pub min_rows: u64,
}

impl TableExpectation {
    /// Creates a new table expectation.
    pub fn new(name: impl Into<String>, min_rows: u64) -> Self {
        Self {
            name: name.into(),
            min_rows,
        }
    }

    /// Resolves the configured name against `catalog`.
    pub fn resolve(&self, catalog: &str) -> Result<TableRef> {
        TableRef::parse(catalog, &self.name)
    }
}

/// A job that must be registered on the platform.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct JobExpectation {
    /// Exact job name as stored in the job settings
    pub name: String,

    /// Informational only: activity is not verified beyond registration
    #[serde(default)]
    pub must_be_active: bool,
}

impl JobExpectation {
    /// Creates a new job expectation.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            must_be_active: false,
        }
    }

    /// Sets the `must_be_active` flag.
    pub fn with_must_be_active(mut self, must_be_active: bool) -> Self {
        self.must_be_active = must_be_active;
        self
    }
}

/// A fully qualified `catalog.schema.table` reference.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TableRef {
    /// Catalog fixed for the whole run
    pub catalog: String,
    /// Schema inside the catalog
    pub schema: String,
    /// Table inside the schema
    pub table: String,
}

impl TableRef {
    /// Creates a new table reference.
    pub fn new(
        catalog: impl Into<String>,
        schema: impl Into<String>,
        table: impl Into<String>,
    ) -> Self {
        Self {
            catalog: catalog.into(),
            schema: schema.into(),
            table: table.into(),
        }
    }

    /// Parses a `<schema>.<table>` name relative to `catalog`.
    ///
    /// The name is split on the first `.`, so `"raw.events.v2"` resolves to
    /// schema `raw` and table `events.v2`.
    ///
    /// # Errors
    ///
    /// Returns `GateError::Configuration` if the separator is missing or either
    /// side of it is empty.
    pub fn parse(catalog: &str, name: &str) -> Result<Self> {
        let (schema, table) = name.split_once('.').ok_or_else(|| {
            GateError::Configuration(format!(
                "invalid table name '{}': expected '<schema>.<table>'",
                name
            ))
        })?;

        if schema.is_empty() || table.is_empty() {
            return Err(GateError::Configuration(format!(
                "invalid table name '{}': schema and table must both be non-empty",
                name
            )));
        }

        Ok(Self::new(catalog, schema, table))
    }

    /// Returns the unquoted `catalog.schema.table` name.
    pub fn full_name(&self) -> String {
        format!("{}.{}.{}", self.catalog, self.schema, self.table)
    }

    /// Returns the backtick-quoted name for use in SQL.
    pub fn quoted(&self) -> String {
        format!(
            "{}.{}.{}",
            quote_identifier(&self.catalog),
            quote_identifier(&self.schema),
            quote_identifier(&self.table)
        )
    }
}

impl fmt::Display for TableRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", self.catalog, self.schema, self.table)
    }
}

/// Wraps an identifier in backticks, doubling any embedded backtick.
pub fn quote_identifier(identifier: &str) -> String {
    format!("`{}`", identifier.replace('`', "``"))
}
