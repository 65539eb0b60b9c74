//! # Deployment Gate Core
//!
//! Core data structures and types for the Deployment Gate.
//!
//! The gate runs after a deployment and confirms that the data platform holds what
//! the deployment promised: every expected table exists and carries at least a
//! minimum number of rows, and every expected job is registered. The outcome is a
//! single pass/fail verdict plus one diagnostic per checked resource.
//!
//! ## Key Concepts
//!
//! - **ValidationConfig**: the declarative list of table and job expectations
//! - **TableRef**: a `catalog.schema.table` triple resolved against the run's catalog
//! - **Platform**: the adapter trait over whichever transport reaches the platform
//! - **DiagnosticSink**: where per-resource findings are reported during a run
//! - **ValidationReport**: the aggregated verdict of one run
//!
//! ## Example
//!
//! ```rust
//! use gate_core::{ValidationConfigBuilder, TableRef};
//!
//! let config = ValidationConfigBuilder::new()
//!     .table("sales.orders", 100)
//!     .job("nightly_etl")
//!     .build();
//!
//! let table = config.tables[0].resolve("dab-mvp-dev").unwrap();
//! assert_eq!(table, TableRef::new("dab-mvp-dev", "sales", "orders"));
//! assert_eq!(table.quoted(), "`dab-mvp-dev`.`sales`.`orders`");
//! ```

pub mod builder;
pub mod error;
pub mod expectation;
pub mod platform;
pub mod validator;

pub use builder::*;
pub use error::*;
pub use expectation::*;
pub use platform::*;
pub use validator::*;
