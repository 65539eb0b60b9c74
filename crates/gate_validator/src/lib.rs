//! # Deployment Gate Validator
//!
//! Validation engine for the Deployment Gate. This crate resolves configured
//! expectations against a live platform, through the [`gate_core::Platform`]
//! adapter:
//!
//! - Statement execution (submit, poll to a terminal state, extract a count)
//! - Table existence lookups
//! - Table validation (existence + minimum row count)
//! - Job validation (registration by exact name)
//! - Orchestration of both categories into one verdict
//!
//! ## Example
//!
//! ```rust,no_run
//! use gate_core::{Platform, TracingSink, ValidationConfigBuilder, ValidationContext};
//! use gate_validator::DeploymentValidator;
//! use std::sync::Arc;
//!
//! # async fn example(platform: Arc<dyn Platform>) -> gate_core::Result<()> {
//! let config = ValidationConfigBuilder::new()
//!     .table("sales.orders", 100)
//!     .job("nightly_etl")
//!     .build();
//!
//! let validator = DeploymentValidator::new(platform, ValidationContext::new("dev", "wh-1"));
//! let report = validator.run(&config, &TracingSink).await?;
//!
//! if report.passed {
//!     println!("Deployment validated");
//! }
//! # Ok(())
//! # }
//! ```

mod clock;
mod engine;
mod executor;
mod existence;
mod extract;
mod jobs;
mod tables;

#[cfg(test)]
mod test_support;

pub use clock::*;
pub use engine::*;
pub use executor::*;
pub use existence::*;
pub use extract::*;
pub use jobs::*;
pub use tables::*;
