pub mod check;
pub mod validate;

use anyhow::{Context, Result};
use gate_core::ValidationConfig;
use gate_parser::parse_file;
use std::path::Path;

/// Loads the expectations file, naming it in the error.
pub fn load_config(config_path: &str) -> Result<ValidationConfig> {
    parse_file(Path::new(config_path))
        .with_context(|| format!("Failed to load validation config: {}", config_path))
}
