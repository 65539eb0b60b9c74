//! Loader for Deployment Gate validation configs (YAML/TOML formats).
//!
//! This crate reads the declarative list of expected tables and jobs into the
//! strongly-typed [`ValidationConfig`] structure.
//!
//! # Example
//!
//! ```rust
//! use gate_parser::parse_yaml;
//!
//! let yaml = r#"
//! tables:
//!   - name: sales.orders
//!     min_rows: 100
//! jobs:
//!   - name: nightly_etl
//! "#;
//!
//! let config = parse_yaml(yaml).expect("Failed to parse config");
//! assert_eq!(config.tables[0].min_rows, 100);
//! assert_eq!(config.jobs[0].name, "nightly_etl");
//! ```

use gate_core::ValidationConfig;
use std::path::Path;
use thiserror::Error;
use tracing::debug;

/// Config file looked up when none is given explicitly.
pub const DEFAULT_CONFIG_FILE: &str = "validation_config.yml";

/// Errors that can occur while loading a validation config.
#[derive(Debug, Error)]
pub enum ParserError {
    /// YAML parsing or deserialization failed
    #[error("Failed to parse YAML: {0}")]
    YamlError(#[from] serde_yaml_ng::Error),

    /// TOML parsing or deserialization failed
    #[error("Failed to parse TOML: {0}")]
    TomlError(String),

    /// File I/O error
    #[error("Failed to read config file '{path}': {source}")]
    IoError {
        /// Path that could not be read
        path: String,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// Unsupported file format
    #[error("Unsupported file format: {0}")]
    UnsupportedFormat(String),

    /// Invalid file extension
    #[error("Invalid or missing file extension")]
    InvalidExtension,
}

/// Result type alias for parser operations.
pub type Result<T> = std::result::Result<T, ParserError>;

/// Supported config file formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigFormat {
    /// YAML format (.yml, .yaml)
    Yaml,
    /// TOML format (.toml)
    Toml,
}

/// Parse a validation config from a YAML string.
///
/// An empty document yields an empty config.
///
/// # Example
///
/// ```rust
/// use gate_parser::parse_yaml;
///
/// let config = parse_yaml("tables:\n  - name: sales.orders\n").unwrap();
/// assert_eq!(config.tables[0].min_rows, 0);
/// ```
pub fn parse_yaml(content: &str) -> Result<ValidationConfig> {
    if content.trim().is_empty() {
        return Ok(ValidationConfig::default());
    }
    let config: ValidationConfig = serde_yaml_ng::from_str(content)?;
    Ok(config)
}

/// Parse a validation config from a TOML string.
///
/// # Example
///
/// ```rust
/// use gate_parser::parse_toml;
///
/// let toml = r#"
/// [[tables]]
/// name = "sales.orders"
/// min_rows = 100
///
/// [[jobs]]
/// name = "nightly_etl"
/// must_be_active = true
/// "#;
///
/// let config = parse_toml(toml).unwrap();
/// assert!(config.jobs[0].must_be_active);
/// ```
pub fn parse_toml(content: &str) -> Result<ValidationConfig> {
    let config: ValidationConfig =
        toml::from_str(content).map_err(|e| ParserError::TomlError(e.to_string()))?;
    Ok(config)
}

/// Detect the config format from a file path based on its extension.
///
/// # Supported Extensions
///
/// * `.yaml`, `.yml` → `ConfigFormat::Yaml`
/// * `.toml` → `ConfigFormat::Toml`
///
/// # Errors
///
/// Returns `ParserError::InvalidExtension` if the file has no extension.
/// Returns `ParserError::UnsupportedFormat` if the extension is not recognized.
pub fn detect_format(path: &Path) -> Result<ConfigFormat> {
    let extension = path
        .extension()
        .and_then(|ext| ext.to_str())
        .ok_or(ParserError::InvalidExtension)?;

    match extension.to_lowercase().as_str() {
        "yaml" | "yml" => Ok(ConfigFormat::Yaml),
        "toml" => Ok(ConfigFormat::Toml),
        other => Err(ParserError::UnsupportedFormat(other.to_string())),
    }
}

/// Parse a validation config from a file with automatic format detection.
///
/// # Example
///
/// ```no_run
/// use gate_parser::parse_file;
/// use std::path::Path;
///
/// let config = parse_file(Path::new("validation_config.yml")).unwrap();
/// println!("{} tables, {} jobs", config.tables.len(), config.jobs.len());
/// ```
pub fn parse_file(path: &Path) -> Result<ValidationConfig> {
    let format = detect_format(path)?;
    let content = std::fs::read_to_string(path).map_err(|source| ParserError::IoError {
        path: path.display().to_string(),
        source,
    })?;

    debug!("Loading {:?} config from {}", format, path.display());

    match format {
        ConfigFormat::Yaml => parse_yaml(&content),
        ConfigFormat::Toml => parse_toml(&content),
    }
}
