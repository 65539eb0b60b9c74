use anyhow::{Context, Result};
use clap::Args;
use gate_parser::DEFAULT_CONFIG_FILE;
use tracing::info;

use super::load_config;
use crate::output;

/// Placeholder catalog used when only the config shape is checked.
const UNRESOLVED_CATALOG: &str = "<catalog>";

#[derive(Args, Debug)]
pub struct CheckArgs {
    /// Path to the expectations file (YAML or TOML)
    #[arg(default_value = DEFAULT_CONFIG_FILE)]
    pub config: String,

    /// Catalog used to print fully qualified table names
    #[arg(long, env = "GATE_CATALOG")]
    pub catalog: Option<String>,

    /// Output format: text, json
    #[arg(short, long, default_value = "text")]
    pub format: String,
}

pub fn execute(args: CheckArgs) -> Result<()> {
    info!("Checking validation config: {}", args.config);

    let config = load_config(&args.config)?;
    let catalog = args
        .catalog
        .as_deref()
        .map(str::trim)
        .filter(|c| !c.is_empty())
        .unwrap_or(UNRESOLVED_CATALOG);

    config
        .validate(catalog)
        .with_context(|| format!("Invalid validation config: {}", args.config))?;
    let tables = config.resolve_tables(catalog)?;

    output::print_config_summary(&config, &tables, &args.format);
    Ok(())
}
