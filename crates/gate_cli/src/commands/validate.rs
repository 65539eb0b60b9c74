use anyhow::{Context, Result, anyhow};
use clap::Args;
use gate_core::{CancelFlag, TracingSink, ValidationContext};
use gate_databricks::{DatabricksClient, DatabricksConfig};
use gate_parser::DEFAULT_CONFIG_FILE;
use gate_validator::DeploymentValidator;
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};

use super::load_config;
use crate::output;

#[derive(Args, Debug)]
pub struct ValidateArgs {
    /// Path to the expectations file (YAML or TOML)
    #[arg(default_value = DEFAULT_CONFIG_FILE)]
    pub config: String,

    /// Catalog that qualifies every table name
    #[arg(long, env = "GATE_CATALOG")]
    pub catalog: Option<String>,

    /// SQL warehouse that runs the row counts
    #[arg(long, env = "WAREHOUSE_ID")]
    pub warehouse_id: Option<String>,

    /// Workspace URL
    #[arg(long, env = "DATABRICKS_HOST")]
    pub host: Option<String>,

    /// Personal access token
    #[arg(long, env = "DATABRICKS_TOKEN", hide_env_values = true)]
    pub token: Option<String>,

    /// Seconds between statement status polls
    #[arg(long, default_value_t = 1, value_parser = clap::value_parser!(u64).range(1..))]
    pub poll_interval: u64,

    /// Give up on a row count after this many seconds
    #[arg(long)]
    pub timeout: Option<u64>,

    /// Number of tables checked at once
    #[arg(long, default_value_t = 1)]
    pub concurrency: usize,

    /// Output format: text, json
    #[arg(short, long, default_value = "text")]
    pub format: String,
}

pub async fn execute(args: ValidateArgs) -> Result<()> {
    info!("Validating deployment against: {}", args.config);

    let config = load_config(&args.config)?;
    if config.is_empty() {
        warn!("No tables or jobs declared in {}", args.config);
    }

    let catalog = required(args.catalog, "catalog", "GATE_CATALOG", "--catalog")?;
    let warehouse_id = required(
        args.warehouse_id,
        "warehouse id",
        "WAREHOUSE_ID",
        "--warehouse-id",
    )?;
    let host = required(args.host, "workspace host", "DATABRICKS_HOST", "--host")?;
    let token = required(args.token, "access token", "DATABRICKS_TOKEN", "--token")?;

    let databricks = DatabricksConfig::builder()
        .host(host)
        .token(token)
        .build()
        .context("Invalid Databricks connection settings")?;
    let client =
        DatabricksClient::new(databricks).context("Failed to create Databricks client")?;
    info!(
        "Connecting to {} (catalog: {}, warehouse: {})",
        client.config().host,
        catalog,
        warehouse_id
    );

    let cancel = CancelFlag::new();
    let interrupt = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            warn!("Interrupted, cancelling pending statements");
            interrupt.cancel();
        }
    });

    let mut context = ValidationContext::new(catalog, warehouse_id)
        .with_poll_interval(Duration::from_secs(args.poll_interval))
        .with_concurrency(args.concurrency)
        .with_cancel_flag(cancel);
    if let Some(secs) = args.timeout {
        context = context.with_statement_timeout(Duration::from_secs(secs));
    }

    let validator = DeploymentValidator::new(Arc::new(client), context);
    let report = validator
        .run(&config, &TracingSink)
        .await
        .with_context(|| format!("Invalid validation config: {}", args.config))?;

    output::print_validation_report(&report, &args.format);

    if !report.passed {
        std::process::exit(report.exit_code());
    }

    Ok(())
}

/// Returns the flag or environment value, failing with the variable to set.
fn required(value: Option<String>, what: &str, env: &str, flag: &str) -> Result<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .ok_or_else(|| {
            anyhow!(
                "Missing {}. Set the {} environment variable or pass {}",
                what,
                env,
                flag
            )
        })
}
