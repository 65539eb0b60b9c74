mod commands;
mod output;

use anyhow::Result;
use clap::{Parser, Subcommand};
use commands::check::CheckArgs;
use commands::validate::ValidateArgs;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "gate")]
#[command(version, about = "Post-deployment validation gate for Databricks", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate deployed tables and jobs against the expectations
    Validate(ValidateArgs),

    /// Check the expectations file without contacting the workspace
    Check(CheckArgs),
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let log_level = if cli.verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::INFO
    };

    // stdout is reserved for the report
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false)
                .with_level(true)
                .compact(),
        )
        .with(tracing_subscriber::filter::LevelFilter::from_level(
            log_level,
        ))
        .init();

    match cli.command {
        Commands::Validate(args) => commands::validate::execute(args).await,
        Commands::Check(args) => commands::check::execute(args),
    }
}
