//! Market regime engine - main entry point
//!
//! This binary provides two subcommands:
//! - analyze: Detect regimes and attribute strategy performance to them
//! - strategies: List the registered strategies

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

mod commands;

#[derive(Parser, Debug)]
#[command(name = "market-regime-engine")]
#[command(about = "Market regime detection and regime-conditioned strategy attribution", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Verbose output
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Run the full regime analysis
    Analyze {
        /// Path to configuration file (defaults are used when omitted)
        #[arg(short, long)]
        config: Option<String>,

        /// Price CSV path (overrides config file)
        #[arg(short, long)]
        data: Option<String>,

        /// Number of regimes
        #[arg(short, long)]
        regimes: Option<usize>,

        /// Seed for reproducible clustering
        #[arg(long)]
        seed: Option<u64>,

        /// Write the report as JSON. Bare file names go into the results directory
        #[arg(long)]
        json: Option<String>,
    },

    /// List available strategies
    Strategies,
}

fn setup_logging(verbose: bool, command_name: &str) -> Result<()> {
    // Create logs directory
    std::fs::create_dir_all("logs")?;

    // Create log file with naming pattern: {command}_{date}.log
    let log_filename = format!(
        "{}_{}.log",
        command_name,
        chrono::Local::now().format("%Y-%m-%d_%H-%M-%S")
    );
    let log_path = PathBuf::from("logs").join(&log_filename);

    let level = if verbose { "debug" } else { "info" };
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    let file_appender = tracing_appender::rolling::never("logs", &log_filename);

    let console_layer = tracing_subscriber::fmt::layer()
        .with_target(true)
        .with_line_number(true)
        .with_file(true)
        .with_ansi(true);

    // File layer - same format but without ANSI colors
    let file_layer = tracing_subscriber::fmt::layer()
        .with_writer(file_appender)
        .with_target(true)
        .with_line_number(true)
        .with_file(true)
        .with_ansi(false);

    tracing_subscriber::registry()
        .with(env_filter)
        .with(console_layer)
        .with(file_layer)
        .init();

    info!("Logging initialized");
    info!("Log file: {}", log_path.display());

    Ok(())
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Analyze {
            config,
            data,
            regimes,
            seed,
            json,
        } => {
            setup_logging(cli.verbose, "analyze")?;
            commands::analyze::run(config, data, regimes, seed, json)
        }

        // Listing needs no log file
        Commands::Strategies => commands::strategies::run(),
    }
}
