//! Analyze command implementation

use anyhow::{Context, Result};
use market_regime_engine::analysis;
use market_regime_engine::kmeans::TracingObserver;
use market_regime_engine::{data, Config};
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

pub fn run(
    config_path: Option<String>,
    data_override: Option<String>,
    regimes_override: Option<usize>,
    seed_override: Option<u64>,
    json_path: Option<String>,
) -> Result<()> {
    info!("Starting regime analysis");

    // Load configuration
    let mut config = match &config_path {
        Some(path) => {
            let config = Config::from_file(path)?;
            info!("Loaded configuration from: {}", path);
            config
        }
        None => {
            info!("No configuration file given, using defaults");
            Config::default()
        }
    };

    // Apply overrides
    if let Some(path) = data_override {
        info!("Overriding data path to: {}", path);
        config.data.path = path;
    }

    if let Some(regimes) = regimes_override {
        info!("Overriding regime count to: {}", regimes);
        config.clustering.regimes = regimes;
    }

    if let Some(seed) = seed_override {
        info!("Overriding seed to: {}", seed);
        config.clustering.seed = Some(seed);
    }

    config.validate()?;

    // Load data
    info!("Loading prices from: {}", config.data.path);
    let prices = data::read_price_series(&config.data.path, &config.data.price_column)?;
    debug!(
        first = ?prices.date(0),
        last = ?prices.len().checked_sub(1).and_then(|i| prices.date(i)),
        "Price range"
    );

    let mut rng = match config.clustering.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };

    info!("Running analysis...");
    let report = analysis::run_analysis(&prices, &config, &mut rng, &mut TracingObserver)?;

    println!("\n{}", report.render());

    if let Some(name) = json_path {
        let path = resolve_output_path(&config.backtest.results_dir, &name);
        let path = path.as_path();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory {}", parent.display()))?;
        }
        let json = report.to_json().context("Failed to serialize report")?;
        fs::write(path, json)
            .with_context(|| format!("Failed to write report to {}", path.display()))?;
        info!("Report written to: {}", path.display());
    }

    info!("Analysis completed successfully");

    Ok(())
}

/// Bare file names go into the results directory; anything with a
/// directory component is used as given
fn resolve_output_path(results_dir: &str, name: &str) -> PathBuf {
    let path = Path::new(name);
    let has_dir = path.parent().map_or(false, |p| !p.as_os_str().is_empty());
    if path.is_absolute() || has_dir {
        path.to_path_buf()
    } else {
        Path::new(results_dir).join(path)
    }
}
