//! Command-line front end: run analyses over a directory of CSV datasets and
//! print the reports as JSON.
//!
//! ```text
//! market-effects --data-dir data heat-wave BTC --lambda 1.5
//! market-effects meteor-shower BTC ETH --window 30
//! market-effects batch BTC ETH SOL --mode both
//! market-effects calibrate BTC --target 0.1
//! market-effects datasets
//! ```
//!
//! `RUST_LOG` controls log output (stderr); `.env` is loaded when present.
use anyhow::{Context, Result};
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use market_effects::{
    AnalysisConfig, AnalysisEngine, AnalysisParams, BatchMode,
    report::to_flat_map,
    volatility::{DEFAULT_DT, HestonParams, simulate_path},
};
use rand::{SeedableRng, rngs::StdRng};
use serde::Serialize;
use std::path::PathBuf;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(author, version, about = "Heat-wave and meteor-shower effect detection")]
struct Args {
    /// JSON configuration file
    #[arg(long)]
    config: Option<PathBuf>,

    /// Dataset directory (overrides config and DATA_DIR)
    #[arg(long)]
    data_dir: Option<String>,

    /// First calendar date to include (YYYY-MM-DD)
    #[arg(long, global = true)]
    start: Option<NaiveDate>,

    /// Last calendar date to include (YYYY-MM-DD)
    #[arg(long, global = true)]
    end: Option<NaiveDate>,

    /// Threshold multiplier for this run
    #[arg(long, global = true)]
    lambda: Option<f64>,

    /// Print dotted key/value pairs instead of nested JSON
    #[arg(long, global = true)]
    flat: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Heat-wave analysis of one dataset
    HeatWave { dataset: String },

    /// Meteor-shower analysis of two datasets
    MeteorShower {
        first: String,
        second: String,
        /// Rolling-correlation window
        #[arg(long)]
        window: Option<usize>,
        /// Rolling correlation over the configured default window
        #[arg(long)]
        rolling: bool,
    },

    /// Batch analysis over several datasets
    Batch {
        datasets: Vec<String>,
        /// heat_wave, meteor_shower or both
        #[arg(long, default_value = "both")]
        mode: String,
        #[arg(long)]
        window: Option<usize>,
        #[arg(long)]
        rolling: bool,
    },

    /// Calibrate λ toward a target heat-wave effect ratio
    Calibrate {
        dataset: String,
        #[arg(long)]
        target: Option<f64>,
    },

    /// List available datasets
    Datasets,

    /// Summary of one dataset
    Summary { dataset: String },

    /// Simulate a Heston volatility path
    Simulate {
        #[arg(long, default_value = "252")]
        steps: usize,
        #[arg(long, default_value = "42")]
        seed: u64,
    },
}

fn main() -> Result<()> {
    let _ = dotenv::dotenv();
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    let config = load_config(&args)?;

    let request = AnalysisParams {
        start_date: args.start,
        end_date: args.end,
        lambda: args.lambda,
        ..AnalysisParams::default()
    };

    if let Command::Simulate { steps, seed } = args.command {
        let params = HestonParams::default();
        let mut rng = StdRng::seed_from_u64(seed);
        let path = simulate_path(params.initial_sigma(), steps, DEFAULT_DT, &params, &mut rng)?;
        return emit(&path.to_vec(), args.flat);
    }

    let engine = AnalysisEngine::from_config(config).context("failed to initialise engine")?;
    match &args.command {
        Command::HeatWave { dataset } => emit(&engine.analyze_single(dataset, &request)?, args.flat),
        Command::MeteorShower { first, second, window, rolling } => {
            let request = AnalysisParams { window: *window, rolling: *rolling, ..request };
            emit(&engine.analyze_pair(first, second, &request)?, args.flat)
        }
        Command::Batch { datasets, mode, window, rolling } => {
            let mode: BatchMode = mode.parse()?;
            let request = AnalysisParams { window: *window, rolling: *rolling, ..request };
            let ids = if datasets.is_empty() { engine.available_datasets() } else { datasets.clone() };
            info!(count = ids.len(), "running batch");
            emit(&engine.analyze_batch(&ids, mode, &request)?, args.flat)
        }
        Command::Calibrate { dataset, target } => {
            emit(&engine.calibrate(dataset, *target, &request)?, args.flat)
        }
        Command::Datasets => emit(&engine.available_datasets(), args.flat),
        Command::Summary { dataset } => emit(&engine.dataset_summary(dataset)?, args.flat),
        Command::Simulate { .. } => Ok(()),
    }
}

fn load_config(args: &Args) -> Result<AnalysisConfig> {
    let mut config = match &args.config {
        Some(path) => AnalysisConfig::load(path)
            .with_context(|| format!("loading config {}", path.display()))?,
        None => AnalysisConfig::default(),
    };
    config.apply_env_overrides()?;
    if let Some(dir) = &args.data_dir {
        config.data.directory = dir.clone();
    }
    if let Err(e) = config.validate() {
        warn!(error = %e, "configuration rejected");
        return Err(e.into());
    }
    Ok(config)
}

fn emit<T: Serialize>(report: &T, flat: bool) -> Result<()> {
    let text = if flat {
        serde_json::to_string_pretty(&to_flat_map(report)?)?
    } else {
        serde_json::to_string_pretty(report)?
    };
    println!("{text}");
    Ok(())
}
