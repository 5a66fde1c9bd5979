//! PairLab CLI: pair backtest, calibration, and batch commands.
//!
//! Commands:
//! - `run`: execute one pair backtest from a TOML config, with overrides
//! - `calibrate`: align and calibrate only; print the fitted spread model
//! - `batch`: run several configs in parallel and list one line per pair

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use tracing::debug;
use tracing_subscriber::EnvFilter;

use pairlab_runner::{
    calibrate_from_config, run_batch, run_pair_backtest, save_artifacts, BacktestConfig,
    ConfigOverrides, PairRunResult,
};

#[derive(Parser)]
#[command(name = "pairlab", about = "PairLab CLI: pairs-trading backtest engine")]
struct Cli {
    /// Enable debug logging (overrides RUST_LOG).
    #[arg(long, short, global = true, default_value_t = false)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Execute a pair backtest from a TOML config file.
    Run {
        /// Path to a TOML config file.
        #[arg(long)]
        config: PathBuf,

        /// Override the training window length.
        #[arg(long)]
        training_period: Option<usize>,

        /// Override the entry z-score threshold.
        #[arg(long)]
        entry_z: Option<f64>,

        /// Override the exit z-score threshold.
        #[arg(long)]
        exit_z: Option<f64>,

        /// Fit the hedge regression with an intercept.
        #[arg(long, default_value_t = false)]
        with_intercept: bool,

        /// Override the starting capital.
        #[arg(long)]
        initial_capital: Option<f64>,

        /// Output directory for artifacts.
        #[arg(long, default_value = "results")]
        output_dir: PathBuf,
    },
    /// Align and calibrate a pair without trading.
    Calibrate {
        /// Path to a TOML config file.
        #[arg(long)]
        config: PathBuf,
    },
    /// Run several configs in parallel.
    Batch {
        /// TOML config files.
        #[arg(required = true)]
        configs: Vec<PathBuf>,

        /// Write artifacts for each successful run under this directory.
        #[arg(long)]
        output_dir: Option<PathBuf>,

        /// Run one config at a time.
        #[arg(long, default_value_t = false)]
        sequential: bool,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Commands::Run {
            config,
            training_period,
            entry_z,
            exit_z,
            with_intercept,
            initial_capital,
            output_dir,
        } => {
            let overrides = ConfigOverrides {
                training_period,
                entry_z,
                exit_z,
                with_intercept: with_intercept.then_some(true),
                initial_capital,
            };
            run_cmd(&config, &overrides, &output_dir)
        }
        Commands::Calibrate { config } => calibrate_cmd(&config),
        Commands::Batch {
            configs,
            output_dir,
            sequential,
        } => batch_cmd(&configs, output_dir.as_deref(), !sequential),
    }
}

fn init_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn load_config(path: &Path, overrides: &ConfigOverrides) -> Result<BacktestConfig> {
    if !overrides.is_empty() {
        debug!(config = %path.display(), ?overrides, "applying overrides");
    }
    BacktestConfig::load_with_overrides(path, overrides)
        .with_context(|| format!("failed to load config {}", path.display()))
}

fn run_cmd(config_path: &Path, overrides: &ConfigOverrides, output_dir: &Path) -> Result<()> {
    let config = load_config(config_path, overrides)?;
    let result = run_pair_backtest(&config)
        .with_context(|| format!("backtest failed for {}", config.pair_label()))?;

    print_summary(&result);

    let run_dir = save_artifacts(&result, output_dir)?;
    println!("Artifacts saved to: {}", run_dir.display());
    Ok(())
}

fn calibrate_cmd(config_path: &Path) -> Result<()> {
    let config = load_config(config_path, &ConfigOverrides::default())?;
    let calibration = calibrate_from_config(&config)
        .with_context(|| format!("calibration failed for {}", config.pair_label()))?;

    println!();
    println!("=== Calibration: {} ===", config.pair_label());
    println!("{}", field("Window", format!("{} observations", calibration.window)));
    println!("{}", field("Hedge Ratio", format!("{:.6}", calibration.hedge_ratio)));
    if config.strategy.with_intercept {
        println!("{}", field("Intercept", format!("{:.6}", calibration.intercept)));
    }
    println!("{}", field("Spread Mean", format!("{:.6}", calibration.spread_mean)));
    println!("{}", field("Spread Std Dev", format!("{:.6}", calibration.spread_std_dev)));
    println!();
    Ok(())
}

fn batch_cmd(paths: &[PathBuf], output_dir: Option<&Path>, parallel: bool) -> Result<()> {
    let configs = paths
        .iter()
        .map(|p| load_config(p, &ConfigOverrides::default()))
        .collect::<Result<Vec<_>>>()?;

    let items = run_batch(&configs, parallel);
    let mut failed = 0usize;
    for item in &items {
        match &item.outcome {
            Ok(result) => {
                println!("{}", result.summary_line());
                if let Some(dir) = output_dir {
                    save_artifacts(result, dir)?;
                }
            }
            Err(e) => {
                failed += 1;
                println!("{:<14} FAILED: {e}", item.pair);
            }
        }
    }

    println!();
    println!(
        "{} run(s), {} succeeded, {} failed",
        items.len(),
        items.len() - failed,
        failed
    );
    if let Some(dir) = output_dir {
        println!("Artifacts saved under: {}", dir.display());
    }
    Ok(())
}

fn print_summary(result: &PairRunResult) {
    let r = &result.report;
    println!();
    println!("=== Pair Backtest Result ===");
    println!("{}", field("Pair", result.pair_label()));
    println!("{}", field("Run ID", result.short_id()));
    if let (Some(start), Some(end)) = (r.start_date(), r.end_date()) {
        println!("{}", field("Period", format!("{start} to {end}")));
    }
    println!(
        "{}",
        field(
            "Steps",
            format!(
                "{} ({} training, {} test)",
                r.equity_curve.len(),
                result.config.strategy.training_period,
                r.test_steps
            )
        )
    );
    println!();
    println!("--- Calibration ---");
    println!("{}", field("Hedge Ratio", format!("{:.6}", r.hedge_ratio)));
    println!("{}", field("Intercept", format!("{:.6}", r.intercept)));
    println!("{}", field("Spread Mean", format!("{:.6}", r.spread_mean)));
    println!("{}", field("Spread Std Dev", format!("{:.6}", r.spread_std_dev)));
    println!();
    println!("--- Performance ---");
    for line in performance_lines(result) {
        println!("{line}");
    }
    println!();
}

fn performance_lines(result: &PairRunResult) -> Vec<String> {
    let m = &result.metrics;
    vec![
        field("Training Sharpe", format!("{:.3}", m.training_sharpe)),
        field("Test Sharpe", format!("{:.3}", m.test_sharpe)),
        field("Total Return", format!("{:.2}%", m.total_return * 100.0)),
        field("CAGR", format!("{:.2}%", m.cagr * 100.0)),
        field("Sortino", format!("{:.3}", m.sortino)),
        field("Max Drawdown", format!("{:.2}%", m.max_drawdown * 100.0)),
        field(
            "Final Value",
            format!("${:.2}", result.report.final_portfolio_value),
        ),
        field(
            "Transitions",
            format!("{} ({} entries)", m.trade_count, m.round_trips),
        ),
    ]
}

/// `label:` padded so every value starts in the same column.
fn field(label: &str, value: impl std::fmt::Display) -> String {
    format!("{:<width$}{value}", format!("{label}:"), width = LABEL_WIDTH)
}

const LABEL_WIDTH: usize = 17;
