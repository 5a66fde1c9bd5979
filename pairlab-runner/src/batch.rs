//! Batch execution of independent pair backtests.
//!
//! Runs share nothing, so they fan out over the rayon pool. Output order
//! matches input order regardless of which run finishes first.

use rayon::prelude::*;
use tracing::{info, warn};

use crate::config::BacktestConfig;
use crate::runner::{run_pair_backtest, PairRunResult, RunError};

/// Outcome of one config in a batch.
#[derive(Debug)]
pub struct BatchItem {
    /// Position of the config in the input.
    pub index: usize,
    pub pair: String,
    pub outcome: Result<PairRunResult, RunError>,
}

/// Run every config, in parallel unless `parallel` is false.
///
/// A failing config does not stop the others; its error is returned in place.
pub fn run_batch(configs: &[BacktestConfig], parallel: bool) -> Vec<BatchItem> {
    let run = |(index, config): (usize, &BacktestConfig)| {
        let outcome = run_pair_backtest(config);
        if let Err(e) = &outcome {
            warn!(pair = %config.pair_label(), error = %e, "batch run failed");
        }
        BatchItem {
            index,
            pair: config.pair_label(),
            outcome,
        }
    };

    let items: Vec<BatchItem> = if parallel {
        configs.par_iter().enumerate().map(run).collect()
    } else {
        configs.iter().enumerate().map(run).collect()
    };

    let failed = items.iter().filter(|i| i.outcome.is_err()).count();
    info!(
        total = items.len(),
        succeeded = items.len() - failed,
        failed,
        "batch finished"
    );
    items
}
