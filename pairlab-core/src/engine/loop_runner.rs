//! Step-by-step driver: the only component that loops.
//!
//! Per step t:
//! 1. Mark the execution sink to today's prices
//! 2. Collecting (t < N): record the training bucket; calibrate once at t = N−1
//! 3. Trading (t ≥ N): attribute P&L with yesterday's position, then compute
//!    today's z-score and run the state machine; transitions go to the sink
//! 4. Record the sink's portfolio value on the equity curve

use tracing::{debug, info};

use crate::accounting::{attributed_pnl, simple_return, LegReturns, TrainingPnlMode};
use crate::calibration::{calibrate, CalibrationResult};
use crate::data::{align_pair, AlignedSeriesPair};
use crate::domain::{PriceSeries, TradeEvent};
use crate::error::{BacktestError, Phase};
use crate::execution::{ExecutionSink, FrictionlessPortfolio};
use crate::metrics::{max_drawdown, sharpe_ratio};
use crate::signal::{transition, Thresholds};

use super::config::EngineConfig;
use super::report::{BacktestReport, EquityPoint};
use super::state::{BacktestState, DriverPhase};

/// Run a pair backtest against a frictionless portfolio.
pub fn run_backtest(
    series_a: &PriceSeries,
    series_b: &PriceSeries,
    config: &EngineConfig,
) -> Result<BacktestReport, BacktestError> {
    let mut sink = FrictionlessPortfolio::new(config.initial_capital);
    run_backtest_with_sink(series_a, series_b, config, &mut sink)
}

/// Run a pair backtest against any execution sink.
///
/// The sink must start holding `config.initial_capital` in cash.
pub fn run_backtest_with_sink<S: ExecutionSink + ?Sized>(
    series_a: &PriceSeries,
    series_b: &PriceSeries,
    config: &EngineConfig,
    sink: &mut S,
) -> Result<BacktestReport, BacktestError> {
    config.validate()?;
    let aligned = align_pair(series_a, series_b);
    run_aligned(&aligned, config, sink)
}

/// Align and calibrate only, without trading. Applies the same data checks as
/// a full run.
pub fn calibrate_pair(
    series_a: &PriceSeries,
    series_b: &PriceSeries,
    config: &EngineConfig,
) -> Result<CalibrationResult, BacktestError> {
    config.validate()?;
    let aligned = align_pair(series_a, series_b);
    validate_prices(&aligned)?;
    aligned.require_len(config.required_observations(), Phase::Alignment)?;
    calibrate(&aligned, config.training_period, config.regression_form())
}

/// Run on already-aligned data.
pub fn run_aligned<S: ExecutionSink + ?Sized>(
    aligned: &AlignedSeriesPair,
    config: &EngineConfig,
    sink: &mut S,
) -> Result<BacktestReport, BacktestError> {
    let thresholds = config.validate()?;
    validate_prices(aligned)?;
    aligned.require_len(config.required_observations(), Phase::Alignment)?;

    let mut state = BacktestState::new(
        config.initial_capital,
        config.training_period,
        aligned.len(),
    );
    for t in 0..aligned.len() {
        state.step = t;
        process_step(&mut state, aligned, config, &thresholds, sink)?;
    }
    state.phase = DriverPhase::Finished;

    let calibration = state
        .calibration
        .ok_or_else(|| BacktestError::InsufficientData {
            symbol_a: aligned.symbol_a().to_string(),
            symbol_b: aligned.symbol_b().to_string(),
            phase: Phase::Calibration,
            available: aligned.len(),
            required: config.training_period,
        })?;
    Ok(build_report(state, calibration, aligned, config, sink))
}

/// Advance the run by one step.
fn process_step<S: ExecutionSink + ?Sized>(
    state: &mut BacktestState,
    aligned: &AlignedSeriesPair,
    config: &EngineConfig,
    thresholds: &Thresholds,
    sink: &mut S,
) -> Result<(), BacktestError> {
    let t = state.step;
    let date = aligned.dates()[t];
    let (price_a, price_b) = (aligned.a()[t], aligned.b()[t]);

    sink.mark(date, price_a, price_b);
    let value = sink.portfolio_value();

    match (state.phase, state.calibration) {
        (DriverPhase::Collecting, _) => {
            if t > 0 {
                let pnl = match config.training_pnl {
                    TrainingPnlMode::Zero => 0.0,
                    TrainingPnlMode::PortfolioDelta => {
                        simple_return(state.last_portfolio_value, value)
                    }
                };
                state.ledger.record_training(pnl);
            }

            if t + 1 == config.training_period {
                let calibration =
                    calibrate(aligned, config.training_period, config.regression_form())?;
                info!(
                    pair = %format!("{}/{}", aligned.symbol_a(), aligned.symbol_b()),
                    date = %date,
                    hedge_ratio = calibration.hedge_ratio,
                    intercept = calibration.intercept,
                    spread_mean = calibration.spread_mean,
                    spread_std_dev = calibration.spread_std_dev,
                    "calibrated"
                );
                state.calibration = Some(calibration);
                state.phase = DriverPhase::Trading;
            }
        }
        (DriverPhase::Trading, Some(calibration)) => {
            // Yesterday's position earns today's return.
            let returns =
                LegReturns::between(aligned.a()[t - 1], aligned.b()[t - 1], price_a, price_b);
            state
                .ledger
                .record_test(attributed_pnl(state.position, returns, config.leg_weight));

            let zscore = calibration.zscore(price_a, price_b);
            let step = transition(state.position, zscore, thresholds);
            if let Some(kind) = step.event {
                debug!(date = %date, zscore, event = %kind, "position transition");
                state.events.push(TradeEvent { date, kind, zscore });
                sink.set_target_weights(step.next.target_weights(config.leg_weight));
            }
            state.position = step.next;
        }
        // Trading is only entered once calibration is stored.
        (DriverPhase::Trading, None) | (DriverPhase::Finished, _) => {}
    }

    let value = sink.portfolio_value();
    state.equity_curve.push(EquityPoint { date, value });
    state.last_portfolio_value = value;
    Ok(())
}

/// Reject prices for which a simple return is undefined.
fn validate_prices(aligned: &AlignedSeriesPair) -> Result<(), BacktestError> {
    let legs = [
        (aligned.symbol_a(), aligned.a()),
        (aligned.symbol_b(), aligned.b()),
    ];
    for (symbol, prices) in legs {
        if let Some(i) = prices.iter().position(|p| !(p.is_finite() && *p > 0.0)) {
            return Err(BacktestError::InvalidPrice {
                symbol: symbol.to_string(),
                date: aligned.dates()[i],
                price: prices[i],
            });
        }
    }
    Ok(())
}

fn build_report<S: ExecutionSink + ?Sized>(
    state: BacktestState,
    calibration: CalibrationResult,
    aligned: &AlignedSeriesPair,
    config: &EngineConfig,
    sink: &S,
) -> BacktestReport {
    let final_portfolio_value = sink.portfolio_value();
    let equity: Vec<f64> = state.equity_curve.iter().map(|p| p.value).collect();

    let report = BacktestReport {
        symbol_a: aligned.symbol_a().to_string(),
        symbol_b: aligned.symbol_b().to_string(),
        hedge_ratio: calibration.hedge_ratio,
        intercept: calibration.intercept,
        spread_mean: calibration.spread_mean,
        spread_std_dev: calibration.spread_std_dev,
        training_sharpe: sharpe_ratio(state.ledger.training()),
        test_sharpe: sharpe_ratio(state.ledger.test()),
        final_portfolio_value,
        total_return: final_portfolio_value / config.initial_capital - 1.0,
        test_cumulative_return: state.ledger.test_cumulative_return(),
        max_drawdown: max_drawdown(&equity),
        trade_count: state.trade_count(),
        training_steps: state.ledger.training().len(),
        test_steps: state.ledger.test().len(),
        trade_events: state.events,
        equity_curve: state.equity_curve,
    };

    info!(
        pair = %format!("{}/{}", report.symbol_a, report.symbol_b),
        trades = report.trade_count,
        test_sharpe = report.test_sharpe,
        total_return = report.total_return,
        "backtest finished"
    );
    report
}
