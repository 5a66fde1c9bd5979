//! Reporting and export: JSON, CSV, and Markdown artifact generation.
//!
//! Provides three export formats for pair backtest results:
//! - **JSON**: full round-trip serialization with schema versioning
//! - **CSV**: trade events and the equity curve with drawdown
//! - **Markdown**: human-readable single-run report
//!
//! Persisted results carry a `schema_version` field. Newer versions are
//! rejected on load.

use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};

use pairlab_core::domain::TradeEvent;
use pairlab_core::engine::EquityPoint;
use pairlab_core::metrics::drawdown_series;

use crate::runner::{PairRunResult, SCHEMA_VERSION};

pub const RESULT_FILE: &str = "result.json";
pub const EVENTS_FILE: &str = "events.csv";
pub const EQUITY_FILE: &str = "equity.csv";
pub const REPORT_FILE: &str = "report.md";

// ─── JSON export ────────────────────────────────────────────────────

/// Serialize a `PairRunResult` to pretty JSON.
pub fn export_json(result: &PairRunResult) -> Result<String> {
    serde_json::to_string_pretty(result).context("failed to serialize PairRunResult to JSON")
}

/// Deserialize a `PairRunResult` from JSON, rejecting newer schema versions.
pub fn import_json(json: &str) -> Result<PairRunResult> {
    let result: PairRunResult =
        serde_json::from_str(json).context("failed to deserialize PairRunResult from JSON")?;
    if result.schema_version > SCHEMA_VERSION {
        bail!(
            "unsupported schema version {} (max supported: {})",
            result.schema_version,
            SCHEMA_VERSION
        );
    }
    Ok(result)
}

// ─── CSV export ─────────────────────────────────────────────────────

/// Export trade events as CSV.
///
/// Columns: date, event, resulting_position, zscore
pub fn export_events_csv(events: &[TradeEvent]) -> Result<String> {
    let mut wtr = csv::Writer::from_writer(vec![]);
    wtr.write_record(["date", "event", "resulting_position", "zscore"])?;
    for e in events {
        wtr.write_record([
            e.date.to_string(),
            e.kind.as_str().to_string(),
            e.kind.resulting_state().to_string(),
            format!("{:.6}", e.zscore),
        ])?;
    }
    let data = wtr.into_inner().context("failed to flush CSV writer")?;
    String::from_utf8(data).context("CSV output is not valid UTF-8")
}

/// Export the equity curve as CSV with a running drawdown column.
pub fn export_equity_csv(equity_curve: &[EquityPoint]) -> Result<String> {
    let values: Vec<f64> = equity_curve.iter().map(|p| p.value).collect();
    let drawdowns = drawdown_series(&values);

    let mut wtr = csv::Writer::from_writer(vec![]);
    wtr.write_record(["date", "value", "drawdown"])?;
    for (point, dd) in equity_curve.iter().zip(drawdowns) {
        wtr.write_record([
            point.date.to_string(),
            format!("{:.2}", point.value),
            format!("{:.6}", dd),
        ])?;
    }
    let data = wtr.into_inner().context("failed to flush CSV writer")?;
    String::from_utf8(data).context("CSV output is not valid UTF-8")
}

// ─── Artifact bundle ────────────────────────────────────────────────

/// Directory name for a run: `{A}_{B}_{short run id}`.
pub fn artifact_dir_name(result: &PairRunResult) -> String {
    format!(
        "{}_{}_{}",
        sanitize(&result.report.symbol_a),
        sanitize(&result.report.symbol_b),
        result.short_id()
    )
}

fn sanitize(symbol: &str) -> String {
    symbol
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '-' { c } else { '_' })
        .collect()
}

/// Save the full artifact set for one run.
///
/// Creates `{A}_{B}_{run id prefix}/` under `output_dir` containing:
/// - `result.json`: the full `PairRunResult`
/// - `events.csv`: trade events
/// - `equity.csv`: per-step portfolio value and drawdown
/// - `report.md`: Markdown summary
///
/// Returns the path to the created directory.
pub fn save_artifacts(result: &PairRunResult, output_dir: &Path) -> Result<PathBuf> {
    let run_dir = output_dir.join(artifact_dir_name(result));
    std::fs::create_dir_all(&run_dir)
        .with_context(|| format!("failed to create artifact dir: {}", run_dir.display()))?;

    let files = [
        (RESULT_FILE, export_json(result)?),
        (EVENTS_FILE, export_events_csv(&result.report.trade_events)?),
        (EQUITY_FILE, export_equity_csv(&result.report.equity_curve)?),
        (REPORT_FILE, generate_report(result)),
    ];
    for (name, content) in files {
        let path = run_dir.join(name);
        std::fs::write(&path, content)
            .with_context(|| format!("failed to write {}", path.display()))?;
    }

    Ok(run_dir)
}

/// Load a `PairRunResult` from an artifact directory's result.json.
///
/// Rejects newer schema versions.
pub fn load_artifacts(dir: &Path) -> Result<PairRunResult> {
    let path = dir.join(RESULT_FILE);
    let json = std::fs::read_to_string(&path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    import_json(&json)
}

// ─── Markdown report ────────────────────────────────────────────────

/// Generate a Markdown report for a single pair backtest.
pub fn generate_report(result: &PairRunResult) -> String {
    let r = &result.report;
    let s = &result.config.strategy;
    let m = &result.metrics;
    let mut md = String::with_capacity(2048);

    md.push_str(&format!("# Pair Backtest: {}\n\n", result.pair_label()));

    // Metadata
    md.push_str("## Metadata\n\n");
    md.push_str("| Field | Value |\n");
    md.push_str("| --- | --- |\n");
    md.push_str(&format!("| Run ID | `{}` |\n", result.run_id));
    if let (Some(start), Some(end)) = (r.start_date(), r.end_date()) {
        md.push_str(&format!("| Period | {start} to {end} |\n"));
    }
    md.push_str(&format!(
        "| Steps | {} aligned ({} training, {} test) |\n",
        r.equity_curve.len(),
        s.training_period,
        r.test_steps
    ));
    md.push_str(&format!(
        "| Initial Capital | ${:.0} |\n",
        result.config.portfolio.initial_capital
    ));
    md.push_str(&format!(
        "| Leg Weight | {:.2} |\n",
        result.config.portfolio.leg_weight
    ));
    md.push_str(&format!(
        "| Thresholds | entry ±{}, exit ±{} |\n",
        s.entry_z, s.exit_z
    ));
    md.push_str(&format!("| Dataset Hash | {} |\n", result.dataset_hash));
    md.push('\n');

    // Calibration
    md.push_str("## Calibration\n\n");
    md.push_str("| Parameter | Value |\n");
    md.push_str("| --- | ---: |\n");
    md.push_str(&format!("| Hedge Ratio | {:.6} |\n", r.hedge_ratio));
    if s.with_intercept {
        md.push_str(&format!("| Intercept | {:.6} |\n", r.intercept));
    }
    md.push_str(&format!("| Spread Mean | {:.6} |\n", r.spread_mean));
    md.push_str(&format!("| Spread Std Dev | {:.6} |\n", r.spread_std_dev));
    md.push('\n');

    // Performance Summary
    md.push_str("## Performance Summary\n\n");
    md.push_str("| Metric | Value |\n");
    md.push_str("| --- | ---: |\n");
    md.push_str(&format!("| Training Sharpe | {:.3} |\n", m.training_sharpe));
    md.push_str(&format!("| Test Sharpe | {:.3} |\n", m.test_sharpe));
    md.push_str(&format!(
        "| Total Return | {:.2}% |\n",
        m.total_return * 100.0
    ));
    md.push_str(&format!(
        "| Test Cumulative Return | {:.2}% |\n",
        r.test_cumulative_return * 100.0
    ));
    md.push_str(&format!("| CAGR | {:.2}% |\n", m.cagr * 100.0));
    md.push_str(&format!("| Sortino | {:.3} |\n", m.sortino));
    md.push_str(&format!(
        "| Max Drawdown | {:.2}% |\n",
        m.max_drawdown * 100.0
    ));
    md.push_str(&format!(
        "| Final Value | ${:.2} |\n",
        r.final_portfolio_value
    ));
    md.push_str(&format!(
        "| Transitions | {} ({} entries) |\n",
        m.trade_count, m.round_trips
    ));
    md.push('\n');

    // Events
    md.push_str("## Trade Events\n\n");
    if r.trade_events.is_empty() {
        md.push_str("No position transitions.\n");
    } else {
        md.push_str("| Date | Event | Z-Score |\n");
        md.push_str("| --- | --- | ---: |\n");
        for e in &r.trade_events {
            md.push_str(&format!("| {} | {} | {:+.3} |\n", e.date, e.kind, e.zscore));
        }
    }

    md
}
