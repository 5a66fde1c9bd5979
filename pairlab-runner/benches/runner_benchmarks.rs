//! Criterion benchmarks for the runner hot paths.
//!
//! Run with: `cargo bench -p pairlab-runner`
//!
//! Measures:
//! - A single pair run from in-memory series (calibration + trading + metrics)
//! - Artifact rendering (equity CSV with drawdown, Markdown report)
//! - Batch fan-out, parallel versus sequential

use chrono::NaiveDate;
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use pairlab_core::domain::PriceSeries;
use pairlab_runner::export::{export_equity_csv, generate_report};
use pairlab_runner::{dataset_hash, run_batch, run_from_series, BacktestConfig};

/// Mean-reverting synthetic pair: A tracks 1.5·B plus an AR(1) spread.
fn synthetic_pair(n: usize) -> (PriceSeries, PriceSeries) {
    let base = NaiveDate::from_ymd_opt(2000, 1, 3).unwrap();
    let mut state: u64 = 7;
    let mut next = || {
        state = state
            .wrapping_mul(6364136223846793005)
            .wrapping_add(1442695040888963407);
        (state >> 33) as f64 / (1u64 << 31) as f64 - 0.5
    };
    let mut b_price = 40.0;
    let mut spread = 0.0;
    let mut a = Vec::with_capacity(n);
    let mut b = Vec::with_capacity(n);
    for i in 0..n {
        b_price = (b_price + next() * 3.0).max(5.0);
        spread = 0.8 * spread + next() * 2.0;
        let date = base + chrono::Duration::days(i as i64);
        a.push((date, 1.5 * b_price + 4.0 + spread));
        b.push((date, b_price));
    }
    (
        PriceSeries::from_pairs("AAA", a),
        PriceSeries::from_pairs("BBB", b),
    )
}

fn bench_config() -> BacktestConfig {
    BacktestConfig::from_toml(
        r#"
[pair]
symbol_a = "AAA"
symbol_b = "BBB"
path_a = "AAA.csv"
path_b = "BBB.csv"

[strategy]
training_period = 250
entry_z = 1.5
exit_z = 0.5
with_intercept = true
"#,
    )
    .unwrap()
}

fn bench_run_from_series(c: &mut Criterion) {
    let mut group = c.benchmark_group("run_from_series");
    let config = bench_config();

    for n in [1_000usize, 10_000] {
        let (a, b) = synthetic_pair(n);
        let hash = dataset_hash(&a, &b);
        group.bench_with_input(BenchmarkId::from_parameter(n), &n, |bench, _| {
            bench.iter(|| {
                let _ = run_from_series(black_box(&config), &a, &b, &hash);
            });
        });
    }

    group.finish();
}

fn bench_artifacts(c: &mut Criterion) {
    let config = bench_config();
    let (a, b) = synthetic_pair(5_000);
    let hash = dataset_hash(&a, &b);
    let result = run_from_series(&config, &a, &b, &hash).unwrap();

    c.bench_function("export_equity_csv_5k", |bench| {
        bench.iter(|| {
            let _ = export_equity_csv(black_box(&result.report.equity_curve));
        });
    });
    c.bench_function("generate_report_5k", |bench| {
        bench.iter(|| {
            let _ = generate_report(black_box(&result));
        });
    });
}

fn bench_batch(c: &mut Criterion) {
    let temp = tempfile::tempdir().unwrap();
    let (a, b) = synthetic_pair(2_000);
    let mut text_a = String::from("date,close\n");
    let mut text_b = String::from("date,close\n");
    for obs in &a.observations {
        text_a.push_str(&format!("{},{}\n", obs.date, obs.price));
    }
    for obs in &b.observations {
        text_b.push_str(&format!("{},{}\n", obs.date, obs.price));
    }
    let path_a = temp.path().join("AAA.csv");
    let path_b = temp.path().join("BBB.csv");
    std::fs::write(&path_a, text_a).unwrap();
    std::fs::write(&path_b, text_b).unwrap();

    let configs: Vec<BacktestConfig> = [1.0, 1.25, 1.5, 1.75, 2.0, 2.25, 2.5, 3.0]
        .iter()
        .map(|&entry| {
            let mut config = bench_config();
            config.pair.path_a = path_a.clone();
            config.pair.path_b = path_b.clone();
            config.strategy.entry_z = entry;
            config
        })
        .collect();

    let mut group = c.benchmark_group("batch_8_pairs");
    group.sample_size(20);
    for parallel in [false, true] {
        let label = if parallel { "parallel" } else { "sequential" };
        group.bench_with_input(BenchmarkId::from_parameter(label), &parallel, |bench, &p| {
            bench.iter(|| {
                let _ = run_batch(black_box(&configs), p);
            });
        });
    }
    group.finish();
}

criterion_group!(benches, bench_run_from_series, bench_artifacts, bench_batch);
criterion_main!(benches);
