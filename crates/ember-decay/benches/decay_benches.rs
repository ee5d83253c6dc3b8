//! Criterion benchmarks for ember-decay hot paths.
//!
//! Covers: retention compounding at common horizons, the factor-exhaustion
//! worst case, and effective-balance evaluation through the trait.

use criterion::{black_box, criterion_group, criterion_main, Criterion};

use ember_core::constants::SECS_PER_DAY;
use ember_core::traits::DecaySchedule;
use ember_core::types::DecayProfile;
use ember_decay::retention::{apply_retention, compound_retention_bps};
use ember_decay::DecayEngine;

fn bench_compound_week(c: &mut Criterion) {
    c.bench_function("compound_retention_week", |b| {
        b.iter(|| compound_retention_bps(black_box(9_990), black_box(7)))
    });
}

fn bench_compound_year(c: &mut Criterion) {
    c.bench_function("compound_retention_year", |b| {
        b.iter(|| compound_retention_bps(black_box(9_990), black_box(365)))
    });
}

fn bench_compound_exhaustion(c: &mut Criterion) {
    // Slowest possible sub-full rate with an unbounded horizon: the loop runs
    // until the factor exhausts to zero.
    c.bench_function("compound_retention_exhaustion", |b| {
        b.iter(|| compound_retention_bps(black_box(9_999), black_box(u64::MAX)))
    });
}

fn bench_apply_retention(c: &mut Criterion) {
    c.bench_function("apply_retention", |b| {
        b.iter(|| apply_retention(black_box(u64::MAX / 3), black_box(9_700)))
    });
}

fn bench_effective_balance_quarter(c: &mut Criterion) {
    let engine = DecayEngine::new();
    let profile = DecayProfile::new(1_700_000_000, 9_990);
    let now = 1_700_000_000 + 90 * SECS_PER_DAY;
    c.bench_function("effective_balance_90_days", |b| {
        b.iter(|| engine.effective_balance(black_box(1_000_000_000), &profile, black_box(now)))
    });
}

criterion_group!(
    benches,
    bench_compound_week,
    bench_compound_year,
    bench_compound_exhaustion,
    bench_apply_retention,
    bench_effective_balance_quarter,
);
criterion_main!(benches);
