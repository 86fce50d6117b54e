//! Descriptive statistics over an amount or volume series

use crate::common::math;
use crate::models::analytics::{Percentiles, SeriesStatistics};
use crate::models::period::{decimal_to_f64, AnalysisWindow};
use crate::models::transaction::TransactionRecord;

/// Mean, population standard deviation, extremes and percentiles.
///
/// Empty input yields [`SeriesStatistics::zero`] so callers always get a
/// complete bundle.
pub fn describe(values: &[f64]) -> SeriesStatistics {
    if values.is_empty() {
        return SeriesStatistics::zero();
    }

    let sorted = math::sorted(values);
    let pct = |p: f64| math::percentile_cont(&sorted, p);

    SeriesStatistics {
        count: values.len(),
        mean: math::mean(values),
        std_dev: math::population_std_dev(values),
        min: sorted[0],
        max: sorted[sorted.len() - 1],
        percentiles: Percentiles {
            p25: pct(25.0),
            p50: pct(50.0),
            p75: pct(75.0),
            p90: pct(90.0),
            p95: pct(95.0),
            p99: pct(99.0),
        },
    }
}

/// Amounts of the records inside `window`, in input order
pub fn window_amounts(records: &[TransactionRecord], window: &AnalysisWindow) -> Vec<f64> {
    records
        .iter()
        .filter(|r| window.contains(&r.timestamp))
        .map(|r| decimal_to_f64(r.amount))
        .collect()
}
