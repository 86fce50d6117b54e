//! Compound period-over-period growth

use std::collections::BTreeMap;

use crate::models::analytics::GrowthRateResult;
use crate::models::period::{metric_series, Metric, PeriodAggregate};

/// Growth figures for a single value series.
///
/// `growth_rate` is `((last / first)^(1 / (n - 1)) - 1) * 100`; it is 0 when
/// fewer than two values exist or the first value is zero.
pub fn growth_rate(values: &[f64]) -> GrowthRateResult {
    let start_value = values.first().copied().unwrap_or(0.0);
    let end_value = values.last().copied().unwrap_or(0.0);
    let periods = values.len();

    let growth_rate = if periods >= 2 && start_value != 0.0 {
        let ratio = end_value / start_value;
        let rate = (ratio.powf(1.0 / (periods - 1) as f64) - 1.0) * 100.0;
        if rate.is_finite() {
            rate
        } else {
            0.0
        }
    } else {
        0.0
    };

    GrowthRateResult {
        start_value,
        end_value,
        total_change: end_value - start_value,
        growth_rate,
        periods,
    }
}

/// Growth per tracked metric across the bucket sequence
pub fn growth_rates(
    periods: &[PeriodAggregate],
    metrics: &[Metric],
) -> BTreeMap<Metric, GrowthRateResult> {
    metrics
        .iter()
        .map(|&metric| (metric, growth_rate(&metric_series(periods, metric))))
        .collect()
}
