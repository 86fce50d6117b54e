//! Current-vs-previous range comparison

use std::collections::BTreeMap;

use crate::models::analytics::{ComparisonTrend, MetricComparison, PeriodComparison, PeriodSummary};
use crate::models::period::{AnalysisWindow, Metric, Totals};
use crate::models::transaction::TransactionRecord;

use super::aggregator::PeriodAggregator;

/// Changes within ±5% are reported as stable. Coarser than the
/// step-counting trend classifier and unrelated to it.
pub const DEFAULT_COMPARISON_BAND_PCT: f64 = 5.0;

/// `(current - previous) / previous * 100`; with no previous value, 100 if
/// anything appeared and 0 otherwise.
pub fn percentage_change(current: f64, previous: f64) -> f64 {
    if previous != 0.0 {
        (current - previous) / previous * 100.0
    } else if current > 0.0 {
        100.0
    } else {
        0.0
    }
}

pub fn comparison_trend(change_pct: f64, band_pct: f64) -> ComparisonTrend {
    if change_pct > band_pct {
        ComparisonTrend::Up
    } else if change_pct < -band_pct {
        ComparisonTrend::Down
    } else {
        ComparisonTrend::Stable
    }
}

pub fn compare_metric(current: f64, previous: f64, band_pct: f64) -> MetricComparison {
    let change_pct = percentage_change(current, previous);
    MetricComparison {
        current,
        previous,
        absolute_change: current - previous,
        change_pct,
        trend: comparison_trend(change_pct, band_pct),
    }
}

impl PeriodSummary {
    pub fn new(window: &AnalysisWindow, totals: Totals) -> Self {
        Self {
            start_date: window.start_date(),
            end_date: window.end_date(),
            success_rate: totals.success_rate(),
            totals,
        }
    }
}

/// Compare two summaries metric by metric
pub fn compare_summaries(
    current: PeriodSummary,
    previous: PeriodSummary,
    band_pct: f64,
) -> PeriodComparison {
    let comparison: BTreeMap<Metric, MetricComparison> = Metric::all()
        .into_iter()
        .map(|metric| {
            (
                metric,
                compare_metric(
                    current.totals.metric(metric),
                    previous.totals.metric(metric),
                    band_pct,
                ),
            )
        })
        .collect();

    PeriodComparison {
        current,
        previous,
        comparison,
    }
}

/// Compare `window` against the equal-length range right before it.
///
/// `records` must cover both ranges; anything outside them is ignored.
pub fn compare_periods(
    records: &[TransactionRecord],
    window: &AnalysisWindow,
    aggregator: &PeriodAggregator,
    band_pct: f64,
) -> PeriodComparison {
    let previous_window = window.previous();
    let current = PeriodSummary::new(window, aggregator.totals(records, window));
    let previous = PeriodSummary::new(&previous_window, aggregator.totals(records, &previous_window));
    compare_summaries(current, previous, band_pct)
}
