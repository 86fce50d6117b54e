//! Period aggregation: folds raw transactions into fixed-granularity buckets

use std::collections::BTreeMap;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use tracing::debug;

use crate::models::period::{AnalysisWindow, Granularity, PeriodAggregate, PeriodKey, Totals};
use crate::models::transaction::TransactionRecord;

/// Default amount at or above which a transaction counts as high-value
pub const DEFAULT_HIGH_VALUE_THRESHOLD: Decimal = Decimal::from_parts(10_000, 0, 0, false, 0);

pub struct PeriodAggregator {
    high_value_threshold: Decimal,
}

impl PeriodAggregator {
    pub fn new() -> Self {
        Self {
            high_value_threshold: DEFAULT_HIGH_VALUE_THRESHOLD,
        }
    }

    pub fn with_high_value_threshold(high_value_threshold: Decimal) -> Self {
        Self {
            high_value_threshold,
        }
    }

    pub fn high_value_threshold(&self) -> Decimal {
        self.high_value_threshold
    }

    /// Bucket the records that fall inside `window`.
    ///
    /// Returns one aggregate per non-empty bucket, ascending by key.
    pub fn aggregate(
        &self,
        records: &[TransactionRecord],
        window: &AnalysisWindow,
    ) -> Vec<PeriodAggregate> {
        let mut buckets: BTreeMap<PeriodKey, Totals> = BTreeMap::new();
        let mut skipped = 0usize;

        for record in records {
            if !window.contains(&record.timestamp) {
                skipped += 1;
                continue;
            }
            buckets
                .entry(window.period_key(&record.timestamp))
                .or_default()
                .record(record, self.high_value_threshold);
        }

        debug!(
            buckets = buckets.len(),
            skipped,
            granularity = %window.granularity(),
            "aggregated transactions into periods"
        );

        buckets
            .into_iter()
            .map(|(key, totals)| PeriodAggregate::new(key, totals.finish()))
            .collect()
    }

    /// Total over every record inside `window`, regardless of granularity
    pub fn totals(&self, records: &[TransactionRecord], window: &AnalysisWindow) -> Totals {
        records
            .iter()
            .filter(|r| window.contains(&r.timestamp))
            .fold(Totals::default(), |mut acc, r| {
                acc.record(r, self.high_value_threshold);
                acc
            })
            .finish()
    }
}

impl Default for PeriodAggregator {
    fn default() -> Self {
        Self::new()
    }
}

/// Re-key already aggregated buckets at `granularity`, merging buckets that
/// land on the same key. Keys whose start date cannot be resolved are dropped.
///
/// Regrouping at the buckets' own granularity is the identity.
pub fn regroup_periods(periods: &[PeriodAggregate], granularity: Granularity) -> Vec<PeriodAggregate> {
    regroup_by(periods, granularity, |key| key.start_date())
}

/// Keep the buckets that overlap `window` and re-key them at its granularity.
///
/// A bucket that starts before the window is keyed by the window's first
/// day, so a leading partial week or month lands on the same key the raw
/// records in it would.
pub fn regroup_within(periods: &[PeriodAggregate], window: &AnalysisWindow) -> Vec<PeriodAggregate> {
    regroup_by(periods, window.granularity(), |key| {
        if !key.overlaps(window) {
            return None;
        }
        key.start_date().map(|start| start.max(window.start_date()))
    })
}

fn regroup_by<F>(periods: &[PeriodAggregate], granularity: Granularity, anchor: F) -> Vec<PeriodAggregate>
where
    F: Fn(&PeriodKey) -> Option<NaiveDate>,
{
    let mut buckets: BTreeMap<PeriodKey, Totals> = BTreeMap::new();

    for period in periods {
        let Some(date) = anchor(&period.period_key) else {
            continue;
        };
        buckets
            .entry(PeriodKey::for_date(date, granularity))
            .or_default()
            .absorb(&period.totals);
    }

    buckets
        .into_iter()
        .map(|(key, totals)| PeriodAggregate::new(key, totals.finish()))
        .collect()
}

/// Sum a bucket sequence into a single set of totals
pub fn roll_up(periods: &[PeriodAggregate]) -> Totals {
    periods
        .iter()
        .fold(Totals::default(), |mut acc, p| {
            acc.absorb(&p.totals);
            acc
        })
        .finish()
}
