//! Day-of-week, hour-of-day and month-of-year patterns

use std::collections::BTreeMap;

use chrono::{Datelike, Timelike};
use rust_decimal::Decimal;

use crate::models::analytics::{SeasonalBucket, SeasonalPatterns};
use crate::models::period::AnalysisWindow;
use crate::models::transaction::TransactionRecord;

const DAY_NAMES: [&str; 7] = [
    "Sunday",
    "Monday",
    "Tuesday",
    "Wednesday",
    "Thursday",
    "Friday",
    "Saturday",
];

const MONTH_NAMES: [&str; 12] = [
    "January",
    "February",
    "March",
    "April",
    "May",
    "June",
    "July",
    "August",
    "September",
    "October",
    "November",
    "December",
];

#[derive(Default)]
struct Tally {
    count: u64,
    volume: Decimal,
}

impl Tally {
    fn into_bucket(self, key: u32, label: String) -> SeasonalBucket {
        let avg_amount = if self.count > 0 {
            self.volume / Decimal::from(self.count)
        } else {
            Decimal::ZERO
        };
        SeasonalBucket {
            key,
            label,
            transaction_count: self.count,
            total_volume: self.volume,
            avg_amount,
        }
    }
}

fn group_by<F>(records: &[&TransactionRecord], key_of: F) -> BTreeMap<u32, Tally>
where
    F: Fn(&TransactionRecord) -> u32,
{
    let mut groups: BTreeMap<u32, Tally> = BTreeMap::new();
    for record in records {
        let tally = groups.entry(key_of(record)).or_default();
        tally.count += 1;
        tally.volume += record.amount;
    }
    groups
}

fn day_label(key: u32) -> String {
    DAY_NAMES.get(key as usize).copied().unwrap_or("?").to_string()
}

fn hour_label(key: u32) -> String {
    format!("{:02}:00", key)
}

fn month_label(key: u32) -> String {
    MONTH_NAMES
        .get(key.saturating_sub(1) as usize)
        .copied()
        .unwrap_or("?")
        .to_string()
}

/// Group the records inside `window` by weekday (0 = Sunday), UTC hour and
/// calendar month. Buckets without records are left out.
pub fn seasonal_patterns(records: &[TransactionRecord], window: &AnalysisWindow) -> SeasonalPatterns {
    let in_window: Vec<&TransactionRecord> = records
        .iter()
        .filter(|r| window.contains(&r.timestamp))
        .collect();

    let build = |groups: BTreeMap<u32, Tally>, label: fn(u32) -> String| -> Vec<SeasonalBucket> {
        groups
            .into_iter()
            .map(|(key, tally)| tally.into_bucket(key, label(key)))
            .collect()
    };

    SeasonalPatterns {
        day_of_week: build(
            group_by(&in_window, |r| r.timestamp.weekday().num_days_from_sunday()),
            day_label,
        ),
        hour_of_day: build(group_by(&in_window, |r| r.timestamp.hour()), hour_label),
        month: build(group_by(&in_window, |r| r.timestamp.month()), month_label),
    }
}
