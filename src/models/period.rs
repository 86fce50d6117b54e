//! Time buckets, analysis windows and per-period aggregates

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Datelike, Days, NaiveDate, Utc, Weekday};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde::{de, Deserialize, Deserializer, Serialize, Serializer};

use crate::analytics::error::{InputError, RangeError};
use crate::models::transaction::TransactionRecord;

/// Width of the buckets transactions are folded into
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Granularity {
    Daily,
    Weekly,
    Monthly,
}

impl Granularity {
    pub fn as_str(self) -> &'static str {
        match self {
            Granularity::Daily => "daily",
            Granularity::Weekly => "weekly",
            Granularity::Monthly => "monthly",
        }
    }
}

impl fmt::Display for Granularity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Granularity {
    type Err = RangeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "daily" | "day" => Ok(Granularity::Daily),
            "weekly" | "week" => Ok(Granularity::Weekly),
            "monthly" | "month" => Ok(Granularity::Monthly),
            _ => Err(RangeError::UnknownGranularity {
                value: s.to_string(),
            }),
        }
    }
}

/// Identity of a bucket: a calendar date, an ISO week or a year-month.
///
/// Keys of one granularity order chronologically. Serialized as
/// `2024-03-05`, `2024-W09` or `2024-03`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum PeriodKey {
    Day(NaiveDate),
    Week { year: i32, week: u32 },
    Month { year: i32, month: u32 },
}

impl PeriodKey {
    /// Bucket containing `date` at the given granularity
    pub fn for_date(date: NaiveDate, granularity: Granularity) -> Self {
        match granularity {
            Granularity::Daily => PeriodKey::Day(date),
            Granularity::Weekly => {
                let iso = date.iso_week();
                PeriodKey::Week {
                    year: iso.year(),
                    week: iso.week(),
                }
            }
            Granularity::Monthly => PeriodKey::Month {
                year: date.year(),
                month: date.month(),
            },
        }
    }

    pub fn granularity(&self) -> Granularity {
        match self {
            PeriodKey::Day(_) => Granularity::Daily,
            PeriodKey::Week { .. } => Granularity::Weekly,
            PeriodKey::Month { .. } => Granularity::Monthly,
        }
    }

    /// First calendar day covered by the bucket
    pub fn start_date(&self) -> Option<NaiveDate> {
        match *self {
            PeriodKey::Day(date) => Some(date),
            PeriodKey::Week { year, week } => NaiveDate::from_isoywd_opt(year, week, Weekday::Mon),
            PeriodKey::Month { year, month } => NaiveDate::from_ymd_opt(year, month, 1),
        }
    }

    /// Last calendar day covered by the bucket
    pub fn end_date(&self) -> Option<NaiveDate> {
        match *self {
            PeriodKey::Day(date) => Some(date),
            PeriodKey::Week { year, week } => NaiveDate::from_isoywd_opt(year, week, Weekday::Sun),
            PeriodKey::Month { .. } => self.offset(1)?.start_date()?.pred_opt(),
        }
    }

    /// Whether any day of the bucket falls inside `window`
    pub fn overlaps(&self, window: &AnalysisWindow) -> bool {
        match (self.start_date(), self.end_date()) {
            (Some(start), Some(end)) => start <= window.end_date() && end >= window.start_date(),
            _ => false,
        }
    }

    /// The bucket `steps` periods after this one
    pub fn offset(&self, steps: u32) -> Option<Self> {
        match *self {
            PeriodKey::Day(date) => date.checked_add_days(Days::new(steps as u64)).map(PeriodKey::Day),
            PeriodKey::Week { .. } => {
                let start = self.start_date()?;
                let shifted = start.checked_add_days(Days::new(7 * steps as u64))?;
                Some(PeriodKey::for_date(shifted, Granularity::Weekly))
            }
            PeriodKey::Month { year, month } => {
                let total = year as i64 * 12 + (month as i64 - 1) + steps as i64;
                let year = i32::try_from(total.div_euclid(12)).ok()?;
                let month = (total.rem_euclid(12) + 1) as u32;
                Some(PeriodKey::Month { year, month })
            }
        }
    }
}

impl fmt::Display for PeriodKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PeriodKey::Day(date) => write!(f, "{}", date.format("%Y-%m-%d")),
            PeriodKey::Week { year, week } => write!(f, "{}-W{:02}", year, week),
            PeriodKey::Month { year, month } => write!(f, "{}-{:02}", year, month),
        }
    }
}

impl FromStr for PeriodKey {
    type Err = RangeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || RangeError::InvalidDate {
            value: s.to_string(),
        };

        if let Some((year, week)) = s.split_once("-W") {
            let year: i32 = year.parse().map_err(|_| invalid())?;
            let week: u32 = week.parse().map_err(|_| invalid())?;
            NaiveDate::from_isoywd_opt(year, week, Weekday::Mon).ok_or_else(invalid)?;
            return Ok(PeriodKey::Week { year, week });
        }

        match s.split('-').count() {
            3 => NaiveDate::parse_from_str(s, "%Y-%m-%d")
                .map(PeriodKey::Day)
                .map_err(|_| invalid()),
            2 => {
                let (year, month) = s.split_once('-').ok_or_else(invalid)?;
                let year: i32 = year.parse().map_err(|_| invalid())?;
                let month: u32 = month.parse().map_err(|_| invalid())?;
                NaiveDate::from_ymd_opt(year, month, 1).ok_or_else(invalid)?;
                Ok(PeriodKey::Month { year, month })
            }
            _ => Err(invalid()),
        }
    }
}

impl Serialize for PeriodKey {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for PeriodKey {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(de::Error::custom)
    }
}

/// Validated, inclusive date range plus bucket granularity.
///
/// Only constructible through [`AnalysisWindow::new`] / [`AnalysisWindow::parse`],
/// so everything downstream can assume `start_date <= end_date`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct AnalysisWindow {
    start_date: NaiveDate,
    end_date: NaiveDate,
    granularity: Granularity,
}

impl AnalysisWindow {
    pub fn new(
        start_date: NaiveDate,
        end_date: NaiveDate,
        granularity: Granularity,
        max_days: i64,
    ) -> Result<Self, RangeError> {
        if start_date > end_date {
            return Err(RangeError::Inverted {
                start: start_date,
                end: end_date,
            });
        }

        let days = (end_date - start_date).num_days() + 1;
        if days > max_days {
            return Err(RangeError::TooLong {
                start: start_date,
                end: end_date,
                days,
                max_days,
            });
        }

        Ok(Self {
            start_date,
            end_date,
            granularity,
        })
    }

    /// Build a window from `YYYY-MM-DD` strings and a granularity name
    pub fn parse(
        start_date: &str,
        end_date: &str,
        granularity: &str,
        max_days: i64,
    ) -> Result<Self, RangeError> {
        let start = parse_date(start_date)?;
        let end = parse_date(end_date)?;
        let granularity = granularity.parse()?;
        Self::new(start, end, granularity, max_days)
    }

    pub fn start_date(&self) -> NaiveDate {
        self.start_date
    }

    pub fn end_date(&self) -> NaiveDate {
        self.end_date
    }

    pub fn granularity(&self) -> Granularity {
        self.granularity
    }

    /// Number of calendar days covered, both ends included
    pub fn days(&self) -> i64 {
        (self.end_date - self.start_date).num_days() + 1
    }

    pub fn contains(&self, timestamp: &DateTime<Utc>) -> bool {
        let date = timestamp.date_naive();
        date >= self.start_date && date <= self.end_date
    }

    /// Window of identical length ending the day before `start_date`
    pub fn previous(&self) -> Self {
        let length = Days::new(self.days() as u64);
        let previous_end = self.start_date.pred_opt().unwrap_or(NaiveDate::MIN);
        let previous_start = self
            .start_date
            .checked_sub_days(length)
            .unwrap_or(NaiveDate::MIN);

        Self {
            start_date: previous_start,
            end_date: previous_end,
            granularity: self.granularity,
        }
    }

    pub fn period_key(&self, timestamp: &DateTime<Utc>) -> PeriodKey {
        PeriodKey::for_date(timestamp.date_naive(), self.granularity)
    }
}

fn parse_date(value: &str) -> Result<NaiveDate, RangeError> {
    NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d").map_err(|_| RangeError::InvalidDate {
        value: value.to_string(),
    })
}

/// Numeric per-period metrics that trends, growth and comparison operate on
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Metric {
    TransactionCount,
    TotalVolume,
    AvgAmount,
    TotalFees,
    SuccessRate,
    FailedCount,
    HighValueCount,
    ReversedCount,
}

impl Metric {
    pub fn all() -> Vec<Metric> {
        vec![
            Metric::TransactionCount,
            Metric::TotalVolume,
            Metric::AvgAmount,
            Metric::TotalFees,
            Metric::SuccessRate,
            Metric::FailedCount,
            Metric::HighValueCount,
            Metric::ReversedCount,
        ]
    }

    pub fn name(self) -> &'static str {
        match self {
            Metric::TransactionCount => "transaction_count",
            Metric::TotalVolume => "total_volume",
            Metric::AvgAmount => "avg_amount",
            Metric::TotalFees => "total_fees",
            Metric::SuccessRate => "success_rate",
            Metric::FailedCount => "failed_count",
            Metric::HighValueCount => "high_value_count",
            Metric::ReversedCount => "reversed_count",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Metric::TransactionCount => "Transaction count",
            Metric::TotalVolume => "Transaction volume",
            Metric::AvgAmount => "Average amount",
            Metric::TotalFees => "Fees collected",
            Metric::SuccessRate => "Success rate",
            Metric::FailedCount => "Failed transactions",
            Metric::HighValueCount => "High-value transactions",
            Metric::ReversedCount => "Reversals",
        }
    }
}

impl fmt::Display for Metric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Counts and sums shared by buckets and whole-window summaries
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Totals {
    pub transaction_count: u64,
    pub total_volume: Decimal,
    pub avg_amount: Decimal,
    pub total_fees: Decimal,
    pub successful_count: u64,
    pub failed_count: u64,
    pub high_value_count: u64,
    pub reversed_count: u64,
}

impl Totals {
    /// Fold one transaction in; `avg_amount` is refreshed by [`Totals::finish`]
    pub fn record(&mut self, record: &TransactionRecord, high_value_threshold: Decimal) {
        self.transaction_count += 1;
        self.total_volume += record.amount;
        self.total_fees += record.fee;
        if record.status.is_successful() {
            self.successful_count += 1;
        }
        if record.status.is_failed() {
            self.failed_count += 1;
        }
        if record.amount >= high_value_threshold {
            self.high_value_count += 1;
        }
        if record.is_reversed {
            self.reversed_count += 1;
        }
    }

    /// Add another set of totals, e.g. when rolling buckets up into a window
    pub fn absorb(&mut self, other: &Totals) {
        self.transaction_count += other.transaction_count;
        self.total_volume += other.total_volume;
        self.total_fees += other.total_fees;
        self.successful_count += other.successful_count;
        self.failed_count += other.failed_count;
        self.high_value_count += other.high_value_count;
        self.reversed_count += other.reversed_count;
    }

    pub fn finish(mut self) -> Self {
        self.avg_amount = if self.transaction_count > 0 {
            self.total_volume / Decimal::from(self.transaction_count)
        } else {
            Decimal::ZERO
        };
        self
    }

    /// Share of completed transactions, in percent
    pub fn success_rate(&self) -> f64 {
        if self.transaction_count == 0 {
            return 0.0;
        }
        self.successful_count as f64 / self.transaction_count as f64 * 100.0
    }

    /// Reject totals no set of transactions could produce: negative sums, or
    /// sub-counts larger than `transaction_count`.
    pub fn validate(&self, subject: &dyn Fn() -> String) -> Result<(), InputError> {
        for (field, value) in [
            ("total_volume", self.total_volume),
            ("avg_amount", self.avg_amount),
            ("total_fees", self.total_fees),
        ] {
            if value < Decimal::ZERO {
                return Err(InputError::Negative {
                    subject: subject(),
                    field,
                    value,
                });
            }
        }

        for (field, count) in [
            (
                "successful_count + failed_count",
                self.successful_count.saturating_add(self.failed_count),
            ),
            ("high_value_count", self.high_value_count),
            ("reversed_count", self.reversed_count),
        ] {
            if count > self.transaction_count {
                return Err(InputError::CountExceedsTotal {
                    subject: subject(),
                    field,
                    count,
                    transaction_count: self.transaction_count,
                });
            }
        }
        Ok(())
    }

    pub fn metric(&self, metric: Metric) -> f64 {
        match metric {
            Metric::TransactionCount => self.transaction_count as f64,
            Metric::TotalVolume => decimal_to_f64(self.total_volume),
            Metric::AvgAmount => decimal_to_f64(self.avg_amount),
            Metric::TotalFees => decimal_to_f64(self.total_fees),
            Metric::SuccessRate => self.success_rate(),
            Metric::FailedCount => self.failed_count as f64,
            Metric::HighValueCount => self.high_value_count as f64,
            Metric::ReversedCount => self.reversed_count as f64,
        }
    }
}

/// Totals for one bucket
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PeriodAggregate {
    pub period_key: PeriodKey,
    #[serde(flatten)]
    pub totals: Totals,
}

impl PeriodAggregate {
    pub fn new(period_key: PeriodKey, totals: Totals) -> Self {
        Self { period_key, totals }
    }

    pub fn success_rate(&self) -> f64 {
        self.totals.success_rate()
    }

    pub fn validate(&self) -> Result<(), InputError> {
        self.totals.validate(&|| format!("period {}", self.period_key))
    }

    pub fn metric(&self, metric: Metric) -> f64 {
        self.totals.metric(metric)
    }
}

/// Value series of one metric across a bucket sequence
pub fn metric_series(periods: &[PeriodAggregate], metric: Metric) -> Vec<f64> {
    periods.iter().map(|p| p.metric(metric)).collect()
}

pub fn decimal_to_f64(value: Decimal) -> f64 {
    value.to_f64().unwrap_or(0.0)
}
