//! Result types produced by the analytics engine

use std::collections::BTreeMap;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::models::period::{AnalysisWindow, Metric, PeriodAggregate, PeriodKey, Totals};

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Percentiles {
    pub p25: f64,
    pub p50: f64,
    pub p75: f64,
    pub p90: f64,
    pub p95: f64,
    pub p99: f64,
}

/// Descriptive statistics of a numeric series
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct SeriesStatistics {
    pub count: usize,
    pub mean: f64,
    pub std_dev: f64,
    pub min: f64,
    pub max: f64,
    pub percentiles: Percentiles,
}

impl SeriesStatistics {
    /// All-zero bundle returned for empty input
    pub fn zero() -> Self {
        Self::default()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TrendResult {
    Upward,
    Downward,
    Stable,
    InsufficientData,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GrowthRateResult {
    pub start_value: f64,
    pub end_value: f64,
    pub total_change: f64,
    /// Compound per-period growth, in percent
    pub growth_rate: f64,
    pub periods: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastPoint {
    /// 1-based distance from the last observed period
    pub step: u32,
    /// Regression x value (observed periods are 1..=n)
    pub period: usize,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub period_key: Option<PeriodKey>,
    pub projected_volume: f64,
    pub confidence: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastResult {
    pub slope: f64,
    pub intercept: f64,
    pub r_squared: f64,
    pub points: Vec<ForecastPoint>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum Forecast {
    InsufficientData { periods: usize, required: usize },
    Projected(ForecastResult),
}

impl Forecast {
    pub fn result(&self) -> Option<&ForecastResult> {
        match self {
            Forecast::Projected(result) => Some(result),
            Forecast::InsufficientData { .. } => None,
        }
    }
}

/// One seasonal bucket (a weekday, an hour or a month)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeasonalBucket {
    pub key: u32,
    pub label: String,
    pub transaction_count: u64,
    pub total_volume: Decimal,
    pub avg_amount: Decimal,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct SeasonalPatterns {
    /// 0 = Sunday .. 6 = Saturday
    pub day_of_week: Vec<SeasonalBucket>,
    pub hour_of_day: Vec<SeasonalBucket>,
    pub month: Vec<SeasonalBucket>,
}

/// Totals over a whole date range
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PeriodSummary {
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    #[serde(flatten)]
    pub totals: Totals,
    pub success_rate: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ComparisonTrend {
    Up,
    Down,
    Stable,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MetricComparison {
    pub current: f64,
    pub previous: f64,
    pub absolute_change: f64,
    pub change_pct: f64,
    pub trend: ComparisonTrend,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PeriodComparison {
    pub current: PeriodSummary,
    pub previous: PeriodSummary,
    pub comparison: BTreeMap<Metric, MetricComparison>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InsightType {
    Positive,
    Warning,
    Info,
    Neutral,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Insight {
    #[serde(rename = "type")]
    pub kind: InsightType,
    pub title: String,
    pub description: String,
}

impl Insight {
    pub fn new(kind: InsightType, title: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            kind,
            title: title.into(),
            description: description.into(),
        }
    }
}

/// Everything computed for one analysis request
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnalyticsReport {
    pub window: AnalysisWindow,
    pub period_series: Vec<PeriodAggregate>,
    /// Per-transaction amounts (per-period volumes for pre-aggregated input)
    pub statistics: SeriesStatistics,
    pub period_volume_statistics: SeriesStatistics,
    pub trends: BTreeMap<Metric, TrendResult>,
    /// Window size -> trailing average of the per-period volume
    pub moving_averages: BTreeMap<usize, Vec<f64>>,
    pub volatility: f64,
    /// Pearson r between per-period count and volume
    pub correlation: f64,
    pub growth_rates: BTreeMap<Metric, GrowthRateResult>,
    pub forecast: Forecast,
    pub seasonal: SeasonalPatterns,
    pub period_comparison: PeriodComparison,
    pub insights: Vec<Insight>,
}
