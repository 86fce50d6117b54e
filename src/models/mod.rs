//! Shared data models spanning the engine layers.

pub mod analytics;
pub mod period;
pub mod transaction;

pub use analytics::{
    AnalyticsReport, ComparisonTrend, Forecast, ForecastPoint, ForecastResult, GrowthRateResult,
    Insight, InsightType, MetricComparison, PeriodComparison, PeriodSummary, Percentiles,
    SeasonalBucket, SeasonalPatterns, SeriesStatistics, TrendResult,
};
pub use period::{
    metric_series, AnalysisWindow, Granularity, Metric, PeriodAggregate, PeriodKey, Totals,
};
pub use transaction::{TransactionRecord, TransactionStatus};
