//! Analytics pipeline for a single request.
//!
//! Aggregation runs first; every later stage reads the resulting bucket
//! sequence (seasonality reads the raw records) and nothing is shared
//! between requests.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Instant;

use tracing::{debug, info};

use crate::analytics::{
    aggregator::{regroup_within, roll_up, PeriodAggregator},
    comparison::{compare_periods, compare_summaries},
    correlation::{pearson_correlation, volatility},
    error::{AnalyticsError, AnalyticsResult, RangeError},
    forecast::forecast_volume,
    growth::growth_rates,
    moving_average::moving_averages,
    seasonal::seasonal_patterns,
    statistics::{describe, window_amounts},
    trend::classify_trend,
};
use crate::config::AnalyticsConfig;
use crate::insights::InsightGenerator;
use crate::models::analytics::{
    AnalyticsReport, PeriodComparison, PeriodSummary, SeasonalPatterns, SeriesStatistics,
};
use crate::models::period::{metric_series, AnalysisWindow, Metric, PeriodAggregate};
use crate::models::transaction::TransactionRecord;

/// Metrics that get a trend classification and a growth rate
pub const TRACKED_METRICS: [Metric; 4] = [
    Metric::TransactionCount,
    Metric::TotalVolume,
    Metric::AvgAmount,
    Metric::SuccessRate,
];

/// Caller-supplied deadline and/or cancellation flag, checked before the
/// forecast and seasonality stages.
#[derive(Debug, Clone, Default)]
pub struct AbortSignal {
    deadline: Option<Instant>,
    cancelled: Option<Arc<AtomicBool>>,
}

impl AbortSignal {
    pub fn none() -> Self {
        Self::default()
    }

    pub fn with_deadline(mut self, deadline: Instant) -> Self {
        self.deadline = Some(deadline);
        self
    }

    pub fn with_cancel_flag(mut self, flag: Arc<AtomicBool>) -> Self {
        self.cancelled = Some(flag);
        self
    }

    pub fn is_triggered(&self) -> bool {
        let cancelled = self
            .cancelled
            .as_ref()
            .is_some_and(|flag| flag.load(Ordering::Relaxed));
        let expired = self.deadline.is_some_and(|deadline| Instant::now() >= deadline);
        cancelled || expired
    }

    pub fn check(&self, stage: &'static str) -> AnalyticsResult<()> {
        if self.is_triggered() {
            return Err(AnalyticsError::Aborted { stage });
        }
        Ok(())
    }
}

/// Input rows for [`AnalyticsEngine::analyze_aggregates`]
pub struct PreAggregated<'a> {
    pub periods: &'a [PeriodAggregate],
    /// Buckets of the preceding equal-length range, when available
    pub previous: Option<&'a [PeriodAggregate]>,
}

pub struct AnalyticsEngine {
    config: AnalyticsConfig,
    aggregator: PeriodAggregator,
    insights: InsightGenerator,
}

impl AnalyticsEngine {
    pub fn new(config: AnalyticsConfig) -> Self {
        let aggregator = PeriodAggregator::with_high_value_threshold(config.high_value_threshold);
        let insights = InsightGenerator::new(config.insights);
        Self {
            config,
            aggregator,
            insights,
        }
    }

    pub fn config(&self) -> &AnalyticsConfig {
        &self.config
    }

    /// Validate a window against this engine's range cap
    pub fn window(
        &self,
        start_date: &str,
        end_date: &str,
        granularity: &str,
    ) -> Result<AnalysisWindow, RangeError> {
        AnalysisWindow::parse(start_date, end_date, granularity, self.config.max_range_days)
    }

    /// Full report from raw transactions.
    ///
    /// `records` should cover both `window` and the equal-length range before
    /// it so the period comparison has a baseline.
    pub fn analyze(
        &self,
        records: &[TransactionRecord],
        window: &AnalysisWindow,
        abort: &AbortSignal,
    ) -> AnalyticsResult<AnalyticsReport> {
        let started = Instant::now();

        records.iter().try_for_each(TransactionRecord::validate)?;
        let periods = self.aggregator.aggregate(records, window);
        let statistics = describe(&window_amounts(records, window));

        let report = self.build_report(
            window,
            periods,
            statistics,
            abort,
            || seasonal_patterns(records, window),
            || compare_periods(records, window, &self.aggregator, self.config.comparison_band_pct),
        )?;

        info!(
            records = records.len(),
            periods = report.period_series.len(),
            insights = report.insights.len(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "analytics report computed"
        );
        Ok(report)
    }

    /// Report from buckets aggregated upstream.
    ///
    /// Every row is checked before use. Rows whose bucket overlaps the window
    /// are regrouped at the window's granularity and the rest are dropped.
    /// There are no timestamps, so the seasonal section stays empty and
    /// `statistics` describes the per-period volumes.
    pub fn analyze_aggregates(
        &self,
        input: PreAggregated<'_>,
        window: &AnalysisWindow,
        abort: &AbortSignal,
    ) -> AnalyticsResult<AnalyticsReport> {
        let started = Instant::now();

        input
            .periods
            .iter()
            .chain(input.previous.unwrap_or_default())
            .try_for_each(PeriodAggregate::validate)?;

        let periods = regroup_within(input.periods, window);
        let statistics = describe(&metric_series(&periods, Metric::TotalVolume));

        let previous_window = window.previous();
        let previous_totals = input
            .previous
            .map(|rows| roll_up(&regroup_within(rows, &previous_window)))
            .unwrap_or_default();
        let current_totals = roll_up(&periods);

        let report = self.build_report(
            window,
            periods,
            statistics,
            abort,
            SeasonalPatterns::default,
            || {
                compare_summaries(
                    PeriodSummary::new(window, current_totals),
                    PeriodSummary::new(&previous_window, previous_totals),
                    self.config.comparison_band_pct,
                )
            },
        )?;

        info!(
            periods = report.period_series.len(),
            insights = report.insights.len(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "analytics report computed from aggregates"
        );
        Ok(report)
    }

    fn build_report<S, C>(
        &self,
        window: &AnalysisWindow,
        periods: Vec<PeriodAggregate>,
        statistics: SeriesStatistics,
        abort: &AbortSignal,
        seasonal: S,
        comparison: C,
    ) -> AnalyticsResult<AnalyticsReport>
    where
        S: FnOnce() -> SeasonalPatterns,
        C: FnOnce() -> PeriodComparison,
    {
        let volumes = metric_series(&periods, Metric::TotalVolume);
        let counts = metric_series(&periods, Metric::TransactionCount);

        let trends = TRACKED_METRICS
            .iter()
            .map(|&metric| (metric, classify_trend(&metric_series(&periods, metric))))
            .collect();
        debug!(periods = periods.len(), "descriptive statistics and trends done");

        let moving_averages = moving_averages(&volumes, &self.config.moving_average_windows);
        let volatility = volatility(&volumes);
        let correlation = pearson_correlation(&counts, &volumes);
        let growth_rates = growth_rates(&periods, &TRACKED_METRICS);

        abort.check("forecast")?;
        let forecast = forecast_volume(
            &volumes,
            self.config.forecast_horizon,
            periods.last().map(|p| p.period_key),
        );

        abort.check("seasonal")?;
        let seasonal = seasonal();
        let period_comparison = comparison();

        let mut report = AnalyticsReport {
            window: *window,
            period_volume_statistics: describe(&volumes),
            period_series: periods,
            statistics,
            trends,
            moving_averages,
            volatility,
            correlation,
            growth_rates,
            forecast,
            seasonal,
            period_comparison,
            insights: Vec::new(),
        };
        report.insights = self.insights.generate(&report);

        Ok(report)
    }
}

impl Default for AnalyticsEngine {
    fn default() -> Self {
        Self::new(AnalyticsConfig::default())
    }
}
