//! Unit tests for the previous-period comparison

use chrono::{DateTime, TimeZone, Utc};
use rust_decimal::Decimal;
use txanalytics::analytics::{
    compare_metric, compare_periods, comparison_trend, percentage_change, PeriodAggregator,
    DEFAULT_COMPARISON_BAND_PCT,
};
use txanalytics::models::{
    AnalysisWindow, ComparisonTrend, Metric, TransactionRecord, TransactionStatus,
};

fn approx(a: f64, b: f64) -> bool {
    (a - b).abs() < 1e-9
}

fn at(d: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 3, d, 12, 0, 0).unwrap()
}

fn completed(d: u32, amount: i64) -> TransactionRecord {
    TransactionRecord::new(at(d), Decimal::from(amount), TransactionStatus::Completed, "USD")
}

#[test]
fn test_percentage_change() {
    assert!(approx(percentage_change(150.0, 100.0), 50.0));
    assert!(approx(percentage_change(50.0, 100.0), -50.0));
    assert_eq!(percentage_change(10.0, 0.0), 100.0);
    assert_eq!(percentage_change(0.0, 0.0), 0.0);
}

#[test]
fn test_trend_band_is_five_percent() {
    assert_eq!(comparison_trend(50.0, DEFAULT_COMPARISON_BAND_PCT), ComparisonTrend::Up);
    assert_eq!(comparison_trend(5.0, DEFAULT_COMPARISON_BAND_PCT), ComparisonTrend::Stable);
    assert_eq!(comparison_trend(-5.0, DEFAULT_COMPARISON_BAND_PCT), ComparisonTrend::Stable);
    assert_eq!(comparison_trend(-5.1, DEFAULT_COMPARISON_BAND_PCT), ComparisonTrend::Down);
}

#[test]
fn test_compare_metric_reports_both_deltas() {
    let comparison = compare_metric(150.0, 100.0, DEFAULT_COMPARISON_BAND_PCT);
    assert!(approx(comparison.change_pct, 50.0));
    assert_eq!(comparison.absolute_change, 50.0);
    assert_eq!(comparison.trend, ComparisonTrend::Up);
}

#[test]
fn test_compare_against_preceding_range() {
    let records = vec![
        completed(2, 60),
        completed(9, 40),
        completed(12, 100),
        completed(20, 50),
        completed(25, 1000),
    ];
    let window = AnalysisWindow::parse("2024-03-11", "2024-03-20", "daily", 366).unwrap();
    let result = compare_periods(
        &records,
        &window,
        &PeriodAggregator::new(),
        DEFAULT_COMPARISON_BAND_PCT,
    );

    assert_eq!(result.previous.start_date.to_string(), "2024-03-01");
    assert_eq!(result.previous.end_date.to_string(), "2024-03-10");

    let volume = &result.comparison[&Metric::TotalVolume];
    assert_eq!(volume.current, 150.0);
    assert_eq!(volume.previous, 100.0);
    assert!(approx(volume.change_pct, 50.0));
    assert_eq!(volume.trend, ComparisonTrend::Up);

    let count = &result.comparison[&Metric::TransactionCount];
    assert_eq!(count.change_pct, 0.0);
    assert_eq!(count.trend, ComparisonTrend::Stable);

    assert_eq!(result.current.success_rate, 100.0);
}
