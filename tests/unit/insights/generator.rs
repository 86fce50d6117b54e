//! Unit tests for insight generation

use chrono::{TimeZone, Utc};
use rust_decimal::Decimal;
use txanalytics::insights::{InsightGenerator, InsightThresholds};
use txanalytics::models::{AnalysisWindow, Insight, InsightType, TransactionRecord, TransactionStatus};
use txanalytics::{AbortSignal, AnalyticsEngine};

fn record(month: u32, day: u32, amount: i64, status: TransactionStatus) -> TransactionRecord {
    TransactionRecord::new(
        Utc.with_ymd_and_hms(2024, month, day, 12, 0, 0).unwrap(),
        Decimal::from(amount),
        status,
        "USD",
    )
}

fn window() -> AnalysisWindow {
    AnalysisWindow::parse("2024-03-01", "2024-03-10", "daily", 366).unwrap()
}

fn insights_for(records: &[TransactionRecord]) -> Vec<Insight> {
    AnalyticsEngine::default()
        .analyze(records, &window(), &AbortSignal::none())
        .unwrap()
        .insights
}

fn find<'a>(insights: &'a [Insight], title: &str) -> Option<&'a Insight> {
    insights.iter().find(|i| i.title == title)
}

#[test]
fn test_growing_healthy_window() {
    let mut records: Vec<TransactionRecord> = (1..=10)
        .map(|d| record(3, d, 100 * d as i64, TransactionStatus::Completed))
        .collect();
    records.extend((20..=29).map(|d| record(2, d, 10, TransactionStatus::Completed)));

    let insights = insights_for(&records);

    assert_eq!(find(&insights, "Volume trending up").unwrap().kind, InsightType::Positive);
    assert_eq!(find(&insights, "Healthy success rate").unwrap().kind, InsightType::Positive);
    assert_eq!(
        find(&insights, "Volume up on previous period").unwrap().kind,
        InsightType::Positive
    );
    assert!(find(&insights, "Strong correlation").is_none());
}

#[test]
fn test_volatile_failing_window() {
    let mut records = Vec::new();
    for d in 1..=6 {
        let amount = if d % 2 == 0 { 1000 } else { 10 };
        records.push(record(3, d, amount, TransactionStatus::Completed));
        let status = if d % 2 == 0 {
            TransactionStatus::Failed
        } else {
            TransactionStatus::Completed
        };
        records.push(record(3, d, amount, status));
    }

    let insights = insights_for(&records);

    assert_eq!(find(&insights, "High volatility").unwrap().kind, InsightType::Warning);
    assert_eq!(find(&insights, "Low success rate").unwrap().kind, InsightType::Warning);
    assert_eq!(find(&insights, "Volume stable").unwrap().kind, InsightType::Neutral);
}

#[test]
fn test_strong_correlation_is_informational() {
    let mut records = Vec::new();
    for d in 1..=5 {
        for _ in 0..d {
            records.push(record(3, d, 100, TransactionStatus::Completed));
        }
    }

    let insights = insights_for(&records);
    let correlation = find(&insights, "Strong correlation").unwrap();
    assert_eq!(correlation.kind, InsightType::Info);
    assert!(correlation.description.contains("positive"));
}

#[test]
fn test_short_window_reports_insufficient_data() {
    let records = vec![
        record(3, 1, 100, TransactionStatus::Completed),
        record(3, 2, 100, TransactionStatus::Completed),
    ];
    let insights = insights_for(&records);
    assert_eq!(find(&insights, "Not enough data").unwrap().kind, InsightType::Info);
}

#[test]
fn test_empty_window_has_no_success_rate_insight() {
    let insights = insights_for(&[]);
    assert!(find(&insights, "Healthy success rate").is_none());
    assert!(find(&insights, "Low success rate").is_none());
}

#[test]
fn test_custom_thresholds() {
    let thresholds = InsightThresholds {
        high_volatility: 10.0,
        ..InsightThresholds::default()
    };
    let generator = InsightGenerator::new(thresholds);
    assert_eq!(generator.thresholds().high_volatility, 10.0);
    assert_eq!(InsightThresholds::default().healthy_success_rate, 95.0);
}
