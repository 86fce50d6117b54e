//! Unit tests for period aggregation

use chrono::{DateTime, TimeZone, Utc};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use txanalytics::analytics::{regroup_periods, regroup_within, roll_up, PeriodAggregator};
use txanalytics::models::{
    AnalysisWindow, Granularity, PeriodKey, TransactionRecord, TransactionStatus,
};

fn at(y: i32, m: u32, d: u32, h: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(y, m, d, h, 0, 0).unwrap()
}

fn record(ts: DateTime<Utc>, amount: Decimal, status: TransactionStatus) -> TransactionRecord {
    TransactionRecord::new(ts, amount, status, "USD")
}

fn sample_records() -> Vec<TransactionRecord> {
    vec![
        record(at(2024, 2, 28, 9), dec!(999), TransactionStatus::Completed),
        record(at(2024, 3, 1, 9), dec!(100), TransactionStatus::Completed).with_fee(dec!(1.5)),
        record(at(2024, 3, 1, 17), dec!(15000), TransactionStatus::Failed).with_fee(dec!(2)),
        record(at(2024, 3, 3, 12), dec!(50), TransactionStatus::Pending).reversed(),
        record(at(2024, 3, 4, 8), dec!(10000), TransactionStatus::Completed),
    ]
}

fn window(granularity: &str) -> AnalysisWindow {
    AnalysisWindow::parse("2024-03-01", "2024-03-10", granularity, 366).unwrap()
}

#[test]
fn test_empty_input_yields_no_periods() {
    let periods = PeriodAggregator::new().aggregate(&[], &window("daily"));
    assert!(periods.is_empty());
}

#[test]
fn test_daily_buckets_exclude_records_outside_window() {
    let periods = PeriodAggregator::new().aggregate(&sample_records(), &window("daily"));
    let keys: Vec<String> = periods.iter().map(|p| p.period_key.to_string()).collect();
    assert_eq!(keys, vec!["2024-03-01", "2024-03-03", "2024-03-04"]);

    let first = &periods[0].totals;
    assert_eq!(first.transaction_count, 2);
    assert_eq!(first.total_volume, dec!(15100));
    assert_eq!(first.avg_amount, dec!(7550));
    assert_eq!(first.total_fees, dec!(3.5));
    assert_eq!(first.successful_count, 1);
    assert_eq!(first.failed_count, 1);
    assert_eq!(first.high_value_count, 1);
    assert_eq!(first.reversed_count, 0);

    let second = &periods[1].totals;
    assert_eq!(second.successful_count + second.failed_count, 0);
    assert_eq!(second.reversed_count, 1);
}

#[test]
fn test_high_value_threshold_is_inclusive_and_configurable() {
    let periods = PeriodAggregator::new().aggregate(&sample_records(), &window("daily"));
    assert_eq!(periods[2].totals.high_value_count, 1);

    let strict = PeriodAggregator::with_high_value_threshold(dec!(20000));
    let periods = strict.aggregate(&sample_records(), &window("daily"));
    assert!(periods.iter().all(|p| p.totals.high_value_count == 0));
}

#[test]
fn test_weekly_buckets_use_iso_weeks() {
    let periods = PeriodAggregator::new().aggregate(&sample_records(), &window("weekly"));
    assert_eq!(periods.len(), 2);
    assert_eq!(periods[0].period_key, PeriodKey::Week { year: 2024, week: 9 });
    assert_eq!(periods[0].totals.transaction_count, 3);
    assert_eq!(periods[1].period_key, PeriodKey::Week { year: 2024, week: 10 });
}

#[test]
fn test_monthly_bucket() {
    let periods = PeriodAggregator::new().aggregate(&sample_records(), &window("monthly"));
    assert_eq!(periods.len(), 1);
    assert_eq!(periods[0].period_key.to_string(), "2024-03");
    assert_eq!(periods[0].totals.transaction_count, 4);
    assert!(periods[0].totals.successful_count + periods[0].totals.failed_count <= 4);
}

#[test]
fn test_unordered_input_produces_sorted_periods() {
    let mut records = sample_records();
    records.reverse();
    let periods = PeriodAggregator::new().aggregate(&records, &window("daily"));
    let keys: Vec<PeriodKey> = periods.iter().map(|p| p.period_key).collect();
    let mut sorted = keys.clone();
    sorted.sort();
    assert_eq!(keys, sorted);
}

#[test]
fn test_aggregation_is_idempotent() {
    let aggregator = PeriodAggregator::new();
    let records = sample_records();
    let first = aggregator.aggregate(&records, &window("daily"));
    let second = aggregator.aggregate(&records, &window("daily"));
    assert_eq!(first, second);
    assert_eq!(
        serde_json::to_vec(&first).unwrap(),
        serde_json::to_vec(&second).unwrap()
    );
}

#[test]
fn test_regrouping_own_output_keeps_key_order() {
    let periods = PeriodAggregator::new().aggregate(&sample_records(), &window("daily"));
    let regrouped = regroup_periods(&periods, Granularity::Daily);
    assert_eq!(regrouped, periods);
}

#[test]
fn test_regrouping_daily_into_weekly_matches_direct_weekly() {
    let aggregator = PeriodAggregator::new();
    let daily = aggregator.aggregate(&sample_records(), &window("daily"));
    let weekly = aggregator.aggregate(&sample_records(), &window("weekly"));
    assert_eq!(regroup_periods(&daily, Granularity::Weekly), weekly);
}

#[test]
fn test_roll_up_matches_window_totals() {
    let aggregator = PeriodAggregator::new();
    let records = sample_records();
    let periods = aggregator.aggregate(&records, &window("daily"));
    assert_eq!(roll_up(&periods), aggregator.totals(&records, &window("daily")));
}

#[test]
fn test_regroup_within_keeps_buckets_starting_before_window() {
    let aggregator = PeriodAggregator::new();
    let mid_week = AnalysisWindow::parse("2024-03-03", "2024-03-10", "weekly", 366).unwrap();
    let weekly = aggregator.aggregate(&sample_records(), &mid_week);
    assert_eq!(weekly[0].period_key, PeriodKey::Week { year: 2024, week: 9 });
    assert_eq!(regroup_within(&weekly, &mid_week), weekly);

    let mid_month = AnalysisWindow::parse("2024-03-03", "2024-03-10", "monthly", 366).unwrap();
    let monthly = aggregator.aggregate(&sample_records(), &mid_month);
    assert_eq!(regroup_within(&monthly, &mid_month), monthly);
}

#[test]
fn test_regroup_within_drops_buckets_outside_window() {
    let periods = PeriodAggregator::new().aggregate(&sample_records(), &window("weekly"));
    let later = AnalysisWindow::parse("2024-03-11", "2024-03-20", "weekly", 366).unwrap();
    assert!(regroup_within(&periods, &later).is_empty());
}
