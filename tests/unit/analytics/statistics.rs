//! Unit tests for descriptive statistics

use txanalytics::analytics::describe;
use txanalytics::models::SeriesStatistics;

fn approx(a: f64, b: f64) -> bool {
    (a - b).abs() < 1e-9
}

#[test]
fn test_empty_series_returns_zero_bundle() {
    assert_eq!(describe(&[]), SeriesStatistics::zero());
}

#[test]
fn test_mean_matches_sum_over_len() {
    let series = [12.5, 300.0, 7.25, 99.0, 0.0, 1234.56];
    let stats = describe(&series);
    let expected = series.iter().sum::<f64>() / series.len() as f64;
    assert!(approx(stats.mean, expected));
    assert_eq!(stats.count, 6);
}

#[test]
fn test_population_standard_deviation_and_extremes() {
    let stats = describe(&[4.0, 1.0, 3.0, 2.0]);
    assert!(approx(stats.std_dev, 1.25_f64.sqrt()));
    assert_eq!(stats.min, 1.0);
    assert_eq!(stats.max, 4.0);
}

#[test]
fn test_percentiles_use_linear_interpolation() {
    let stats = describe(&[4.0, 1.0, 3.0, 2.0]);
    assert!(approx(stats.percentiles.p25, 1.75));
    assert!(approx(stats.percentiles.p50, 2.5));
    assert!(approx(stats.percentiles.p75, 3.25));
    assert!(approx(stats.percentiles.p90, 3.7));
    assert!(approx(stats.percentiles.p99, 3.97));
}

#[test]
fn test_single_value_series() {
    let stats = describe(&[42.0]);
    assert_eq!(stats.mean, 42.0);
    assert_eq!(stats.std_dev, 0.0);
    assert_eq!(stats.percentiles.p95, 42.0);
}
