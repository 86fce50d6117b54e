//! Unit tests for the linear regression forecast

use chrono::NaiveDate;
use txanalytics::analytics::{forecast_volume, linear_regression, step_confidence};
use txanalytics::models::{Forecast, PeriodKey};

fn approx(a: f64, b: f64) -> bool {
    (a - b).abs() < 1e-9
}

#[test]
fn test_perfectly_linear_series() {
    let forecast = forecast_volume(&[10.0, 20.0, 30.0, 40.0, 50.0], 7, None);
    let result = forecast.result().expect("projected forecast");

    assert!(approx(result.slope, 10.0));
    assert!(approx(result.intercept, 0.0));
    assert!(approx(result.r_squared, 1.0));
    assert_eq!(result.points.len(), 7);

    let first = &result.points[0];
    assert_eq!(first.step, 1);
    assert_eq!(first.period, 6);
    assert!(approx(first.projected_volume, 60.0));
    assert!(approx(first.confidence, 0.9));
    assert!(first.period_key.is_none());
}

#[test]
fn test_confidence_strictly_decreases() {
    let forecast = forecast_volume(&[5.0, 7.0, 6.0, 9.0], 7, None);
    let points = &forecast.result().unwrap().points;
    for pair in points.windows(2) {
        assert!(pair[1].confidence < pair[0].confidence);
    }
    assert!(approx(points[6].confidence, 0.3));
}

#[test]
fn test_confidence_floors_at_zero() {
    assert!(step_confidence(10).abs() < 1e-9);
    assert_eq!(step_confidence(12), 0.0);
}

#[test]
fn test_projection_clamped_at_zero() {
    let forecast = forecast_volume(&[50.0, 40.0, 30.0, 20.0, 10.0], 3, None);
    let result = forecast.result().unwrap();
    assert!(approx(result.slope, -10.0));
    assert!(result.points.iter().all(|p| p.projected_volume >= 0.0));
    assert_eq!(result.points[2].projected_volume, 0.0);
}

#[test]
fn test_flat_series_has_zero_r_squared() {
    let fit = linear_regression(&[7.0, 7.0, 7.0]).unwrap();
    assert!(approx(fit.slope, 0.0));
    assert_eq!(fit.r_squared, 0.0);
}

#[test]
fn test_insufficient_history() {
    assert_eq!(
        forecast_volume(&[1.0, 2.0], 7, None),
        Forecast::InsufficientData {
            periods: 2,
            required: 3
        }
    );
}

#[test]
fn test_points_carry_future_period_keys() {
    let last = PeriodKey::Day(NaiveDate::from_ymd_opt(2024, 2, 28).unwrap());
    let forecast = forecast_volume(&[1.0, 2.0, 3.0], 2, Some(last));
    let points = &forecast.result().unwrap().points;
    assert_eq!(points[0].period_key.unwrap().to_string(), "2024-02-29");
    assert_eq!(points[1].period_key.unwrap().to_string(), "2024-03-01");
}
