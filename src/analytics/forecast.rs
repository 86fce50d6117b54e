//! Ordinary least-squares volume forecast

use tracing::debug;

use crate::common::math;
use crate::models::analytics::{Forecast, ForecastPoint, ForecastResult};
use crate::models::period::PeriodKey;

pub const MIN_FORECAST_PERIODS: usize = 3;
pub const DEFAULT_HORIZON: u32 = 7;

/// Confidence lost per projected step
pub const CONFIDENCE_DECAY: f64 = 0.1;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LinearFit {
    pub slope: f64,
    pub intercept: f64,
    pub r_squared: f64,
}

impl LinearFit {
    pub fn predict(&self, x: f64) -> f64 {
        self.slope * x + self.intercept
    }
}

/// Fit `y = slope * x + intercept` with `x = 1..=n`.
///
/// `None` when fewer than two points are given. `r_squared` is 0 for a flat
/// series.
pub fn linear_regression(values: &[f64]) -> Option<LinearFit> {
    if values.len() < 2 {
        return None;
    }

    let n = values.len() as f64;
    let (mut sum_x, mut sum_y, mut sum_xy, mut sum_xx) = (0.0, 0.0, 0.0, 0.0);
    for (i, y) in values.iter().enumerate() {
        let x = (i + 1) as f64;
        sum_x += x;
        sum_y += y;
        sum_xy += x * y;
        sum_xx += x * x;
    }

    let slope = math::safe_div(n * sum_xy - sum_x * sum_y, n * sum_xx - sum_x * sum_x);
    let intercept = (sum_y - slope * sum_x) / n;

    let mean_y = sum_y / n;
    let (mut ss_res, mut ss_tot) = (0.0, 0.0);
    for (i, y) in values.iter().enumerate() {
        let predicted = slope * (i + 1) as f64 + intercept;
        ss_res += (y - predicted).powi(2);
        ss_tot += (y - mean_y).powi(2);
    }
    let r_squared = if ss_tot == 0.0 { 0.0 } else { 1.0 - ss_res / ss_tot };

    Some(LinearFit {
        slope,
        intercept,
        r_squared,
    })
}

/// Confidence attached to the projection `step` periods ahead
pub fn step_confidence(step: u32) -> f64 {
    (1.0 - step as f64 * CONFIDENCE_DECAY).max(0.0)
}

/// Project the volume series `horizon` periods ahead.
///
/// `last_key` is the key of the final observed bucket; when given, each
/// projected point carries the key of its future bucket.
pub fn forecast_volume(values: &[f64], horizon: u32, last_key: Option<PeriodKey>) -> Forecast {
    if values.len() < MIN_FORECAST_PERIODS {
        return Forecast::InsufficientData {
            periods: values.len(),
            required: MIN_FORECAST_PERIODS,
        };
    }

    let Some(fit) = linear_regression(values) else {
        return Forecast::InsufficientData {
            periods: values.len(),
            required: MIN_FORECAST_PERIODS,
        };
    };

    let n = values.len();
    let points = (1..=horizon)
        .map(|step| {
            let period = n + step as usize;
            ForecastPoint {
                step,
                period,
                period_key: last_key.and_then(|key| key.offset(step)),
                projected_volume: fit.predict(period as f64).max(0.0),
                confidence: step_confidence(step),
            }
        })
        .collect();

    debug!(
        slope = fit.slope,
        r_squared = fit.r_squared,
        horizon,
        "volume forecast computed"
    );

    Forecast::Projected(ForecastResult {
        slope: fit.slope,
        intercept: fit.intercept,
        r_squared: fit.r_squared,
        points,
    })
}
