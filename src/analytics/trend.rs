//! Direction classification of a numeric series

use crate::models::analytics::TrendResult;

pub const MIN_TREND_POINTS: usize = 3;

/// Increases must outnumber decreases by this factor (and vice versa) before
/// a direction is called; keeps noisy, near-balanced series `Stable`.
pub const TREND_DOMINANCE: f64 = 1.5;

/// Classify a series by counting strict step-ups against strict step-downs.
/// Equal neighbours count as neither.
pub fn classify_trend(values: &[f64]) -> TrendResult {
    if values.len() < MIN_TREND_POINTS {
        return TrendResult::InsufficientData;
    }

    let (increases, decreases) = values.windows(2).fold((0usize, 0usize), |(up, down), pair| {
        if pair[1] > pair[0] {
            (up + 1, down)
        } else if pair[1] < pair[0] {
            (up, down + 1)
        } else {
            (up, down)
        }
    });

    let increases = increases as f64;
    let decreases = decreases as f64;

    if increases > decreases * TREND_DOMINANCE {
        TrendResult::Upward
    } else if decreases > increases * TREND_DOMINANCE {
        TrendResult::Downward
    } else {
        TrendResult::Stable
    }
}
