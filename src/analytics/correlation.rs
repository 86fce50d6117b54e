//! Volatility (coefficient of variation) and Pearson correlation

use crate::common::math;

/// `stddev / mean` of the series, 0 when the mean is not positive
pub fn volatility(values: &[f64]) -> f64 {
    let mean = math::mean(values);
    if mean <= 0.0 {
        return 0.0;
    }
    math::safe_div(math::population_std_dev(values), mean)
}

/// Pearson's r over the first `min(x.len(), y.len())` points.
///
/// Returns 0 with fewer than two paired points or when either side has no
/// variance.
pub fn pearson_correlation(x: &[f64], y: &[f64]) -> f64 {
    let n = x.len().min(y.len());
    if n < 2 {
        return 0.0;
    }

    let (x, y) = (&x[..n], &y[..n]);
    let mean_x = math::mean(x);
    let mean_y = math::mean(y);

    let mut covariance = 0.0;
    let mut spread_x = 0.0;
    let mut spread_y = 0.0;
    for (a, b) in x.iter().zip(y) {
        let dx = a - mean_x;
        let dy = b - mean_y;
        covariance += dx * dy;
        spread_x += dx * dx;
        spread_y += dy * dy;
    }

    math::safe_div(covariance, (spread_x * spread_y).sqrt())
}
