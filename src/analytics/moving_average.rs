//! Trailing moving averages

use std::collections::BTreeMap;

use crate::common::math;

pub const DEFAULT_WINDOWS: [usize; 3] = [7, 14, 30];

/// Trailing simple moving average.
///
/// Index `i` averages `values[i + 1 - window ..= i]`; near the start the
/// window shrinks to whatever is available, so the output has the same
/// length as the input. A window of 0 is treated as 1.
pub fn trailing_average(values: &[f64], window: usize) -> Vec<f64> {
    let window = window.max(1);
    (0..values.len())
        .map(|i| {
            let start = (i + 1).saturating_sub(window);
            math::mean(&values[start..=i])
        })
        .collect()
}

/// One trailing average series per requested window size
pub fn moving_averages(values: &[f64], windows: &[usize]) -> BTreeMap<usize, Vec<f64>> {
    windows
        .iter()
        .map(|&window| (window, trailing_average(values, window)))
        .collect()
}
