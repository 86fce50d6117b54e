//! Insight threshold set

use serde::{Deserialize, Serialize};

/// Fixed cut-offs applied by the insight generator
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct InsightThresholds {
    /// Coefficient of variation above which volume is flagged as volatile
    pub high_volatility: f64,
    /// Success rate (percent) at or above which the window is healthy
    pub healthy_success_rate: f64,
    /// Success rate (percent) below which a warning is raised
    pub poor_success_rate: f64,
    /// |r| above which count and volume are reported as strongly correlated
    pub strong_correlation: f64,
}

impl InsightThresholds {
    pub const HIGH_VOLATILITY: f64 = 0.3;
    pub const HEALTHY_SUCCESS_RATE: f64 = 95.0;
    pub const POOR_SUCCESS_RATE: f64 = 90.0;
    pub const STRONG_CORRELATION: f64 = 0.8;
}

impl Default for InsightThresholds {
    fn default() -> Self {
        Self {
            high_volatility: Self::HIGH_VOLATILITY,
            healthy_success_rate: Self::HEALTHY_SUCCESS_RATE,
            poor_success_rate: Self::POOR_SUCCESS_RATE,
            strong_correlation: Self::STRONG_CORRELATION,
        }
    }
}
