//! Environment-driven configuration.
//!
//! Every knob has a default; unset or unparseable variables fall back to it.

use std::env;
use std::str::FromStr;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::analytics::{
    DEFAULT_COMPARISON_BAND_PCT, DEFAULT_HIGH_VALUE_THRESHOLD, DEFAULT_HORIZON, DEFAULT_WINDOWS,
};
use crate::insights::InsightThresholds;

pub const DEFAULT_MAX_RANGE_DAYS: i64 = 366;

/// Deployment environment name (`APP_ENV`), `sandbox` when unset
pub fn get_environment() -> String {
    env::var("APP_ENV").unwrap_or_else(|_| "sandbox".to_string())
}

/// Port the API server binds to (`PORT`), 8080 when unset
pub fn get_port() -> u16 {
    env_or("PORT", 8080)
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalyticsConfig {
    pub high_value_threshold: Decimal,
    pub moving_average_windows: Vec<usize>,
    pub forecast_horizon: u32,
    pub max_range_days: i64,
    pub comparison_band_pct: f64,
    pub insights: InsightThresholds,
}

impl Default for AnalyticsConfig {
    fn default() -> Self {
        Self {
            high_value_threshold: DEFAULT_HIGH_VALUE_THRESHOLD,
            moving_average_windows: DEFAULT_WINDOWS.to_vec(),
            forecast_horizon: DEFAULT_HORIZON,
            max_range_days: DEFAULT_MAX_RANGE_DAYS,
            comparison_band_pct: DEFAULT_COMPARISON_BAND_PCT,
            insights: InsightThresholds::default(),
        }
    }
}

impl AnalyticsConfig {
    pub fn from_env() -> Self {
        let defaults = Self::default();

        let moving_average_windows = env::var("MOVING_AVERAGE_WINDOWS")
            .ok()
            .map(|raw| parse_windows(&raw))
            .filter(|windows| !windows.is_empty())
            .unwrap_or(defaults.moving_average_windows);

        Self {
            high_value_threshold: env_or("HIGH_VALUE_THRESHOLD", defaults.high_value_threshold),
            moving_average_windows,
            forecast_horizon: env_or("FORECAST_HORIZON", defaults.forecast_horizon),
            max_range_days: env_or("MAX_RANGE_DAYS", defaults.max_range_days),
            comparison_band_pct: env_or("COMPARISON_BAND_PCT", defaults.comparison_band_pct),
            insights: InsightThresholds {
                high_volatility: env_or("INSIGHT_HIGH_VOLATILITY", defaults.insights.high_volatility),
                healthy_success_rate: env_or(
                    "INSIGHT_HEALTHY_SUCCESS_RATE",
                    defaults.insights.healthy_success_rate,
                ),
                poor_success_rate: env_or(
                    "INSIGHT_POOR_SUCCESS_RATE",
                    defaults.insights.poor_success_rate,
                ),
                strong_correlation: env_or(
                    "INSIGHT_STRONG_CORRELATION",
                    defaults.insights.strong_correlation,
                ),
            },
        }
    }
}

/// Parse a comma list such as `7,14,30`, dropping blanks, zeros and junk
pub fn parse_windows(raw: &str) -> Vec<usize> {
    raw.split(',')
        .filter_map(|part| part.trim().parse::<usize>().ok())
        .filter(|&window| window > 0)
        .collect()
}

fn env_or<T: FromStr>(key: &str, default: T) -> T {
    env::var(key)
        .ok()
        .and_then(|value| value.trim().parse().ok())
        .unwrap_or(default)
}
