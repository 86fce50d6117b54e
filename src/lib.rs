//! Transaction trend and volume analytics.
//!
//! Turns a finite window of transaction records (or upstream aggregates)
//! into period aggregates, descriptive statistics, trend labels, moving
//! averages, volatility, correlation, growth rates, a short linear forecast,
//! seasonal patterns, a previous-period comparison and derived insights.

pub mod analytics;
pub mod common;
pub mod config;
pub mod core;
pub mod engine;
pub mod insights;
pub mod logging;
pub mod metrics;
pub mod models;

pub use analytics::{AnalyticsError, InputError, RangeError};
pub use engine::{AbortSignal, AnalyticsEngine, PreAggregated};
