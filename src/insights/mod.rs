//! Threshold rules that turn computed analytics into readable insights.

pub mod generator;
pub mod thresholds;

pub use generator::*;
pub use thresholds::*;
