//! Transaction trend and volume analytics: one module per computation.

pub mod aggregator;
pub mod comparison;
pub mod correlation;
pub mod error;
pub mod forecast;
pub mod growth;
pub mod moving_average;
pub mod seasonal;
pub mod statistics;
pub mod trend;

pub use aggregator::*;
pub use comparison::*;
pub use correlation::*;
pub use error::{AnalyticsError, AnalyticsResult, InputError, RangeError};
pub use forecast::*;
pub use growth::*;
pub use moving_average::*;
pub use seasonal::*;
pub use statistics::*;
pub use trend::*;
