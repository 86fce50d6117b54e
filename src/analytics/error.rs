use chrono::NaiveDate;
use rust_decimal::Decimal;
use thiserror::Error;

/// Rejected analysis window, raised before any aggregation happens
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RangeError {
    #[error("invalid date '{value}', expected YYYY-MM-DD")]
    InvalidDate { value: String },

    #[error("start date {start} is after end date {end}")]
    Inverted { start: NaiveDate, end: NaiveDate },

    #[error("range {start}..={end} spans {days} days, limit is {max_days}")]
    TooLong {
        start: NaiveDate,
        end: NaiveDate,
        days: i64,
        max_days: i64,
    },

    #[error("unknown granularity '{value}', expected daily, weekly or monthly")]
    UnknownGranularity { value: String },
}

impl RangeError {
    /// The bound that caused the rejection, as shown to API callers
    pub fn bound(&self) -> String {
        match self {
            RangeError::InvalidDate { value } => value.clone(),
            RangeError::Inverted { start, .. } => start.to_string(),
            RangeError::TooLong { end, .. } => end.to_string(),
            RangeError::UnknownGranularity { value } => value.clone(),
        }
    }
}

/// Transaction or aggregate row that breaks the input invariants
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum InputError {
    #[error("{subject} has negative {field} {value}")]
    Negative {
        subject: String,
        field: &'static str,
        value: Decimal,
    },

    #[error("{subject} reports {field} = {count} but only {transaction_count} transactions")]
    CountExceedsTotal {
        subject: String,
        field: &'static str,
        count: u64,
        transaction_count: u64,
    },
}

impl InputError {
    /// The offending record or period, as shown to API callers
    pub fn subject(&self) -> &str {
        match self {
            InputError::Negative { subject, .. } | InputError::CountExceedsTotal { subject, .. } => {
                subject
            }
        }
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AnalyticsError {
    #[error(transparent)]
    Range(#[from] RangeError),

    #[error(transparent)]
    Input(#[from] InputError),

    #[error("analysis aborted before the {stage} stage")]
    Aborted { stage: &'static str },
}

pub type AnalyticsResult<T> = std::result::Result<T, AnalyticsError>;
