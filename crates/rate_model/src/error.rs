use chrono::NaiveDate;
use thiserror::Error;

/// Raised when a series, currency or amount cannot be used as given.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum InvalidInputError {
    #[error("series is empty")]
    Empty,

    #[error("rate {rate} on {date} is not a positive number")]
    NonPositiveRate { date: NaiveDate, rate: f64 },

    #[error("unparseable date: {0}")]
    UnparseableDate(String),

    #[error("date {date} does not follow {previous}")]
    OutOfOrder { previous: NaiveDate, date: NaiveDate },

    #[error("unknown currency: {0}")]
    UnknownCurrency(String),

    #[error("invalid rate: {0}")]
    InvalidRate(f64),

    #[error("invalid amount: {0}")]
    InvalidAmount(f64),
}
