//! Error types for orbis.

use chrono::NaiveDate;
use thiserror::Error;

use crate::IntervalParseError;

/// Result type alias for orbis operations.
pub type Result<T> = std::result::Result<T, OrbisError>;

/// Errors shared across the orbis crates.
#[derive(Error, Debug)]
pub enum OrbisError {
    /// Instrument not found.
    #[error("Unknown instrument: {0}")]
    UnknownInstrument(String),

    /// Currency code not supported.
    #[error("Unknown currency: {0}")]
    UnknownCurrency(String),

    /// Invalid lookback period or date range.
    #[error(transparent)]
    Period(#[from] PeriodError),

    /// Invalid sampling interval.
    #[error(transparent)]
    Interval(#[from] IntervalParseError),

    /// Invalid weight table.
    #[error(transparent)]
    Weight(#[from] WeightError),
}

/// Error for invalid lookback periods and date ranges.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PeriodError {
    /// Start date is after end date.
    #[error("Invalid date range: {start} > {end}")]
    InvalidRange {
        /// The start date.
        start: NaiveDate,
        /// The end date.
        end: NaiveDate,
    },

    /// Period string is not of the form `<days>d`.
    #[error("Invalid period '{0}', expected a number of days such as '365d'")]
    InvalidFormat(String),

    /// Period length outside the allowed bounds.
    #[error("Period of {days} days is outside the allowed range 1..={max}")]
    OutOfBounds {
        /// Requested number of days.
        days: u32,
        /// Maximum allowed number of days.
        max: u32,
    },
}

/// Error for invalid aggregation weights.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum WeightError {
    /// Weight is below zero.
    #[error("Weight for {instrument} is negative: {weight}")]
    Negative {
        /// The instrument carrying the weight.
        instrument: String,
        /// The offending weight.
        weight: f64,
    },

    /// Weight is NaN or infinite.
    #[error("Weight for {instrument} is not a finite number")]
    NotFinite {
        /// The instrument carrying the weight.
        instrument: String,
    },
}
