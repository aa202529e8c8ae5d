//! Core types for the orbis global market index.
//!
//! This crate provides the fundamental data structures used throughout orbis:
//!
//! - [`TimeSeries`] - Ordered timestamp-to-price map with unique keys
//! - [`RawTimestamp`] - Timestamp as delivered by a market-data provider
//! - [`InstrumentSeries`] - Price history of one instrument in its own currency
//! - [`Instrument`] - Market benchmark with currency and weight metadata
//! - [`Interval`] - Sampling interval with grid and smoothing parameters
//! - [`Period`] / [`DateRange`] - Lookback length and business-day ranges
//! - [`WeightTable`] - Exogenous per-instrument aggregation weights

#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/factordynamics/orbis/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod currency;
mod error;
mod instrument;
mod interval;
mod period;
mod series;
mod weights;

pub use currency::Currency;
pub use error::{OrbisError, PeriodError, Result, WeightError};
pub use instrument::{Category, Instrument};
pub use interval::{Interval, IntervalParseError};
pub use period::{BusinessDays, DateRange, MAX_PERIOD_DAYS, Period, is_business_day};
pub use series::{InstrumentSeries, RawTimestamp, TimeSeries};
pub use weights::WeightTable;
