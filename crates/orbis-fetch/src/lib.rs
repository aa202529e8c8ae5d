//! Market data retrieval for the orbis global market index.
//!
//! This crate provides the data retrieval side of the pipeline:
//!
//! - [`url::chart_url`] - Builds chart API URLs
//! - [`ChartClient`] - HTTP client with connection pooling and retries
//! - [`parse::parse_chart`] - Chart JSON parsing into price series
//! - [`PriceProvider`] - Provider abstraction consumed by the CLI and tests
//! - [`instrument_stream`] / [`rate_stream`] - Concurrent, failure-tolerant retrieval

#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/factordynamics/orbis/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod client;
pub mod parse;
mod provider;
mod stream;
pub mod url;

pub use client::{ChartClient, ClientConfig, FetchError};
pub use parse::{ParseError, parse_chart, parse_rates};
pub use provider::{FX_LOOKBACK_DAYS, PriceProvider};
pub use stream::{FetchBatch, RateBatch, instrument_stream, rate_stream};
