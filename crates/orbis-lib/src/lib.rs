//! Global market index built from heterogeneous regional benchmarks.
//!
//! This is a facade crate that re-exports functionality from the orbis
//! workspace crates for convenient access.
//!
//! # Quick Start
//!
//! ```ignore
//! use orbis_lib::prelude::*;
//! use futures::StreamExt;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let registry = InstrumentRegistry::global();
//!     let client = ChartClient::with_defaults()?;
//!     let period: Period = "365d".parse()?;
//!
//!     let mut input = PipelineInput::new();
//!     let instruments = registry.all().into_iter().cloned().collect();
//!     let mut stream = instrument_stream(&client, instruments, period, Interval::Day1, 4);
//!     while let Some(batch) = stream.next().await {
//!         if let Some(series) = batch.series {
//!             input.insert_series(series);
//!         }
//!     }
//!
//!     let mut rates = rate_stream(&client, registry.foreign_currencies(), FX_LOOKBACK_DAYS, 4);
//!     while let Some(batch) = rates.next().await {
//!         if let Some(rates) = batch.rates {
//!             input.insert_rates(ExchangeRates::new(batch.currency, rates));
//!         }
//!     }
//!
//!     let config = IndexConfig::new(Interval::Day1, registry.weights()?);
//!     let report = IndexPipeline::new(config).run(&input)?;
//!     println!("{} points", report.points.len());
//!     Ok(())
//! }
//! ```

#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/factordynamics/orbis/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

// Re-export core types
pub use orbis_types::*;

// Re-export instrument registry
pub use orbis_instruments::InstrumentRegistry;

// Re-export the computation pipeline
pub use orbis_pipeline::{
    AlignError, CombinedTable, ConfigError, ConfigOverrides, ConvertError, DEFAULT_BENCHMARK,
    DEFAULT_TIMEZONE, ExchangeRates, Exclusion, ExclusionReason, GridSpec, IndexConfig,
    IndexPipeline, IndexPoint, IndexReport, PipelineError, PipelineInput, PostError, Rescale,
    RobustScaler, ScaleError, WeightedAggregator, parse_timezone,
};

// Re-export fetch functionality
#[cfg(feature = "fetch")]
pub use orbis_fetch::{
    ChartClient, ClientConfig, FX_LOOKBACK_DAYS, FetchBatch, FetchError, ParseError,
    PriceProvider, RateBatch, instrument_stream, rate_stream,
};

// Re-export formatters
#[cfg(feature = "format")]
pub use orbis_format::{CsvFormatter, FormatError, Formatter, JsonFormatter, OutputFormat};

#[cfg(all(feature = "format", feature = "parquet"))]
pub use orbis_format::ParquetFormatter;

/// Prelude module for convenient imports.
///
/// ```
/// use orbis_lib::prelude::*;
/// ```
pub mod prelude {
    pub use orbis_types::{
        Category, Currency, DateRange, Instrument, InstrumentSeries, Interval, OrbisError,
        Period, RawTimestamp, Result, TimeSeries, WeightTable,
    };

    pub use orbis_instruments::InstrumentRegistry;

    pub use orbis_pipeline::{
        ExchangeRates, IndexConfig, IndexPipeline, IndexPoint, IndexReport, PipelineInput,
    };

    #[cfg(feature = "fetch")]
    pub use orbis_fetch::{
        ChartClient, ClientConfig, FX_LOOKBACK_DAYS, FetchBatch, PriceProvider, RateBatch,
        instrument_stream, rate_stream,
    };

    #[cfg(feature = "format")]
    pub use orbis_format::{CsvFormatter, Formatter, JsonFormatter, OutputFormat};

    #[cfg(all(feature = "format", feature = "parquet"))]
    pub use orbis_format::ParquetFormatter;
}
