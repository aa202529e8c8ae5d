//! Index computation for the orbis global market index.
//!
//! This crate turns raw per-instrument prices into one global index:
//!
//! - [`convert_to_usd`] - Causal currency conversion with stale-rate fallback
//! - [`RobustScaler`] - Per-instrument median / IQR scaling
//! - [`to_reference_zone`] - Timestamp normalization into one time zone
//! - [`align`] - Reindexing onto a shared business-day grid
//! - [`WeightedAggregator`] - Weighted mean over present instruments
//! - [`post_process`] - Offset, EMA smoothing and benchmark rescaling
//! - [`IndexPipeline`] - All of the above, in order

#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/factordynamics/orbis/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod aggregate;
mod config;
mod convert;
mod grid;
mod pipeline;
mod post;
mod scale;
mod timezone;

pub use aggregate::{WeightedAggregator, weighted_mean};
pub use config::{ConfigError, ConfigOverrides, DEFAULT_BENCHMARK, IndexConfig, parse_timezone};
pub use convert::{ConvertError, Converted, ExchangeRates, RateLookup, convert_to_usd};
pub use grid::{AlignError, CombinedTable, GridSpec, UnifiedGrid, align};
pub use pipeline::{
    Exclusion, ExclusionReason, IndexPipeline, IndexPoint, IndexReport, PipelineError,
    PipelineInput,
};
pub use post::{
    PostError, PostProcessed, Rescale, apply_offset, ewma, post_process, rescale_to_benchmark,
};
pub use scale::{RobustScaler, ScaleError, scale_series};
pub use timezone::{DEFAULT_TIMEZONE, localize, to_reference_zone};
