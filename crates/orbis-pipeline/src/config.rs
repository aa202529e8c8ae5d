//! Index configuration and JSON overrides.

use std::path::{Path, PathBuf};

use chrono_tz::Tz;
use orbis_types::{Interval, WeightTable};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{GridSpec, timezone::DEFAULT_TIMEZONE};

/// Benchmark whose price level anchors the rescaled index.
pub const DEFAULT_BENCHMARK: &str = "ACWI";

/// Errors raised while loading configuration.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// The override file could not be read.
    #[error("Failed to read config file {path}: {source}")]
    Read {
        /// Path that was read.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// The override file is not valid JSON or has unexpected fields.
    #[error("Invalid config: {0}")]
    Parse(#[from] serde_json::Error),

    /// The time zone name is not in the IANA database.
    #[error("Unknown time zone: {0}")]
    UnknownTimezone(String),
}

/// Parses an IANA time zone name such as `America/New_York`.
///
/// # Errors
///
/// Returns [`ConfigError::UnknownTimezone`] for unrecognized names.
pub fn parse_timezone(name: &str) -> Result<Tz, ConfigError> {
    name.parse().map_err(|_| ConfigError::UnknownTimezone(name.to_string()))
}

/// Everything the pipeline needs besides the data itself.
#[derive(Debug, Clone, PartialEq)]
pub struct IndexConfig {
    /// Sampling interval; selects the grid and the smoothing span.
    pub interval: Interval,
    /// Instrument whose raw prices set the output's level.
    pub benchmark: String,
    /// Zone timestamps are normalized to.
    pub timezone: Tz,
    /// Aggregation weights.
    pub weights: WeightTable,
}

impl IndexConfig {
    /// Creates a configuration with the default benchmark and time zone.
    #[must_use]
    pub fn new(interval: Interval, weights: WeightTable) -> Self {
        Self {
            interval,
            benchmark: DEFAULT_BENCHMARK.to_string(),
            timezone: DEFAULT_TIMEZONE,
            weights,
        }
    }

    /// Sets the benchmark instrument.
    #[must_use]
    pub fn with_benchmark(mut self, benchmark: impl Into<String>) -> Self {
        self.benchmark = benchmark.into();
        self
    }

    /// Sets the reference time zone.
    #[must_use]
    pub const fn with_timezone(mut self, timezone: Tz) -> Self {
        self.timezone = timezone;
        self
    }

    /// Replaces the weight table.
    #[must_use]
    pub fn with_weights(mut self, weights: WeightTable) -> Self {
        self.weights = weights;
        self
    }

    /// Returns the grid resolution for the interval.
    #[must_use]
    pub fn grid(&self) -> GridSpec {
        GridSpec::from(self.interval)
    }

    /// Returns the smoothing span for the interval.
    #[must_use]
    pub const fn ema_span(&self) -> u32 {
        self.interval.ema_span()
    }

    /// Applies the fields set in `overrides`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::UnknownTimezone`] for an invalid zone name.
    pub fn apply(mut self, overrides: ConfigOverrides) -> Result<Self, ConfigError> {
        if let Some(benchmark) = overrides.benchmark {
            self.benchmark = benchmark;
        }
        if let Some(timezone) = overrides.timezone {
            self.timezone = parse_timezone(&timezone)?;
        }
        if let Some(weights) = overrides.weights {
            self.weights = weights;
        }
        Ok(self)
    }
}

/// Optional settings read from a JSON file.
///
/// ```json
/// {
///   "benchmark": "ACWI",
///   "timezone": "Europe/London",
///   "weights": { "ACWI": 0.2, "^GDAXI": 0.1 }
/// }
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ConfigOverrides {
    /// Benchmark instrument id.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub benchmark: Option<String>,
    /// IANA time zone name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timezone: Option<String>,
    /// Complete replacement weight table.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub weights: Option<WeightTable>,
}

impl ConfigOverrides {
    /// Parses overrides from JSON text.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Parse`] for malformed JSON, unknown fields, or
    /// negative or non-finite weights.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Reads overrides from a JSON file.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Read`] if the file cannot be read, otherwise as
    /// [`from_json`](Self::from_json).
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)
            .map_err(|source| ConfigError::Read {
                path: path.to_path_buf(),
                source,
            })?;
        Self::from_json(&json)
    }
}
