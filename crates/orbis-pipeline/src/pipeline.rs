//! End-to-end index computation.

use std::collections::BTreeMap;

use chrono::{DateTime, FixedOffset};
use chrono_tz::Tz;
use orbis_types::{Currency, InstrumentSeries, TimeSeries};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{
    AlignError, ConvertError, ExchangeRates, IndexConfig, PostError, Rescale, ScaleError,
    WeightedAggregator, align, convert_to_usd, post_process, scale_series, to_reference_zone,
};

/// Errors that abort a pipeline run.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum PipelineError {
    /// The benchmark instrument has no raw prices.
    #[error("Benchmark {0} has no price data")]
    BenchmarkUnavailable(String),

    /// No instrument survived, or no grid row had a weighted value.
    #[error("No usable data to build the index")]
    NoUsableData,

    /// Alignment failed.
    #[error(transparent)]
    Align(#[from] AlignError),

    /// Post-processing failed.
    #[error(transparent)]
    Post(#[from] PostError),
}

/// Why an instrument was left out of the index.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ExclusionReason {
    /// The series held no observations.
    #[error("no observations")]
    NoObservations,

    /// Prices could not be converted to US dollars.
    #[error(transparent)]
    Convert(#[from] ConvertError),

    /// The converted series could not be scaled.
    #[error(transparent)]
    Scale(#[from] ScaleError),
}

/// An instrument left out of the index.
#[derive(Debug, Clone, PartialEq)]
pub struct Exclusion {
    /// Instrument id.
    pub instrument: String,
    /// Why it was left out.
    pub reason: ExclusionReason,
}

impl std::fmt::Display for Exclusion {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.instrument, self.reason)
    }
}

/// Raw inputs for one run.
#[derive(Debug, Clone, Default)]
pub struct PipelineInput {
    instruments: BTreeMap<String, InstrumentSeries>,
    rates: BTreeMap<Currency, ExchangeRates>,
}

impl PipelineInput {
    /// Creates an empty input.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds an instrument's price history, replacing any earlier one with the
    /// same id.
    pub fn insert_series(&mut self, series: InstrumentSeries) {
        self.instruments.insert(series.id().to_string(), series);
    }

    /// Adds a currency's exchange rates.
    pub fn insert_rates(&mut self, rates: ExchangeRates) {
        self.rates.insert(rates.currency(), rates);
    }

    /// Builder form of [`insert_series`](Self::insert_series).
    #[must_use]
    pub fn with_series(mut self, series: InstrumentSeries) -> Self {
        self.insert_series(series);
        self
    }

    /// Builder form of [`insert_rates`](Self::insert_rates).
    #[must_use]
    pub fn with_rates(mut self, rates: ExchangeRates) -> Self {
        self.insert_rates(rates);
        self
    }

    /// Returns the instrument series keyed by id.
    #[must_use]
    pub const fn instruments(&self) -> &BTreeMap<String, InstrumentSeries> {
        &self.instruments
    }

    /// Returns the exchange rates for `currency`, if supplied.
    #[must_use]
    pub fn rates(&self, currency: Currency) -> Option<&ExchangeRates> {
        self.rates.get(&currency)
    }
}

/// One value of the final index.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct IndexPoint {
    /// Timestamp in the reference zone.
    pub timestamp: DateTime<FixedOffset>,
    /// Index level in benchmark price units.
    pub value: f64,
}

/// Output of a pipeline run.
#[derive(Debug, Clone, PartialEq)]
pub struct IndexReport {
    /// Final index, strictly increasing in time.
    pub points: Vec<IndexPoint>,
    /// Weighted aggregate before offset, smoothing and rescaling.
    pub raw_index: TimeSeries<DateTime<Tz>>,
    /// Instruments that entered alignment.
    pub included: Vec<String>,
    /// Instruments left out, with reasons.
    pub excluded: Vec<Exclusion>,
    /// Prices converted with an earlier day's exchange rate.
    pub stale_rate_observations: usize,
    /// Offset added before smoothing.
    pub offset: f64,
    /// Benchmark rescaling.
    pub rescale: Rescale,
    /// Smoothing span used.
    pub ema_span: u32,
}

impl IndexReport {
    /// Returns the earliest point.
    #[must_use]
    pub fn first(&self) -> Option<&IndexPoint> {
        self.points.first()
    }

    /// Returns the latest point.
    #[must_use]
    pub fn last(&self) -> Option<&IndexPoint> {
        self.points.last()
    }

    /// Returns the lowest point.
    #[must_use]
    pub fn min(&self) -> Option<&IndexPoint> {
        self.points.iter().min_by(|a, b| a.value.total_cmp(&b.value))
    }

    /// Returns the highest point.
    #[must_use]
    pub fn max(&self) -> Option<&IndexPoint> {
        self.points.iter().max_by(|a, b| a.value.total_cmp(&b.value))
    }
}

/// Instrument ready for alignment.
struct Prepared {
    series: TimeSeries<DateTime<Tz>>,
    stale_observations: usize,
}

/// Computes the global index from raw prices and exchange rates.
#[derive(Debug, Clone)]
pub struct IndexPipeline {
    config: IndexConfig,
}

impl IndexPipeline {
    /// Creates a pipeline.
    #[must_use]
    pub const fn new(config: IndexConfig) -> Self {
        Self { config }
    }

    /// Returns the configuration.
    #[must_use]
    pub const fn config(&self) -> &IndexConfig {
        &self.config
    }

    /// Runs every stage over `input`.
    ///
    /// Instruments that fail conversion or scaling are excluded and the run
    /// continues without them.
    ///
    /// # Errors
    ///
    /// Returns [`PipelineError::BenchmarkUnavailable`] if the benchmark has no
    /// prices and [`PipelineError::NoUsableData`] if nothing is left to
    /// aggregate.
    pub fn run(&self, input: &PipelineInput) -> Result<IndexReport, PipelineError> {
        let tz = self.config.timezone;
        let benchmark = input
            .instruments
            .get(&self.config.benchmark)
            .filter(|series| !series.is_empty())
            .ok_or_else(|| {
                PipelineError::BenchmarkUnavailable(self.config.benchmark.clone())
            })?;

        let mut normalized = BTreeMap::new();
        let mut excluded = Vec::new();
        let mut stale_rate_observations = 0;
        for (id, series) in &input.instruments {
            match self.prepare(series, input.rates(series.currency())) {
                Ok(prepared) => {
                    stale_rate_observations += prepared.stale_observations;
                    normalized.insert(id.clone(), prepared.series);
                }
                Err(reason) => {
                    tracing::warn!(instrument = %id, %reason, "excluding instrument");
                    excluded.push(Exclusion {
                        instrument: id.clone(),
                        reason,
                    });
                }
            }
        }

        if normalized.is_empty() {
            return Err(PipelineError::NoUsableData);
        }
        tracing::info!(
            included = normalized.len(),
            excluded = excluded.len(),
            stale_rate_observations,
            "instruments normalized"
        );

        let table = align(&normalized, self.config.grid(), tz)?;
        let raw_index = WeightedAggregator::new(&self.config.weights).aggregate(&table);
        if raw_index.is_empty() {
            return Err(PipelineError::NoUsableData);
        }
        tracing::info!(rows = table.len(), points = raw_index.len(), "aggregated grid");

        let benchmark_prices = to_reference_zone(benchmark.prices(), tz);
        let post = post_process(&raw_index, self.config.ema_span(), &benchmark_prices)?;
        tracing::info!(
            points = post.series.len(),
            factor = post.rescale.factor,
            benchmark = %self.config.benchmark,
            "index computed"
        );

        let points = post
            .series
            .iter()
            .map(|(timestamp, value)| IndexPoint {
                timestamp: timestamp.fixed_offset(),
                value,
            })
            .collect();

        Ok(IndexReport {
            points,
            raw_index,
            included: normalized.into_keys().collect(),
            excluded,
            stale_rate_observations,
            offset: post.offset,
            rescale: post.rescale,
            ema_span: self.config.ema_span(),
        })
    }

    /// Converts, scales and re-zones one instrument.
    fn prepare(
        &self,
        series: &InstrumentSeries,
        rates: Option<&ExchangeRates>,
    ) -> Result<Prepared, ExclusionReason> {
        if series.is_empty() {
            return Err(ExclusionReason::NoObservations);
        }
        let converted = convert_to_usd(series, rates)?;
        let scaled = scale_series(&converted.prices)?;

        Ok(Prepared {
            series: to_reference_zone(&scaled, self.config.timezone),
            stale_observations: converted.stale_observations,
        })
    }
}
