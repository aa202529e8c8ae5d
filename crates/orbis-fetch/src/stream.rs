//! Concurrent, failure-tolerant retrieval of instruments and rates.

use chrono::NaiveDate;
use futures::stream::{self, Stream, StreamExt};
use orbis_types::{Currency, Instrument, InstrumentSeries, Interval, Period, TimeSeries};

use crate::{FetchError, PriceProvider};

/// Outcome of fetching one instrument.
#[derive(Debug, Clone)]
pub struct FetchBatch {
    /// The instrument symbol.
    pub symbol: String,
    /// The fetched series, if the provider returned data.
    pub series: Option<InstrumentSeries>,
    /// The error message, if the fetch failed.
    pub error: Option<String>,
}

impl FetchBatch {
    /// Creates a batch holding fetched data.
    #[must_use]
    pub fn fetched(series: InstrumentSeries) -> Self {
        Self {
            symbol: series.id().to_string(),
            series: Some(series),
            error: None,
        }
    }

    /// Creates a batch for an instrument the provider has no data for.
    #[must_use]
    pub const fn empty(symbol: String) -> Self {
        Self {
            symbol,
            series: None,
            error: None,
        }
    }

    /// Creates a batch for a failed fetch.
    #[must_use]
    pub fn failed(symbol: String, error: &FetchError) -> Self {
        Self {
            symbol,
            series: None,
            error: Some(error.to_string()),
        }
    }

    /// Returns true if no data was obtained.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.series.as_ref().is_none_or(InstrumentSeries::is_empty)
    }

    /// Returns true if the fetch failed.
    #[must_use]
    pub const fn had_error(&self) -> bool {
        self.error.is_some()
    }
}

/// Outcome of fetching the exchange rates of one currency.
#[derive(Debug, Clone)]
pub struct RateBatch {
    /// The quote currency.
    pub currency: Currency,
    /// The fetched rates, if the provider returned data.
    pub rates: Option<TimeSeries<NaiveDate>>,
    /// The error message, if the fetch failed.
    pub error: Option<String>,
}

impl RateBatch {
    /// Returns true if the fetch failed.
    #[must_use]
    pub const fn had_error(&self) -> bool {
        self.error.is_some()
    }
}

/// Creates an async stream fetching every instrument concurrently.
///
/// At most `concurrency` requests are in flight. A failing instrument is
/// yielded as a batch with `error` set instead of terminating the stream,
/// so one unavailable market never blocks the others. Batches arrive in
/// completion order.
pub fn instrument_stream<'a, P>(
    provider: &'a P,
    instruments: Vec<Instrument>,
    period: Period,
    interval: Interval,
    concurrency: usize,
) -> impl Stream<Item = FetchBatch> + 'a
where
    P: PriceProvider + ?Sized,
{
    stream::iter(instruments)
        .map(move |instrument| async move {
            let symbol = instrument.id().to_string();
            match provider.fetch(&symbol, period, interval).await {
                Ok(Some(prices)) => FetchBatch::fetched(InstrumentSeries::new(
                    symbol,
                    instrument.currency(),
                    prices,
                )),
                Ok(None) => FetchBatch::empty(symbol),
                Err(e) => {
                    tracing::warn!(%symbol, error = %e, "fetch failed");
                    FetchBatch::failed(symbol, &e)
                }
            }
        })
        .buffer_unordered(concurrency.max(1))
}

/// Creates an async stream fetching USD exchange rates for each currency.
///
/// Failures are reported per currency, as in [`instrument_stream`].
pub fn rate_stream<'a, P>(
    provider: &'a P,
    currencies: Vec<Currency>,
    lookback_days: u32,
    concurrency: usize,
) -> impl Stream<Item = RateBatch> + 'a
where
    P: PriceProvider + ?Sized,
{
    stream::iter(currencies)
        .map(move |currency| async move {
            match provider.fetch_fx(currency, lookback_days).await {
                Ok(rates) => RateBatch {
                    currency,
                    rates,
                    error: None,
                },
                Err(e) => {
                    tracing::warn!(%currency, error = %e, "exchange-rate fetch failed");
                    RateBatch {
                        currency,
                        rates: None,
                        error: Some(e.to_string()),
                    }
                }
            }
        })
        .buffer_unordered(concurrency.max(1))
}
