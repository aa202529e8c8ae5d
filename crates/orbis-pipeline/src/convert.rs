//! Conversion of local-currency prices into US dollars.

use chrono::NaiveDate;
use orbis_types::{Currency, InstrumentSeries, RawTimestamp, TimeSeries};
use thiserror::Error;

/// Errors raised while converting prices to US dollars.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConvertError {
    /// No exchange-rate history is available for the currency.
    #[error("No exchange rates available for {currency}")]
    MissingRates {
        /// Currency without rates.
        currency: Currency,
    },

    /// Rates were supplied for a different currency than the series uses.
    #[error("Exchange rates are for {found}, series is priced in {expected}")]
    CurrencyMismatch {
        /// Currency of the price series.
        expected: Currency,
        /// Currency of the supplied rates.
        found: Currency,
    },

    /// Every known rate is dated after the requested date.
    #[error("No {currency} exchange rate on or before {date}")]
    NoPriorRate {
        /// Currency being converted.
        currency: Currency,
        /// Date of the price that could not be converted.
        date: NaiveDate,
    },

    /// The effective rate is zero, negative or not finite.
    #[error("Invalid {currency} exchange rate {rate} dated {date}")]
    InvalidRate {
        /// Currency being converted.
        currency: Currency,
        /// Date the offending rate is recorded under.
        date: NaiveDate,
        /// The offending rate.
        rate: f64,
    },
}

/// Daily exchange rates of one currency, quoted as units of that currency per
/// US dollar.
#[derive(Debug, Clone, PartialEq)]
pub struct ExchangeRates {
    currency: Currency,
    rates: TimeSeries<NaiveDate>,
}

/// Effective rate for a date.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RateLookup {
    /// Units of the currency per US dollar.
    pub rate: f64,
    /// Date of the substituted rate when none was recorded for the requested
    /// date itself.
    pub stale_from: Option<NaiveDate>,
}

impl RateLookup {
    /// Returns true if an earlier rate stood in for the requested date.
    #[must_use]
    pub const fn is_stale(&self) -> bool {
        self.stale_from.is_some()
    }
}

impl ExchangeRates {
    /// Creates a rate table for `currency`.
    #[must_use]
    pub const fn new(currency: Currency, rates: TimeSeries<NaiveDate>) -> Self {
        Self { currency, rates }
    }

    /// Returns the quoted currency.
    #[must_use]
    pub const fn currency(&self) -> Currency {
        self.currency
    }

    /// Returns the underlying daily rates.
    #[must_use]
    pub const fn rates(&self) -> &TimeSeries<NaiveDate> {
        &self.rates
    }

    /// Returns the number of recorded dates.
    #[must_use]
    pub fn len(&self) -> usize {
        self.rates.len()
    }

    /// Returns true if no rate is recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rates.is_empty()
    }

    /// Returns the rate in effect on `date`.
    ///
    /// Uses the rate recorded for `date` when present, otherwise the most
    /// recent earlier one. Later rates are never consulted.
    ///
    /// # Errors
    ///
    /// Returns [`ConvertError::NoPriorRate`] if every rate is dated after
    /// `date`, and [`ConvertError::InvalidRate`] if the effective rate is not
    /// a positive finite number.
    pub fn rate_on(&self, date: NaiveDate) -> Result<RateLookup, ConvertError> {
        let (&dated, rate) =
            self.rates.last_at_or_before(&date).ok_or(ConvertError::NoPriorRate {
                currency: self.currency,
                date,
            })?;

        if !(rate.is_finite() && rate > 0.0) {
            return Err(ConvertError::InvalidRate {
                currency: self.currency,
                date: dated,
                rate,
            });
        }

        Ok(RateLookup {
            rate,
            stale_from: (dated != date).then_some(dated),
        })
    }
}

/// A series converted to US dollars.
#[derive(Debug, Clone, PartialEq)]
pub struct Converted {
    /// Prices in US dollars, keyed by the original timestamps.
    pub prices: TimeSeries<RawTimestamp>,
    /// Number of observations converted with an earlier day's rate.
    pub stale_observations: usize,
}

/// Converts an instrument's prices to US dollars.
///
/// USD series pass through unchanged. Every other price is divided by the
/// rate in effect on the calendar date of its timestamp.
///
/// # Errors
///
/// Fails if no usable rates are supplied for a non-USD series or any price
/// predates the first rate.
pub fn convert_to_usd(
    series: &InstrumentSeries,
    rates: Option<&ExchangeRates>,
) -> Result<Converted, ConvertError> {
    let currency = series.currency();
    if currency.is_usd() {
        return Ok(Converted {
            prices: series.prices().clone(),
            stale_observations: 0,
        });
    }

    let rates = rates.filter(|r| !r.is_empty()).ok_or(ConvertError::MissingRates { currency })?;
    if rates.currency() != currency {
        return Err(ConvertError::CurrencyMismatch {
            expected: currency,
            found: rates.currency(),
        });
    }

    let mut stale_observations = 0;
    let prices = series.prices().try_map(|stamp, price| -> Result<f64, ConvertError> {
        let date = stamp.date();
        let lookup = rates.rate_on(date)?;
        if let Some(used) = lookup.stale_from {
            stale_observations += 1;
            tracing::debug!(
                instrument = series.id(),
                %currency,
                %date,
                %used,
                "using earlier exchange rate"
            );
        }
        Ok(price / lookup.rate)
    })?;

    Ok(Converted {
        prices,
        stale_observations,
    })
}
