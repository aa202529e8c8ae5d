//! Ordered price series.

use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime};
use std::collections::BTreeMap;
use std::collections::btree_map;

use crate::Currency;

/// Ordered mapping from timestamp to price.
///
/// Keys are unique and iterate in ascending order, so every series built
/// from another one keeps the timestamp ordering of its source.
#[derive(Debug, Clone, PartialEq)]
pub struct TimeSeries<K: Ord> {
    points: BTreeMap<K, f64>,
}

impl<K: Ord> Default for TimeSeries<K> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: Ord> TimeSeries<K> {
    /// Creates an empty series.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            points: BTreeMap::new(),
        }
    }

    /// Inserts a value, returning the value previously stored at `key`.
    pub fn insert(&mut self, key: K, value: f64) -> Option<f64> {
        self.points.insert(key, value)
    }

    /// Returns the value at `key`.
    #[must_use]
    pub fn get(&self, key: &K) -> Option<f64> {
        self.points.get(key).copied()
    }

    /// Returns the number of observations.
    #[must_use]
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Returns true if the series has no observations.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Iterates over `(timestamp, value)` pairs in ascending order.
    pub fn iter(&self) -> impl DoubleEndedIterator<Item = (&K, f64)> {
        self.points.iter().map(|(k, v)| (k, *v))
    }

    /// Iterates over timestamps in ascending order.
    pub fn keys(&self) -> btree_map::Keys<'_, K, f64> {
        self.points.keys()
    }

    /// Iterates over values in timestamp order.
    pub fn values(&self) -> impl DoubleEndedIterator<Item = f64> {
        self.points.values().copied()
    }

    /// Returns the earliest observation.
    #[must_use]
    pub fn first(&self) -> Option<(&K, f64)> {
        self.points.first_key_value().map(|(k, v)| (k, *v))
    }

    /// Returns the latest observation.
    #[must_use]
    pub fn last(&self) -> Option<(&K, f64)> {
        self.points.last_key_value().map(|(k, v)| (k, *v))
    }

    /// Returns the latest observation at or before `key`.
    ///
    /// Observations after `key` are never consulted.
    #[must_use]
    pub fn last_at_or_before(&self, key: &K) -> Option<(&K, f64)> {
        self.points.range(..=key).next_back().map(|(k, v)| (k, *v))
    }

    /// Iterates over observations with `start <= timestamp <= end`.
    pub fn between<'a>(
        &'a self,
        start: &'a K,
        end: &'a K,
    ) -> impl DoubleEndedIterator<Item = (&'a K, f64)> {
        let range = (start <= end).then(|| self.points.range(start..=end));
        range.into_iter().flatten().map(|(k, v)| (k, *v))
    }

    /// Returns the smallest value.
    #[must_use]
    pub fn min(&self) -> Option<f64> {
        self.values().reduce(f64::min)
    }

    /// Returns the largest value.
    #[must_use]
    pub fn max(&self) -> Option<f64> {
        self.values().reduce(f64::max)
    }

    /// Returns the arithmetic mean of the values.
    #[must_use]
    pub fn mean(&self) -> Option<f64> {
        if self.is_empty() {
            return None;
        }
        Some(self.values().sum::<f64>() / self.len() as f64)
    }

    /// Returns a series with `f` applied to every value.
    #[must_use]
    pub fn map_values(&self, mut f: impl FnMut(f64) -> f64) -> Self
    where
        K: Clone,
    {
        self.points
            .iter()
            .map(|(k, v)| (k.clone(), f(*v)))
            .collect()
    }

    /// Returns a series with a fallible `f` applied to every observation.
    ///
    /// # Errors
    ///
    /// Returns the first error produced by `f`.
    pub fn try_map<E>(&self, mut f: impl FnMut(&K, f64) -> Result<f64, E>) -> Result<Self, E>
    where
        K: Clone,
    {
        self.points
            .iter()
            .map(|(k, v)| f(k, *v).map(|mapped| (k.clone(), mapped)))
            .collect()
    }

    /// Re-keys the series. When several keys collapse onto one, the value
    /// of the latest source key wins.
    #[must_use]
    pub fn map_keys<J: Ord>(&self, mut f: impl FnMut(&K) -> J) -> TimeSeries<J> {
        self.points.iter().map(|(k, v)| (f(k), *v)).collect()
    }

    /// Consumes the series, returning the underlying map.
    #[must_use]
    pub fn into_inner(self) -> BTreeMap<K, f64> {
        self.points
    }
}

impl<K: Ord> FromIterator<(K, f64)> for TimeSeries<K> {
    fn from_iter<I: IntoIterator<Item = (K, f64)>>(iter: I) -> Self {
        Self {
            points: iter.into_iter().collect(),
        }
    }
}

impl<K: Ord> IntoIterator for TimeSeries<K> {
    type Item = (K, f64);
    type IntoIter = btree_map::IntoIter<K, f64>;

    fn into_iter(self) -> Self::IntoIter {
        self.points.into_iter()
    }
}

/// Timestamp of an observation as delivered by the provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum RawTimestamp {
    /// Calendar trading date with no time-of-day (daily bars).
    Date(NaiveDate),
    /// Wall-clock time without a zone.
    Naive(NaiveDateTime),
    /// Zone-aware instant.
    Aware(DateTime<FixedOffset>),
}

impl RawTimestamp {
    /// Returns the calendar date of the observation, local to its own zone.
    #[must_use]
    pub fn date(&self) -> NaiveDate {
        match self {
            Self::Date(date) => *date,
            Self::Naive(dt) => dt.date(),
            Self::Aware(dt) => dt.date_naive(),
        }
    }
}

impl std::fmt::Display for RawTimestamp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Date(date) => write!(f, "{date}"),
            Self::Naive(dt) => write!(f, "{}", dt.format("%Y-%m-%dT%H:%M:%S")),
            Self::Aware(dt) => write!(f, "{}", dt.to_rfc3339()),
        }
    }
}

/// Price history of one instrument, in its own quote currency.
#[derive(Debug, Clone, PartialEq)]
pub struct InstrumentSeries {
    id: String,
    currency: Currency,
    prices: TimeSeries<RawTimestamp>,
}

impl InstrumentSeries {
    /// Creates a new instrument series.
    #[must_use]
    pub fn new(
        id: impl Into<String>,
        currency: Currency,
        prices: TimeSeries<RawTimestamp>,
    ) -> Self {
        Self {
            id: id.into(),
            currency,
            prices,
        }
    }

    /// Returns the instrument identifier.
    #[must_use]
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Returns the quote currency.
    #[must_use]
    pub const fn currency(&self) -> Currency {
        self.currency
    }

    /// Returns the prices.
    #[must_use]
    pub const fn prices(&self) -> &TimeSeries<RawTimestamp> {
        &self.prices
    }

    /// Returns true if the series has no observations.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.prices.is_empty()
    }
}
