//! Instrument registry for the orbis global market index.
//!
//! This crate provides the fixed table of market benchmarks that make up
//! the index, with their quote currencies and aggregation weights.
//!
//! # Example
//!
//! ```
//! use orbis_instruments::InstrumentRegistry;
//!
//! let registry = InstrumentRegistry::global();
//!
//! // Lookup by provider symbol
//! if let Some(instrument) = registry.get("^GDAXI") {
//!     println!("{}: {}", instrument.name(), instrument.currency());
//! }
//! ```

#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/factordynamics/orbis/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

use std::collections::{BTreeSet, HashMap};
use std::sync::OnceLock;

use orbis_types::{Category, Currency, Instrument, OrbisError, WeightError, WeightTable};

/// The instrument table embedded at compile time.
const INSTRUMENTS_JSON: &str = include_str!("../data/instruments.json");

/// Global instrument registry instance.
static REGISTRY: OnceLock<InstrumentRegistry> = OnceLock::new();

/// Registry of the benchmarks that make up the global index.
#[derive(Debug)]
pub struct InstrumentRegistry {
    instruments: HashMap<String, Instrument>,
}

impl InstrumentRegistry {
    /// Returns the global instrument registry.
    ///
    /// The registry is initialized lazily on first access.
    #[must_use]
    pub fn global() -> &'static Self {
        REGISTRY.get_or_init(Self::load)
    }

    /// Loads instruments from the embedded JSON data.
    fn load() -> Self {
        let instruments: Vec<Instrument> =
            serde_json::from_str(INSTRUMENTS_JSON).expect("Invalid instruments.json");
        Self::from_instruments(instruments)
    }

    /// Builds a registry from an explicit instrument list.
    #[must_use]
    pub fn from_instruments(instruments: impl IntoIterator<Item = Instrument>) -> Self {
        let instruments = instruments
            .into_iter()
            .map(|i| (i.id().to_uppercase(), i))
            .collect();
        Self { instruments }
    }

    /// Looks up an instrument by symbol (case-insensitive).
    #[must_use]
    pub fn get(&self, id: &str) -> Option<&Instrument> {
        self.instruments.get(&id.to_uppercase())
    }

    /// Looks up an instrument by symbol, failing if it is unknown.
    ///
    /// # Errors
    ///
    /// Returns [`OrbisError::UnknownInstrument`] if the symbol is not registered.
    pub fn require(&self, id: &str) -> Result<&Instrument, OrbisError> {
        self.get(id)
            .ok_or_else(|| OrbisError::UnknownInstrument(id.to_string()))
    }

    /// Returns all instruments sorted by symbol.
    #[must_use]
    pub fn all(&self) -> Vec<&Instrument> {
        let mut all: Vec<&Instrument> = self.instruments.values().collect();
        all.sort_by(|a, b| a.id().cmp(b.id()));
        all
    }

    /// Returns the total number of instruments.
    #[must_use]
    pub fn len(&self) -> usize {
        self.instruments.len()
    }

    /// Returns true if the registry is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.instruments.is_empty()
    }

    /// Returns instruments matching the given category.
    pub fn by_category(&self, category: Category) -> impl Iterator<Item = &Instrument> {
        self.instruments
            .values()
            .filter(move |i| i.category() == category)
    }

    /// Searches instruments by symbol, name or region (case-insensitive).
    #[must_use]
    pub fn search(&self, pattern: &str) -> Vec<&Instrument> {
        let pattern = pattern.to_lowercase();
        let mut found: Vec<&Instrument> = self
            .instruments
            .values()
            .filter(|i| {
                i.id().to_lowercase().contains(&pattern)
                    || i.name().to_lowercase().contains(&pattern)
                    || i.region().to_lowercase().contains(&pattern)
            })
            .collect();
        found.sort_by(|a, b| a.id().cmp(b.id()));
        found
    }

    /// Returns the aggregation weights of all weighted instruments.
    ///
    /// # Errors
    ///
    /// Returns an error if a registered weight is negative or not finite.
    pub fn weights(&self) -> Result<WeightTable, WeightError> {
        WeightTable::new(
            self.instruments
                .values()
                .filter_map(|i| i.weight().map(|w| (i.id().to_string(), w))),
        )
    }

    /// Returns the distinct non-USD quote currencies, sorted.
    #[must_use]
    pub fn foreign_currencies(&self) -> Vec<Currency> {
        self.instruments
            .values()
            .map(Instrument::currency)
            .filter(|c| !c.is_usd())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }
}
