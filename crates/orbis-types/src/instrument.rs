//! Market benchmark definitions.

use serde::{Deserialize, Serialize};

use crate::Currency;

/// Instrument category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    /// Stock market indices.
    Index,
    /// Exchange-traded funds.
    Etf,
    /// Bond funds.
    Bond,
    /// Commodity trackers.
    Commodity,
    /// Currency indices.
    Currency,
    /// Individual listed stocks.
    Stock,
}

impl Category {
    /// Returns the category as a string slice.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Index => "index",
            Self::Etf => "etf",
            Self::Bond => "bond",
            Self::Commodity => "commodity",
            Self::Currency => "currency",
            Self::Stock => "stock",
        }
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A market benchmark that contributes to the global index.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Instrument {
    /// Provider symbol (e.g., "^GSPC", "EEM").
    id: String,
    /// Human-readable name.
    name: String,
    /// Market or region the benchmark tracks.
    region: String,
    /// Instrument category.
    category: Category,
    /// Quote currency.
    currency: Currency,
    /// Aggregation weight; unweighted instruments are aligned but not mixed in.
    #[serde(default)]
    weight: Option<f64>,
}

impl Instrument {
    /// Creates a new instrument.
    #[must_use]
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        region: impl Into<String>,
        category: Category,
        currency: Currency,
        weight: Option<f64>,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            region: region.into(),
            category,
            currency,
            weight,
        }
    }

    /// Returns the provider symbol.
    #[must_use]
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Returns the human-readable name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the tracked market or region.
    #[must_use]
    pub fn region(&self) -> &str {
        &self.region
    }

    /// Returns the instrument category.
    #[must_use]
    pub const fn category(&self) -> Category {
        self.category
    }

    /// Returns the quote currency.
    #[must_use]
    pub const fn currency(&self) -> Currency {
        self.currency
    }

    /// Returns the aggregation weight, if any.
    #[must_use]
    pub const fn weight(&self) -> Option<f64> {
        self.weight
    }

    /// Returns true if prices must be converted to USD.
    #[must_use]
    pub const fn needs_conversion(&self) -> bool {
        !self.currency.is_usd()
    }
}

impl std::fmt::Display for Instrument {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({})", self.name, self.id)
    }
}
