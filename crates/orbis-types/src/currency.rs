//! Quote currency definitions.

use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::OrbisError;

/// Currency an instrument is quoted in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Currency {
    /// US dollar.
    Usd,
    /// Euro.
    Eur,
    /// Pound sterling.
    Gbp,
    /// Japanese yen.
    Jpy,
    /// Swiss franc.
    Chf,
    /// Chinese yuan renminbi.
    Cny,
    /// Hong Kong dollar.
    Hkd,
    /// Australian dollar.
    Aud,
    /// Canadian dollar.
    Cad,
    /// Indian rupee.
    Inr,
    /// Singapore dollar.
    Sgd,
}

impl Currency {
    /// Returns the ISO 4217 code.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Usd => "USD",
            Self::Eur => "EUR",
            Self::Gbp => "GBP",
            Self::Jpy => "JPY",
            Self::Chf => "CHF",
            Self::Cny => "CNY",
            Self::Hkd => "HKD",
            Self::Aud => "AUD",
            Self::Cad => "CAD",
            Self::Inr => "INR",
            Self::Sgd => "SGD",
        }
    }

    /// Returns true for the US dollar, which needs no conversion.
    #[must_use]
    pub const fn is_usd(&self) -> bool {
        matches!(self, Self::Usd)
    }

    /// Returns the provider symbol of the USD exchange rate, quoted as
    /// units of this currency per one dollar (e.g. `EUR=X`).
    #[must_use]
    pub fn fx_symbol(&self) -> String {
        format!("{}=X", self.as_str())
    }

    /// Returns all supported currencies.
    #[must_use]
    pub const fn all() -> &'static [Self] {
        &[
            Self::Usd,
            Self::Eur,
            Self::Gbp,
            Self::Jpy,
            Self::Chf,
            Self::Cny,
            Self::Hkd,
            Self::Aud,
            Self::Cad,
            Self::Inr,
            Self::Sgd,
        ]
    }
}

impl std::fmt::Display for Currency {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Currency {
    type Err = OrbisError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let code = s.trim().to_uppercase();
        Self::all()
            .iter()
            .copied()
            .find(|c| c.as_str() == code)
            .ok_or_else(|| OrbisError::UnknownCurrency(s.to_string()))
    }
}
