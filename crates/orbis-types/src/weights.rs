//! Exogenous aggregation weights.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::WeightError;

/// Immutable mapping from instrument identifier to a non-negative weight.
///
/// Weights need not sum to one: the aggregator renormalizes by the sum of
/// the weights of the instruments present at each timestamp.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(try_from = "BTreeMap<String, f64>", into = "BTreeMap<String, f64>")]
pub struct WeightTable {
    weights: BTreeMap<String, f64>,
}

impl WeightTable {
    /// Creates a weight table, validating every weight.
    ///
    /// # Errors
    ///
    /// Returns an error if a weight is negative, NaN or infinite.
    pub fn new<I, S>(weights: I) -> Result<Self, WeightError>
    where
        I: IntoIterator<Item = (S, f64)>,
        S: Into<String>,
    {
        let mut table = BTreeMap::new();
        for (id, weight) in weights {
            let instrument = id.into();
            if !weight.is_finite() {
                return Err(WeightError::NotFinite { instrument });
            }
            if weight < 0.0 {
                return Err(WeightError::Negative { instrument, weight });
            }
            table.insert(instrument, weight);
        }
        Ok(Self { weights: table })
    }

    /// Returns the weight of an instrument.
    #[must_use]
    pub fn get(&self, id: &str) -> Option<f64> {
        self.weights.get(id).copied()
    }

    /// Returns true if the instrument carries a weight.
    #[must_use]
    pub fn contains(&self, id: &str) -> bool {
        self.weights.contains_key(id)
    }

    /// Returns the number of weighted instruments.
    #[must_use]
    pub fn len(&self) -> usize {
        self.weights.len()
    }

    /// Returns true if no instrument carries a weight.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.weights.is_empty()
    }

    /// Iterates over `(id, weight)` pairs sorted by id.
    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.weights.iter().map(|(id, w)| (id.as_str(), *w))
    }

    /// Returns the sum of all weights.
    #[must_use]
    pub fn total(&self) -> f64 {
        self.weights.values().sum()
    }
}

impl TryFrom<BTreeMap<String, f64>> for WeightTable {
    type Error = WeightError;

    fn try_from(weights: BTreeMap<String, f64>) -> Result<Self, Self::Error> {
        Self::new(weights)
    }
}

impl From<WeightTable> for BTreeMap<String, f64> {
    fn from(table: WeightTable) -> Self {
        table.weights
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_weight_table_lookup() {
        let table = WeightTable::new([("A", 0.5), ("B", 0.3), ("C", 0.2)]).unwrap();

        assert_eq!(table.get("B"), Some(0.3));
        assert_eq!(table.get("D"), None);
        assert!((table.total() - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_rejects_negative_and_nan() {
        assert_eq!(
            WeightTable::new([("A", -0.1)]),
            Err(WeightError::Negative {
                instrument: "A".into(),
                weight: -0.1
            })
        );
        assert!(matches!(
            WeightTable::new([("A", f64::NAN)]),
            Err(WeightError::NotFinite { .. })
        ));
    }

    #[test]
    fn test_deserialize_validates() {
        let table: WeightTable = serde_json::from_str(r#"{"^GSPC": 0.28, "EEM": 0.0001}"#).unwrap();
        assert_eq!(table.len(), 2);

        let invalid: Result<WeightTable, _> = serde_json::from_str(r#"{"^GSPC": -1.0}"#);
        assert!(invalid.is_err());
    }
}
