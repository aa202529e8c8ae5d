//! Weighted cross-sectional mean of aligned instruments.

use chrono::DateTime;
use chrono_tz::Tz;
use orbis_types::{TimeSeries, WeightTable};

use crate::CombinedTable;

/// Collapses each row of a [`CombinedTable`] into one index value.
///
/// Each row is averaged over its present cells using the weights, so the
/// weights are renormalized over whatever is present. Instruments without a
/// weight never contribute.
#[derive(Debug, Clone, Copy)]
pub struct WeightedAggregator<'a> {
    weights: &'a WeightTable,
}

impl<'a> WeightedAggregator<'a> {
    /// Creates an aggregator over a fixed weight table.
    #[must_use]
    pub const fn new(weights: &'a WeightTable) -> Self {
        Self { weights }
    }

    /// Aggregates every row of `table`.
    ///
    /// Rows without any weighted present cell are omitted rather than
    /// reported as zero.
    #[must_use]
    pub fn aggregate(&self, table: &CombinedTable) -> TimeSeries<DateTime<Tz>> {
        let weights: Vec<Option<f64>> =
            table.columns().iter().map(|id| self.weights.get(id)).collect();

        table
            .rows()
            .filter_map(|(timestamp, cells)| {
                let value = weighted_mean(weights.iter().copied().zip(cells.iter().copied()))?;
                Some((*timestamp, value))
            })
            .collect()
    }
}

/// Weighted mean over `(weight, value)` pairs where both are present.
///
/// Returns `None` when the present weights sum to zero.
#[must_use]
pub fn weighted_mean(cells: impl IntoIterator<Item = (Option<f64>, Option<f64>)>) -> Option<f64> {
    let (weighted, total) = cells
        .into_iter()
        .filter_map(|(weight, value)| Some((weight?, value?)))
        .fold((0.0, 0.0), |(sum, total), (w, v)| {
            (w.mul_add(v, sum), total + w)
        });

    (total > 0.0).then(|| weighted / total)
}
