//! Median / interquartile-range scaling.

use orbis_types::TimeSeries;
use thiserror::Error;

/// Errors raised while fitting a [`RobustScaler`].
#[derive(Error, Debug, Clone, Copy, PartialEq)]
pub enum ScaleError {
    /// The series holds no values.
    #[error("Cannot scale an empty series")]
    Empty,

    /// The interquartile range is zero or not finite.
    #[error("Interquartile range {iqr} does not define a scale")]
    DegenerateScale {
        /// The fitted interquartile range.
        iqr: f64,
    },
}

/// Centers on the median and divides by the interquartile range.
///
/// Quantiles use linear interpolation between closest ranks.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RobustScaler {
    median: f64,
    iqr: f64,
}

impl RobustScaler {
    /// Fits the scaler to `values`.
    ///
    /// # Errors
    ///
    /// Returns [`ScaleError::Empty`] for no values and
    /// [`ScaleError::DegenerateScale`] when the interquartile range is not a
    /// positive finite number.
    pub fn fit(values: impl IntoIterator<Item = f64>) -> Result<Self, ScaleError> {
        let mut sorted: Vec<f64> = values.into_iter().collect();
        if sorted.is_empty() {
            return Err(ScaleError::Empty);
        }
        sorted.sort_by(f64::total_cmp);

        let median = quantile(&sorted, 0.5);
        let iqr = quantile(&sorted, 0.75) - quantile(&sorted, 0.25);
        if !(iqr.is_finite() && iqr > 0.0) || !median.is_finite() {
            return Err(ScaleError::DegenerateScale { iqr });
        }

        Ok(Self { median, iqr })
    }

    /// Returns the fitted median.
    #[must_use]
    pub const fn median(&self) -> f64 {
        self.median
    }

    /// Returns the fitted interquartile range.
    #[must_use]
    pub const fn iqr(&self) -> f64 {
        self.iqr
    }

    /// Scales a value.
    #[must_use]
    pub fn transform(&self, value: f64) -> f64 {
        (value - self.median) / self.iqr
    }

    /// Undoes [`transform`](Self::transform).
    #[must_use]
    pub fn inverse(&self, scaled: f64) -> f64 {
        scaled.mul_add(self.iqr, self.median)
    }
}

/// Scales a series by its own median and interquartile range.
///
/// # Errors
///
/// See [`RobustScaler::fit`].
pub fn scale_series<K: Ord + Clone>(series: &TimeSeries<K>) -> Result<TimeSeries<K>, ScaleError> {
    let scaler = RobustScaler::fit(series.values())?;
    Ok(series.map_values(|v| scaler.transform(v)))
}

/// Quantile of sorted data with linear interpolation.
fn quantile(sorted: &[f64], q: f64) -> f64 {
    let position = q * (sorted.len() - 1) as f64;
    let lower = position.floor() as usize;
    let upper = position.ceil() as usize;
    let fraction = position - lower as f64;
    (sorted[upper] - sorted[lower]).mul_add(fraction, sorted[lower])
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_fit_odd_length() {
        let scaler = RobustScaler::fit([5.0, 1.0, 3.0, 2.0, 4.0]).unwrap();

        assert_relative_eq!(scaler.median(), 3.0);
        assert_relative_eq!(scaler.iqr(), 2.0);
        assert_relative_eq!(scaler.transform(5.0), 1.0);
        assert_relative_eq!(scaler.transform(2.0), -0.5);
    }

    #[test]
    fn test_fit_interpolates_quantiles() {
        // q1 at rank 0.75, median at 1.5, q3 at 2.25
        let scaler = RobustScaler::fit([20.0, 22.0, 26.0, 28.0]).unwrap();

        assert_relative_eq!(scaler.median(), 24.0);
        assert_relative_eq!(scaler.iqr(), 26.5 - 21.5);
    }

    #[test]
    fn test_inverse_round_trip() {
        let scaler = RobustScaler::fit([101.5, 99.0, 104.25, 97.75, 100.0, 103.0]).unwrap();

        for value in [95.0, 100.0, 101.5, 250.0] {
            assert_relative_eq!(
                scaler.inverse(scaler.transform(value)),
                value,
                epsilon = 1e-9
            );
        }
    }

    #[test]
    fn test_empty_fails() {
        assert_eq!(RobustScaler::fit(Vec::new()), Err(ScaleError::Empty));
    }

    #[test]
    fn test_constant_series_is_degenerate() {
        assert_eq!(
            RobustScaler::fit([7.0; 10]),
            Err(ScaleError::DegenerateScale { iqr: 0.0 })
        );
    }

    #[test]
    fn test_single_value_is_degenerate() {
        assert!(matches!(
            RobustScaler::fit([7.0]),
            Err(ScaleError::DegenerateScale { .. })
        ));
    }

    #[test]
    fn test_scale_series_keeps_keys() {
        let series: TimeSeries<u32> =
            [(1, 10.0), (2, 11.0), (3, 12.0), (4, 13.0), (5, 14.0)].into_iter().collect();

        let scaled = scale_series(&series).unwrap();

        assert_eq!(
            scaled.keys().copied().collect::<Vec<_>>(),
            vec![1, 2, 3, 4, 5]
        );
        assert_relative_eq!(scaled.get(&1).unwrap(), -1.0);
        assert_relative_eq!(scaled.get(&3).unwrap(), 0.0);
        assert_relative_eq!(scaled.get(&5).unwrap(), 1.0);
    }
}
