//! Offset, smoothing and benchmark rescaling of the raw index.

use orbis_types::TimeSeries;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors raised during post-processing.
#[derive(Error, Debug, Clone, Copy, PartialEq)]
pub enum PostError {
    /// The index holds no values.
    #[error("Index series is empty")]
    EmptySeries,

    /// Smoothing span below one.
    #[error("Smoothing span must be at least 1, got {0}")]
    InvalidSpan(u32),

    /// The benchmark has no price inside the index's time span.
    #[error("Benchmark has no observations within the index time span")]
    BenchmarkOutOfSpan,

    /// The smoothed index averages to zero, so no factor maps it onto the
    /// benchmark.
    #[error("Smoothed index has zero mean")]
    ZeroMean,
}

/// Outcome of rescaling onto a benchmark's price level.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rescale {
    /// Multiplier applied to the smoothed index.
    pub factor: f64,
    /// Mean benchmark price within the index span.
    pub benchmark_mean: f64,
    /// Mean of the smoothed index before rescaling.
    pub index_mean: f64,
}

/// Result of [`post_process`].
#[derive(Debug, Clone, PartialEq)]
pub struct PostProcessed<K: Ord> {
    /// Final index values.
    pub series: TimeSeries<K>,
    /// Constant added before smoothing.
    pub offset: f64,
    /// Benchmark rescaling applied after smoothing.
    pub rescale: Rescale,
}

/// Adds `|min| + 1` to every value so the series is at least one
/// everywhere. Returns the shifted series and the offset.
#[must_use]
pub fn apply_offset<K: Ord + Clone>(series: &TimeSeries<K>) -> (TimeSeries<K>, f64) {
    let offset = series.min().map_or(0.0, |min| min.abs() + 1.0);
    (series.map_values(|v| v + offset), offset)
}

/// Exponentially weighted moving average seeded with the first value.
///
/// Uses `alpha = 2 / (span + 1)`. Each output depends only on inputs at or
/// before its own timestamp.
///
/// # Errors
///
/// Returns [`PostError::InvalidSpan`] for a span of zero.
pub fn ewma<K: Ord + Clone>(series: &TimeSeries<K>, span: u32) -> Result<TimeSeries<K>, PostError> {
    if span < 1 {
        return Err(PostError::InvalidSpan(span));
    }
    let alpha = 2.0 / (f64::from(span) + 1.0);

    let mut state: Option<f64> = None;
    Ok(series.map_values(|x| {
        let next = state.map_or(x, |prev| alpha.mul_add(x - prev, prev));
        state = Some(next);
        next
    }))
}

/// Scales `smoothed` so its mean equals the mean benchmark price over the same
/// time span.
///
/// Only benchmark prices between the first and last smoothed timestamps,
/// inclusive, are averaged.
///
/// # Errors
///
/// Fails if `smoothed` is empty, the benchmark has no price in the span, or
/// the smoothed mean is zero.
pub fn rescale_to_benchmark<K: Ord + Clone>(
    smoothed: &TimeSeries<K>,
    benchmark: &TimeSeries<K>,
) -> Result<(TimeSeries<K>, Rescale), PostError> {
    let ((first, _), (last, _)) =
        smoothed.first().zip(smoothed.last()).ok_or(PostError::EmptySeries)?;

    let (sum, count) = benchmark
        .between(first, last)
        .fold((0.0, 0_usize), |(sum, count), (_, price)| {
            (sum + price, count + 1)
        });
    if count == 0 {
        return Err(PostError::BenchmarkOutOfSpan);
    }
    let benchmark_mean = sum / count as f64;

    let index_mean = smoothed.mean().ok_or(PostError::EmptySeries)?;
    if index_mean == 0.0 {
        return Err(PostError::ZeroMean);
    }

    let factor = benchmark_mean / index_mean;
    let rescale = Rescale {
        factor,
        benchmark_mean,
        index_mean,
    };
    Ok((smoothed.map_values(|v| v * factor), rescale))
}

/// Applies offset, smoothing and benchmark rescaling in order.
///
/// # Errors
///
/// See [`ewma`] and [`rescale_to_benchmark`].
pub fn post_process<K: Ord + Clone>(
    raw: &TimeSeries<K>,
    span: u32,
    benchmark: &TimeSeries<K>,
) -> Result<PostProcessed<K>, PostError> {
    if raw.is_empty() {
        return Err(PostError::EmptySeries);
    }

    let (shifted, offset) = apply_offset(raw);
    let smoothed = ewma(&shifted, span)?;
    let (series, rescale) = rescale_to_benchmark(&smoothed, benchmark)?;

    Ok(PostProcessed {
        series,
        offset,
        rescale,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn series(values: &[f64]) -> TimeSeries<u32> {
        values.iter().enumerate().map(|(i, &v)| (i as u32, v)).collect()
    }

    #[test]
    fn test_offset_makes_minimum_at_least_one() {
        let (shifted, offset) = apply_offset(&series(&[-2.5, 0.0, 1.5]));

        assert_relative_eq!(offset, 3.5);
        assert_relative_eq!(shifted.min().unwrap(), 1.0);
        assert!(shifted.values().all(|v| v >= 1.0));
    }

    #[test]
    fn test_offset_positive_minimum() {
        let (shifted, offset) = apply_offset(&series(&[2.0, 3.0]));

        assert_relative_eq!(offset, 3.0);
        assert_relative_eq!(shifted.min().unwrap(), 5.0);
    }

    #[test]
    fn test_ewma_recurrence() {
        // span 3 gives alpha 0.5
        let smoothed = ewma(&series(&[1.0, 3.0, 5.0]), 3).unwrap();

        assert_eq!(smoothed.values().collect::<Vec<_>>(), vec![1.0, 2.0, 3.5]);
    }

    #[test]
    fn test_ewma_span_one_is_identity() {
        let input = series(&[4.0, -1.0, 7.5]);

        assert_eq!(ewma(&input, 1).unwrap(), input);
    }

    #[test]
    fn test_ewma_rejects_zero_span() {
        assert_eq!(ewma(&series(&[1.0]), 0), Err(PostError::InvalidSpan(0)));
    }

    #[test]
    fn test_ewma_is_causal() {
        let base = [1.0, 2.0, 3.0, 4.0, 5.0, 6.0];
        let mut changed = base;
        changed[4] = 100.0;

        let a = ewma(&series(&base), 15).unwrap();
        let b = ewma(&series(&changed), 15).unwrap();

        for t in 0..4 {
            assert_eq!(a.get(&t), b.get(&t));
        }
        assert_ne!(a.get(&4), b.get(&4));
    }

    #[test]
    fn test_rescale_to_benchmark_mean() {
        // Smoothed mean 100, benchmark mean 4000 -> factor 40.
        let smoothed = series(&[90.0, 100.0, 110.0]);
        let benchmark = series(&[3900.0, 4000.0, 4100.0]);

        let (rescaled, rescale) = rescale_to_benchmark(&smoothed, &benchmark).unwrap();

        assert_relative_eq!(rescale.factor, 40.0);
        assert_relative_eq!(rescaled.get(&1).unwrap(), 4000.0);
        assert_relative_eq!(rescaled.mean().unwrap(), 4000.0);
    }

    #[test]
    fn test_rescale_ignores_benchmark_outside_span() {
        let smoothed: TimeSeries<u32> = [(2, 50.0), (3, 50.0)].into_iter().collect();
        let benchmark: TimeSeries<u32> =
            [(1, 1_000_000.0), (2, 100.0), (3, 100.0), (4, 1_000_000.0)].into_iter().collect();

        let (_, rescale) = rescale_to_benchmark(&smoothed, &benchmark).unwrap();

        assert_relative_eq!(rescale.benchmark_mean, 100.0);
        assert_relative_eq!(rescale.factor, 2.0);
    }

    #[test]
    fn test_rescale_without_benchmark_in_span_fails() {
        let smoothed: TimeSeries<u32> = [(5, 1.0), (6, 2.0)].into_iter().collect();
        let benchmark: TimeSeries<u32> = [(1, 10.0)].into_iter().collect();

        assert_eq!(
            rescale_to_benchmark(&smoothed, &benchmark).unwrap_err(),
            PostError::BenchmarkOutOfSpan
        );
    }

    #[test]
    fn test_post_process_chains_stages() {
        let raw = series(&[-1.0, 0.0, 1.0, 0.5]);
        let benchmark = series(&[200.0, 210.0, 190.0, 200.0]);

        let post = post_process(&raw, 10, &benchmark).unwrap();

        assert_relative_eq!(post.offset, 2.0);
        assert_eq!(post.series.len(), raw.len());
        assert_relative_eq!(post.series.mean().unwrap(), 200.0, epsilon = 1e-9);
        assert!(post.series.values().all(|v| v > 0.0));
    }

    #[test]
    fn test_post_process_empty_fails() {
        let benchmark = series(&[1.0]);

        assert_eq!(
            post_process(&TimeSeries::new(), 5, &benchmark).unwrap_err(),
            PostError::EmptySeries
        );
    }
}
