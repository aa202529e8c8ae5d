//! Sampling interval definitions.

use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Sampling interval requested from the provider.
///
/// The interval fixes both the alignment grid (intraday slots or business
/// days) and the span of the exponential smoothing applied to the index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum Interval {
    /// 5-minute bars.
    #[serde(rename = "5m")]
    Minute5,
    /// 15-minute bars.
    #[serde(rename = "15m")]
    Minute15,
    /// 30-minute bars.
    #[serde(rename = "30m")]
    Minute30,
    /// 60-minute bars.
    #[serde(rename = "60m")]
    Minute60,
    /// Daily bars.
    #[default]
    #[serde(rename = "1d")]
    Day1,
    /// 5-day bars.
    #[serde(rename = "5d")]
    Day5,
}

impl Interval {
    /// Returns the intraday slot width in minutes, or None for daily grids.
    #[must_use]
    pub const fn slot_minutes(&self) -> Option<u32> {
        match self {
            Self::Minute5 => Some(5),
            Self::Minute15 => Some(15),
            Self::Minute30 => Some(30),
            Self::Minute60 => Some(60),
            Self::Day1 | Self::Day5 => None,
        }
    }

    /// Returns true if the interval aligns onto a date × time-of-day grid.
    #[must_use]
    pub const fn is_intraday(&self) -> bool {
        self.slot_minutes().is_some()
    }

    /// Returns the exponential smoothing span.
    ///
    /// Finer intervals carry more noise per sample and get longer spans.
    #[must_use]
    pub const fn ema_span(&self) -> u32 {
        match self {
            Self::Minute5 => 50,
            Self::Minute15 | Self::Minute30 => 25,
            Self::Minute60 => 20,
            Self::Day1 => 15,
            Self::Day5 => 10,
        }
    }

    /// Returns the interval as the provider's string identifier.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Minute5 => "5m",
            Self::Minute15 => "15m",
            Self::Minute30 => "30m",
            Self::Minute60 => "60m",
            Self::Day1 => "1d",
            Self::Day5 => "5d",
        }
    }

    /// Returns all available intervals.
    #[must_use]
    pub const fn all() -> &'static [Self] {
        &[
            Self::Minute5,
            Self::Minute15,
            Self::Minute30,
            Self::Minute60,
            Self::Day1,
            Self::Day5,
        ]
    }
}

impl std::fmt::Display for Interval {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Interval {
    type Err = IntervalParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "5m" | "m5" | "minute5" => Ok(Self::Minute5),
            "15m" | "m15" | "minute15" => Ok(Self::Minute15),
            "30m" | "m30" | "minute30" => Ok(Self::Minute30),
            "60m" | "m60" | "1h" | "h1" | "hour" => Ok(Self::Minute60),
            "1d" | "d1" | "day" | "daily" => Ok(Self::Day1),
            "5d" | "d5" | "week" => Ok(Self::Day5),
            _ => Err(IntervalParseError(s.to_string())),
        }
    }
}

/// Error returned when parsing an invalid interval string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IntervalParseError(String);

impl std::fmt::Display for IntervalParseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "invalid interval '{}', expected one of: 5m, 15m, 30m, 60m, 1d, 5d",
            self.0
        )
    }
}

impl std::error::Error for IntervalParseError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_interval_grid() {
        assert_eq!(Interval::Minute5.slot_minutes(), Some(5));
        assert_eq!(Interval::Minute60.slot_minutes(), Some(60));
        assert!(!Interval::Day1.is_intraday());
        assert!(!Interval::Day5.is_intraday());
    }

    #[test]
    fn test_span_shrinks_with_coarser_intervals() {
        let spans: Vec<u32> = Interval::all().iter().map(Interval::ema_span).collect();
        assert_eq!(spans, vec![50, 25, 25, 20, 15, 10]);
        assert!(spans.windows(2).all(|w| w[0] >= w[1]));
    }

    #[test]
    fn test_interval_parse() {
        assert_eq!("5m".parse::<Interval>().unwrap(), Interval::Minute5);
        assert_eq!("1H".parse::<Interval>().unwrap(), Interval::Minute60);
        assert_eq!("daily".parse::<Interval>().unwrap(), Interval::Day1);
        assert!("2m".parse::<Interval>().is_err());
    }
}
