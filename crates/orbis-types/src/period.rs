//! Lookback periods, date ranges and business-day iteration.

use chrono::{Datelike, NaiveDate, Weekday};
use std::str::FromStr;

use crate::PeriodError;

/// Maximum lookback accepted for a single run, bounding retrieval cost.
pub const MAX_PERIOD_DAYS: u32 = 2000;

/// Lookback length in calendar days.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Period {
    days: u32,
}

impl Period {
    /// Creates a new period, validating that `1 <= days <= MAX_PERIOD_DAYS`.
    ///
    /// # Errors
    ///
    /// Returns an error if the number of days is out of bounds.
    pub const fn new(days: u32) -> Result<Self, PeriodError> {
        if days == 0 || days > MAX_PERIOD_DAYS {
            return Err(PeriodError::OutOfBounds {
                days,
                max: MAX_PERIOD_DAYS,
            });
        }
        Ok(Self { days })
    }

    /// Returns the number of days.
    #[must_use]
    pub const fn days(&self) -> u32 {
        self.days
    }
}

impl std::fmt::Display for Period {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}d", self.days)
    }
}

impl FromStr for Period {
    type Err = PeriodError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let digits = trimmed.strip_suffix(['d', 'D']).unwrap_or(trimmed);
        let days: u32 = digits
            .parse()
            .map_err(|_| PeriodError::InvalidFormat(s.to_string()))?;
        Self::new(days)
    }
}

/// A range of dates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateRange {
    /// Start date (inclusive).
    pub start: NaiveDate,
    /// End date (inclusive).
    pub end: NaiveDate,
}

impl DateRange {
    /// Creates a new date range, validating that start <= end.
    ///
    /// # Errors
    ///
    /// Returns an error if start > end.
    pub fn new(start: NaiveDate, end: NaiveDate) -> Result<Self, PeriodError> {
        if start > end {
            return Err(PeriodError::InvalidRange { start, end });
        }
        Ok(Self { start, end })
    }

    /// Returns an iterator over the Monday–Friday dates in the range.
    #[must_use]
    pub const fn business_days(&self) -> BusinessDays {
        BusinessDays {
            current: self.start,
            end: self.end,
        }
    }
}

impl std::fmt::Display for DateRange {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} to {}", self.start, self.end)
    }
}

/// Returns true if the date falls on a weekday.
#[must_use]
pub fn is_business_day(date: NaiveDate) -> bool {
    !matches!(date.weekday(), Weekday::Sat | Weekday::Sun)
}

/// Iterator over the business days of a date range.
#[derive(Debug, Clone)]
pub struct BusinessDays {
    current: NaiveDate,
    end: NaiveDate,
}

impl Iterator for BusinessDays {
    type Item = NaiveDate;

    fn next(&mut self) -> Option<Self::Item> {
        while self.current <= self.end {
            let date = self.current;
            self.current = date.succ_opt()?;
            if is_business_day(date) {
                return Some(date);
            }
        }
        None
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        if self.current > self.end {
            return (0, Some(0));
        }
        let days = (self.end - self.current).num_days() as usize + 1;
        (0, Some(days))
    }
}
