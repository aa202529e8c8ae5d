//! Alignment of instrument series on a common time grid.

use std::collections::{BTreeMap, HashMap};

use chrono::{DateTime, LocalResult, NaiveDate, NaiveTime, Offset, TimeZone, Timelike};
use chrono_tz::Tz;
use orbis_types::{DateRange, Interval, TimeSeries};
use thiserror::Error;

use crate::timezone::start_of_day;

/// Errors raised while aligning series.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum AlignError {
    /// No series holds any observation.
    #[error("No series to align")]
    NoSeries,

    /// The observed span contains no business day.
    #[error("No business days between {start} and {end}")]
    EmptyGrid {
        /// Earliest observed date.
        start: NaiveDate,
        /// Latest observed date.
        end: NaiveDate,
    },
}

/// Resolution of the alignment grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GridSpec {
    /// One row per business day.
    Daily,
    /// One row per fixed-length slot of every business day.
    Intraday {
        /// Slot length in minutes.
        slot_minutes: u32,
    },
}

impl From<Interval> for GridSpec {
    fn from(interval: Interval) -> Self {
        interval
            .slot_minutes()
            .map_or(Self::Daily, |slot_minutes| Self::Intraday { slot_minutes })
    }
}

/// Local calendar position of a grid row: date, slot start and UTC offset in
/// seconds. The offset tells apart the two passes through a repeated hour.
type SlotKey = (NaiveDate, NaiveTime, i32);

impl GridSpec {
    /// Local times of day at which intraday rows start.
    fn slots(self) -> Vec<NaiveTime> {
        match self {
            Self::Daily => vec![NaiveTime::MIN],
            Self::Intraday { slot_minutes } => {
                let step = slot_minutes.clamp(1, 24 * 60);
                (0..24 * 60)
                    .step_by(step as usize)
                    .filter_map(|minute| {
                        NaiveTime::from_hms_opt(minute / 60, minute % 60, 0)
                    })
                    .collect()
            }
        }
    }

    /// Row an observation at `instant` falls into.
    fn key(self, instant: &DateTime<Tz>) -> SlotKey {
        let local = instant.naive_local();
        match self {
            Self::Daily => (local.date(), NaiveTime::MIN, 0),
            Self::Intraday { slot_minutes } => {
                let step = slot_minutes.clamp(1, 24 * 60);
                let minute = local.time().num_seconds_from_midnight() / 60;
                let floored = minute - minute % step;
                let time = NaiveTime::from_hms_opt(floored / 60, floored % 60, 0)
                    .unwrap_or(NaiveTime::MIN);
                (local.date(), time, utc_offset(instant))
            }
        }
    }

    /// Grid rows of one business day, in any order.
    fn rows_on(
        self,
        date: NaiveDate,
        slots: &[NaiveTime],
        tz: Tz,
    ) -> Vec<(DateTime<Tz>, SlotKey)> {
        match self {
            Self::Daily => vec![(start_of_day(date, tz), (date, NaiveTime::MIN, 0))],
            Self::Intraday { .. } => slots
                .iter()
                .flat_map(|&time| {
                    let instants = match tz.from_local_datetime(&date.and_time(time)) {
                        LocalResult::Single(instant) => vec![instant],
                        LocalResult::Ambiguous(first, second) => vec![first, second],
                        LocalResult::None => Vec::new(),
                    };
                    instants
                        .into_iter()
                        .map(move |instant| (instant, (date, time, utc_offset(&instant))))
                })
                .collect(),
        }
    }
}

fn utc_offset(instant: &DateTime<Tz>) -> i32 {
    instant.offset().fix().local_minus_utc()
}

/// The ordered set of timestamps every instrument is reindexed onto.
#[derive(Debug, Clone, PartialEq)]
pub struct UnifiedGrid {
    spec: GridSpec,
    rows: Vec<(DateTime<Tz>, SlotKey)>,
}

impl UnifiedGrid {
    /// Builds the grid spanning every business day between the earliest and
    /// latest observation of any series.
    ///
    /// Daily rows sit at the start of each day in `tz`, so every business day
    /// has a row even where local midnight does not exist. Intraday slots are
    /// placed in `tz`: a repeated local time yields one row per instant and a
    /// local time that does not exist yields none.
    ///
    /// # Errors
    ///
    /// Returns [`AlignError::NoSeries`] if no series has observations and
    /// [`AlignError::EmptyGrid`] if the span holds no business day.
    pub fn build<'a>(
        spec: GridSpec,
        series: impl IntoIterator<Item = &'a TimeSeries<DateTime<Tz>>>,
        tz: Tz,
    ) -> Result<Self, AlignError> {
        let bounds = series
            .into_iter()
            .filter_map(|s| {
                Some((s.first()?.0.date_naive(), s.last()?.0.date_naive()))
            })
            .reduce(|(lo, hi), (first, last)| (lo.min(first), hi.max(last)));
        let (start, end) = bounds.ok_or(AlignError::NoSeries)?;

        let range = DateRange::new(start, end).map_err(|_| AlignError::EmptyGrid { start, end })?;
        let slots = spec.slots();
        let mut rows: Vec<_> = range
            .business_days()
            .flat_map(|date| spec.rows_on(date, &slots, tz))
            .collect();
        rows.sort_by_key(|(instant, _)| *instant);

        if rows.is_empty() {
            return Err(AlignError::EmptyGrid { start, end });
        }

        Ok(Self { spec, rows })
    }

    /// Returns the grid resolution.
    #[must_use]
    pub const fn spec(&self) -> GridSpec {
        self.spec
    }

    /// Returns the number of grid timestamps.
    #[must_use]
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Returns true if the grid has no timestamps.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Iterates over the grid timestamps in order.
    pub fn timestamps(&self) -> impl Iterator<Item = &DateTime<Tz>> {
        self.rows.iter().map(|(instant, _)| instant)
    }
}

/// Instruments reindexed onto a shared grid.
///
/// Columns are instrument ids in ascending order. A cell is `None` when the
/// instrument has no observation for that row. Rows where every cell is
/// `None` are not kept.
#[derive(Debug, Clone, PartialEq)]
pub struct CombinedTable {
    timestamps: Vec<DateTime<Tz>>,
    columns: Vec<String>,
    cells: Vec<Vec<Option<f64>>>,
}

impl CombinedTable {
    /// Returns the row timestamps.
    #[must_use]
    pub fn timestamps(&self) -> &[DateTime<Tz>] {
        &self.timestamps
    }

    /// Returns the column ids.
    #[must_use]
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    /// Returns the number of rows.
    #[must_use]
    pub fn len(&self) -> usize {
        self.timestamps.len()
    }

    /// Returns true if no row holds a value.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.timestamps.is_empty()
    }

    /// Returns the number of columns.
    #[must_use]
    pub fn width(&self) -> usize {
        self.columns.len()
    }

    /// Iterates over `(timestamp, cells)` rows in time order.
    pub fn rows(&self) -> impl Iterator<Item = (&DateTime<Tz>, &[Option<f64>])> {
        self.timestamps.iter().zip(self.cells.iter().map(Vec::as_slice))
    }

    /// Returns one cell.
    #[must_use]
    pub fn cell(&self, row: usize, column: &str) -> Option<f64> {
        let index = self.columns.iter().position(|c| c == column)?;
        self.cells.get(row)?.get(index).copied().flatten()
    }
}

/// Reindexes every series onto the unified grid.
///
/// Observations match grid rows by local calendar position only: the date for
/// daily grids, the date, floored slot start and UTC offset for intraday grids. Nothing is
/// interpolated. When several observations fall into one row the latest wins.
///
/// # Errors
///
/// See [`UnifiedGrid::build`].
pub fn align(
    series: &BTreeMap<String, TimeSeries<DateTime<Tz>>>,
    spec: GridSpec,
    tz: Tz,
) -> Result<CombinedTable, AlignError> {
    let grid = UnifiedGrid::build(spec, series.values(), tz)?;

    let columns: Vec<String> = series.keys().cloned().collect();
    let lookups: Vec<HashMap<SlotKey, f64>> = series
        .values()
        .map(|s| {
            s.iter()
                .map(|(instant, v)| (spec.key(instant), v))
                .collect()
        })
        .collect();

    let mut timestamps = Vec::with_capacity(grid.len());
    let mut cells = Vec::with_capacity(grid.len());
    for (instant, key) in &grid.rows {
        let row: Vec<Option<f64>> = lookups.iter().map(|l| l.get(key).copied()).collect();
        if row.iter().any(Option::is_some) {
            timestamps.push(*instant);
            cells.push(row);
        }
    }

    tracing::debug!(grid = grid.len(), kept = timestamps.len(), "aligned series on grid");

    Ok(CombinedTable {
        timestamps,
        columns,
        cells,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::timezone::DEFAULT_TIMEZONE;
    use chrono::Utc;

    fn local(y: i32, m: u32, d: u32, h: u32, min: u32) -> DateTime<Tz> {
        DEFAULT_TIMEZONE.with_ymd_and_hms(y, m, d, h, min, 0).unwrap()
    }

    fn day(d: u32) -> DateTime<Tz> {
        local(2024, 1, d, 0, 0)
    }

    fn series(points: &[(DateTime<Tz>, f64)]) -> TimeSeries<DateTime<Tz>> {
        points.iter().copied().collect()
    }

    #[test]
    fn test_grid_spec_from_interval() {
        assert_eq!(GridSpec::from(Interval::Day1), GridSpec::Daily);
        assert_eq!(GridSpec::from(Interval::Day5), GridSpec::Daily);
        assert_eq!(
            GridSpec::from(Interval::Minute15),
            GridSpec::Intraday { slot_minutes: 15 }
        );
    }

    #[test]
    fn test_intraday_slots_cover_day() {
        let slots = GridSpec::Intraday { slot_minutes: 15 }.slots();

        assert_eq!(slots.len(), 96);
        assert_eq!(slots[0], NaiveTime::MIN);
        assert_eq!(slots[95], NaiveTime::from_hms_opt(23, 45, 0).unwrap());
    }

    #[test]
    fn test_daily_grid_skips_weekends() {
        // Friday 2024-01-05 through Tuesday 2024-01-09.
        let s = series(&[(day(5), 1.0), (day(9), 2.0)]);

        let grid = UnifiedGrid::build(GridSpec::Daily, [&s], DEFAULT_TIMEZONE).unwrap();

        let dates: Vec<_> = grid.timestamps().map(DateTime::date_naive).collect();
        assert_eq!(
            dates,
            vec![
                NaiveDate::from_ymd_opt(2024, 1, 5).unwrap(),
                NaiveDate::from_ymd_opt(2024, 1, 8).unwrap(),
                NaiveDate::from_ymd_opt(2024, 1, 9).unwrap(),
            ]
        );
    }

    #[test]
    fn test_weekend_only_grid_is_empty() {
        let s = series(&[(day(6), 1.0), (day(7), 2.0)]);

        assert!(matches!(
            UnifiedGrid::build(GridSpec::Daily, [&s], DEFAULT_TIMEZONE),
            Err(AlignError::EmptyGrid { .. })
        ));
    }

    #[test]
    fn test_no_observations_fails() {
        let empty = TimeSeries::new();
        let input = BTreeMap::from([("A".to_string(), empty)]);

        assert_eq!(
            align(&input, GridSpec::Daily, DEFAULT_TIMEZONE).unwrap_err(),
            AlignError::NoSeries
        );
    }

    #[test]
    fn test_align_daily_marks_missing_cells() {
        let input = BTreeMap::from([
            ("B".to_string(), series(&[(day(8), 20.0), (day(10), 26.0)])),
            ("A".to_string(), series(&[(day(8), 10.0), (day(9), 11.0), (day(10), 12.0)])),
        ]);

        let table = align(&input, GridSpec::Daily, DEFAULT_TIMEZONE).unwrap();

        assert_eq!(table.columns(), &["A".to_string(), "B".to_string()]);
        assert_eq!(table.len(), 3);
        assert_eq!(table.cell(1, "A"), Some(11.0));
        assert_eq!(table.cell(1, "B"), None);
        assert_eq!(table.cell(2, "B"), Some(26.0));
    }

    #[test]
    fn test_all_absent_rows_dropped() {
        // Nothing observed on Tuesday the 9th.
        let input = BTreeMap::from([
            ("A".to_string(), series(&[(day(8), 1.0), (day(10), 3.0)])),
            ("B".to_string(), series(&[(day(8), 2.0), (day(10), 4.0)])),
        ]);

        let table = align(&input, GridSpec::Daily, DEFAULT_TIMEZONE).unwrap();

        assert_eq!(table.timestamps(), &[day(8), day(10)]);
        for (_, cells) in table.rows() {
            assert!(cells.iter().any(Option::is_some));
        }
    }

    #[test]
    fn test_intraday_observations_floor_into_slots() {
        let spec = GridSpec::Intraday { slot_minutes: 15 };
        let input = BTreeMap::from([
            ("A".to_string(), series(&[(local(2024, 1, 9, 9, 31), 1.0)])),
            ("B".to_string(), series(&[(local(2024, 1, 9, 9, 47), 2.0)])),
        ]);

        let table = align(&input, spec, DEFAULT_TIMEZONE).unwrap();

        assert_eq!(
            table.timestamps(),
            &[local(2024, 1, 9, 9, 30), local(2024, 1, 9, 9, 45)]
        );
        assert_eq!(table.cell(0, "A"), Some(1.0));
        assert_eq!(table.cell(1, "B"), Some(2.0));
    }

    #[test]
    fn test_latest_observation_in_slot_wins() {
        let spec = GridSpec::Intraday { slot_minutes: 60 };
        let points = [
            (local(2024, 1, 9, 10, 5), 1.0),
            (local(2024, 1, 9, 10, 55), 2.0),
        ];
        let input = BTreeMap::from([("A".to_string(), series(&points))]);

        let table = align(&input, spec, DEFAULT_TIMEZONE).unwrap();

        assert_eq!(table.len(), 1);
        assert_eq!(table.cell(0, "A"), Some(2.0));
    }

    #[test]
    fn test_daily_row_kept_when_midnight_is_skipped() {
        // Tehran moved clocks from 00:00 to 01:00 on Tuesday 2022-03-22.
        let tz = chrono_tz::Asia::Tehran;
        let points: Vec<_> = (21..=23)
            .map(|d| {
                let date = NaiveDate::from_ymd_opt(2022, 3, d).unwrap();
                (start_of_day(date, tz), f64::from(d))
            })
            .collect();
        let input = BTreeMap::from([("A".to_string(), series(&points))]);

        let table = align(&input, GridSpec::Daily, tz).unwrap();

        assert_eq!(table.len(), 3);
        assert_eq!(
            table.timestamps()[1].date_naive(),
            NaiveDate::from_ymd_opt(2022, 3, 22).unwrap()
        );
        assert_eq!(table.timestamps()[1].hour(), 1);
        assert_eq!(table.cell(1, "A"), Some(22.0));
    }

    #[test]
    fn test_repeated_local_hour_keeps_both_instants() {
        // Tehran repeated 23:00-24:00 on Wednesday 2022-09-21.
        let tz = chrono_tz::Asia::Tehran;
        let first = Utc.with_ymd_and_hms(2022, 9, 21, 18, 40, 0).unwrap().with_timezone(&tz);
        let second = Utc.with_ymd_and_hms(2022, 9, 21, 19, 40, 0).unwrap().with_timezone(&tz);
        assert_eq!(first.naive_local(), second.naive_local());
        let input = BTreeMap::from([("A".to_string(), series(&[(first, 1.0), (second, 2.0)]))]);

        let table = align(&input, GridSpec::Intraday { slot_minutes: 60 }, tz).unwrap();

        assert_eq!(table.len(), 2);
        assert!(table.timestamps()[0] < table.timestamps()[1]);
        assert_eq!(table.timestamps()[0].hour(), 23);
        assert_eq!(table.timestamps()[1].hour(), 23);
        assert_eq!(table.cell(0, "A"), Some(1.0));
        assert_eq!(table.cell(1, "A"), Some(2.0));
    }

    #[test]
    fn test_timestamps_strictly_increasing() {
        let spec = GridSpec::Intraday { slot_minutes: 30 };
        let points: Vec<_> = (0..48)
            .map(|i| {
                let instant = local(2024, 3, 8, 0, 0) + chrono::TimeDelta::minutes(i * 90);
                (instant, 1.0)
            })
            .collect();
        let input = BTreeMap::from([("A".to_string(), series(&points))]);

        let table = align(&input, spec, DEFAULT_TIMEZONE).unwrap();

        assert!(table.timestamps().windows(2).all(|w| w[0] < w[1]));
    }
}
