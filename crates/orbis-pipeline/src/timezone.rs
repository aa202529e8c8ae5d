//! Conversion of provider timestamps into a single reference zone.

use chrono::{DateTime, NaiveDate, NaiveTime, TimeDelta, TimeZone, Utc};
use chrono_tz::Tz;
use orbis_types::{RawTimestamp, TimeSeries};

/// Zone the index is reported in unless configured otherwise.
pub const DEFAULT_TIMEZONE: Tz = chrono_tz::America::New_York;

/// Places a provider timestamp in `tz`.
///
/// Zone-aware instants are converted and naive wall-clock times are read as
/// UTC. A bare date names a trading day rather than an instant, so it maps to
/// the start of that same day in `tz`.
#[must_use]
pub fn localize(stamp: &RawTimestamp, tz: Tz) -> DateTime<Tz> {
    match stamp {
        RawTimestamp::Date(date) => start_of_day(*date, tz),
        RawTimestamp::Naive(naive) => Utc.from_utc_datetime(naive).with_timezone(&tz),
        RawTimestamp::Aware(instant) => instant.with_timezone(&tz),
    }
}

/// Re-keys a series into `tz`.
///
/// Distinct instants stay distinct, so ordering and length are preserved for
/// instant-based series.
#[must_use]
pub fn to_reference_zone(series: &TimeSeries<RawTimestamp>, tz: Tz) -> TimeSeries<DateTime<Tz>> {
    series.map_keys(|stamp| localize(stamp, tz))
}

/// First instant of `date` in `tz`.
///
/// Zones that skip midnight on a transition day start at the first local
/// time that exists.
pub(crate) fn start_of_day(date: NaiveDate, tz: Tz) -> DateTime<Tz> {
    let midnight = date.and_time(NaiveTime::MIN);
    (0..=2)
        .find_map(|hours| {
            let local = midnight + TimeDelta::hours(hours);
            tz.from_local_datetime(&local).earliest()
        })
        .unwrap_or_else(|| Utc.from_utc_datetime(&midnight).with_timezone(&tz))
}
