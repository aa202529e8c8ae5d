//! Chart JSON parsing.
//!
//! A chart document carries one result with parallel arrays of unix
//! timestamps and prices. Daily bars are read from the dividend and split
//! adjusted `adjclose` array; intraday bars only carry `close`.

use chrono::{DateTime, FixedOffset, NaiveDate, Offset, Utc};
use chrono_tz::Tz;
use orbis_types::{RawTimestamp, TimeSeries};
use serde::Deserialize;
use thiserror::Error;

/// Errors that can occur while parsing a chart document.
#[derive(Error, Debug)]
pub enum ParseError {
    /// Body is not valid chart JSON.
    #[error("Invalid chart JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// Provider reported an error.
    #[error("Provider error {code}: {description}")]
    Provider {
        /// Provider error code.
        code: String,
        /// Provider error message.
        description: String,
    },

    /// Document is structurally inconsistent.
    #[error("Malformed chart: {0}")]
    Malformed(String),
}

#[derive(Debug, Deserialize)]
struct ChartResponse {
    chart: Chart,
}

#[derive(Debug, Deserialize)]
struct Chart {
    result: Option<Vec<ChartResult>>,
    error: Option<ChartErrorBody>,
}

#[derive(Debug, Deserialize)]
struct ChartErrorBody {
    code: String,
    #[serde(default)]
    description: String,
}

#[derive(Debug, Deserialize)]
struct ChartResult {
    meta: ChartMeta,
    #[serde(default)]
    timestamp: Vec<i64>,
    indicators: Indicators,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ChartMeta {
    #[serde(default)]
    exchange_timezone_name: Option<String>,
    #[serde(default)]
    gmtoffset: i32,
}

#[derive(Debug, Deserialize)]
struct Indicators {
    #[serde(default)]
    quote: Vec<Quote>,
    #[serde(default)]
    adjclose: Vec<AdjClose>,
}

#[derive(Debug, Deserialize)]
struct Quote {
    #[serde(default)]
    close: Vec<Option<f64>>,
}

#[derive(Debug, Deserialize)]
struct AdjClose {
    #[serde(default)]
    adjclose: Vec<Option<f64>>,
}

/// Exchange clock used to express bar timestamps.
#[derive(Debug, Clone, Copy)]
enum ExchangeClock {
    Zone(Tz),
    Fixed(FixedOffset),
}

impl ExchangeClock {
    fn from_meta(meta: &ChartMeta) -> Self {
        meta.exchange_timezone_name
            .as_deref()
            .and_then(|name| name.parse::<Tz>().ok())
            .map_or_else(
                || Self::Fixed(FixedOffset::east_opt(meta.gmtoffset).unwrap_or(Utc.fix())),
                Self::Zone,
            )
    }

    fn localize(self, unix_seconds: i64) -> Option<DateTime<FixedOffset>> {
        let utc = DateTime::from_timestamp(unix_seconds, 0)?;
        Some(match self {
            Self::Zone(tz) => utc.with_timezone(&tz).fixed_offset(),
            Self::Fixed(offset) => utc.with_timezone(&offset),
        })
    }
}

/// Parses a chart document into a price series.
///
/// Daily documents (`daily = true`) yield [`RawTimestamp::Date`] keys holding
/// the exchange-local trading date; intraday documents yield
/// [`RawTimestamp::Aware`] instants in the exchange's own offset. Bars with a
/// missing or non-finite price are dropped.
///
/// Returns `Ok(None)` when the provider has no data for the symbol.
///
/// # Errors
///
/// Returns an error if the JSON is invalid, the provider reports an error,
/// or the timestamp and price arrays disagree in length.
pub fn parse_chart(
    body: &[u8],
    daily: bool,
) -> Result<Option<TimeSeries<RawTimestamp>>, ParseError> {
    let response: ChartResponse = serde_json::from_slice(body)?;
    let chart = response.chart;

    let Some(result) = chart.result.and_then(|r| r.into_iter().next()) else {
        return match chart.error {
            Some(err) if err.code != "Not Found" => Err(ParseError::Provider {
                code: err.code,
                description: err.description,
            }),
            _ => Ok(None),
        };
    };

    let close = result.indicators.quote.into_iter().next().map(|q| q.close);
    let adjclose = result.indicators.adjclose.into_iter().next().map(|a| a.adjclose);
    let prices = match (daily, adjclose) {
        (true, Some(adjusted)) => adjusted,
        _ => close.unwrap_or_default(),
    };

    if result.timestamp.is_empty() {
        return Ok(None);
    }
    if prices.len() != result.timestamp.len() {
        return Err(ParseError::Malformed(format!(
            "{} timestamps but {} prices",
            result.timestamp.len(),
            prices.len()
        )));
    }

    let clock = ExchangeClock::from_meta(&result.meta);
    let mut series = TimeSeries::new();
    for (&ts, price) in result.timestamp.iter().zip(prices) {
        let Some(price) = price.filter(|p| p.is_finite()) else {
            continue;
        };
        let local = clock
            .localize(ts)
            .ok_or_else(|| ParseError::Malformed(format!("timestamp {ts} out of range")))?;
        let key = if daily {
            RawTimestamp::Date(local.date_naive())
        } else {
            RawTimestamp::Aware(local)
        };
        series.insert(key, price);
    }

    Ok((!series.is_empty()).then_some(series))
}

/// Parses a daily exchange-rate chart into a date-keyed rate series.
///
/// # Errors
///
/// Returns an error under the same conditions as [`parse_chart`].
pub fn parse_rates(body: &[u8]) -> Result<Option<TimeSeries<NaiveDate>>, ParseError> {
    let series = parse_chart(body, true)?;
    Ok(series.map(|series| series.map_keys(RawTimestamp::date)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Timelike;

    const DAILY: &str = r#"{
        "chart": {
            "result": [{
                "meta": {"currency": "EUR", "symbol": "^GDAXI", "exchangeTimezoneName": "Europe/Berlin", "gmtoffset": 3600},
                "timestamp": [1704787200, 1704873600, 1704960000],
                "indicators": {
                    "quote": [{"close": [16700.0, 16690.0, null]}],
                    "adjclose": [{"adjclose": [16688.4, 16689.8, null]}]
                }
            }],
            "error": null
        }
    }"#;

    #[test]
    fn test_parse_daily_uses_adjclose_and_drops_nulls() {
        let series = parse_chart(DAILY.as_bytes(), true).unwrap().unwrap();

        assert_eq!(series.len(), 2);
        let (first, value) = series.first().unwrap();
        // 2024-01-09 08:00 UTC is 09:00 in Berlin.
        assert_eq!(
            *first,
            RawTimestamp::Date(NaiveDate::from_ymd_opt(2024, 1, 9).unwrap())
        );
        assert!((value - 16688.4).abs() < 1e-9);
    }

    #[test]
    fn test_parse_intraday_keeps_exchange_offset() {
        let body = r#"{
            "chart": {
                "result": [{
                    "meta": {"exchangeTimezoneName": "Asia/Tokyo", "gmtoffset": 32400},
                    "timestamp": [1704758400],
                    "indicators": {"quote": [{"close": [33500.5]}]}
                }],
                "error": null
            }
        }"#;
        let series = parse_chart(body.as_bytes(), false).unwrap().unwrap();
        let (stamp, _) = series.first().unwrap();

        let RawTimestamp::Aware(dt) = stamp else {
            panic!("expected an aware timestamp");
        };
        assert_eq!(dt.offset().local_minus_utc(), 9 * 3600);
        assert_eq!(dt.hour(), 9);
    }

    #[test]
    fn test_parse_not_found_is_none() {
        let body = r#"{"chart":{"result":null,"error":{"code":"Not Found","description":"No data found, symbol may be delisted"}}}"#;
        assert!(parse_chart(body.as_bytes(), true).unwrap().is_none());
    }

    #[test]
    fn test_parse_provider_error() {
        let body = r#"{"chart":{"result":null,"error":{"code":"Unprocessable Entity","description":"Invalid input - interval=7m is not supported"}}}"#;
        assert!(matches!(
            parse_chart(body.as_bytes(), false),
            Err(ParseError::Provider { .. })
        ));
    }

    #[test]
    fn test_parse_length_mismatch() {
        let body = r#"{"chart":{"result":[{"meta":{},"timestamp":[1,2],"indicators":{"quote":[{"close":[1.0]}]}}],"error":null}}"#;
        assert!(matches!(
            parse_chart(body.as_bytes(), false),
            Err(ParseError::Malformed(_))
        ));
    }

    #[test]
    fn test_parse_rates_keys_by_date() {
        let rates = parse_rates(DAILY.as_bytes()).unwrap().unwrap();
        let dates: Vec<_> = rates.keys().map(ToString::to_string).collect();
        assert_eq!(dates, vec!["2024-01-09", "2024-01-10"]);
    }
}
