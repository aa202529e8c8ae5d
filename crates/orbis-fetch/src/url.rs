//! Chart API URL construction.

use orbis_types::Interval;
use reqwest::Url;

use crate::FetchError;

/// Base URL of the chart API.
pub const BASE_URL: &str = "https://query1.finance.yahoo.com/v8/finance/chart";

/// Builds the chart URL for a symbol.
///
/// URL format: `{base}/{SYMBOL}?range={days}d&interval={interval}`
///
/// # Example
///
/// ```
/// use orbis_fetch::url::{BASE_URL, chart_url};
/// use orbis_types::Interval;
///
/// let url = chart_url(BASE_URL, "ACWI", 365, Interval::Day1).unwrap();
/// assert_eq!(
///     url.as_str(),
///     "https://query1.finance.yahoo.com/v8/finance/chart/ACWI?range=365d&interval=1d"
/// );
/// ```
///
/// # Errors
///
/// Returns an error if `base` is not a valid base URL.
pub fn chart_url(
    base: &str,
    symbol: &str,
    range_days: u32,
    interval: Interval,
) -> Result<Url, FetchError> {
    let mut url = Url::parse(base).map_err(|e| FetchError::InvalidUrl(e.to_string()))?;
    url.path_segments_mut()
        .map_err(|()| FetchError::InvalidUrl(base.to_string()))?
        .pop_if_empty()
        .push(symbol);
    url.query_pairs_mut()
        .append_pair("range", &format!("{range_days}d"))
        .append_pair("interval", interval.as_str());
    Ok(url)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_chart_url_intraday() {
        let url = chart_url(BASE_URL, "EEM", 7, Interval::Minute15).unwrap();
        assert!(url.as_str().ends_with("/chart/EEM?range=7d&interval=15m"));
    }

    #[test]
    fn test_chart_url_fx_symbol() {
        let url = chart_url(BASE_URL, "EUR=X", 2200, Interval::Day1).unwrap();
        assert!(url.path().ends_with("/EUR=X"));
        assert_eq!(url.query(), Some("range=2200d&interval=1d"));
    }

    #[test]
    fn test_chart_url_trailing_slash() {
        let url = chart_url("http://localhost:8080/chart/", "^GSPC", 30, Interval::Day1).unwrap();
        assert!(url.path().starts_with("/chart/"));
        assert!(!url.path().contains("//"));
    }

    #[test]
    fn test_chart_url_invalid_base() {
        assert!(chart_url("not a url", "ACWI", 30, Interval::Day1).is_err());
    }
}
