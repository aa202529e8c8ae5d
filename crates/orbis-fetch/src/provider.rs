//! Market data provider abstraction.

use async_trait::async_trait;
use chrono::NaiveDate;
use orbis_types::{Currency, Interval, Period, RawTimestamp, TimeSeries};

use crate::url::chart_url;
use crate::{ChartClient, FetchError, parse_chart, parse_rates};

/// Exchange-rate lookback in days, longer than any index period so the
/// earliest prices have a prior rate to fall back on.
pub const FX_LOOKBACK_DAYS: u32 = 2200;

/// Source of price and exchange-rate series.
///
/// `Ok(None)` means the provider has no data for the request; callers treat
/// that as missing data and exclude the instrument.
#[async_trait]
pub trait PriceProvider: Send + Sync {
    /// Fetches adjusted close prices for an instrument.
    async fn fetch(
        &self,
        symbol: &str,
        period: Period,
        interval: Interval,
    ) -> Result<Option<TimeSeries<RawTimestamp>>, FetchError>;

    /// Fetches daily rates quoted as units of `currency` per one US dollar.
    async fn fetch_fx(
        &self,
        currency: Currency,
        lookback_days: u32,
    ) -> Result<Option<TimeSeries<NaiveDate>>, FetchError>;
}

#[async_trait]
impl PriceProvider for ChartClient {
    async fn fetch(
        &self,
        symbol: &str,
        period: Period,
        interval: Interval,
    ) -> Result<Option<TimeSeries<RawTimestamp>>, FetchError> {
        let url = chart_url(&self.config().base_url, symbol, period.days(), interval)?;
        let Some(body) = self.download(url).await? else {
            return Ok(None);
        };
        Ok(parse_chart(&body, !interval.is_intraday())?)
    }

    async fn fetch_fx(
        &self,
        currency: Currency,
        lookback_days: u32,
    ) -> Result<Option<TimeSeries<NaiveDate>>, FetchError> {
        let url = chart_url(
            &self.config().base_url,
            &currency.fx_symbol(),
            lookback_days,
            Interval::Day1,
        )?;
        let Some(body) = self.download(url).await? else {
            return Ok(None);
        };
        Ok(parse_rates(&body)?)
    }
}
