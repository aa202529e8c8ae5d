//! Synthetic market data for benchmarking the orbis pipeline.

use chrono::{NaiveDate, TimeDelta, TimeZone, Utc};
use orbis_lib::{
    Currency, ExchangeRates, IndexConfig, InstrumentSeries, Interval, PipelineInput,
    RawTimestamp, TimeSeries, WeightTable, is_business_day,
};

/// Shape of a generated market.
#[derive(Debug, Clone, Copy)]
pub struct SyntheticMarket {
    /// Number of instruments; every third one is quoted in EUR.
    pub instruments: usize,
    /// Calendar days of history.
    pub days: u32,
    /// Sampling interval.
    pub interval: Interval,
    /// Seed of the price walk.
    pub seed: u64,
}

impl SyntheticMarket {
    /// Creates a daily market with a fixed seed.
    #[must_use]
    pub const fn daily(instruments: usize, days: u32) -> Self {
        Self {
            instruments,
            days,
            interval: Interval::Day1,
            seed: 7,
        }
    }

    /// Creates an intraday market with a fixed seed.
    #[must_use]
    pub const fn intraday(instruments: usize, days: u32, interval: Interval) -> Self {
        Self {
            instruments,
            days,
            interval,
            seed: 7,
        }
    }

    /// Returns the id of the `i`-th instrument. The first one is the
    /// benchmark.
    #[must_use]
    pub fn id(i: usize) -> String {
        format!("SYN{i:03}")
    }

    /// Number of observations generated per instrument.
    #[must_use]
    pub fn observations(&self) -> usize {
        self.timestamps().len()
    }

    /// Generates prices and EUR rates.
    #[must_use]
    pub fn input(&self) -> PipelineInput {
        let stamps = self.timestamps();
        let mut rng = Lcg(self.seed);
        let mut input = PipelineInput::new();

        for i in 0..self.instruments {
            let currency = if i % 3 == 2 { Currency::Eur } else { Currency::Usd };
            let mut price = 100.0 + 10.0 * i as f64;
            let prices: TimeSeries<RawTimestamp> = stamps
                .iter()
                .map(|stamp| {
                    price *= 1.0 + 0.01 * rng.next_signed();
                    (*stamp, price)
                })
                .collect();
            input.insert_series(InstrumentSeries::new(Self::id(i), currency, prices));
        }

        let mut rate = 0.92;
        let rates = self
            .dates()
            .map(|date| {
                rate *= 1.0 + 0.002 * rng.next_signed();
                (date, rate)
            })
            .collect();
        input.insert_rates(ExchangeRates::new(Currency::Eur, rates));

        input
    }

    /// Equal weights over every instrument, with the first as benchmark.
    #[must_use]
    pub fn config(&self) -> IndexConfig {
        let weights = WeightTable::new((0..self.instruments).map(|i| (Self::id(i), 1.0)))
            .unwrap_or_default();
        IndexConfig::new(self.interval, weights).with_benchmark(Self::id(0))
    }

    fn start(&self) -> NaiveDate {
        NaiveDate::from_ymd_opt(2020, 1, 1).unwrap_or_default()
    }

    fn dates(&self) -> impl Iterator<Item = NaiveDate> + '_ {
        let start = self.start();
        (0..i64::from(self.days)).map(move |d| start + TimeDelta::days(d))
    }

    fn timestamps(&self) -> Vec<RawTimestamp> {
        let business_days = self.dates().filter(|date| is_business_day(*date));
        match self.interval.slot_minutes() {
            None => business_days.map(RawTimestamp::Date).collect(),
            Some(slot) => business_days
                .flat_map(|date| {
                    // 14:30 to 21:00 UTC, one bar per slot.
                    let open = date.and_hms_opt(14, 30, 0).unwrap_or_default();
                    let open = Utc.from_utc_datetime(&open);
                    (0..390 / slot).map(move |k| {
                        let bar = open + TimeDelta::minutes(i64::from(k * slot));
                        RawTimestamp::Aware(bar.fixed_offset())
                    })
                })
                .collect(),
        }
    }
}

/// Small deterministic generator for reproducible walks.
struct Lcg(u64);

impl Lcg {
    /// Uniform value in `[-1, 1)`.
    fn next_signed(&mut self) -> f64 {
        self.0 = self
            .0
            .wrapping_mul(6_364_136_223_846_793_005)
            .wrapping_add(1_442_695_040_888_963_407);
        ((self.0 >> 11) as f64 / (1_u64 << 53) as f64).mul_add(2.0, -1.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use orbis_lib::IndexPipeline;

    #[test]
    fn test_daily_market_runs() {
        let market = SyntheticMarket::daily(6, 60);

        let report = IndexPipeline::new(market.config()).run(&market.input()).unwrap();

        assert_eq!(report.included.len(), 6);
        assert_eq!(report.points.len(), market.observations());
    }

    #[test]
    fn test_intraday_market_runs() {
        let market = SyntheticMarket::intraday(4, 10, Interval::Minute30);

        let report = IndexPipeline::new(market.config()).run(&market.input()).unwrap();

        assert_eq!(market.observations(), 8 * 13);
        assert_eq!(report.points.len(), market.observations());
    }
}
