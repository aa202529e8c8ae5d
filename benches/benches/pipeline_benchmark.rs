//! Pipeline benchmarks over synthetic markets.
//!
//! Run with: `cargo bench --package orbis-bench`

use criterion::{BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};
use orbis_bench::SyntheticMarket;
use orbis_lib::{IndexPipeline, Interval};
use std::hint::black_box;

fn pipeline_benchmark(c: &mut Criterion) {
    let mut group = c.benchmark_group("pipeline");

    let markets = [
        ("daily-22x2000d", SyntheticMarket::daily(22, 2000)),
        ("daily-100x2000d", SyntheticMarket::daily(100, 2000)),
        ("5m-22x60d", SyntheticMarket::intraday(22, 60, Interval::Minute5)),
        ("60m-22x700d", SyntheticMarket::intraday(22, 700, Interval::Minute60)),
    ];

    for (name, market) in markets {
        let input = market.input();
        let pipeline = IndexPipeline::new(market.config());

        let elements = market.observations() * market.instruments;
        group.throughput(Throughput::Elements(elements as u64));
        group.bench_with_input(BenchmarkId::new("run", name), &input, |b, input| {
            b.iter(|| pipeline.run(black_box(input)));
        });
    }

    group.finish();
}

criterion_group!(benches, pipeline_benchmark);
criterion_main!(benches);
