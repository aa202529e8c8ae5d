//! Display utilities and output formatting for the orbis CLI.

use anyhow::{Context, Result, bail};
use clap::ValueEnum;
use orbis_lib::prelude::*;
use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

/// Output format for the computed index.
#[derive(Clone, Copy, ValueEnum)]
pub(crate) enum Format {
    Csv,
    Json,
    Ndjson,
    Parquet,
}

impl From<Format> for OutputFormat {
    fn from(format: Format) -> Self {
        match format {
            Format::Csv => Self::Csv,
            Format::Json => Self::Json,
            Format::Ndjson => Self::Ndjson,
            Format::Parquet => Self::Parquet,
        }
    }
}

/// Write index points to a file in the specified format.
pub(crate) fn write_index(
    points: &[IndexPoint],
    output: &Path,
    format: OutputFormat,
    timezone: &str,
) -> Result<()> {
    let file = File::create(output)
        .with_context(|| format!("Failed to create {}", output.display()))?;
    let writer = BufWriter::new(file);

    format
        .write(points, timezone, writer)
        .with_context(|| format!("Failed to write {format} output"))?;

    Ok(())
}

/// Print first, last and extreme values of the index plus run diagnostics.
pub(crate) fn print_summary(report: &IndexReport, interval: Interval, benchmark: &str) {
    println!(
        "Global index: {} points ({interval}, EMA span {})",
        report.points.len(),
        report.ema_span
    );
    println!("{}", "-".repeat(50));

    let rows = [
        ("First", report.first()),
        ("Last", report.last()),
        ("Min", report.min()),
        ("Max", report.max()),
    ];
    for (label, point) in rows {
        if let Some(point) = point {
            println!(
                "{label:<8} {}  {:>12.2}",
                point.timestamp.format("%Y-%m-%d %H:%M %:z"),
                point.value
            );
        }
    }

    println!(
        "\nScaled to {benchmark}: factor {:.4} (benchmark mean {:.2})",
        report.rescale.factor, report.rescale.benchmark_mean
    );
    println!(
        "Instruments: {} included, {} excluded",
        report.included.len(),
        report.excluded.len()
    );
    for exclusion in &report.excluded {
        println!("  - {exclusion}");
    }
    if report.stale_rate_observations > 0 {
        println!(
            "Prices converted with an earlier exchange rate: {}",
            report.stale_rate_observations
        );
    }
}

/// Parse a category string into a Category enum.
pub(crate) fn parse_category(s: &str) -> Result<Category> {
    match s.to_lowercase().as_str() {
        "index" => Ok(Category::Index),
        "etf" => Ok(Category::Etf),
        "bond" => Ok(Category::Bond),
        "commodity" => Ok(Category::Commodity),
        "currency" => Ok(Category::Currency),
        "stock" => Ok(Category::Stock),
        _ => bail!(
            "Unknown category: {}. Valid options: index, etf, bond, commodity, currency, stock",
            s
        ),
    }
}
