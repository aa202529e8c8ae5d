//! Compute command implementation.
//!
//! Fetches every constituent and the exchange rates it needs, runs the
//! index pipeline and writes or summarises the result.

use crate::display::{Format, print_summary, write_index};
use anyhow::{Context, Result, bail};
use futures::StreamExt;
use indicatif::{ProgressBar, ProgressStyle};
use inquire::validator::Validation;
use inquire::{Select, Text};
use orbis_lib::prelude::*;
use orbis_lib::{ConfigOverrides, parse_timezone};
use std::path::PathBuf;

/// Arguments of the `compute` command.
pub(crate) struct ComputeArgs {
    pub(crate) interval: Option<String>,
    pub(crate) period: Option<String>,
    pub(crate) benchmark: Option<String>,
    pub(crate) timezone: Option<String>,
    pub(crate) config: Option<PathBuf>,
    pub(crate) output: Option<PathBuf>,
    pub(crate) format: Option<Format>,
    pub(crate) concurrency: usize,
    pub(crate) quiet: bool,
}

/// Fetch prices, compute the index and write or print it.
pub(crate) async fn compute(args: ComputeArgs) -> Result<()> {
    let interval = match args.interval.as_deref() {
        Some(s) => s.parse::<Interval>()?,
        None => prompt_interval()?,
    };
    let period = match args.period.as_deref() {
        Some(s) => s.parse::<Period>().with_context(|| format!("Invalid period: {s}"))?,
        None => prompt_period()?,
    };

    let registry = InstrumentRegistry::global();
    let config = build_config(registry, interval, &args)?;
    let timezone = config.timezone;
    let benchmark = config.benchmark.clone();

    for (id, _) in config.weights.iter() {
        if registry.get(id).is_none() {
            tracing::warn!(instrument = id, "weighted instrument is not registered");
        }
    }

    let client = ChartClient::new(ClientConfig {
        concurrency: args.concurrency,
        ..Default::default()
    })?;

    let instruments: Vec<Instrument> = registry.all().into_iter().cloned().collect();
    let currencies = registry.foreign_currencies();

    let progress = if args.quiet {
        ProgressBar::hidden()
    } else {
        let pb = ProgressBar::new((instruments.len() + currencies.len()) as u64);
        pb.set_style(
            ProgressStyle::default_bar()
                .template(
                    "{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} {msg}",
                )
                .context("Invalid progress template")?
                .progress_chars("=>-"),
        );
        pb.set_message(format!("{interval} over {period}"));
        pb
    };

    let mut input = PipelineInput::new();
    let mut unavailable = Vec::new();

    let mut stream = instrument_stream(&client, instruments, period, interval, args.concurrency);
    while let Some(batch) = stream.next().await {
        progress.set_message(batch.symbol.clone());
        match batch.series {
            Some(series) if !series.is_empty() => input.insert_series(series),
            _ => {
                if batch.error.is_none() {
                    tracing::warn!(instrument = %batch.symbol, "no price data");
                }
                unavailable.push(batch.symbol);
            }
        }
        progress.inc(1);
    }

    let mut rates = rate_stream(&client, currencies, FX_LOOKBACK_DAYS, args.concurrency);
    while let Some(batch) = rates.next().await {
        progress.set_message(batch.currency.fx_symbol());
        match batch.rates {
            Some(rates) if !rates.is_empty() => {
                input.insert_rates(ExchangeRates::new(batch.currency, rates));
            }
            _ => {
                if batch.error.is_none() {
                    tracing::warn!(currency = %batch.currency, "no exchange-rate data");
                }
            }
        }
        progress.inc(1);
    }

    let fetched = input.instruments().len();
    progress.finish_with_message(if unavailable.is_empty() {
        format!("Fetched {fetched} instruments")
    } else {
        format!("Fetched {fetched} instruments ({} unavailable)", unavailable.len())
    });

    let report = IndexPipeline::new(config)
        .run(&input)
        .context("Failed to compute index")?;

    match args.output {
        Some(output) => {
            let format = args
                .format
                .map(OutputFormat::from)
                .or_else(|| OutputFormat::from_path(&output))
                .unwrap_or_default();
            write_index(&report.points, &output, format, timezone.name())?;
            if !args.quiet {
                print_summary(&report, interval, &benchmark);
                println!("\nOutput written to: {}", output.display());
            }
        }
        None => print_summary(&report, interval, &benchmark),
    }

    Ok(())
}

/// Combine registry defaults, the override file and command-line flags.
///
/// Flags win over the file, which wins over the defaults.
fn build_config(
    registry: &InstrumentRegistry,
    interval: Interval,
    args: &ComputeArgs,
) -> Result<IndexConfig> {
    let mut config = IndexConfig::new(interval, registry.weights()?);

    if let Some(path) = &args.config {
        let overrides = ConfigOverrides::from_path(path)?;
        config = config.apply(overrides)?;
    }
    if let Some(benchmark) = &args.benchmark {
        config = config.with_benchmark(benchmark.as_str());
    }
    if let Some(timezone) = &args.timezone {
        config = config.with_timezone(parse_timezone(timezone)?);
    }

    // Normalise the benchmark to its registered spelling.
    let Some(benchmark) = registry.get(&config.benchmark) else {
        bail!("Unknown benchmark: {}", config.benchmark);
    };
    let benchmark = benchmark.id().to_string();

    Ok(config.with_benchmark(benchmark))
}

/// Ask for the sampling interval.
fn prompt_interval() -> Result<Interval> {
    let options = Interval::all().to_vec();
    let default = options.iter().position(|i| *i == Interval::default()).unwrap_or(0);

    Select::new("Select an interval:", options)
        .with_starting_cursor(default)
        .prompt()
        .context("Interval selection cancelled")
}

/// Ask for the lookback period.
fn prompt_period() -> Result<Period> {
    let answer = Text::new("Lookback period in days:")
        .with_default("365d")
        .with_help_message("e.g. 90d, 365d; at most 2000d")
        .with_validator(|input: &str| {
            Ok(match input.parse::<Period>() {
                Ok(_) => Validation::Valid,
                Err(e) => Validation::Invalid(e.to_string().into()),
            })
        })
        .prompt()
        .context("Period input cancelled")?;

    answer.parse::<Period>().with_context(|| format!("Invalid period: {answer}"))
}
