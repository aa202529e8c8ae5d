//! orbis CLI - Global market index from regional benchmarks.

use anyhow::Result;
use clap::{CommandFactory, Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

mod commands;
mod display;

use display::Format;

#[derive(Parser)]
#[command(name = "orbis")]
#[command(about = "Global market index from regional benchmarks", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Verbosity level (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Quiet mode (suppress progress output)
    #[arg(short, long, global = true)]
    quiet: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Fetch prices and compute the global index
    Compute {
        /// Sampling interval (5m, 15m, 30m, 60m, 1d, 5d). Prompted if omitted.
        #[arg(short, long)]
        interval: Option<String>,

        /// Lookback period in days, e.g. 365d (at most 2000d). Prompted if omitted.
        #[arg(short, long)]
        period: Option<String>,

        /// Benchmark instrument whose price level the index is scaled to
        #[arg(short, long)]
        benchmark: Option<String>,

        /// Reference time zone (IANA name)
        #[arg(short, long)]
        timezone: Option<String>,

        /// JSON file overriding benchmark, time zone and weights
        #[arg(long)]
        config: Option<PathBuf>,

        /// Output file path. Prints a summary when omitted.
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Output format (inferred from the output extension when omitted)
        #[arg(short, long, value_enum)]
        format: Option<Format>,

        /// Maximum concurrent requests
        #[arg(long, default_value = "4")]
        concurrency: usize,
    },

    /// List index constituents
    List {
        /// Filter by category (index, etf, bond, commodity, currency, stock)
        #[arg(short, long)]
        category: Option<String>,

        /// Search pattern
        #[arg(short, long)]
        search: Option<String>,
    },

    /// Show instrument details
    Info {
        /// Instrument identifier
        instrument: String,
    },
}

/// Installs the log subscriber. `RUST_LOG` takes precedence over `-v`.
fn init_tracing(verbose: u8, quiet: bool) {
    let level = match (quiet, verbose) {
        (true, _) => "error",
        (false, 0) => "warn",
        (false, 1) => "info",
        (false, 2) => "debug",
        (false, _) => "trace",
    };
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose, cli.quiet);

    // Show help if no command provided
    let Some(command) = cli.command else {
        Cli::command().print_help()?;
        return Ok(());
    };

    match command {
        Commands::Compute {
            interval,
            period,
            benchmark,
            timezone,
            config,
            output,
            format,
            concurrency,
        } => {
            let args = commands::compute::ComputeArgs {
                interval,
                period,
                benchmark,
                timezone,
                config,
                output,
                format,
                concurrency,
                quiet: cli.quiet,
            };
            commands::compute::compute(args).await
        }
        Commands::List { category, search } => {
            commands::list::list_instruments(category.as_deref(), search.as_deref())
        }
        Commands::Info { instrument } => commands::info::show_info(&instrument),
    }
}
