//! Info command implementation.
//!
//! Shows an instrument's metadata and how it enters the index.

use anyhow::{Context, Result};
use orbis_lib::prelude::*;
use orbis_lib::DEFAULT_BENCHMARK;

/// Show detailed information about an instrument.
pub(crate) fn show_info(instrument_id: &str) -> Result<()> {
    let registry = InstrumentRegistry::global();
    let instrument = registry
        .get(instrument_id)
        .with_context(|| format!("Unknown instrument: {instrument_id}"))?;

    println!("Instrument: {}", instrument.name());
    println!("ID:         {}", instrument.id());
    println!("Region:     {}", instrument.region());
    println!("Category:   {}", instrument.category());
    println!("Currency:   {}", instrument.currency());

    if instrument.needs_conversion() {
        println!(
            "Converted:  via {} (daily rate, {} per USD)",
            instrument.currency().fx_symbol(),
            instrument.currency()
        );
    }

    match instrument.weight() {
        Some(weight) => {
            let total = registry.weights()?.total();
            let share = if total > 0.0 { weight / total * 100.0 } else { 0.0 };
            println!("Weight:     {weight:.3} ({share:.1}% of total)");
        }
        None => println!("Weight:     none (aligned but not aggregated)"),
    }

    if instrument.id() == DEFAULT_BENCHMARK {
        println!("\nDefault benchmark: the index is scaled to this instrument's price level.");
    }

    Ok(())
}
