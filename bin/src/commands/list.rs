//! List command implementation.
//!
//! This module handles listing index constituents with optional filtering.

use crate::display::parse_category;
use anyhow::Result;
use orbis_lib::prelude::*;

/// List constituents with optional category filter or search pattern.
pub(crate) fn list_instruments(category: Option<&str>, search: Option<&str>) -> Result<()> {
    let registry = InstrumentRegistry::global();

    let instruments: Vec<_> = match (category, search) {
        (Some(cat), _) => {
            let category = parse_category(cat)?;
            let mut found: Vec<_> = registry.by_category(category).collect();
            found.sort_by(|a, b| a.id().cmp(b.id()));
            found
        }
        (_, Some(pattern)) => registry.search(pattern),
        (None, None) => registry.all(),
    };

    if instruments.is_empty() {
        println!("No instruments found.");
        return Ok(());
    }

    println!(
        "{:<10} {:<32} {:<14} {:<9} {:>8}",
        "ID", "NAME", "REGION", "CURRENCY", "WEIGHT"
    );
    println!("{}", "-".repeat(77));

    for instrument in &instruments {
        let weight = instrument
            .weight()
            .map_or_else(|| "-".to_string(), |w| format!("{w:.3}"));
        println!(
            "{:<10} {:<32} {:<14} {:<9} {:>8}",
            instrument.id(),
            instrument.name(),
            instrument.region(),
            instrument.currency(),
            weight
        );
    }

    println!("\nTotal: {} instruments", instruments.len());
    Ok(())
}
