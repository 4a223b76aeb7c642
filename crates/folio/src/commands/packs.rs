/*
 * packs.rs
 * Copyright (c) 2025 Posit, PBC
 *
 * Packs command implementation
 */

//! List the built-in template packs.

use anyhow::Result;

use folio_core::packs;

/// Execute the packs command
pub fn execute() -> Result<()> {
    for id in packs::builtin_ids() {
        let pack = packs::builtin(id).expect("builtin pack");
        println!("{:<12} {} (v{})", pack.id, pack.name, pack.version);
        for variant in &pack.variants {
            let hero = match variant.hero {
                Some(h) => format!("hero {}-{}vh", h.min_vh, h.max_vh),
                None => "no hero".to_string(),
            };
            let pullquote = if variant.allows_pullquote() {
                "pullquote"
            } else {
                "no pullquote"
            };
            println!(
                "  {:<18} {} col, {hero}, {pullquote}",
                variant.id, variant.columns
            );
        }
    }
    Ok(())
}
