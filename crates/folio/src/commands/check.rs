/*
 * check.rs
 * Copyright (c) 2025 Posit, PBC
 *
 * Check command implementation
 */

//! Validate an intake document without rendering it.

use anyhow::{Context, Result};

use folio_core::intake;

/// Execute the check command
pub fn execute(input: &str) -> Result<()> {
    let json = std::fs::read_to_string(input)
        .with_context(|| format!("Failed to read intake document {input}"))?;
    let parsed = intake::parse_issue(&json).context("Invalid intake document")?;

    println!(
        "OK: issue '{}' with {} article(s) in {} section(s)",
        parsed.issue.id,
        parsed.articles.len(),
        parsed.issue.sections.len()
    );
    for warning in &parsed.warnings {
        println!("warning: {warning}");
    }
    Ok(())
}
