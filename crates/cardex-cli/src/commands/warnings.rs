//! Command to show the data-quality warnings of the active catalog.

use anyhow::{Context, Result};
use cardex_core::CatalogBuilder;
use colored::Colorize;

use crate::output::{OutputFormat, print_json};

/// Execute the warnings command.
pub fn execute(builder: &CatalogBuilder, format: OutputFormat) -> Result<()> {
    let warnings = builder
        .warnings()
        .context("catalog has no ready snapshot")?;

    match format {
        OutputFormat::Json => print_json(&warnings),
        OutputFormat::Text => {
            if warnings.is_empty() {
                println!("no warnings");
                return Ok(());
            }
            for warning in &warnings {
                println!(
                    "{} {}: {}",
                    format!("[{}]", warning.kind).yellow(),
                    warning.id.to_string().bold(),
                    warning.detail
                );
            }
            Ok(())
        },
    }
}
