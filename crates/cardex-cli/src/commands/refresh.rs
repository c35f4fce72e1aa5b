//! Command to rebuild the catalog and report the outcome.

use anyhow::{Context, Result};
use colored::Colorize;

use crate::commands::CatalogContext;
use crate::output::{OutputFormat, print_json};

/// Execute the refresh command.
pub async fn execute(catalog: &CatalogContext, format: OutputFormat) -> Result<()> {
    let report = catalog
        .builder
        .refresh()
        .await
        .context("catalog refresh failed")?;

    match format {
        OutputFormat::Json => print_json(&report),
        OutputFormat::Text => {
            let origin = if report.from_cache { "cache" } else { "rebuild" };
            println!(
                "refreshed {} units across {} topics in {} ms ({origin})",
                report.unit_count, report.topic_count, report.duration_ms
            );
            if report.warnings.is_empty() {
                println!("no warnings");
            } else {
                println!("{}", format!("{} warnings:", report.warnings.len()).yellow());
                for warning in &report.warnings {
                    println!("  [{}] {}: {}", warning.kind, warning.id, warning.detail);
                }
            }
            Ok(())
        },
    }
}
