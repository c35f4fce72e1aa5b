//! Command for free-text search across the catalog.

use anyhow::Result;
use cardex_core::QueryService;
use colored::Colorize;

use crate::output::{OutputFormat, print_json};

/// Execute the search command.
pub fn execute(
    query: &QueryService,
    text: &str,
    limit: usize,
    format: OutputFormat,
) -> Result<()> {
    let hits = query.search(text, limit);

    match format {
        OutputFormat::Json => print_json(&hits),
        OutputFormat::Text => {
            if hits.is_empty() {
                println!("no results for '{text}'");
                return Ok(());
            }
            for (rank, hit) in hits.iter().enumerate() {
                println!(
                    "{:>2}. {}  {}",
                    rank + 1,
                    hit.id.to_string().bold(),
                    format!("score {}", hit.score).dimmed()
                );
                for heading in &hit.matched_headings {
                    println!("      {heading}");
                }
            }
            Ok(())
        },
    }
}
