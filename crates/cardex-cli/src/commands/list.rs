//! Command to list topics or the units of one topic.

use anyhow::Result;
use cardex_core::QueryService;
use colored::Colorize;
use serde::Serialize;

use crate::output::{OutputFormat, print_json};

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct TopicRow {
    topic: String,
    unit_count: usize,
}

/// Execute the list command.
pub fn execute(query: &QueryService, topic: Option<&str>, format: OutputFormat) -> Result<()> {
    match topic {
        Some(topic) => list_units(query, topic, format),
        None => list_topics(query, format),
    }
}

fn list_topics(query: &QueryService, format: OutputFormat) -> Result<()> {
    let rows: Vec<TopicRow> = query
        .topics()
        .map(|(topic, unit_count)| TopicRow {
            topic: topic.to_string(),
            unit_count,
        })
        .collect();

    match format {
        OutputFormat::Json => print_json(&rows),
        OutputFormat::Text => {
            for row in rows {
                println!("{}  {}", row.topic.bold(), format!("({} units)", row.unit_count).dimmed());
            }
            Ok(())
        },
    }
}

fn list_units(query: &QueryService, topic: &str, format: OutputFormat) -> Result<()> {
    let summaries = query.summaries_for_topic(topic);

    match format {
        OutputFormat::Json => print_json(&summaries),
        OutputFormat::Text => {
            if summaries.is_empty() {
                println!("no units in topic '{topic}'");
                return Ok(());
            }
            for summary in summaries {
                println!(
                    "{}  {}  {}",
                    summary.id.slug.bold(),
                    summary.title,
                    format!(
                        "({} headings, {} code blocks)",
                        summary.heading_count, summary.code_block_count
                    )
                    .dimmed()
                );
            }
            Ok(())
        },
    }
}
