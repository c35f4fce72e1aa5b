//! Command to show one content unit by topic and slug.

use anyhow::Result;
use cardex_core::{ContentId, Error, QueryService};
use colored::Colorize;

use crate::output::{OutputFormat, print_json};

/// Execute the get command.
pub fn execute(query: &QueryService, topic: &str, slug: &str, format: OutputFormat) -> Result<()> {
    let id = ContentId::new(topic, slug);
    let Some(unit) = query.get_by_id(&id) else {
        return Err(Error::NotFound(format!("content unit '{id}'")).into());
    };

    match format {
        OutputFormat::Json => print_json(unit),
        OutputFormat::Text => {
            println!("{} ({id})", unit.title().bold());
            if !unit.headings.is_empty() {
                println!("\n{}", "Outline:".underline());
                for heading in &unit.headings {
                    let indent = "  ".repeat(usize::from(heading.level.saturating_sub(1)));
                    println!("{indent}{} {}", heading.text, format!("#{}", heading.anchor).dimmed());
                }
            }
            if !unit.code_blocks.is_empty() {
                let langs: Vec<_> = unit
                    .code_blocks
                    .iter()
                    .map(|b| b.language.as_str())
                    .collect();
                println!("\n{} {}", "Code blocks:".underline(), langs.join(", "));
            }
            println!("\n{}", unit.raw_html);
            Ok(())
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cardex_core::{CatalogIndex, ModuleSource, loader};
    use std::sync::Arc;

    #[test]
    fn unknown_id_is_a_not_found_error() {
        let snapshot =
            loader::load(&[ModuleSource::new("docker", "intro", "<p>hola</p>")]).expect("load");
        let query = QueryService::new(Arc::new(CatalogIndex::build(&snapshot)));

        let err = execute(&query, "docker", "inexistente", OutputFormat::Text)
            .expect_err("lookup must fail");
        match err.downcast_ref::<Error>() {
            Some(Error::NotFound(detail)) => assert!(detail.contains("docker/inexistente")),
            other => panic!("expected NotFound, got {other:?}"),
        }
    }
}
