//! Load pass: raw module sources → parsed catalog snapshot.
//!
//! Assigns stable ids in input order, detects duplicate `(topic, slug)`
//! pairs (first occurrence wins), runs the parser per entry, and folds all
//! per-unit issues into the snapshot's warning list. The only fatal
//! condition is an empty source sequence, which signals a wiring error
//! upstream rather than a content problem.

use chrono::Utc;
use std::collections::HashSet;
use tracing::{debug, warn};

use crate::parser::ContentParser;
use crate::{
    CatalogSnapshot, ContentId, ContentUnit, Error, LoadWarning, ModuleSource, Result, WarningKind,
};

/// Run a full load pass over `sources`.
///
/// Every entry becomes a [`ContentUnit`] in input order except later
/// duplicates, which are excluded with a [`WarningKind::DuplicateSlug`]
/// warning. Malformed or empty entries degrade to stub units plus
/// warnings; they remain indexable so navigation stays complete.
///
/// # Errors
///
/// Returns [`Error::CatalogBuild`] when `sources` is empty — a catalog
/// with zero expected modules is a configuration error, not a valid
/// empty state.
pub fn load(sources: &[ModuleSource]) -> Result<CatalogSnapshot> {
    if sources.is_empty() {
        return Err(Error::CatalogBuild(
            "module source provider returned no entries".into(),
        ));
    }

    let parser = ContentParser::new()?;
    let loaded_at = Utc::now();

    let mut units = Vec::with_capacity(sources.len());
    let mut warnings = Vec::new();
    let mut seen: HashSet<ContentId> = HashSet::with_capacity(sources.len());

    for (position, source) in sources.iter().enumerate() {
        let id = ContentId::new(&source.topic, &source.slug);

        if !seen.insert(id.clone()) {
            warn!(%id, position, "duplicate slug, keeping first occurrence");
            warnings.push(LoadWarning {
                kind: WarningKind::DuplicateSlug,
                id,
                detail: format!("entry at position {position} duplicates an earlier id"),
            });
            continue;
        }

        let parsed = parser.parse(&source.raw_html);
        for diagnostic in parsed.diagnostics {
            warnings.push(LoadWarning {
                kind: diagnostic.kind,
                id: id.clone(),
                detail: diagnostic.detail,
            });
        }

        units.push(ContentUnit {
            id,
            raw_html: source.raw_html.clone(),
            headings: parsed.headings,
            code_blocks: parsed.code_blocks,
            callouts: parsed.callouts,
            plain_text: parsed.plain_text,
            loaded_at,
        });
    }

    debug!(
        units = units.len(),
        warnings = warnings.len(),
        "load pass complete"
    );

    Ok(CatalogSnapshot { units, warnings })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_input_is_fatal() {
        match load(&[]) {
            Err(Error::CatalogBuild(_)) => {},
            other => panic!("expected CatalogBuild error, got {other:?}"),
        }
    }

    #[test]
    fn duplicate_id_keeps_first_and_warns_once() {
        let sources = vec![
            ModuleSource::new("errores", "overrides", "<h1>Primera</h1>"),
            ModuleSource::new("errores", "overrides", "<h1>Segunda</h1>"),
        ];

        let snapshot = load(&sources).expect("load");

        assert_eq!(snapshot.units.len(), 1);
        assert_eq!(snapshot.units[0].headings[0].text, "Primera");
        assert_eq!(snapshot.warnings.len(), 1);
        assert_eq!(snapshot.warnings[0].kind, WarningKind::DuplicateSlug);
        assert_eq!(snapshot.warnings[0].id, ContentId::new("errores", "overrides"));
    }

    #[test]
    fn same_slug_in_different_topics_is_not_a_duplicate() {
        let sources = vec![
            ModuleSource::new("docker", "intro", "<h1>Docker</h1>"),
            ModuleSource::new("php", "intro", "<h1>PHP</h1>"),
        ];

        let snapshot = load(&sources).expect("load");

        assert_eq!(snapshot.units.len(), 2);
        assert!(snapshot.warnings.is_empty());
    }

    #[test]
    fn empty_entry_becomes_indexable_stub() {
        let sources = vec![
            ModuleSource::new("docker", "vacio", ""),
            ModuleSource::new("docker", "lleno", "<h1>Contenido</h1>"),
        ];

        let snapshot = load(&sources).expect("load");

        assert_eq!(snapshot.units.len(), 2);
        let stub = &snapshot.units[0];
        assert!(stub.headings.is_empty());
        assert!(stub.code_blocks.is_empty());
        assert!(stub.plain_text.is_empty());
        assert_eq!(snapshot.warnings.len(), 1);
        assert_eq!(snapshot.warnings[0].kind, WarningKind::EmptyContent);
        assert_eq!(snapshot.warnings[0].id, ContentId::new("docker", "vacio"));
    }

    #[test]
    fn units_preserve_input_order() {
        let sources = vec![
            ModuleSource::new("b", "dos", "<p>2</p>"),
            ModuleSource::new("a", "uno", "<p>1</p>"),
            ModuleSource::new("b", "tres", "<p>3</p>"),
        ];

        let snapshot = load(&sources).expect("load");

        let ids: Vec<_> = snapshot.units.iter().map(|u| u.id.to_string()).collect();
        assert_eq!(ids, vec!["b/dos", "a/uno", "b/tres"]);
    }

    #[test]
    fn all_units_share_one_load_timestamp() {
        let sources = vec![
            ModuleSource::new("a", "uno", "<p>1</p>"),
            ModuleSource::new("a", "dos", "<p>2</p>"),
        ];

        let snapshot = load(&sources).expect("load");
        assert_eq!(snapshot.units[0].loaded_at, snapshot.units[1].loaded_at);
    }
}
