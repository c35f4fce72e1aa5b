//! Module source providers.
//!
//! The loader consumes `{topic, slug, raw_html}` triples and stays agnostic
//! about where they come from. [`FsSourceProvider`] is the batteries-included
//! implementation for the on-disk layout (`<root>/<topic>/<slug>.html`);
//! [`StaticSourceProvider`] backs tests and embedding scenarios.

use async_trait::async_trait;
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::debug;

use crate::{ModuleSource, Result};

/// Supplies the raw module sources for a load or refresh pass.
///
/// Enumeration must be deterministic for a given corpus state: the loader
/// preserves input order into topic listings, and the persisted-cache
/// fingerprint is computed over the enumerated sequence.
#[async_trait]
pub trait SourceProvider: Send + Sync {
    /// Enumerate all module sources, in a stable order.
    async fn enumerate(&self) -> Result<Vec<ModuleSource>>;
}

/// File extensions recognized as content payloads.
const CONTENT_EXTENSIONS: [&str; 2] = ["html", "htm"];

/// Filesystem provider over a `<root>/<topic>/<slug>.html` layout.
///
/// Topic is the directory name, slug is the file stem. Directories and
/// files are visited in lexicographic name order so enumeration is stable
/// across runs regardless of readdir order.
#[derive(Debug, Clone)]
pub struct FsSourceProvider {
    root: PathBuf,
}

impl FsSourceProvider {
    /// Create a provider rooted at `root`.
    #[must_use]
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// The content root this provider reads from.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    async fn sorted_entries(dir: &Path) -> Result<Vec<(PathBuf, std::fs::FileType)>> {
        let mut entries = Vec::new();
        let mut reader = fs::read_dir(dir).await?;
        while let Some(entry) = reader.next_entry().await? {
            let file_type = entry.file_type().await?;
            entries.push((entry.path(), file_type));
        }
        entries.sort_by(|a, b| a.0.cmp(&b.0));
        Ok(entries)
    }
}

#[async_trait]
impl SourceProvider for FsSourceProvider {
    async fn enumerate(&self) -> Result<Vec<ModuleSource>> {
        let mut sources = Vec::new();

        for (topic_dir, kind) in Self::sorted_entries(&self.root).await? {
            if !kind.is_dir() {
                continue;
            }
            let Some(topic) = topic_dir.file_name().and_then(|n| n.to_str()) else {
                debug!(path = %topic_dir.display(), "skipping non-UTF-8 topic directory");
                continue;
            };
            let topic = topic.to_string();

            for (file, kind) in Self::sorted_entries(&topic_dir).await? {
                let is_content = file
                    .extension()
                    .and_then(|e| e.to_str())
                    .is_some_and(|ext| CONTENT_EXTENSIONS.contains(&ext));
                if !kind.is_file() || !is_content {
                    continue;
                }
                let Some(slug) = file.file_stem().and_then(|s| s.to_str()) else {
                    debug!(path = %file.display(), "skipping non-UTF-8 content file");
                    continue;
                };

                let raw_html = fs::read_to_string(&file).await?;
                sources.push(ModuleSource::new(topic.clone(), slug, raw_html));
            }
        }

        debug!(count = sources.len(), root = %self.root.display(), "enumerated module sources");
        Ok(sources)
    }
}

/// In-memory provider with a fixed source list.
#[derive(Debug, Clone, Default)]
pub struct StaticSourceProvider {
    sources: Vec<ModuleSource>,
}

impl StaticSourceProvider {
    /// Create a provider over the given sources.
    #[must_use]
    pub fn new(sources: Vec<ModuleSource>) -> Self {
        Self { sources }
    }
}

#[async_trait]
impl SourceProvider for StaticSourceProvider {
    async fn enumerate(&self) -> Result<Vec<ModuleSource>> {
        Ok(self.sources.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn fs_provider_maps_layout_to_topic_and_slug() {
        let dir = tempfile::tempdir().expect("tempdir");
        let docker = dir.path().join("docker");
        let errores = dir.path().join("errores");
        std::fs::create_dir(&docker).expect("mkdir");
        std::fs::create_dir(&errores).expect("mkdir");
        std::fs::write(docker.join("volumenes.html"), "<h1>Volúmenes</h1>").expect("write");
        std::fs::write(errores.join("excepciones.html"), "<h1>Excepciones</h1>").expect("write");
        std::fs::write(errores.join("notas.txt"), "ignored").expect("write");

        let provider = FsSourceProvider::new(dir.path());
        let sources = provider.enumerate().await.expect("enumerate");

        assert_eq!(sources.len(), 2);
        assert_eq!(sources[0].topic, "docker");
        assert_eq!(sources[0].slug, "volumenes");
        assert_eq!(sources[1].topic, "errores");
        assert_eq!(sources[1].slug, "excepciones");
    }

    #[tokio::test]
    async fn fs_provider_skips_directories_with_content_extension() {
        let dir = tempfile::tempdir().expect("tempdir");
        let topic = dir.path().join("docker");
        std::fs::create_dir(&topic).expect("mkdir");
        std::fs::create_dir(topic.join("trampa.html")).expect("mkdir");
        std::fs::write(topic.join("real.html"), "<p>x</p>").expect("write");

        let provider = FsSourceProvider::new(dir.path());
        let sources = provider.enumerate().await.expect("enumerate");

        assert_eq!(sources.len(), 1);
        assert_eq!(sources[0].slug, "real");
    }

    #[tokio::test]
    async fn fs_provider_enumeration_is_stable() {
        let dir = tempfile::tempdir().expect("tempdir");
        let topic = dir.path().join("php");
        std::fs::create_dir(&topic).expect("mkdir");
        for slug in ["zeta", "alfa", "medio"] {
            std::fs::write(topic.join(format!("{slug}.html")), "<p>x</p>").expect("write");
        }

        let provider = FsSourceProvider::new(dir.path());
        let first = provider.enumerate().await.expect("enumerate");
        let second = provider.enumerate().await.expect("enumerate");

        assert_eq!(first, second);
        let slugs: Vec<_> = first.iter().map(|s| s.slug.as_str()).collect();
        assert_eq!(slugs, vec!["alfa", "medio", "zeta"]);
    }

    #[tokio::test]
    async fn static_provider_round_trips_sources() {
        let sources = vec![ModuleSource::new("t", "s", "<p>x</p>")];
        let provider = StaticSourceProvider::new(sources.clone());
        assert_eq!(provider.enumerate().await.expect("enumerate"), sources);
    }
}
