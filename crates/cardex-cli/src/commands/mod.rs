//! Command implementations and shared catalog wiring.

use anyhow::{Context, Result};
use cardex_core::{CatalogBuilder, Config, FsSourceProvider, IndexCache, QueryService};

use crate::cli::{Cli, Commands};

pub mod get;
pub mod list;
pub mod refresh;
pub mod search;
pub mod warnings;

/// Catalog builder plus the resolved configuration the commands need.
pub struct CatalogContext {
    /// The orchestrator owning the active snapshot.
    pub builder: CatalogBuilder,
    /// Default search result cap from config.
    pub search_limit: usize,
}

impl CatalogContext {
    /// Run the initial load pass and return a query service over it.
    pub async fn load(&self) -> Result<QueryService> {
        self.builder
            .refresh()
            .await
            .context("failed to load the content catalog")?;
        self.builder
            .query()
            .context("catalog has no ready snapshot")
    }
}

/// Resolve config and CLI overrides into a ready-to-load catalog context.
pub async fn open_catalog(cli: &Cli) -> Result<CatalogContext> {
    let config = match &cli.config {
        Some(path) => Config::load_from(path)
            .with_context(|| format!("failed to load config from {}", path.display()))?,
        None => Config::load().context("failed to load config")?,
    };

    let root = cli.root.clone().unwrap_or_else(|| config.content_root.clone());
    anyhow::ensure!(
        root.is_dir(),
        "content root {} is not a directory (set `content-root` in config or pass --root)",
        root.display()
    );

    let mut builder = CatalogBuilder::new(Box::new(FsSourceProvider::new(root)));

    // `refresh --full` forces a rebuild by not attaching the cache.
    let bypass_cache = matches!(cli.command, Commands::Refresh { full: true, .. });
    if !bypass_cache {
        let cache_dir = config
            .effective_cache_dir()
            .context("cannot resolve cache directory")?;
        builder = builder.with_cache(IndexCache::new(cache_dir));
    }

    Ok(CatalogContext {
        builder,
        search_limit: config.search_limit,
    })
}
