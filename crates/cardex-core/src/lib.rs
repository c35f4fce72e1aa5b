//! # cardex-core
//!
//! Core functionality for cardex - a catalog and retrieval engine for
//! HTML documentation corpora.
//!
//! This crate ingests raw topic modules (`{topic, slug, raw_html}`
//! triples), parses each fragment into a structural summary, builds a
//! deterministic in-memory index over the corpus, and serves lookups by
//! id, by topic, and by free-text query.
//!
//! ## Architecture
//!
//! The pipeline is provider → loader → index → query:
//!
//! - **Providers**: supply raw module sources (filesystem layout or
//!   in-memory)
//! - **Loader**: assigns stable ids, detects duplicates, runs the parser,
//!   accumulates warnings
//! - **Index**: id map, topic listings in source order, and a
//!   presence-based inverted word index
//! - **Builder**: owns the active snapshot and swaps in rebuilds
//!   atomically; readers are never blocked
//!
//! ## Quick Start
//!
//! ```rust
//! use cardex_core::{CatalogBuilder, ModuleSource, StaticSourceProvider};
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() -> cardex_core::Result<()> {
//! let provider = StaticSourceProvider::new(vec![ModuleSource::new(
//!     "errores",
//!     "manejo-errores-tradicional",
//!     "<h1>Manejo de Errores</h1><p>try y catch en PHP</p>",
//! )]);
//!
//! let builder = CatalogBuilder::new(Box::new(provider));
//! let report = builder.refresh().await?;
//! assert_eq!(report.unit_count, 1);
//!
//! let query = builder.query()?;
//! let hits = query.search("errores", 20);
//! assert_eq!(hits.len(), 1);
//! # Ok(())
//! # }
//! ```
//!
//! ## Error Handling
//!
//! All operations return [`Result<T, Error>`]. Per-unit data-quality
//! issues are never errors: they surface as [`LoadWarning`]s on the build
//! result, and query-time "not found" is an `Option`, not a failure.

/// Catalog orchestration and the refresh state machine
pub mod builder;
/// Persisted index cache keyed by a source fingerprint
pub mod cache;
/// Configuration management
pub mod config;
/// Error types and result aliases
pub mod error;
/// Deterministic catalog index with inverted-word search postings
pub mod index;
/// Load pass: sources → parsed snapshot
pub mod loader;
/// Tolerant HTML fragment parser
pub mod parser;
/// Module source providers
pub mod provider;
/// Read-only query surface over a pinned snapshot
pub mod query;
/// Text normalization shared by indexing and querying
pub mod text;
/// Core data types and structures
pub mod types;

// Re-export commonly used types
pub use builder::{CatalogBuilder, CatalogState, RefreshReport};
pub use cache::{CachedCatalog, IndexCache};
pub use config::Config;
pub use error::{Error, Result};
pub use index::CatalogIndex;
pub use loader::load;
pub use parser::{ContentParser, ParseDiagnostic, ParsedContent};
pub use provider::{FsSourceProvider, SourceProvider, StaticSourceProvider};
pub use query::{DEFAULT_SEARCH_LIMIT, QueryService};
pub use types::*;
