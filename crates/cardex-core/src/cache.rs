//! Persisted index cache.
//!
//! A built [`CatalogIndex`] can be serialized to a JSON blob keyed by a
//! content fingerprint of the module sources, so a process restart over an
//! unchanged corpus skips the rebuild. Because the index deserializes
//! through the same pure build path, a cache hit answers every query
//! identically to a fresh build.

use base64::{Engine, engine::general_purpose::URL_SAFE_NO_PAD};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::{debug, warn};

use crate::{CatalogIndex, Error, LoadWarning, ModuleSource, Result};

/// Bumped whenever the serialized shape changes; a mismatch forces a
/// rebuild instead of a deserialization error.
pub const CACHE_FORMAT_VERSION: u32 = 1;

const CACHE_FILE_NAME: &str = "catalog.json";

/// Serialized cache payload: the index plus the warnings of the load pass
/// that produced it, bound to a source fingerprint.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CachedCatalog {
    /// Cache format version at write time.
    pub format_version: u32,
    /// Fingerprint of the sources the index was built from.
    pub fingerprint: String,
    /// The built index.
    pub index: CatalogIndex,
    /// Warnings from the originating load pass. Cached so operators still
    /// see them when the rebuild is skipped.
    pub warnings: Vec<LoadWarning>,
}

/// On-disk cache for built catalog indexes.
#[derive(Debug, Clone)]
pub struct IndexCache {
    dir: PathBuf,
}

impl IndexCache {
    /// Create a cache rooted at `dir`. The directory is created lazily on
    /// first store.
    #[must_use]
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Path of the cache blob.
    #[must_use]
    pub fn cache_path(&self) -> PathBuf {
        self.dir.join(CACHE_FILE_NAME)
    }

    /// Compute the content fingerprint of a source sequence.
    ///
    /// Fields are length-prefixed before hashing so `("ab", "c")` and
    /// `("a", "bc")` cannot collide. The digest is sha256,
    /// URL-safe-base64-encoded.
    #[must_use]
    pub fn fingerprint(sources: &[ModuleSource]) -> String {
        let mut hasher = Sha256::new();
        for source in sources {
            for field in [&source.topic, &source.slug, &source.raw_html] {
                hasher.update(u64::try_from(field.len()).unwrap_or(u64::MAX).to_le_bytes());
                hasher.update(field.as_bytes());
            }
        }
        URL_SAFE_NO_PAD.encode(hasher.finalize())
    }

    /// Load the cached catalog if it matches `fingerprint`.
    ///
    /// Returns `Ok(None)` when there is no cache file, the format version
    /// differs, or the fingerprint does not match. A corrupt cache file is
    /// also a miss (logged, never fatal): the cache is an optimization, not
    /// a source of truth.
    pub async fn load(&self, fingerprint: &str) -> Result<Option<CachedCatalog>> {
        let path = self.cache_path();
        let raw = match fs::read_to_string(&path).await {
            Ok(raw) => raw,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(Error::Io(e)),
        };

        let cached: CachedCatalog = match serde_json::from_str(&raw) {
            Ok(cached) => cached,
            Err(e) => {
                warn!(path = %path.display(), error = %e, "discarding corrupt catalog cache");
                return Ok(None);
            },
        };

        if cached.format_version != CACHE_FORMAT_VERSION {
            debug!(
                found = cached.format_version,
                expected = CACHE_FORMAT_VERSION,
                "cache format version mismatch"
            );
            return Ok(None);
        }
        if cached.fingerprint != fingerprint {
            debug!("cache fingerprint mismatch, sources changed");
            return Ok(None);
        }

        debug!(path = %path.display(), "catalog cache hit");
        Ok(Some(cached))
    }

    /// Persist a built catalog, replacing any previous cache atomically
    /// (write to a temporary sibling, then rename).
    pub async fn store(&self, catalog: &CachedCatalog) -> Result<()> {
        fs::create_dir_all(&self.dir).await?;

        let payload = serde_json::to_string(catalog)?;
        let tmp_path = self.dir.join(format!("{CACHE_FILE_NAME}.tmp"));
        fs::write(&tmp_path, payload).await?;
        fs::rename(&tmp_path, self.cache_path()).await?;

        debug!(path = %self.cache_path().display(), "catalog cache written");
        Ok(())
    }

    /// The directory this cache writes under.
    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }
}
