//! Catalog orchestration: wires provider → loader → index and owns the
//! active snapshot.
//!
//! The builder is the single writer. Readers obtain a [`QueryService`]
//! pinned to the snapshot current at call time and are never blocked by a
//! refresh: a rebuild happens on detached data and lands in one pointer
//! swap. A refresh that fails — or is cancelled by dropping its future —
//! leaves the previously active snapshot untouched.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, RwLock};
use std::time::Instant;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{info, warn};

use crate::cache::{CACHE_FORMAT_VERSION, CachedCatalog, IndexCache};
use crate::provider::SourceProvider;
use crate::query::QueryService;
use crate::{CatalogIndex, Error, LoadWarning, Result, loader};

/// Lifecycle state of the catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CatalogState {
    /// No load pass has run yet.
    Empty,
    /// First load pass in progress; no snapshot to serve reads from.
    Loading,
    /// A snapshot is active and queries are permitted.
    Ready,
    /// A replacement snapshot is being built; reads keep using the
    /// previous one.
    Rebuilding,
    /// The first load pass failed fatally; there is nothing to serve.
    Failed,
}

/// Outcome summary of one `refresh()` call.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RefreshReport {
    /// Wall-clock build duration in milliseconds.
    pub duration_ms: u64,
    /// Units in the new snapshot.
    pub unit_count: usize,
    /// Topics in the new snapshot.
    pub topic_count: usize,
    /// Warnings accumulated by the load pass (or replayed from cache).
    pub warnings: Vec<LoadWarning>,
    /// Whether the snapshot came from the persisted cache instead of a
    /// fresh build.
    pub from_cache: bool,
}

struct ActiveCatalog {
    index: Arc<CatalogIndex>,
    warnings: Vec<LoadWarning>,
    built_at: DateTime<Utc>,
}

/// Owner of the active catalog snapshot; the only component that writes it.
pub struct CatalogBuilder {
    provider: Box<dyn SourceProvider>,
    cache: Option<IndexCache>,
    active: RwLock<Option<ActiveCatalog>>,
    state: Mutex<CatalogState>,
    refresh_in_flight: AtomicBool,
}

impl CatalogBuilder {
    /// Create a builder over the given source provider, starting `Empty`.
    #[must_use]
    pub fn new(provider: Box<dyn SourceProvider>) -> Self {
        Self {
            provider,
            cache: None,
            active: RwLock::new(None),
            state: Mutex::new(CatalogState::Empty),
            refresh_in_flight: AtomicBool::new(false),
        }
    }

    /// Attach a persisted index cache consulted before each rebuild.
    #[must_use]
    pub fn with_cache(mut self, cache: IndexCache) -> Self {
        self.cache = Some(cache);
        self
    }

    /// Current lifecycle state.
    pub fn state(&self) -> CatalogState {
        *self
            .state
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
    }

    /// Query service pinned to the currently active snapshot.
    ///
    /// # Errors
    ///
    /// [`Error::NotReady`] before the first successful refresh.
    pub fn query(&self) -> Result<QueryService> {
        self.read_active(|active| QueryService::new(Arc::clone(&active.index)))
    }

    /// Warnings attached to the active snapshot.
    pub fn warnings(&self) -> Result<Vec<LoadWarning>> {
        self.read_active(|active| active.warnings.clone())
    }

    /// When the active snapshot was built.
    pub fn built_at(&self) -> Result<DateTime<Utc>> {
        self.read_active(|active| active.built_at)
    }

    /// Re-run the load + build pipeline and swap the active snapshot.
    ///
    /// Only one refresh runs at a time; concurrent callers get
    /// [`Error::RefreshInFlight`]. On a fatal build error the previous
    /// snapshot (if any) stays active and the state returns to `Ready`;
    /// without one the catalog ends `Failed`. Dropping the returned future
    /// mid-build has no effect on the active snapshot.
    pub async fn refresh(&self) -> Result<RefreshReport> {
        if self
            .refresh_in_flight
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .is_err()
        {
            return Err(Error::RefreshInFlight);
        }

        let had_active = self.has_snapshot();
        let mut guard = RefreshGuard {
            builder: self,
            restore_state: Some(self.state()),
        };
        self.set_state(if had_active {
            CatalogState::Rebuilding
        } else {
            CatalogState::Loading
        });

        let started = Instant::now();
        match self.build_detached().await {
            Ok((index, warnings, from_cache)) => {
                let report = RefreshReport {
                    duration_ms: u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX),
                    unit_count: index.unit_count(),
                    topic_count: index.topic_count(),
                    warnings: warnings.clone(),
                    from_cache,
                };

                self.swap_active(ActiveCatalog {
                    index,
                    warnings,
                    built_at: Utc::now(),
                });
                self.set_state(CatalogState::Ready);
                guard.defuse();

                info!(
                    units = report.unit_count,
                    topics = report.topic_count,
                    warnings = report.warnings.len(),
                    from_cache = report.from_cache,
                    duration_ms = report.duration_ms,
                    "catalog refresh complete"
                );
                Ok(report)
            },
            Err(e) => {
                self.set_state(if had_active {
                    CatalogState::Ready
                } else {
                    CatalogState::Failed
                });
                guard.defuse();
                warn!(error = %e, "catalog refresh failed, previous snapshot untouched");
                Err(e)
            },
        }
    }

    /// Build a complete replacement snapshot without touching shared state.
    async fn build_detached(
        &self,
    ) -> Result<(Arc<CatalogIndex>, Vec<LoadWarning>, bool)> {
        let sources = self.provider.enumerate().await?;

        let fingerprint = self
            .cache
            .as_ref()
            .map(|_| IndexCache::fingerprint(&sources));

        if let (Some(cache), Some(fingerprint)) = (&self.cache, &fingerprint) {
            match cache.load(fingerprint).await {
                Ok(Some(hit)) => return Ok((Arc::new(hit.index), hit.warnings, true)),
                Ok(None) => {},
                // The cache is an optimization; any failure is a miss.
                Err(e) => warn!(error = %e, "catalog cache unreadable, rebuilding"),
            }
        }

        let snapshot = loader::load(&sources)?;
        let index = CatalogIndex::build(&snapshot);

        if let (Some(cache), Some(fingerprint)) = (&self.cache, fingerprint) {
            let payload = CachedCatalog {
                format_version: CACHE_FORMAT_VERSION,
                fingerprint,
                index: index.clone(),
                warnings: snapshot.warnings.clone(),
            };
            if let Err(e) = cache.store(&payload).await {
                warn!(error = %e, "failed to persist catalog cache");
            }
        }

        Ok((Arc::new(index), snapshot.warnings, false))
    }

    fn read_active<T>(&self, f: impl FnOnce(&ActiveCatalog) -> T) -> Result<T> {
        self.active
            .read()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .as_ref()
            .map(f)
            .ok_or_else(|| Error::NotReady("no catalog snapshot has been built yet".into()))
    }

    fn has_snapshot(&self) -> bool {
        self.active
            .read()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .is_some()
    }

    fn swap_active(&self, next: ActiveCatalog) {
        *self
            .active
            .write()
            .unwrap_or_else(std::sync::PoisonError::into_inner) = Some(next);
    }

    fn set_state(&self, state: CatalogState) {
        *self
            .state
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner) = state;
    }
}

/// Clears the in-flight flag on every exit path and, when the refresh was
/// abandoned (future dropped mid-build), restores the pre-refresh state.
struct RefreshGuard<'a> {
    builder: &'a CatalogBuilder,
    restore_state: Option<CatalogState>,
}

impl RefreshGuard<'_> {
    fn defuse(&mut self) {
        self.restore_state = None;
    }
}

impl Drop for RefreshGuard<'_> {
    fn drop(&mut self) {
        if let Some(state) = self.restore_state.take() {
            self.builder.set_state(state);
        }
        self.builder
            .refresh_in_flight
            .store(false, Ordering::SeqCst);
    }
}
