//! Read-only query surface over one immutable index snapshot.
//!
//! A `QueryService` pins the catalog snapshot that was current when it was
//! created; a refresh swapping in a new index never affects queries already
//! running against this one. All operations are lock-free reads.

use std::cmp::Reverse;
use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;
use tracing::debug;

use crate::text::tokenize;
use crate::{CatalogIndex, ContentId, ContentUnit, SearchHit, UnitSummary};

/// Default result cap for [`QueryService::search`].
pub const DEFAULT_SEARCH_LIMIT: usize = 20;

/// Query service over a pinned catalog snapshot.
#[derive(Debug, Clone)]
pub struct QueryService {
    index: Arc<CatalogIndex>,
}

impl QueryService {
    /// Create a service over the given snapshot.
    #[must_use]
    pub fn new(index: Arc<CatalogIndex>) -> Self {
        Self { index }
    }

    /// The snapshot this service answers from.
    #[must_use]
    pub fn index(&self) -> &CatalogIndex {
        &self.index
    }

    /// Exact lookup by id. `None` is the expected "not found" outcome,
    /// never an error.
    #[must_use]
    pub fn get_by_id(&self, id: &ContentId) -> Option<&ContentUnit> {
        self.index.get(id)
    }

    /// Units of one topic in source order; empty for unknown topics.
    #[must_use]
    pub fn list_by_topic(&self, topic: &str) -> Vec<&ContentUnit> {
        self.index.units_for_topic(topic)
    }

    /// Summaries of one topic's units, for listings.
    #[must_use]
    pub fn summaries_for_topic(&self, topic: &str) -> Vec<UnitSummary> {
        self.index
            .units_for_topic(topic)
            .into_iter()
            .map(ContentUnit::summary)
            .collect()
    }

    /// All topics with unit counts, in lexicographic order.
    pub fn topics(&self) -> impl Iterator<Item = (&str, usize)> {
        self.index.topics()
    }

    /// Free-text search with set-overlap ranking.
    ///
    /// The query is tokenized with the exact normalization used at index
    /// time. A unit's score is the count of distinct query tokens present
    /// in its postings; only units matching at least one token appear.
    /// Ties break by topic then slug, both ascending, so results are fully
    /// deterministic. Empty queries (or queries with only sub-2-character
    /// tokens) return an empty list, not an error.
    #[must_use]
    pub fn search(&self, query: &str, limit: usize) -> Vec<SearchHit> {
        let query_tokens: BTreeSet<String> = tokenize(query).into_iter().collect();
        if query_tokens.is_empty() {
            return Vec::new();
        }

        let mut scores: BTreeMap<&ContentId, usize> = BTreeMap::new();
        for token in &query_tokens {
            if let Some(postings) = self.index.postings(token) {
                for id in postings {
                    *scores.entry(id).or_insert(0) += 1;
                }
            }
        }

        // BTreeMap iteration is already (topic, slug) ascending; a stable
        // sort on descending score keeps that order within equal scores.
        let mut ranked: Vec<(&ContentId, usize)> = scores.into_iter().collect();
        ranked.sort_by_key(|&(_, score)| Reverse(score));
        ranked.truncate(limit);

        debug!(query, hits = ranked.len(), "search complete");

        ranked
            .into_iter()
            .map(|(id, score)| SearchHit {
                id: id.clone(),
                score,
                matched_headings: self.matched_headings(id, &query_tokens),
            })
            .collect()
    }

    fn matched_headings(&self, id: &ContentId, query_tokens: &BTreeSet<String>) -> Vec<String> {
        self.index.get(id).map_or_else(Vec::new, |unit| {
            unit.headings
                .iter()
                .filter(|heading| {
                    tokenize(&heading.text)
                        .iter()
                        .any(|token| query_tokens.contains(token))
                })
                .map(|heading| heading.text.clone())
                .collect()
        })
    }
}
