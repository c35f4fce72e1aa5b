//! The catalog index: id lookups, topic listings, and the inverted word
//! index backing free-text search.
//!
//! `build` is a pure function of its input snapshot. All internal structures
//! are ordered (`BTreeMap`/`BTreeSet` plus insertion-order vectors), so two
//! builds over the same snapshot are identical — including their serialized
//! form, which the persisted cache relies on.
//!
//! Postings are presence-based: each token maps to the set of units that
//! contain it at least once. Frequency is deliberately not tracked; it keeps
//! ranking simple and deterministic.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

use crate::text::tokenize;
use crate::{CatalogSnapshot, ContentId, ContentUnit};

/// Immutable, point-in-time index over all content units.
///
/// Built once per load pass and shared read-only afterwards; updates happen
/// only by building a replacement and swapping it in atomically.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(into = "IndexPayload", from = "IndexPayload")]
pub struct CatalogIndex {
    /// Units in snapshot (source input) order; the owning storage.
    units: Vec<ContentUnit>,
    /// Exact-key lookup into `units`.
    by_id: BTreeMap<ContentId, usize>,
    /// Topic → unit positions, preserving first-seen slug order per topic.
    by_topic: BTreeMap<String, Vec<usize>>,
    /// Normalized token → ids of units containing it.
    inverted: BTreeMap<String, BTreeSet<ContentId>>,
}

impl CatalogIndex {
    /// Build an index from a loader snapshot.
    ///
    /// Pure: the same snapshot always produces the same index. Units keep
    /// their snapshot order, which fixes the display order of
    /// [`Self::units_for_topic`].
    #[must_use]
    pub fn build(snapshot: &CatalogSnapshot) -> Self {
        Self::from_units(snapshot.units.clone())
    }

    fn from_units(units: Vec<ContentUnit>) -> Self {
        let mut by_id = BTreeMap::new();
        let mut by_topic: BTreeMap<String, Vec<usize>> = BTreeMap::new();
        let mut inverted: BTreeMap<String, BTreeSet<ContentId>> = BTreeMap::new();

        for (position, unit) in units.iter().enumerate() {
            // The loader already dropped duplicates; first wins if one
            // slips through anyway.
            if by_id.contains_key(&unit.id) {
                continue;
            }
            by_id.insert(unit.id.clone(), position);
            by_topic
                .entry(unit.id.topic.clone())
                .or_default()
                .push(position);

            for token in unit_tokens(unit) {
                inverted.entry(token).or_default().insert(unit.id.clone());
            }
        }

        Self {
            units,
            by_id,
            by_topic,
            inverted,
        }
    }

    /// Exact lookup by id.
    #[must_use]
    pub fn get(&self, id: &ContentId) -> Option<&ContentUnit> {
        self.by_id.get(id).map(|&pos| &self.units[pos])
    }

    /// Units of one topic in source order. Empty for unknown topics.
    #[must_use]
    pub fn units_for_topic(&self, topic: &str) -> Vec<&ContentUnit> {
        self.by_topic.get(topic).map_or_else(Vec::new, |positions| {
            positions.iter().map(|&pos| &self.units[pos]).collect()
        })
    }

    /// All topics with their unit counts, in lexicographic topic order.
    pub fn topics(&self) -> impl Iterator<Item = (&str, usize)> {
        self.by_topic
            .iter()
            .map(|(topic, positions)| (topic.as_str(), positions.len()))
    }

    /// Posting set for a normalized token.
    #[must_use]
    pub fn postings(&self, token: &str) -> Option<&BTreeSet<ContentId>> {
        self.inverted.get(token)
    }

    /// All units in snapshot order.
    pub fn units(&self) -> impl Iterator<Item = &ContentUnit> {
        self.units.iter()
    }

    /// Number of indexed units.
    #[must_use]
    pub fn unit_count(&self) -> usize {
        self.units.len()
    }

    /// Number of distinct topics.
    #[must_use]
    pub fn topic_count(&self) -> usize {
        self.by_topic.len()
    }

    /// Whether the index holds no units.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.units.is_empty()
    }

    /// Verify the structural invariant: every id referenced by a posting
    /// set exists in the id map.
    #[must_use]
    pub fn postings_are_consistent(&self) -> bool {
        self.inverted
            .values()
            .flatten()
            .all(|id| self.by_id.contains_key(id))
    }
}

/// Distinct normalized tokens of one unit: plain text plus heading texts.
fn unit_tokens(unit: &ContentUnit) -> BTreeSet<String> {
    let mut tokens: BTreeSet<String> = tokenize(&unit.plain_text).into_iter().collect();
    for heading in &unit.headings {
        tokens.extend(tokenize(&heading.text));
    }
    tokens
}

/// Serialized form of [`CatalogIndex`]: the ordered unit list only. The
/// derived maps are rebuilt on deserialization through the same pure build
/// path, so a round-tripped index is identical to a fresh one.
#[derive(Serialize, Deserialize)]
struct IndexPayload {
    units: Vec<ContentUnit>,
}

impl From<CatalogIndex> for IndexPayload {
    fn from(index: CatalogIndex) -> Self {
        Self { units: index.units }
    }
}

impl From<IndexPayload> for CatalogIndex {
    fn from(payload: IndexPayload) -> Self {
        Self::from_units(payload.units)
    }
}
