//! Core data types and structures for the catalog engine.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Stable identifier for one content unit: a `(topic, slug)` pair.
///
/// Ids are assigned by the loader in input order and remain stable across
/// rebuilds as long as the source topic/slug pair is unchanged. Ordering is
/// lexicographic on topic, then slug, which is also the deterministic
/// tie-break order for search results.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ContentId {
    /// Topic grouping key (directory name in the source layout).
    pub topic: String,
    /// Unique-within-topic article key.
    pub slug: String,
}

impl ContentId {
    /// Create a new content id.
    #[must_use]
    pub fn new(topic: impl Into<String>, slug: impl Into<String>) -> Self {
        Self {
            topic: topic.into(),
            slug: slug.into(),
        }
    }
}

impl fmt::Display for ContentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.topic, self.slug)
    }
}

/// One heading extracted from a unit's HTML, with its navigation anchor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Heading {
    /// Heading level, 1..=6.
    pub level: u8,
    /// Heading text with nested markup stripped.
    pub text: String,
    /// Kebab-case anchor, unique within the unit (`-2`, `-3`, ... on collision).
    pub anchor: String,
}

/// One code block extracted from a unit's HTML, in document order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CodeBlock {
    /// Language hint from a `language-*` class, or `"unknown"`.
    pub language: String,
    /// Verbatim code text.
    pub text: String,
}

impl CodeBlock {
    /// Language value used when no `language-*` hint is present.
    pub const UNKNOWN_LANGUAGE: &'static str = "unknown";
}

/// Per-class callout counts observed in a unit (e.g. `info-box`,
/// `warning-box`). Structural audit data only; never rendered.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CalloutCount {
    /// Callout class name as it appears in the markup.
    pub class: String,
    /// Number of occurrences in the unit.
    pub count: usize,
}

/// One parsed documentation article.
///
/// Created only during a loader pass and immutable afterwards. `raw_html`
/// is passed through unmodified for the rendering layer; `headings`,
/// `code_blocks`, and `plain_text` are derived deterministically from it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContentUnit {
    /// Stable identifier.
    pub id: ContentId,
    /// Unmodified source HTML fragment.
    pub raw_html: String,
    /// Heading outline in document order.
    pub headings: Vec<Heading>,
    /// Code blocks in document order.
    pub code_blocks: Vec<CodeBlock>,
    /// Callout boxes grouped by class, in first-seen order.
    pub callouts: Vec<CalloutCount>,
    /// Tag-stripped, entity-decoded, whitespace-collapsed body text.
    /// Used only for search tokenization, never re-rendered.
    pub plain_text: String,
    /// When the loader pass that produced this unit ran.
    pub loaded_at: DateTime<Utc>,
}

impl ContentUnit {
    /// Display title: first heading text, falling back to the slug.
    #[must_use]
    pub fn title(&self) -> &str {
        self.headings
            .first()
            .map_or(self.id.slug.as_str(), |h| h.text.as_str())
    }

    /// Lightweight summary for listings.
    #[must_use]
    pub fn summary(&self) -> UnitSummary {
        UnitSummary {
            id: self.id.clone(),
            title: self.title().to_string(),
            heading_count: self.headings.len(),
            code_block_count: self.code_blocks.len(),
            word_count: self.plain_text.split_whitespace().count(),
        }
    }
}

/// Compact description of a unit for topic listings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UnitSummary {
    /// Stable identifier.
    pub id: ContentId,
    /// First heading text, or the slug when the unit has no headings.
    pub title: String,
    /// Number of headings in the outline.
    pub heading_count: usize,
    /// Number of extracted code blocks.
    pub code_block_count: usize,
    /// Word count of the plain-text body.
    pub word_count: usize,
}

/// Classification of a recoverable, per-unit data-quality issue.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WarningKind {
    /// A later source entry reused an already-assigned `(topic, slug)`.
    DuplicateSlug,
    /// The raw HTML was empty or whitespace-only; the unit is a stub.
    EmptyContent,
    /// The markup was unbalanced or otherwise malformed; extraction was
    /// best-effort.
    MalformedMarkup,
}

impl fmt::Display for WarningKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::DuplicateSlug => write!(f, "duplicate_slug"),
            Self::EmptyContent => write!(f, "empty_content"),
            Self::MalformedMarkup => write!(f, "malformed_markup"),
        }
    }
}

/// A non-fatal data-quality issue recorded during a load pass.
///
/// Warnings are accumulated alongside the build result and exposed to
/// operators; they are never thrown and never silently dropped.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoadWarning {
    /// What went wrong.
    pub kind: WarningKind,
    /// The unit the issue was observed on.
    pub id: ContentId,
    /// Human-readable detail (offending fragment offset, duplicate
    /// position, ...).
    pub detail: String,
}

/// One raw source entry handed to the loader by a module source provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ModuleSource {
    /// Topic grouping key.
    pub topic: String,
    /// Article slug within the topic.
    pub slug: String,
    /// Raw HTML fragment payload.
    pub raw_html: String,
}

impl ModuleSource {
    /// Create a new module source entry.
    #[must_use]
    pub fn new(
        topic: impl Into<String>,
        slug: impl Into<String>,
        raw_html: impl Into<String>,
    ) -> Self {
        Self {
            topic: topic.into(),
            slug: slug.into(),
            raw_html: raw_html.into(),
        }
    }
}

/// Ordered, not-yet-indexed output of a loader pass: the parsed units in
/// input order plus every warning accumulated along the way.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogSnapshot {
    /// Parsed units, in source input order (duplicates excluded).
    pub units: Vec<ContentUnit>,
    /// Accumulated load warnings.
    pub warnings: Vec<LoadWarning>,
}

/// One ranked search result.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchHit {
    /// Matching unit id.
    pub id: ContentId,
    /// Count of distinct query tokens present in the unit's postings.
    pub score: usize,
    /// Texts of the unit's headings that share a token with the query.
    pub matched_headings: Vec<String>,
}
