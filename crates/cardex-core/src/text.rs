//! Text normalization shared by the parser, the index builder, and the
//! query service.
//!
//! Both sides of search (indexing and querying) must agree on exactly one
//! normalization, so it lives here: lowercase, diacritics stripped via NFKD
//! decomposition, split on non-alphanumeric boundaries, tokens shorter than
//! two characters dropped.

use unicode_normalization::{UnicodeNormalization, char::is_combining_mark};

/// Minimum token length retained by [`tokenize`].
pub const MIN_TOKEN_LEN: usize = 2;

/// Slugify heading text into a lowercase-kebab anchor.
///
/// Diacritics are removed (`Qué` → `que`), alphanumeric runs are kept, and
/// everything else collapses into single hyphens. The result never starts
/// or ends with a hyphen. Collision suffixing (`-2`, `-3`, ...) is the
/// parser's responsibility, not this function's.
#[must_use]
pub fn slugify(text: &str) -> String {
    let mut slug = String::with_capacity(text.len());
    let mut prev_was_hyphen = true;

    for ch in text.nfkd() {
        if is_combining_mark(ch) {
            continue;
        }

        for lower in ch.to_lowercase() {
            if lower.is_alphanumeric() {
                // Letters without a decomposed ASCII form (CJK and friends)
                // are kept as-is so those headings still get usable anchors.
                slug.push(lower);
                prev_was_hyphen = false;
            } else if !prev_was_hyphen {
                slug.push('-');
                prev_was_hyphen = true;
            }
        }
    }

    slug.trim_end_matches('-').to_string()
}

/// Tokenize text for the inverted index and for queries.
///
/// Returns tokens in occurrence order, duplicates included; callers that
/// need presence semantics deduplicate on their side.
#[must_use]
pub fn tokenize(text: &str) -> Vec<String> {
    let mut tokens = Vec::new();
    let mut current = String::new();

    for ch in text.nfkd() {
        if is_combining_mark(ch) {
            continue;
        }

        if ch.is_alphanumeric() {
            for lower in ch.to_lowercase() {
                current.push(lower);
            }
        } else if !current.is_empty() {
            if current.chars().count() >= MIN_TOKEN_LEN {
                tokens.push(std::mem::take(&mut current));
            } else {
                current.clear();
            }
        }
    }

    if current.chars().count() >= MIN_TOKEN_LEN {
        tokens.push(current);
    }

    tokens
}

/// Collapse all whitespace runs in `text` to single spaces and trim.
#[must_use]
pub fn collapse_whitespace(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut prev_was_space = true;

    for ch in text.chars() {
        if ch.is_whitespace() {
            if !prev_was_space {
                out.push(' ');
                prev_was_space = true;
            }
        } else {
            out.push(ch);
            prev_was_space = false;
        }
    }

    out.trim_end().to_string()
}
