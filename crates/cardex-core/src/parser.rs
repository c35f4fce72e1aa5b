//! Tolerant HTML fragment parser.
//!
//! Extracts a structural summary from one raw article fragment: the heading
//! outline (with unique anchors), code blocks with language hints, callout
//! counts, and a tag-stripped plain-text body for search tokenization.
//!
//! The parser is a pure function of its input and never fails on content:
//! empty input and unbalanced markup degrade to diagnostics on the result
//! while extraction proceeds best-effort over the recovered DOM.

use scraper::{ElementRef, Html, Selector};
use std::collections::HashSet;

use crate::text::{collapse_whitespace, slugify};
use crate::{CalloutCount, CodeBlock, Error, Heading, Result, WarningKind};

/// Suffix identifying callout container classes in the source corpus
/// (`info-box`, `warning-box`, `tip-box`, ...).
const CALLOUT_CLASS_SUFFIX: &str = "-box";

/// A per-unit data-quality issue found while parsing.
///
/// The loader attaches the owning [`crate::ContentId`] and lifts these into
/// [`crate::LoadWarning`]s.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseDiagnostic {
    /// Issue classification.
    pub kind: WarningKind,
    /// Human-readable detail, including the byte offset for markup issues.
    pub detail: String,
}

/// Structural summary of one parsed fragment.
#[derive(Debug, Clone, Default)]
pub struct ParsedContent {
    /// Heading outline in document order, anchors unique within the unit.
    pub headings: Vec<Heading>,
    /// Code blocks in document order.
    pub code_blocks: Vec<CodeBlock>,
    /// Callout counts by class, in first-seen order.
    pub callouts: Vec<CalloutCount>,
    /// Whitespace-collapsed, tag-stripped body text.
    pub plain_text: String,
    /// Data-quality issues observed on this fragment.
    pub diagnostics: Vec<ParseDiagnostic>,
}

/// HTML structural parser with precompiled selectors.
pub struct ContentParser {
    heading_selector: Selector,
    pre_selector: Selector,
    code_selector: Selector,
    callout_selector: Selector,
}

impl ContentParser {
    /// Create a parser instance.
    pub fn new() -> Result<Self> {
        Ok(Self {
            heading_selector: compile_selector("h1, h2, h3, h4, h5, h6")?,
            pre_selector: compile_selector("pre")?,
            code_selector: compile_selector("code")?,
            callout_selector: compile_selector("div[class]")?,
        })
    }

    /// Parse one raw HTML fragment into its structural summary.
    ///
    /// Never fails on content: malformed markup yields
    /// [`WarningKind::MalformedMarkup`] diagnostics and best-effort
    /// extraction, empty input yields an [`WarningKind::EmptyContent`]
    /// diagnostic and an indexable stub.
    #[must_use]
    pub fn parse(&self, raw_html: &str) -> ParsedContent {
        if raw_html.trim().is_empty() {
            return ParsedContent {
                diagnostics: vec![ParseDiagnostic {
                    kind: WarningKind::EmptyContent,
                    detail: "fragment is empty or whitespace-only".into(),
                }],
                ..ParsedContent::default()
            };
        }

        let diagnostics: Vec<ParseDiagnostic> = scan_markup_issues(raw_html)
            .into_iter()
            .map(|issue| ParseDiagnostic {
                kind: WarningKind::MalformedMarkup,
                detail: issue,
            })
            .collect();

        let document = Html::parse_fragment(raw_html);

        ParsedContent {
            headings: self.extract_headings(&document),
            code_blocks: self.extract_code_blocks(&document),
            callouts: self.extract_callouts(&document),
            plain_text: extract_plain_text(&document),
            diagnostics,
        }
    }

    fn extract_headings(&self, document: &Html) -> Vec<Heading> {
        let mut headings = Vec::new();
        let mut used_anchors: HashSet<String> = HashSet::new();

        for element in document.select(&self.heading_selector) {
            let level = heading_level(element.value().name());
            let text = collapse_whitespace(&element.text().collect::<String>());

            let base = match slugify(&text).as_str() {
                "" => "section".to_string(),
                slug => slug.to_string(),
            };

            let mut anchor = base.clone();
            let mut n = 1usize;
            while !used_anchors.insert(anchor.clone()) {
                n += 1;
                anchor = format!("{base}-{n}");
            }

            headings.push(Heading {
                level,
                text,
                anchor,
            });
        }

        headings
    }

    fn extract_code_blocks(&self, document: &Html) -> Vec<CodeBlock> {
        let mut blocks = Vec::new();

        for pre in document.select(&self.pre_selector) {
            // pre > code is the dominant idiom in the corpus; bare <pre>
            // blocks still count, with no language hint available.
            let (language, text) = pre.select(&self.code_selector).next().map_or_else(
                || (None, pre.text().collect::<String>()),
                |code| (language_hint(code), code.text().collect::<String>()),
            );

            blocks.push(CodeBlock {
                language: language.unwrap_or_else(|| CodeBlock::UNKNOWN_LANGUAGE.to_string()),
                text,
            });
        }

        blocks
    }

    fn extract_callouts(&self, document: &Html) -> Vec<CalloutCount> {
        let mut callouts: Vec<CalloutCount> = Vec::new();

        for element in document.select(&self.callout_selector) {
            for class in element.value().classes() {
                if !class.ends_with(CALLOUT_CLASS_SUFFIX) {
                    continue;
                }
                match callouts.iter_mut().find(|c| c.class == class) {
                    Some(entry) => entry.count += 1,
                    None => callouts.push(CalloutCount {
                        class: class.to_string(),
                        count: 1,
                    }),
                }
            }
        }

        callouts
    }
}

fn compile_selector(selector: &str) -> Result<Selector> {
    Selector::parse(selector)
        .map_err(|e| Error::Parse(format!("invalid selector `{selector}`: {e:?}")))
}

fn heading_level(tag_name: &str) -> u8 {
    match tag_name {
        "h1" => 1,
        "h2" => 2,
        "h3" => 3,
        "h4" => 4,
        "h5" => 5,
        _ => 6,
    }
}

fn language_hint(code: ElementRef<'_>) -> Option<String> {
    code.value()
        .classes()
        .find_map(|class| class.strip_prefix("language-"))
        .filter(|hint| !hint.is_empty())
        .map(str::to_string)
}

fn extract_plain_text(document: &Html) -> String {
    let joined = document
        .root_element()
        .text()
        .collect::<Vec<_>>()
        .join(" ");
    collapse_whitespace(&joined)
}

/// Elements for which an unmatched open or close tag is reported.
///
/// Deliberately conservative: `<p>` and `<li>` have spec-sanctioned implied
/// closes, so flagging them would drown real problems in noise. The tags
/// listed here change document structure when html5ever has to recover.
const BALANCE_CHECKED_TAGS: [&str; 10] =
    ["h1", "h2", "h3", "h4", "h5", "h6", "pre", "code", "div", "table"];

/// Scan raw markup for structural problems that html5ever recovers from
/// silently: tags that open with `<` but never reach `>`, and unbalanced
/// open/close pairs for the tags in [`BALANCE_CHECKED_TAGS`].
///
/// A `<` that does not start a plausible tag (`a < b`) is treated as text.
/// Each finding carries the byte offset of the offending fragment.
fn scan_markup_issues(raw: &str) -> Vec<String> {
    let bytes = raw.as_bytes();
    let mut findings = Vec::new();
    let mut open_stack: Vec<(String, usize)> = Vec::new();
    let mut i = 0;

    while i < bytes.len() {
        if bytes[i] != b'<' {
            i += 1;
            continue;
        }

        // Comments close with `-->`, not `>`.
        if raw[i..].starts_with("<!--") {
            match raw[i + 4..].find("-->") {
                Some(end) => i += 4 + end + 3,
                None => {
                    findings.push(format!(
                        "unterminated comment at byte offset {i}: `{}`",
                        fragment_prefix(raw, i)
                    ));
                    break;
                },
            }
            continue;
        }

        let is_tag_start =
            matches!(bytes.get(i + 1), Some(c) if c.is_ascii_alphabetic() || *c == b'/' || *c == b'!');
        if !is_tag_start {
            i += 1;
            continue;
        }

        let rest = &bytes[i + 1..];
        let close = rest.iter().position(|&b| b == b'>');
        let reopen = rest.iter().position(|&b| b == b'<');

        match (close, reopen) {
            (Some(c), r) if r.is_none_or(|r| c < r) => {
                track_tag_balance(&raw[i + 1..=i + c], i, &mut open_stack, &mut findings);
                i += c + 2;
            },
            (_, Some(r)) => {
                findings.push(format!(
                    "unterminated tag at byte offset {i}: `{}`",
                    fragment_prefix(raw, i)
                ));
                i += r + 1;
            },
            (_, None) => {
                findings.push(format!(
                    "unterminated tag at byte offset {i}: `{}`",
                    fragment_prefix(raw, i)
                ));
                break;
            },
        }
    }

    for (name, offset) in open_stack {
        findings.push(format!("unclosed `<{name}>` element at byte offset {offset}"));
    }

    findings
}

/// Track one complete tag (the text between `<` and `>`) against the open
/// stack, recording stray closes. Self-closing tags are ignored.
fn track_tag_balance(
    tag_body: &str,
    offset: usize,
    open_stack: &mut Vec<(String, usize)>,
    findings: &mut Vec<String>,
) {
    let body = tag_body.trim();
    if body.ends_with('/') || body.starts_with('!') {
        return;
    }

    let (is_close, name_part) = match body.strip_prefix('/') {
        Some(rest) => (true, rest),
        None => (false, body),
    };
    let name: String = name_part
        .chars()
        .take_while(|c| c.is_ascii_alphanumeric())
        .collect::<String>()
        .to_ascii_lowercase();

    if !BALANCE_CHECKED_TAGS.contains(&name.as_str()) {
        return;
    }

    if is_close {
        match open_stack.iter().rposition(|(open, _)| *open == name) {
            // Anything above the match had an implied close.
            Some(pos) => open_stack.truncate(pos),
            None => findings.push(format!(
                "closing `</{name}>` without matching open tag at byte offset {offset}"
            )),
        }
    } else {
        open_stack.push((name, offset));
    }
}

fn fragment_prefix(raw: &str, offset: usize) -> String {
    raw[offset..].chars().take(24).collect()
}
