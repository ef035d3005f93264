//! Markdown Detection
//!
//! A cheap heuristic that decides whether a message body goes through a
//! markdown renderer or is shown as plain text. Any single structural match
//! is enough.

use std::sync::OnceLock;

use regex::RegexSet;

use crate::messages::ContentType;

/// Texts shorter than this (in characters) are never markdown
pub const MIN_MARKDOWN_LEN: usize = 3;

const MARKDOWN_PATTERNS: &[&str] = &[
    // bold / italic
    r"[*_]{1,2}[^*_]+[*_]{1,2}",
    // links
    r"\[[^\]]+\]\([^)]+\)",
    // headings
    r"(?mR)^#{1,6}\s",
    // unordered lists
    r"(?mR)^[-*+]\s",
    // ordered lists
    r"(?mR)^[0-9]+\.\s",
    // block quotes
    r"(?mR)^>\s",
    // inline code
    r"`[^`]+`",
    // fenced code
    r"```[\s\S]*?```",
    // table rows
    r"(?mR)^\|(.+\|)+$",
    // images
    r"!\[[^\]]*\]\([^)]+\)",
];

fn patterns() -> &'static RegexSet {
    static PATTERNS: OnceLock<RegexSet> = OnceLock::new();
    PATTERNS.get_or_init(|| {
        #[allow(clippy::expect_used)]
        RegexSet::new(MARKDOWN_PATTERNS).expect("markdown patterns are valid")
    })
}

/// Whether `text` looks like markdown
#[must_use]
pub fn contains_markdown(text: &str) -> bool {
    if text.chars().count() < MIN_MARKDOWN_LEN {
        return false;
    }
    patterns().is_match(text)
}

impl ContentType {
    /// Pick the rendering hint for a message body
    #[must_use]
    pub fn detect(text: &str) -> Self {
        if contains_markdown(text) {
            Self::Markdown
        } else {
            Self::Plain
        }
    }
}
