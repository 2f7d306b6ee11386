//! Header shape gate.
//!
//! Legitimate headers are short, so most lines are rejected here before any
//! embedding is computed. The gate is an ordered list of rejection rules;
//! the first rule that matches decides.

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::OnceLock;
use unicode_normalization::UnicodeNormalization;

/// Word and character ceilings for a header candidate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ShapeLimits {
    /// Maximum number of words
    pub max_words: usize,
    /// Maximum number of characters
    pub max_chars: usize,
}

impl Default for ShapeLimits {
    fn default() -> Self {
        Self::line()
    }
}

impl ShapeLimits {
    /// Create limits with explicit ceilings.
    pub fn new(max_words: usize, max_chars: usize) -> Self {
        Self {
            max_words,
            max_chars,
        }
    }

    /// Limits for lines of plain text (4 words, 30 characters).
    pub fn line() -> Self {
        Self::new(4, 30)
    }

    /// Limits for document paragraphs (6 words, 40 characters).
    pub fn paragraph() -> Self {
        Self::new(6, 40)
    }
}

/// Why a line was rejected as a header candidate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rejection {
    /// Nothing left after normalization
    Empty,
    /// Starts with a bullet glyph or dash marker
    Bullet,
    /// Has content after a colon ("Category: items")
    InlineContent,
    /// More words than allowed
    TooManyWords,
    /// More characters than allowed
    TooLong,
}

/// Rejection rules in evaluation order.
pub const SHAPE_RULES: [Rejection; 5] = [
    Rejection::Empty,
    Rejection::Bullet,
    Rejection::InlineContent,
    Rejection::TooManyWords,
    Rejection::TooLong,
];

impl Rejection {
    /// Check whether this rule rejects the candidate.
    ///
    /// `raw` is the trimmed input line, `normalized` its header-normalized form.
    pub fn applies(&self, raw: &str, normalized: &str, limits: &ShapeLimits) -> bool {
        match self {
            Rejection::Empty => normalized.is_empty(),
            Rejection::Bullet => bullet_regex().is_match(raw),
            Rejection::InlineContent => raw
                .split_once(':')
                .is_some_and(|(_, rest)| !rest.trim().is_empty()),
            Rejection::TooManyWords => normalized.split_whitespace().count() > limits.max_words,
            Rejection::TooLong => normalized.chars().count() > limits.max_chars,
        }
    }
}

fn bullet_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^(?:[•●▪◦‣⁃·○■□*]|[-–—]\s)").expect("valid regex"))
}

/// Normalize header text: NFKC, decorative punctuation removed, whitespace
/// collapsed.
pub fn normalize_header(text: &str) -> String {
    let replaced: String = text
        .nfkc()
        .map(|c| match c {
            ':' | '-' | '–' | '—' | '•' | '·' => ' ',
            other => other,
        })
        .collect();
    replaced.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Run the shape gate.
///
/// Returns the normalized header text when every rule passes, or the first
/// rule that rejected the line.
pub fn check_shape(line: &str, limits: &ShapeLimits) -> Result<String, Rejection> {
    let raw = line.trim();
    let normalized = normalize_header(raw);

    match SHAPE_RULES
        .iter()
        .find(|rule| rule.applies(raw, &normalized, limits))
    {
        Some(rule) => Err(*rule),
        None => Ok(normalized),
    }
}
