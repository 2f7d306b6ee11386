//! Entity extraction from section text.
//!
//! Every extractor is a pure function of a section's raw text. Empty input
//! yields the empty form of the result; a section in which no entity is
//! recognised does too, and the miss is logged at debug level.

mod experience;
mod projects;
mod skills;
mod summary;

pub use experience::{extract_experience, ExperienceEntry};
pub use projects::{extract_projects, ProjectEntry};
pub use skills::{SkillMap, SkillsExtractor};
pub use summary::extract_summary;

use regex::Regex;
use std::sync::OnceLock;

/// Verbs that open a description line rather than a title or company line.
pub(crate) const ACTION_VERBS: &[&str] = &[
    "developed",
    "built",
    "designed",
    "implemented",
    "created",
];

/// [`ACTION_VERBS`] plus verbs that only disqualify project names.
pub(crate) const EXTENDED_ACTION_VERBS: &[&str] = &[
    "developed",
    "built",
    "designed",
    "implemented",
    "created",
    "worked",
    "used",
    "integrated",
    "deployed",
    "gained",
    "technologies:",
];

/// Verbs that open an achievement line.
pub(crate) const ACHIEVEMENT_VERBS: &[&str] = &[
    "achieved",
    "increased",
    "reduced",
    "improved",
    "decreased",
    "saved",
    "won",
    "awarded",
    "grew",
    "boosted",
    "cut",
];

/// Upper-case headers that always end a section's content.
pub(crate) const MAJOR_HEADERS: &[&str] = &[
    "SKILLS",
    "WORK EXPERIENCE",
    "EXPERIENCE",
    "PROJECTS",
    "EDUCATION",
    "PROFESSIONAL SUMMARY",
    "SUMMARY",
    "CERTIFICATIONS",
    "AWARDS",
];

const SEPARATORS: [char; 9] = [',', '•', '●', '▪', '◦', '|', ';', '/', '\t'];

const FILLER_WORDS: [&str; 3] = ["etc", "and", "or"];

/// Check whether the first 15 characters of a line contain one of `verbs`.
pub(crate) fn starts_with_action(line: &str, verbs: &[&str]) -> bool {
    let head: String = line.to_lowercase().chars().take(15).collect();
    verbs.iter().any(|verb| head.contains(verb))
}

/// Check whether a line is a known major section header.
pub(crate) fn is_major_header(line: &str) -> bool {
    let upper = line.trim().trim_end_matches(':').to_uppercase();
    MAJOR_HEADERS.contains(&upper.as_str())
}

/// Strip a leading bullet glyph, dash or asterisk marker.
pub(crate) fn strip_bullet(line: &str) -> Option<&str> {
    static RE: OnceLock<Regex> = OnceLock::new();
    let re = RE.get_or_init(|| Regex::new(r"^\s*(?:[•●▪▫◦‣⁃·]|[-*+]\s)\s*").expect("valid regex"));
    re.find(line).map(|m| &line[m.end()..])
}

fn year_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\b(?:19|20)\d{2}\b").expect("valid regex"))
}

pub(crate) fn contains_year(text: &str) -> bool {
    year_regex().is_match(text)
}

pub(crate) fn url_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r#"https?://[^\s<>"')\]]+"#).expect("valid regex"))
}

fn parenthetical_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\([^)]*\)").expect("valid regex"))
}

fn numeric_word_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?:^|\s)\d+(?:\.\d+)*\+?(?:\s|$)").expect("valid regex"))
}

/// Split a list line into cleaned item tokens.
///
/// Separators are applied in a fixed order; tokens lose parenthetical notes,
/// standalone numbers and trailing punctuation, and tokens of one character,
/// pure digits or filler words are dropped.
pub fn tokenize_items(line: &str) -> Vec<String> {
    let line = strip_bullet(line).unwrap_or(line);

    let mut pieces = vec![line.to_string()];
    for separator in SEPARATORS {
        pieces = pieces
            .iter()
            .flat_map(|p| p.split(separator).map(str::to_string).collect::<Vec<_>>())
            .collect();
    }

    pieces
        .into_iter()
        .filter_map(|piece| clean_token(&piece))
        .collect()
}

fn clean_token(piece: &str) -> Option<String> {
    let without_notes = parenthetical_regex().replace_all(piece, " ");
    let without_numbers = numeric_word_regex().replace_all(&without_notes, " ");
    let token = without_numbers
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ");
    let token = token.trim_matches(|c| matches!(c, '.' | ',' | ';' | ':' | '-' | '*'));
    let token = token.trim();

    let too_short = token.chars().count() <= 1;
    let numeric = token.chars().all(|c| c.is_ascii_digit() || c == '.');
    let filler = FILLER_WORDS.contains(&token.to_lowercase().as_str());
    if too_short || numeric || filler {
        None
    } else {
        Some(token.to_string())
    }
}

/// Push `item` unless an equal item (ignoring case) is already present.
pub(crate) fn push_unique(items: &mut Vec<String>, item: String) {
    let lower = item.to_lowercase();
    if !items.iter().any(|existing| existing.to_lowercase() == lower) {
        items.push(item);
    }
}

/// Non-empty trimmed lines of a text.
pub(crate) fn content_lines(text: &str) -> Vec<&str> {
    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .collect()
}
