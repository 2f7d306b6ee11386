//! Work-experience extraction.

use super::{
    contains_year, content_lines, is_major_header, push_unique, starts_with_action,
    strip_bullet, tokenize_items, ACHIEVEMENT_VERBS, ACTION_VERBS,
};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::OnceLock;

/// One position held.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExperienceEntry {
    /// Job title
    pub job_title: String,
    /// Company and location line
    pub company: String,
    /// Duration as written ("Jan 2021 - Present")
    pub duration: String,
    /// Start of the duration, if it could be split
    pub start_date: String,
    /// End of the duration, if it could be split
    pub end_date: String,
    /// Description lines joined with single spaces
    pub description: String,
    /// Bullet lines, marker removed
    pub responsibilities: Vec<String>,
    /// Lines opening with an achievement verb
    pub achievements: Vec<String>,
    /// Items of a "Technologies:" line
    pub technologies: Vec<String>,
}

const MONTHS: [&str; 12] = [
    "january",
    "february",
    "march",
    "april",
    "may",
    "june",
    "july",
    "august",
    "september",
    "october",
    "november",
    "december",
];

const TECHNOLOGIES_PREFIX: &str = "technologies:";

fn role_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"(?i)\b(?:engineer|developer|manager|analyst|lead|senior|junior)s?\b")
            .expect("valid regex")
    })
}

fn company_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"(?i)\b(?:ltd|inc|corp|llc|gmbh|pvt|limited|remote|india)\b")
            .expect("valid regex")
    })
}

fn range_separator_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?i)\s*(?:[-–—]|\bto\b)\s*").expect("valid regex"))
}

/// Check whether a word is a full or abbreviated month name.
fn is_month(word: &str) -> bool {
    let word = word
        .trim_end_matches(|c| c == '.' || c == ',')
        .to_lowercase();
    if word.len() < 3 {
        return false;
    }
    word == "sept"
        || MONTHS
            .iter()
            .any(|m| *m == word || (word.len() == 3 && m.starts_with(word.as_str())))
}

/// A line that opens a new entry: a year and a role keyword.
fn is_entry_boundary(line: &str) -> bool {
    contains_year(line) && role_regex().is_match(line)
}

fn is_company_line(line: &str) -> bool {
    !is_entry_boundary(line)
        && (line.contains(',') || company_regex().is_match(line))
        && !starts_with_action(line, ACTION_VERBS)
}

fn is_technologies_line(line: &str) -> bool {
    line.to_lowercase().starts_with(TECHNOLOGIES_PREFIX)
}

/// Split an entry line into job title and duration at the first year token,
/// absorbing a preceding month name into the duration.
fn split_title_duration(line: &str) -> (String, String) {
    let words: Vec<&str> = line.split_whitespace().collect();
    let Some(year_at) = words.iter().position(|w| contains_year(w)) else {
        return (words.join(" "), String::new());
    };

    let start = if year_at > 0 && is_month(words[year_at - 1]) {
        year_at - 1
    } else {
        year_at
    };

    let title = words[..start]
        .join(" ")
        .trim_end_matches(|c: char| c.is_whitespace() || matches!(c, '|' | ',' | '-' | '–' | '—' | '@' | '('))
        .to_string();
    let duration = words[start..]
        .join(" ")
        .trim_end_matches(')')
        .to_string();

    if title.is_empty() && duration.is_empty() {
        (line.to_string(), String::new())
    } else {
        (title, duration)
    }
}

fn split_duration(duration: &str) -> (String, String) {
    let mut parts = range_separator_regex().splitn(duration, 2);
    let start = parts.next().unwrap_or_default().trim().to_string();
    let end = parts.next().unwrap_or_default().trim().to_string();
    (start, end)
}

/// Extract experience entries from an experience section.
pub fn extract_experience(text: &str) -> Vec<ExperienceEntry> {
    let lines = content_lines(text);
    let mut entries = Vec::new();
    let mut i = 0;

    while i < lines.len() {
        if !is_entry_boundary(lines[i]) {
            i += 1;
            continue;
        }

        let mut entry = ExperienceEntry::default();
        (entry.job_title, entry.duration) = split_title_duration(lines[i]);
        (entry.start_date, entry.end_date) = split_duration(&entry.duration);
        i += 1;

        if i < lines.len() && is_company_line(lines[i]) {
            entry.company = lines[i].to_string();
            i += 1;
        }

        let mut description = Vec::new();
        while i < lines.len() {
            let line = lines[i];
            if is_entry_boundary(line) || is_major_header(line) {
                break;
            }
            if is_technologies_line(line) {
                for item in tokenize_items(&line[TECHNOLOGIES_PREFIX.len()..]) {
                    push_unique(&mut entry.technologies, item);
                }
                i += 1;
                continue;
            }

            let stripped = strip_bullet(line);
            let body = stripped.unwrap_or(line).trim();
            if stripped.is_some() {
                entry.responsibilities.push(body.to_string());
            }
            if starts_with_action(body, ACHIEVEMENT_VERBS) {
                entry.achievements.push(body.to_string());
            }
            description.push(line);
            i += 1;
        }

        let joined = description.join(" ");
        entry.description = match joined.find("Technologies:") {
            Some(at) => joined[..at].trim().to_string(),
            None => joined.trim().to_string(),
        };
        entries.push(entry);
    }

    if entries.is_empty() && !lines.is_empty() {
        log::debug!("No experience entries recognised in {} lines", lines.len());
    }
    entries
}
