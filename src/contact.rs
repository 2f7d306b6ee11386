//! Personal-info harvesting.
//!
//! Contact identifiers are collected document-wide, independent of section
//! boundaries, so a rewrite that silently drops one can be reported. The
//! harvest never blocks a mutation.

use crate::model::Document;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::sync::OnceLock;

const MIN_PHONE_DIGITS: usize = 7;

/// Contact identifiers found in a document.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PersonalInfo {
    /// Email addresses
    pub emails: BTreeSet<String>,
    /// Phone numbers as written
    pub phones: BTreeSet<String>,
    /// Profile and web URLs (LinkedIn, GitHub, generic)
    pub urls: BTreeSet<String>,
}

impl PersonalInfo {
    /// Create an empty bundle.
    pub fn new() -> Self {
        Self::default()
    }

    /// Total number of identifiers.
    pub fn len(&self) -> usize {
        self.emails.len() + self.phones.len() + self.urls.len()
    }

    /// Check if nothing was found.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// All identifiers, emails first.
    pub fn identifiers(&self) -> impl Iterator<Item = &str> {
        self.emails
            .iter()
            .chain(self.phones.iter())
            .chain(self.urls.iter())
            .map(String::as_str)
    }

    /// Merge another bundle into this one.
    pub fn merge(&mut self, other: PersonalInfo) {
        self.emails.extend(other.emails);
        self.phones.extend(other.phones);
        self.urls.extend(other.urls);
    }

    /// Scan a text and add every identifier found.
    pub fn scan(&mut self, text: &str) {
        for m in email_regex().find_iter(text) {
            self.emails.insert(m.as_str().to_string());
        }

        for m in phone_regex().find_iter(text) {
            let phone = m.as_str().trim();
            let digits = phone.chars().filter(char::is_ascii_digit).count();
            if digits >= MIN_PHONE_DIGITS && !year_range_regex().is_match(phone) {
                self.phones.insert(phone.to_string());
            }
        }

        for re in [linkedin_regex(), github_regex(), web_regex()] {
            for m in re.find_iter(text) {
                let url = m.as_str().trim_end_matches(['.', ','].as_slice());
                self.urls.insert(url.to_string());
            }
        }
    }

    /// Identifiers that occur in `original` but not in `replacement`.
    pub fn missing_from(&self, original: &str, replacement: &str) -> Vec<String> {
        self.identifiers()
            .filter(|id| original.contains(id) && !replacement.contains(id))
            .map(str::to_string)
            .collect()
    }
}

fn email_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"\b[A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Za-z]{2,}\b").expect("valid regex")
    })
}

fn phone_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"\+?\(?[0-9]{1,3}\)?[-\s.]?\(?[0-9]{1,3}\)?[-\s.]?[0-9]{3,4}[-\s.]?[0-9]{3,4}")
            .expect("valid regex")
    })
}

fn year_range_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^(?:19|20)\d{2}\s*[-–]?\s*(?:19|20)\d{2}$").expect("valid regex"))
}

fn linkedin_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"(?:https?://)?(?:www\.)?linkedin\.com/in/[\w-]+/?").expect("valid regex")
    })
}

fn github_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?:https?://)?(?:www\.)?github\.com/[\w-]+/?").expect("valid regex"))
}

fn web_regex() -> &'static Regex {
    crate::extract::url_regex()
}

/// Harvest contact identifiers from a plain text.
pub fn harvest_text(text: &str) -> PersonalInfo {
    let mut info = PersonalInfo::new();
    info.scan(text);
    info
}

/// Harvest contact identifiers from every paragraph, every table cell and
/// every external hyperlink target of a document.
pub fn harvest(document: &Document) -> PersonalInfo {
    let mut info = PersonalInfo::new();

    for paragraph in &document.paragraphs {
        info.scan(&paragraph.plain_text());
    }

    for table in &document.tables {
        for cell in table.cells() {
            info.scan(&cell.plain_text());
        }
    }

    for (_, relationship) in document.relationships.iter() {
        if relationship.is_hyperlink() && relationship.external {
            info.scan(&relationship.target);
        }
    }

    info
}
