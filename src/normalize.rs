//! Input text normalization.
//!
//! Plain text handed to the parser has usually been extracted from a PDF or
//! word-processor file by an external collaborator. This pass repairs the
//! usual extraction artifacts while keeping the line structure the parser
//! depends on.

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::OnceLock;
use unicode_normalization::UnicodeNormalization;

/// Options for text normalization.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NormalizeOptions {
    /// Normalize Unicode to NFC form
    pub normalize_unicode: bool,

    /// Fix ligatures (ﬁ, ﬂ, etc.)
    pub fix_ligatures: bool,

    /// Standardize bullet characters (●, ■, ► → •)
    pub standardize_bullets: bool,

    /// Remove Unicode replacement character (U+FFFD)
    pub remove_replacement_char: bool,

    /// Remove decorated page-number lines ("- 3 -", "Page 3 of 4")
    pub remove_page_numbers: bool,

    /// Join a lone bullet marker with the line that follows it
    pub merge_list_markers: bool,

    /// Trim lines and collapse runs of spaces and tabs
    pub normalize_whitespace: bool,

    /// Maximum consecutive blank lines (0 = unlimited)
    pub max_blank_lines: u8,
}

impl Default for NormalizeOptions {
    fn default() -> Self {
        Self {
            normalize_unicode: true,
            fix_ligatures: true,
            standardize_bullets: true,
            remove_replacement_char: true,
            remove_page_numbers: true,
            merge_list_markers: true,
            normalize_whitespace: true,
            max_blank_lines: 1,
        }
    }
}

impl NormalizeOptions {
    /// Options that leave text untouched.
    pub fn none() -> Self {
        Self {
            normalize_unicode: false,
            fix_ligatures: false,
            standardize_bullets: false,
            remove_replacement_char: false,
            remove_page_numbers: false,
            merge_list_markers: false,
            normalize_whitespace: false,
            max_blank_lines: 0,
        }
    }

    /// Enable or disable page-number removal.
    pub fn with_page_numbers_removed(mut self, enabled: bool) -> Self {
        self.remove_page_numbers = enabled;
        self
    }

    /// Set the maximum number of consecutive blank lines.
    pub fn with_max_blank_lines(mut self, max: u8) -> Self {
        self.max_blank_lines = max;
        self
    }
}

const LIGATURES: [(&str, &str); 7] = [
    ("\u{FB00}", "ff"),
    ("\u{FB01}", "fi"),
    ("\u{FB02}", "fl"),
    ("\u{FB03}", "ffi"),
    ("\u{FB04}", "ffl"),
    ("\u{FB05}", "st"),
    ("\u{FB06}", "st"),
];

const BULLETS: [char; 10] = ['●', '○', '■', '□', '◆', '◇', '▪', '▫', '►', '▻'];

fn page_number_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"(?i)^(?:[-–—]\s*\d{1,3}\s*[-–—]|page\s+\d{1,3}(?:\s+of\s+\d{1,3})?)$")
            .expect("valid regex")
    })
}

fn lone_marker_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^(?:[•\-*]|\d{1,2}[.)])$").expect("valid regex"))
}

/// Line-preserving text normalizer.
#[derive(Debug, Clone, Default)]
pub struct TextNormalizer {
    options: NormalizeOptions,
}

impl TextNormalizer {
    /// Create a normalizer with the given options.
    pub fn new(options: NormalizeOptions) -> Self {
        Self { options }
    }

    /// Get the options.
    pub fn options(&self) -> &NormalizeOptions {
        &self.options
    }

    /// Normalize text.
    pub fn process(&self, text: &str) -> String {
        let mut result = text.replace("\r\n", "\n").replace('\r', "\n");

        if self.options.normalize_unicode {
            result = result.nfc().collect();
        }

        if self.options.fix_ligatures {
            for (ligature, replacement) in LIGATURES {
                result = result.replace(ligature, replacement);
            }
        }

        if self.options.standardize_bullets {
            result = result.replace(&BULLETS[..], "•");
        }

        if self.options.remove_replacement_char {
            result = result.replace('\u{FFFD}', "");
        }

        let mut lines: Vec<String> = result
            .lines()
            .map(|line| {
                if self.options.normalize_whitespace {
                    line.split_whitespace().collect::<Vec<_>>().join(" ")
                } else {
                    line.to_string()
                }
            })
            .collect();

        if self.options.remove_page_numbers {
            lines.retain(|line| !page_number_regex().is_match(line.trim()));
        }

        if self.options.merge_list_markers {
            lines = Self::merge_list_markers(lines);
        }

        if self.options.max_blank_lines > 0 {
            lines = self.limit_blank_lines(lines);
        }

        lines.join("\n").trim_matches('\n').to_string()
    }

    fn merge_list_markers(lines: Vec<String>) -> Vec<String> {
        let mut merged: Vec<String> = Vec::with_capacity(lines.len());
        let mut pending: Option<String> = None;

        for line in lines {
            if let Some(marker) = pending.take() {
                if line.trim().is_empty() {
                    merged.push(marker);
                    merged.push(line);
                } else {
                    merged.push(format!("{} {}", marker, line.trim_start()));
                }
                continue;
            }
            if lone_marker_regex().is_match(line.trim()) {
                pending = Some(line.trim().to_string());
            } else {
                merged.push(line);
            }
        }
        merged.extend(pending);
        merged
    }

    fn limit_blank_lines(&self, lines: Vec<String>) -> Vec<String> {
        let max = self.options.max_blank_lines as usize;
        let mut blank_run = 0;
        lines
            .into_iter()
            .filter(|line| {
                if line.trim().is_empty() {
                    blank_run += 1;
                    blank_run <= max
                } else {
                    blank_run = 0;
                    true
                }
            })
            .collect()
    }
}

/// Normalize text with default options.
pub fn normalize(text: &str) -> String {
    TextNormalizer::default().process(text)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ligature_fix() {
        assert_eq!(normalize("ﬁnance and workﬂow"), "finance and workflow");
    }

    #[test]
    fn test_bullet_standardization() {
        assert_eq!(normalize("● Rust\n■ Go"), "• Rust\n• Go");
    }

    #[test]
    fn test_page_numbers_removed() {
        let text = "SKILLS\nRust\n- 2 -\nPage 2 of 3\nGo";
        assert_eq!(normalize(text), "SKILLS\nRust\nGo");
    }

    #[test]
    fn test_bare_numbers_kept() {
        let text = "Tickets closed per sprint\n100\n- 3 -";
        assert_eq!(normalize(text), "Tickets closed per sprint\n100");
    }

    #[test]
    fn test_whitespace_and_blank_lines() {
        let text = "  Work   Experience \r\n\n\n\nAcme\tCorp";
        assert_eq!(normalize(text), "Work Experience\n\nAcme Corp");
    }

    #[test]
    fn test_merge_list_markers() {
        assert_eq!(normalize("•\nBuilt a parser\n1.\nShipped"), "• Built a parser\n1. Shipped");
    }

    #[test]
    fn test_remove_replacement_char() {
        assert_eq!(normalize("Python\u{FFFD}"), "Python");
    }

    #[test]
    fn test_none_is_identity_for_lines() {
        let normalizer = TextNormalizer::new(NormalizeOptions::none());
        assert_eq!(normalizer.process("a  b\n\n\nc"), "a  b\n\n\nc");
    }
}
