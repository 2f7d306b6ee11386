//! Error types for resume-tailor library.

use std::fmt;
use std::io;
use thiserror::Error;

use crate::model::SectionType;

/// Result type alias for resume-tailor operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error types that can occur while parsing or regenerating a resume.
#[derive(Error, Debug)]
pub enum Error {
    /// I/O error when reading or writing files.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// JSON (de)serialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// The embedding provider failed.
    #[error("Embedding provider error: {0}")]
    Embedding(String),

    /// The embedding provider returned vectors of an unexpected shape.
    #[error("Embedding dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch {
        /// Expected dimension (or batch size)
        expected: usize,
        /// Actual dimension (or batch size)
        actual: usize,
    },

    /// An empty string was handed to the embedding provider.
    #[error("Cannot embed empty text")]
    EmptyInput,

    /// The regeneration policy is inconsistent.
    #[error("Invalid regeneration policy: {0}")]
    InvalidPolicy(String),

    /// A section key could not be recognised.
    #[error("Unknown section: {0}")]
    UnknownSection(String),

    /// Replacement content has no matching update strategy.
    #[error("Unsupported replacement for section {section}: {shape}")]
    UnsupportedReplacement {
        /// Section the replacement was meant for
        section: String,
        /// Description of the offending shape
        shape: String,
    },

    /// A paragraph index is outside the document.
    #[error("Paragraph {index} is out of range (document has {count} paragraphs)")]
    ParagraphOutOfRange {
        /// Requested paragraph index
        index: usize,
        /// Number of paragraphs in the document
        count: usize,
    },

    /// Integrity guard phases were called out of order.
    #[error("Integrity guard is {actual}, expected {expected}")]
    GuardState {
        /// State the operation requires
        expected: &'static str,
        /// State the guard is in
        actual: &'static str,
    },

    /// A protected section changed during regeneration.
    #[error("Protected sections were modified: {}", DisplayFailures(.0))]
    IntegrityViolation(Vec<SectionFailure>),

    /// Generic error with message.
    #[error("{0}")]
    Other(String),
}

impl Error {
    /// Check if this error aborts a regeneration run.
    pub fn is_integrity_violation(&self) -> bool {
        matches!(self, Error::IntegrityViolation(_))
    }
}

/// A failed protected section, as carried by [`Error::IntegrityViolation`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SectionFailure {
    /// The protected section
    pub section: SectionType,
    /// Checks that did not hold
    pub failed_checks: Vec<IntegrityCheck>,
}

/// One field-by-field comparison performed by the integrity guard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IntegrityCheck {
    /// The section could not be found after mutation
    SectionPresent,
    /// Header paragraph text
    HeaderText,
    /// Number of content paragraphs
    ParagraphCount,
    /// Total characters across content paragraphs
    CharacterCount,
    /// Ordered content paragraph texts
    ContentEquality,
}

impl IntegrityCheck {
    /// Short name used in messages.
    pub fn as_str(&self) -> &'static str {
        match self {
            IntegrityCheck::SectionPresent => "section present",
            IntegrityCheck::HeaderText => "header text",
            IntegrityCheck::ParagraphCount => "paragraph count",
            IntegrityCheck::CharacterCount => "character count",
            IntegrityCheck::ContentEquality => "content equality",
        }
    }
}

struct DisplayFailures<'a>(&'a [SectionFailure]);

impl fmt::Display for DisplayFailures<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, failure) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str("; ")?;
            }
            let checks: Vec<&str> = failure.failed_checks.iter().map(|c| c.as_str()).collect();
            write!(f, "{} ({})", failure.section, checks.join(", "))?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = Error::ParagraphOutOfRange { index: 10, count: 5 };
        assert_eq!(
            err.to_string(),
            "Paragraph 10 is out of range (document has 5 paragraphs)"
        );
    }

    #[test]
    fn test_integrity_violation_display() {
        let err = Error::IntegrityViolation(vec![
            SectionFailure {
                section: SectionType::Education,
                failed_checks: vec![IntegrityCheck::HeaderText, IntegrityCheck::ContentEquality],
            },
            SectionFailure {
                section: SectionType::Projects,
                failed_checks: vec![IntegrityCheck::SectionPresent],
            },
        ]);
        assert_eq!(
            err.to_string(),
            "Protected sections were modified: education (header text, content equality); projects (section present)"
        );
        assert!(err.is_integrity_violation());
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = io::Error::new(io::ErrorKind::NotFound, "file not found");
        let err: Error = io_err.into();
        assert!(matches!(err, Error::Io(_)));
        assert!(!err.is_integrity_violation());
    }
}
