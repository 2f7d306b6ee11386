//! Protected-range integrity guard.
//!
//! Each regeneration run drives one guard through three phases:
//!
//! 1. [`IntegrityGuard::snapshot`] captures every never-modify section of the
//!    original section map.
//! 2. The caller mutates the document.
//! 3. [`IntegrityGuard::verify`] re-maps the mutated document and compares
//!    each snapshot field by field.
//!
//! Any mismatch makes the run fail: [`VerificationReport::into_result`]
//! turns a failed report into [`Error::IntegrityViolation`].

use crate::error::{Error, IntegrityCheck, Result, SectionFailure};
use crate::mapper::{SectionMap, SectionMapper, SectionRange};
use crate::model::{Document, SectionType};
use crate::structure;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

/// Captured state of one protected section.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SectionSnapshot {
    /// Header paragraph text
    pub header_text: String,
    /// Content paragraph texts, in order
    pub content: Vec<String>,
    /// Number of content paragraphs
    pub paragraph_count: usize,
    /// Total characters across content paragraphs
    pub char_count: usize,
}

impl SectionSnapshot {
    /// Capture a section range.
    pub fn capture(range: &SectionRange) -> Self {
        let content: Vec<String> = range.formats.iter().map(|f| f.text.clone()).collect();
        Self {
            header_text: range.header_text.clone(),
            paragraph_count: content.len(),
            char_count: content.iter().map(|t| t.chars().count()).sum(),
            content,
        }
    }

    /// Checks that differ between this snapshot and a later one.
    pub fn compare(&self, current: &SectionSnapshot) -> Vec<IntegrityCheck> {
        let mut failed = Vec::new();
        if self.header_text != current.header_text {
            failed.push(IntegrityCheck::HeaderText);
        }
        if self.paragraph_count != current.paragraph_count {
            failed.push(IntegrityCheck::ParagraphCount);
        }
        if self.char_count != current.char_count {
            failed.push(IntegrityCheck::CharacterCount);
        }
        if self.content != current.content {
            failed.push(IntegrityCheck::ContentEquality);
        }
        failed
    }
}

/// Guard lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GuardState {
    /// No snapshot taken yet
    Idle,
    /// Snapshots captured, awaiting verification
    Snapshotted,
    /// Every protected section matched
    Verified,
    /// At least one protected section changed
    Failed,
}

impl GuardState {
    /// Lowercase name.
    pub fn as_str(&self) -> &'static str {
        match self {
            GuardState::Idle => "idle",
            GuardState::Snapshotted => "snapshotted",
            GuardState::Verified => "verified",
            GuardState::Failed => "failed",
        }
    }
}

/// Verification outcome of one protected section.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SectionVerification {
    /// Protected section
    pub section: SectionType,
    /// Whether every check held
    pub passed: bool,
    /// Checks that did not hold
    pub failed_checks: Vec<IntegrityCheck>,
}

/// Per-section verification results.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VerificationReport {
    /// Results in section order
    pub sections: Vec<SectionVerification>,
}

impl VerificationReport {
    /// Check if every protected section passed.
    pub fn passed(&self) -> bool {
        self.sections.iter().all(|s| s.passed)
    }

    /// Result for one section.
    pub fn get(&self, section: SectionType) -> Option<&SectionVerification> {
        self.sections.iter().find(|s| s.section == section)
    }

    /// Failing sections.
    pub fn failures(&self) -> Vec<SectionFailure> {
        self.sections
            .iter()
            .filter(|s| !s.passed)
            .map(|s| SectionFailure {
                section: s.section,
                failed_checks: s.failed_checks.clone(),
            })
            .collect()
    }

    /// Convert a failed report into [`Error::IntegrityViolation`].
    pub fn into_result(self) -> Result<Self> {
        if self.passed() {
            Ok(self)
        } else {
            Err(Error::IntegrityViolation(self.failures()))
        }
    }
}

/// Snapshot/verify guard for never-modify sections.
#[derive(Debug)]
pub struct IntegrityGuard {
    mapper: SectionMapper,
    state: GuardState,
    snapshots: BTreeMap<SectionType, SectionSnapshot>,
}

impl IntegrityGuard {
    /// Create an idle guard that re-maps documents with `mapper`.
    pub fn new(mapper: SectionMapper) -> Self {
        Self {
            mapper,
            state: GuardState::Idle,
            snapshots: BTreeMap::new(),
        }
    }

    /// Current state.
    pub fn state(&self) -> GuardState {
        self.state
    }

    /// Captured snapshots.
    pub fn snapshots(&self) -> &BTreeMap<SectionType, SectionSnapshot> {
        &self.snapshots
    }

    fn expect_state(&self, expected: GuardState) -> Result<()> {
        if self.state == expected {
            Ok(())
        } else {
            Err(Error::GuardState {
                expected: expected.as_str(),
                actual: self.state.as_str(),
            })
        }
    }

    /// Capture every section of `never_modify` present in `map`.
    ///
    /// Returns the number of sections captured.
    pub fn snapshot(
        &mut self,
        map: &SectionMap,
        never_modify: &BTreeSet<SectionType>,
    ) -> Result<usize> {
        self.expect_state(GuardState::Idle)?;

        self.snapshots = never_modify
            .iter()
            .filter_map(|section| {
                map.get(*section)
                    .map(|range| (*section, SectionSnapshot::capture(range)))
            })
            .collect();
        self.state = GuardState::Snapshotted;

        log::debug!(
            "Captured {} protected sections: {:?}",
            self.snapshots.len(),
            self.snapshots.keys().collect::<Vec<_>>()
        );
        Ok(self.snapshots.len())
    }

    /// Re-map `document` and compare every snapshot.
    ///
    /// The report is returned in either case; the guard moves to
    /// [`GuardState::Verified`] or [`GuardState::Failed`].
    pub fn verify(&mut self, document: &Document) -> Result<VerificationReport> {
        self.expect_state(GuardState::Snapshotted)?;

        let structure = structure::extract(document);
        let map = self.mapper.map(&structure.paragraphs);

        let sections: Vec<SectionVerification> = self
            .snapshots
            .iter()
            .map(|(section, before)| {
                let failed_checks = match map.get(*section) {
                    Some(range) => before.compare(&SectionSnapshot::capture(range)),
                    None => vec![IntegrityCheck::SectionPresent],
                };
                SectionVerification {
                    section: *section,
                    passed: failed_checks.is_empty(),
                    failed_checks,
                }
            })
            .collect();

        let report = VerificationReport { sections };
        if report.passed() {
            self.state = GuardState::Verified;
            log::info!(
                "Integrity verified for {} protected sections",
                report.sections.len()
            );
        } else {
            self.state = GuardState::Failed;
            for failure in report.failures() {
                log::error!(
                    "Protected section {} modified: {:?}",
                    failure.section,
                    failure.failed_checks
                );
            }
        }
        Ok(report)
    }

    /// Return to [`GuardState::Idle`], discarding snapshots.
    pub fn reset(&mut self) {
        self.snapshots.clear();
        self.state = GuardState::Idle;
    }
}
