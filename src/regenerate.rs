//! Section regeneration.
//!
//! Applies replacement content to the whitelisted sections of a document
//! while an [`IntegrityGuard`] proves the never-modify sections untouched.
//! A run works on a copy of the document and writes it back only after
//! verification passes, so a failed run leaves the caller's document as it
//! was.

use crate::contact::{self, PersonalInfo};
use crate::error::{Error, Result};
use crate::guard::{IntegrityGuard, VerificationReport};
use crate::mapper::SectionMapper;
use crate::model::{Document, SectionType};
use crate::rewrite::{self, Replacement, RewriteOutcome};
use crate::structure;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

/// Editor name recorded in document metadata after a regeneration.
pub const EDITOR: &str = "resume-tailor";

/// Which sections a regeneration may touch and which it must not.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RegenerationPolicy {
    /// Sections replacements may be applied to
    pub updatable: BTreeSet<SectionType>,
    /// Sections verified unchanged after every run
    pub never_modify: BTreeSet<SectionType>,
}

impl Default for RegenerationPolicy {
    fn default() -> Self {
        Self {
            updatable: [SectionType::Summary, SectionType::Skills].into_iter().collect(),
            never_modify: [SectionType::Education, SectionType::Projects]
                .into_iter()
                .collect(),
        }
    }
}

impl RegenerationPolicy {
    /// Create a policy; the two sets must be disjoint.
    pub fn new(
        updatable: impl IntoIterator<Item = SectionType>,
        never_modify: impl IntoIterator<Item = SectionType>,
    ) -> Result<Self> {
        let policy = Self {
            updatable: updatable.into_iter().collect(),
            never_modify: never_modify.into_iter().collect(),
        };
        policy.validate()?;
        Ok(policy)
    }

    /// Check that no section is both updatable and protected.
    pub fn validate(&self) -> Result<()> {
        let overlap: Vec<&str> = self
            .updatable
            .intersection(&self.never_modify)
            .map(SectionType::as_str)
            .collect();
        if overlap.is_empty() {
            Ok(())
        } else {
            Err(Error::InvalidPolicy(format!(
                "sections both updatable and protected: {}",
                overlap.join(", ")
            )))
        }
    }

    /// Check if replacements may be applied to a section.
    pub fn is_updatable(&self, section: SectionType) -> bool {
        self.updatable.contains(&section)
    }

    /// Check if a section is protected.
    pub fn is_protected(&self, section: SectionType) -> bool {
        self.never_modify.contains(&section)
    }
}

/// Why a requested replacement was not applied.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "reason", content = "detail", rename_all = "snake_case")]
pub enum SkipReason {
    /// The key names no section type
    UnknownSection,
    /// The replacement shape has no update strategy
    UnsupportedShape(String),
    /// The section is protected
    Protected,
    /// The section is not in the updatable whitelist
    NotUpdatable,
    /// The section was not detected in the document
    NotFound,
    /// The rewrite itself failed
    RewriteFailed(String),
}

/// A requested replacement that was not applied.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkippedSection {
    /// Key as requested
    pub key: String,
    /// Reason
    #[serde(flatten)]
    pub reason: SkipReason,
}

impl SkippedSection {
    fn new(key: impl Into<String>, reason: SkipReason) -> Self {
        Self {
            key: key.into(),
            reason,
        }
    }
}

/// Replacement content keyed by section type.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SectionUpdates {
    entries: BTreeMap<SectionType, Replacement>,
    rejected: Vec<SkippedSection>,
}

impl SectionUpdates {
    /// Create an empty update set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a replacement (builder form).
    pub fn with(mut self, section: SectionType, replacement: impl Into<Replacement>) -> Self {
        self.insert(section, replacement);
        self
    }

    /// Add or replace a replacement.
    pub fn insert(&mut self, section: SectionType, replacement: impl Into<Replacement>) {
        self.entries.insert(section, replacement.into());
    }

    /// Parse updates from a JSON object of section key to content.
    ///
    /// Unknown keys and values of unsupported shape are kept aside as
    /// [`SectionUpdates::rejected`] rather than failing the whole set.
    pub fn from_json(json: &str) -> Result<Self> {
        let value: serde_json::Value = serde_json::from_str(json)?;
        Self::from_value(value)
    }

    /// Parse updates from a JSON value; see [`SectionUpdates::from_json`].
    pub fn from_value(value: serde_json::Value) -> Result<Self> {
        let serde_json::Value::Object(object) = value else {
            return Err(Error::Other("section updates must be a JSON object".to_string()));
        };

        let mut updates = Self::new();
        for (key, content) in object {
            let section = match key.parse::<SectionType>() {
                Ok(section) => section,
                Err(_) => {
                    updates
                        .rejected
                        .push(SkippedSection::new(key, SkipReason::UnknownSection));
                    continue;
                }
            };
            match Replacement::from_value(section, content) {
                Ok(replacement) => updates.insert(section, replacement),
                Err(Error::UnsupportedReplacement { shape, .. }) => updates
                    .rejected
                    .push(SkippedSection::new(key, SkipReason::UnsupportedShape(shape))),
                Err(e) => return Err(e),
            }
        }
        Ok(updates)
    }

    /// Get the replacement for a section.
    pub fn get(&self, section: SectionType) -> Option<&Replacement> {
        self.entries.get(&section)
    }

    /// Iterate over replacements in section order.
    pub fn iter(&self) -> impl Iterator<Item = (SectionType, &Replacement)> {
        self.entries.iter().map(|(section, r)| (*section, r))
    }

    /// Entries that could not be parsed.
    pub fn rejected(&self) -> &[SkippedSection] {
        &self.rejected
    }

    /// Number of usable replacements.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if there is no usable replacement.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Result of a successful regeneration run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegenerationReport {
    /// Rewrites applied, in the order they ran
    pub applied: Vec<RewriteOutcome>,
    /// Requested replacements that were not applied
    pub skipped: Vec<SkippedSection>,
    /// Integrity verification of the protected sections
    pub verification: VerificationReport,
    /// Contact identifiers found in the original document
    pub contacts: PersonalInfo,
    /// Identifiers present in a rewritten section before but not after
    pub dropped_contacts: BTreeMap<SectionType, Vec<String>>,
    /// When the run finished
    pub regenerated_at: DateTime<Utc>,
}

impl RegenerationReport {
    /// Sections that were rewritten.
    pub fn applied_sections(&self) -> Vec<SectionType> {
        self.applied.iter().map(|o| o.section).collect()
    }
}

/// Drives one snapshot, rewrite and verify cycle per document.
#[derive(Debug, Clone)]
pub struct Regenerator {
    mapper: SectionMapper,
    policy: RegenerationPolicy,
}

impl Regenerator {
    /// Create a regenerator; fails if the policy is inconsistent.
    pub fn new(mapper: SectionMapper, policy: RegenerationPolicy) -> Result<Self> {
        policy.validate()?;
        Ok(Self { mapper, policy })
    }

    /// Get the policy.
    pub fn policy(&self) -> &RegenerationPolicy {
        &self.policy
    }

    /// Apply `updates` to `document`.
    ///
    /// Replacements for sections outside the whitelist, or not present in
    /// the document, are skipped and reported. If any protected section
    /// changed, the run fails with [`Error::IntegrityViolation`] and
    /// `document` is left unmodified.
    pub fn regenerate(
        &self,
        document: &mut Document,
        updates: &SectionUpdates,
    ) -> Result<RegenerationReport> {
        let structure = structure::extract(document);
        let map = self.mapper.map(&structure.paragraphs);
        let contacts = contact::harvest(document);

        let mut skipped: Vec<SkippedSection> = Vec::new();
        for rejected in updates.rejected() {
            log::warn!("Ignoring replacement {:?}: {:?}", rejected.key, rejected.reason);
            skipped.push(rejected.clone());
        }

        let mut plan = Vec::new();
        for (section, replacement) in updates.iter() {
            let reason = if self.policy.is_protected(section) {
                SkipReason::Protected
            } else if !self.policy.is_updatable(section) {
                SkipReason::NotUpdatable
            } else if let Some(range) = map.get(section) {
                plan.push((range, replacement));
                continue;
            } else {
                SkipReason::NotFound
            };
            log::warn!("Ignoring replacement for {}: {:?}", section, reason);
            skipped.push(SkippedSection::new(section.as_str(), reason));
        }

        let mut guard = IntegrityGuard::new(self.mapper.clone());
        guard.snapshot(&map, &self.policy.never_modify)?;

        // Later sections first, so paragraphs inserted by one rewrite never
        // shift a range that is still to be written.
        plan.sort_by(|a, b| b.0.header_index.cmp(&a.0.header_index));

        let mut working = document.clone();
        let mut applied = Vec::new();
        let mut dropped_contacts = BTreeMap::new();
        for (range, replacement) in plan {
            let section = range.section_type;
            match rewrite::rewrite(&mut working, range, &structure.hyperlinks, replacement) {
                Ok(outcome) => {
                    let dropped = contacts.missing_from(&range.content_text(), &outcome.text());
                    if !dropped.is_empty() {
                        log::info!(
                            "Rewrite of {} drops contact identifiers: {}",
                            section,
                            dropped.join(", ")
                        );
                        dropped_contacts.insert(section, dropped);
                    }
                    applied.push(outcome);
                }
                Err(e) => {
                    log::warn!("Could not rewrite {}: {}", section, e);
                    let reason = match e {
                        Error::UnsupportedReplacement { shape, .. } => {
                            SkipReason::UnsupportedShape(shape)
                        }
                        other => SkipReason::RewriteFailed(other.to_string()),
                    };
                    skipped.push(SkippedSection::new(section.as_str(), reason));
                }
            }
        }

        let verification = guard.verify(&working)?.into_result()?;

        let regenerated_at = Utc::now();
        if !applied.is_empty() {
            working.metadata.touch(EDITOR, regenerated_at);
        }
        *document = working;

        log::info!(
            "Regenerated {} sections, skipped {}",
            applied.len(),
            skipped.len()
        );
        Ok(RegenerationReport {
            applied,
            skipped,
            verification,
            contacts,
            dropped_contacts,
            regenerated_at,
        })
    }
}
