//! # resume-tailor
//!
//! Semantic resume section detection, entity extraction and
//! format-preserving section rewriting.
//!
//! Two pipelines share one embedding-backed header classifier:
//!
//! - **Parsing** turns plain resume text into sections, a summary, work
//!   experience, categorized skills and projects.
//! - **Regeneration** rewrites whitelisted sections of a loaded document in
//!   place, keeping paragraph styles, dominant fonts and hyperlinks, while
//!   an integrity guard proves the protected sections untouched.
//!
//! ## Quick Start
//!
//! ```
//! use resume_tailor::{ResumeTailor, SectionType, SectionUpdates, Document};
//!
//! fn main() -> resume_tailor::Result<()> {
//!     let tailor = ResumeTailor::new().build()?;
//!
//!     let parsed = tailor.parse("Skills\nDatabases: PostgreSQL, Redis");
//!     assert_eq!(parsed.skills.get("databases").unwrap(), ["PostgreSQL", "Redis"]);
//!
//!     let mut doc = Document::from_lines(["Summary", "Old summary.", "Education", "BSc"]);
//!     let updates = SectionUpdates::new().with(SectionType::Summary, "Rust engineer.");
//!     let report = tailor.regenerate(&mut doc, &updates)?;
//!     assert!(report.verification.passed());
//!     assert_eq!(doc.paragraphs[1].plain_text(), "Rust engineer.");
//!     Ok(())
//! }
//! ```
//!
//! ## Embeddings
//!
//! The built-in [`HashedNgramEmbedder`] is deterministic and needs no model
//! files. Sentence-embedding models plug in through [`EmbeddingProvider`].

pub mod classify;
pub mod contact;
pub mod embedding;
pub mod error;
pub mod extract;
pub mod guard;
pub mod mapper;
pub mod model;
pub mod normalize;
pub mod parser;
pub mod regenerate;
pub mod render;
pub mod rewrite;
pub mod structure;

// Re-export commonly used types
pub use classify::{
    ClassifierConfig, HeaderClassifier, ShapeLimits, SkillCategory, SkillCategoryClassifier,
};
pub use contact::PersonalInfo;
pub use embedding::{EmbeddingProvider, HashedNgramEmbedder};
pub use error::{Error, IntegrityCheck, Result, SectionFailure};
pub use extract::{ExperienceEntry, ProjectEntry, SkillMap};
pub use guard::{IntegrityGuard, VerificationReport};
pub use mapper::{SectionMap, SectionMapper, SectionRange};
pub use model::{
    Alignment, Document, InlineContent, Paragraph, ParagraphStyle, SectionType, TextRun,
    TextStyle,
};
pub use normalize::NormalizeOptions;
pub use parser::{ParsedResume, ParsedSection, ParserOptions, ResumeParser};
pub use regenerate::{RegenerationPolicy, RegenerationReport, Regenerator, SectionUpdates};
pub use render::JsonFormat;
pub use rewrite::{ListItem, Replacement, StructuredItem};

use std::sync::Arc;

/// Parse a resume text with the default configuration.
///
/// # Example
///
/// ```
/// let resume = resume_tailor::parse_text("Education\nBSc Physics").unwrap();
/// assert!(resume.sections.contains_key(&resume_tailor::SectionType::Education));
/// ```
pub fn parse_text(text: &str) -> Result<ParsedResume> {
    Ok(ResumeTailor::new().build()?.parse(text))
}

/// Builder for a configured [`Tailor`].
///
/// # Example
///
/// ```
/// use resume_tailor::{RegenerationPolicy, ResumeTailor, SectionType};
///
/// let tailor = ResumeTailor::new()
///     .with_header_threshold(0.7)
///     .with_policy(RegenerationPolicy::new(
///         [SectionType::Summary, SectionType::Skills, SectionType::Experience],
///         [SectionType::Education],
///     )?)
///     .build()?;
/// # Ok::<(), resume_tailor::Error>(())
/// ```
pub struct ResumeTailor {
    provider: Arc<dyn EmbeddingProvider>,
    parser_options: ParserOptions,
    document_limits: ShapeLimits,
    header_threshold: f32,
    policy: RegenerationPolicy,
}

impl ResumeTailor {
    /// Create a builder using the built-in hashed n-gram embedder.
    pub fn new() -> Self {
        Self {
            provider: Arc::new(HashedNgramEmbedder::default()),
            parser_options: ParserOptions::default(),
            document_limits: ShapeLimits::paragraph(),
            header_threshold: classify::SECTION_THRESHOLD,
            policy: RegenerationPolicy::default(),
        }
    }

    /// Use a different embedding provider.
    pub fn with_provider(mut self, provider: Arc<dyn EmbeddingProvider>) -> Self {
        self.provider = provider;
        self
    }

    /// Set plain-text parsing options.
    pub fn with_parser_options(mut self, options: ParserOptions) -> Self {
        self.parser_options = options;
        self
    }

    /// Set the header shape limits for document paragraphs.
    pub fn with_document_limits(mut self, limits: ShapeLimits) -> Self {
        self.document_limits = limits;
        self
    }

    /// Set the section header acceptance threshold.
    pub fn with_header_threshold(mut self, threshold: f32) -> Self {
        self.header_threshold = threshold;
        self
    }

    /// Set the regeneration policy.
    pub fn with_policy(mut self, policy: RegenerationPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Build the classifiers and pipelines.
    pub fn build(self) -> Result<Tailor> {
        let config = ClassifierConfig::for_taxonomy::<SectionType>()
            .with_threshold(self.header_threshold);
        let headers = Arc::new(HeaderClassifier::with_config(
            Arc::clone(&self.provider),
            config,
        )?);
        let skills = Arc::new(SkillCategoryClassifier::new(self.provider)?);

        let parser = ResumeParser::with_classifiers(Arc::clone(&headers), skills)
            .with_options(self.parser_options);
        let mapper = SectionMapper::new(headers).with_limits(self.document_limits);
        let regenerator = Regenerator::new(mapper.clone(), self.policy)?;

        Ok(Tailor {
            parser,
            mapper,
            regenerator,
        })
    }
}

impl Default for ResumeTailor {
    fn default() -> Self {
        Self::new()
    }
}

/// Configured parsing and regeneration pipelines.
#[derive(Debug, Clone)]
pub struct Tailor {
    parser: ResumeParser,
    mapper: SectionMapper,
    regenerator: Regenerator,
}

impl Tailor {
    /// Parse a resume text.
    pub fn parse(&self, text: &str) -> ParsedResume {
        self.parser.parse(text)
    }

    /// Parse independent resume texts in parallel.
    pub fn parse_batch<S: AsRef<str> + Sync>(&self, texts: &[S]) -> Vec<ParsedResume> {
        self.parser.parse_batch(texts)
    }

    /// Parse the text of a loaded document.
    pub fn parse_document(&self, document: &Document) -> ParsedResume {
        self.parser.parse(&render::to_text(document))
    }

    /// Map the sections of a loaded document.
    pub fn sections(&self, document: &Document) -> SectionMap {
        let structure = structure::extract(document);
        self.mapper.map(&structure.paragraphs)
    }

    /// Rewrite whitelisted sections of `document`.
    pub fn regenerate(
        &self,
        document: &mut Document,
        updates: &SectionUpdates,
    ) -> Result<RegenerationReport> {
        self.regenerator.regenerate(document, updates)
    }

    /// Get the parser.
    pub fn parser(&self) -> &ResumeParser {
        &self.parser
    }

    /// Get the regeneration policy.
    pub fn policy(&self) -> &RegenerationPolicy {
        self.regenerator.policy()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_defaults() {
        let builder = ResumeTailor::default();
        assert_eq!(builder.header_threshold, classify::SECTION_THRESHOLD);
        assert_eq!(builder.document_limits, ShapeLimits::paragraph());
        assert_eq!(builder.provider.model_id(), "hashed-ngram-384");
    }

    #[test]
    fn test_build_rejects_overlapping_policy() {
        let policy = RegenerationPolicy {
            updatable: [SectionType::Education].into_iter().collect(),
            never_modify: [SectionType::Education].into_iter().collect(),
        };
        let result = ResumeTailor::new().with_policy(policy).build();
        assert!(matches!(result, Err(Error::InvalidPolicy(_))));
    }

    #[test]
    fn test_parse_document_and_sections() {
        let tailor = ResumeTailor::new().build().unwrap();
        let doc = Document::from_lines(["Jane Doe", "Work Experience", "Lead Developer 2020 - 2024"]);

        let parsed = tailor.parse_document(&doc);
        assert_eq!(parsed.experience.len(), 1);
        assert_eq!(parsed.experience[0].job_title, "Lead Developer");

        let map = tailor.sections(&doc);
        assert_eq!(map.section_types(), vec![SectionType::Experience]);
        assert_eq!(map.get(SectionType::Experience).unwrap().content_start, 2);
    }

    #[test]
    fn test_strict_threshold_misses_headers() {
        let tailor = ResumeTailor::new().with_header_threshold(1.01).build().unwrap();
        assert!(tailor.parse("Education\nBSc").sections.is_empty());
    }
}
