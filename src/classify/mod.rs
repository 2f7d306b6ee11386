//! Semantic header classification.
//!
//! A line is a header if it passes the [shape gate](shape) and its embedding
//! is close enough to one of the curated reference phrases of a taxonomy.
//!
//! # Example
//!
//! ```
//! use resume_tailor::classify::HeaderClassifier;
//! use resume_tailor::embedding::HashedNgramEmbedder;
//! use resume_tailor::SectionType;
//! use std::sync::Arc;
//!
//! let classifier = HeaderClassifier::new(Arc::new(HashedNgramEmbedder::default())).unwrap();
//! assert_eq!(classifier.classify("WORK EXPERIENCE"), Some(SectionType::Experience));
//! assert_eq!(classifier.classify("Built a compiler for a toy language in Rust"), None);
//! ```

pub mod shape;
mod vocabulary;

pub use shape::{check_shape, normalize_header, Rejection, ShapeLimits};
pub use vocabulary::{SkillCategory, SECTION_THRESHOLD, SKILL_CATEGORY_THRESHOLD};

use crate::embedding::{embed_checked, Embedding, EmbeddingCache, EmbeddingProvider};
use crate::error::Result;
use crate::model::SectionType;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

/// A fixed enumeration of header kinds with reference vocabularies.
pub trait Taxonomy: Copy + Eq + fmt::Debug + Send + Sync + 'static {
    /// Default acceptance threshold for this taxonomy.
    const THRESHOLD: f32;

    /// All kinds, in tie-break order.
    fn variants() -> &'static [Self];

    /// Canonical header phrases for this kind.
    fn vocabulary(&self) -> &'static [&'static str];

    /// Snake-case key.
    fn key(&self) -> &'static str;
}

/// Classifier configuration.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClassifierConfig {
    /// Minimum cosine similarity to accept a match
    pub threshold: f32,
    /// Shape ceilings used by [`SemanticClassifier::classify`]
    pub limits: ShapeLimits,
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        Self {
            threshold: SECTION_THRESHOLD,
            limits: ShapeLimits::line(),
        }
    }
}

impl ClassifierConfig {
    /// Create the default configuration for a taxonomy.
    pub fn for_taxonomy<K: Taxonomy>() -> Self {
        Self {
            threshold: K::THRESHOLD,
            limits: ShapeLimits::line(),
        }
    }

    /// Set the acceptance threshold.
    pub fn with_threshold(mut self, threshold: f32) -> Self {
        self.threshold = threshold;
        self
    }

    /// Set the shape ceilings.
    pub fn with_limits(mut self, limits: ShapeLimits) -> Self {
        self.limits = limits;
        self
    }
}

/// A best match against the reference set.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Match<K> {
    /// Owning kind of the closest phrase
    pub kind: K,
    /// The closest reference phrase
    pub phrase: &'static str,
    /// Cosine similarity to that phrase
    pub similarity: f32,
}

/// Reference embeddings for every phrase of a taxonomy, in tie-break order.
///
/// Built once when the classifier is constructed and never mutated after.
#[derive(Debug)]
pub struct ReferenceSet<K> {
    entries: Vec<(K, &'static str, Embedding)>,
}

impl<K: Taxonomy> ReferenceSet<K> {
    /// Embed every vocabulary phrase in one batch.
    pub fn build(provider: &dyn EmbeddingProvider) -> Result<Self> {
        let phrases: Vec<(K, &'static str)> = K::variants()
            .iter()
            .flat_map(|kind| kind.vocabulary().iter().map(move |p| (*kind, *p)))
            .collect();
        let normalized: Vec<String> = phrases.iter().map(|(_, p)| normalize_header(p)).collect();
        let texts: Vec<&str> = normalized.iter().map(String::as_str).collect();
        let embeddings = embed_checked(provider, &texts)?;

        let entries = phrases
            .into_iter()
            .zip(embeddings)
            .map(|((kind, phrase), embedding)| (kind, phrase, embedding))
            .collect();
        Ok(Self { entries })
    }

    /// Number of reference phrases.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if the set is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Global maximum similarity across all phrases.
    ///
    /// Only a strictly greater similarity replaces the current best, so exact
    /// ties go to the kind declared first.
    pub fn best_match(&self, embedding: &Embedding) -> Option<Match<K>> {
        let mut best: Option<Match<K>> = None;
        for (kind, phrase, reference) in &self.entries {
            let similarity = embedding.cosine_similarity(reference);
            if best.map_or(true, |b| similarity > b.similarity) {
                best = Some(Match {
                    kind: *kind,
                    phrase: *phrase,
                    similarity,
                });
            }
        }
        best
    }
}

/// Embedding-based classifier over a taxonomy.
///
/// Safe to share across threads: the reference set is immutable and the
/// line cache is write-once-per-key.
pub struct SemanticClassifier<K: Taxonomy> {
    provider: Arc<dyn EmbeddingProvider>,
    references: ReferenceSet<K>,
    cache: EmbeddingCache,
    config: ClassifierConfig,
}

/// Classifier for top-level resume sections.
pub type HeaderClassifier = SemanticClassifier<SectionType>;

/// Classifier for sub-category headers inside a skills section.
pub type SkillCategoryClassifier = SemanticClassifier<SkillCategory>;

impl<K: Taxonomy> fmt::Debug for SemanticClassifier<K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SemanticClassifier")
            .field("model", &self.provider.model_id())
            .field("references", &self.references.len())
            .field("config", &self.config)
            .finish()
    }
}

impl<K: Taxonomy> SemanticClassifier<K> {
    /// Create a classifier with the taxonomy's default configuration.
    pub fn new(provider: Arc<dyn EmbeddingProvider>) -> Result<Self> {
        Self::with_config(provider, ClassifierConfig::for_taxonomy::<K>())
    }

    /// Create a classifier with a custom configuration.
    ///
    /// Reference embeddings are computed here, so a failing provider fails
    /// construction rather than the first classification.
    pub fn with_config(provider: Arc<dyn EmbeddingProvider>, config: ClassifierConfig) -> Result<Self> {
        let references = ReferenceSet::build(provider.as_ref())?;
        log::debug!(
            "Built {} reference embeddings with {}",
            references.len(),
            provider.model_id()
        );
        Ok(Self {
            provider,
            references,
            cache: EmbeddingCache::new(),
            config,
        })
    }

    /// Get the configuration.
    pub fn config(&self) -> &ClassifierConfig {
        &self.config
    }

    /// Get the embedding provider.
    pub fn provider(&self) -> &Arc<dyn EmbeddingProvider> {
        &self.provider
    }

    /// Classify a line using the configured shape ceilings.
    pub fn classify(&self, line: &str) -> Option<K> {
        self.classify_within(line, self.config.limits)
    }

    /// Classify a line with explicit shape ceilings.
    ///
    /// A provider failure is logged and treated as "not a header".
    pub fn classify_within(&self, line: &str, limits: ShapeLimits) -> Option<K> {
        match self.try_classify_within(line, limits) {
            Ok(kind) => kind,
            Err(e) => {
                log::warn!("Header classification failed for {:?}: {}", line, e);
                None
            }
        }
    }

    /// Classify a line, surfacing provider errors.
    pub fn try_classify(&self, line: &str) -> Result<Option<K>> {
        self.try_classify_within(line, self.config.limits)
    }

    /// Classify a line with explicit shape ceilings, surfacing provider errors.
    pub fn try_classify_within(&self, line: &str, limits: ShapeLimits) -> Result<Option<K>> {
        Ok(self
            .score(line, limits)?
            .filter(|m| m.similarity > self.config.threshold)
            .map(|m| m.kind))
    }

    /// Best reference match for a line that passes the shape gate,
    /// regardless of threshold.
    pub fn score(&self, line: &str, limits: ShapeLimits) -> Result<Option<Match<K>>> {
        let normalized = match check_shape(line, &limits) {
            Ok(normalized) => normalized,
            Err(_) => return Ok(None),
        };
        let embedding = self.cache.get_or_embed(self.provider.as_ref(), &normalized)?;
        Ok(self.references.best_match(&embedding))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::embedding::HashedNgramEmbedder;
    use crate::error::Error;
    use proptest::prelude::*;

    struct FailingProvider;

    impl EmbeddingProvider for FailingProvider {
        fn embed_batch(&self, _texts: &[&str]) -> Result<Vec<Vec<f32>>> {
            Err(Error::Embedding("model unavailable".to_string()))
        }

        fn dimension(&self) -> usize {
            8
        }

        fn model_id(&self) -> &str {
            "failing"
        }
    }

    fn provider() -> Arc<dyn EmbeddingProvider> {
        Arc::new(HashedNgramEmbedder::default())
    }

    #[test]
    fn test_vocabulary_precision() {
        let classifier = HeaderClassifier::new(provider()).unwrap();
        for kind in SectionType::ALL {
            for phrase in kind.vocabulary() {
                assert_eq!(classifier.classify(phrase), Some(kind), "{phrase}");
            }
        }
    }

    #[test]
    fn test_skill_vocabulary_precision() {
        let classifier = SkillCategoryClassifier::new(provider()).unwrap();
        for kind in SkillCategory::ALL {
            for phrase in kind.vocabulary() {
                assert_eq!(classifier.classify(phrase), Some(kind), "{phrase}");
            }
        }
    }

    #[test]
    fn test_decorated_headers() {
        let classifier = HeaderClassifier::new(provider()).unwrap();
        assert_eq!(classifier.classify("WORK EXPERIENCE:"), Some(SectionType::Experience));
        assert_eq!(classifier.classify("  Education  "), Some(SectionType::Education));
        assert_eq!(classifier.classify("Acme Corp, Remote"), None);
    }

    // Lexical embeddings cannot tell a short content line from a header that
    // shares its leading word; a sentence-embedding provider is needed for that.
    #[test]
    fn test_hashed_provider_accepts_header_word_lines() {
        let classifier = HeaderClassifier::new(provider()).unwrap();
        assert_eq!(classifier.classify("Summary Statistics"), Some(SectionType::Summary));
        assert_eq!(classifier.classify("Education Technology"), Some(SectionType::Education));
        assert_eq!(classifier.classify("Work History Notes"), Some(SectionType::Experience));
    }

    #[test]
    fn test_score_reports_phrase() {
        let classifier = HeaderClassifier::new(provider()).unwrap();
        let m = classifier
            .score("Technical Skills", ShapeLimits::line())
            .unwrap()
            .unwrap();
        assert_eq!(m.kind, SectionType::Skills);
        assert_eq!(m.phrase, "Technical Skills");
        assert!(m.similarity > 0.99);
    }

    #[test]
    fn test_threshold_is_configurable() {
        let classifier = HeaderClassifier::with_config(
            provider(),
            ClassifierConfig::for_taxonomy::<SectionType>().with_threshold(1.01),
        )
        .unwrap();
        assert_eq!(classifier.classify("Skills"), None);
    }

    #[test]
    fn test_failing_provider() {
        assert!(matches!(
            HeaderClassifier::new(Arc::new(FailingProvider)),
            Err(Error::Embedding(_))
        ));
    }

    proptest! {
        #[test]
        fn prop_long_lines_never_classify(words in prop::collection::vec("[A-Za-z]{1,8}", 5..12)) {
            let classifier = HeaderClassifier::new(provider()).unwrap();
            let line = words.join(" ");
            prop_assert_eq!(classifier.classify(&line), None);
        }

        #[test]
        fn prop_overlong_single_word_never_classifies(word in "[a-z]{31,60}") {
            let classifier = HeaderClassifier::new(provider()).unwrap();
            prop_assert_eq!(classifier.classify(&word), None);
        }
    }
}
