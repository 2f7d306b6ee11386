//! Deterministic hashed n-gram embedder.

use super::EmbeddingProvider;
use crate::error::{Error, Result};
use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};
use unicode_normalization::UnicodeNormalization;

const WORD_WEIGHT: f32 = 1.0;
const TRIGRAM_WEIGHT: f32 = 0.5;

/// Feature-hashing embedder over word unigrams and character trigrams.
///
/// Text is NFKC-normalized, lowercased and stripped of punctuation, so
/// "WORK EXPERIENCE:" and "Work Experience" embed identically. Each word
/// contributes one feature and each trigram of `#word#` contributes a
/// lighter one, which gives graded similarity for shared stems
/// ("Project" / "Projects"). Vectors are unit length.
#[derive(Debug, Clone)]
pub struct HashedNgramEmbedder {
    dimension: usize,
    model_id: String,
}

impl Default for HashedNgramEmbedder {
    fn default() -> Self {
        Self::new(Self::DEFAULT_DIMENSION)
    }
}

impl HashedNgramEmbedder {
    /// Default vector dimension.
    pub const DEFAULT_DIMENSION: usize = 384;

    /// Create an embedder producing vectors of `dimension` components.
    ///
    /// A dimension of zero is bumped to one.
    pub fn new(dimension: usize) -> Self {
        let dimension = dimension.max(1);
        Self {
            dimension,
            model_id: format!("hashed-ngram-{}", dimension),
        }
    }

    fn normalize(text: &str) -> String {
        text.nfkc()
            .flat_map(char::to_lowercase)
            .map(|c| if c.is_alphanumeric() { c } else { ' ' })
            .collect()
    }

    fn add_feature(&self, vector: &mut [f32], feature: &str, kind: u8, weight: f32) {
        let mut hasher = DefaultHasher::new();
        kind.hash(&mut hasher);
        feature.hash(&mut hasher);
        let hash = hasher.finish();

        let index = (hash % self.dimension as u64) as usize;
        let sign = if (hash >> 63) & 1 == 1 { -1.0 } else { 1.0 };
        vector[index] += sign * weight;
    }

    fn embed_one(&self, text: &str) -> Result<Vec<f32>> {
        let normalized = Self::normalize(text);
        let words: Vec<&str> = normalized.split_whitespace().collect();
        if words.is_empty() {
            return Err(Error::EmptyInput);
        }

        let mut vector = vec![0.0f32; self.dimension];
        for word in &words {
            self.add_feature(&mut vector, word, 0, WORD_WEIGHT);

            let padded: Vec<char> = format!("#{}#", word).chars().collect();
            for window in padded.windows(3) {
                let trigram: String = window.iter().collect();
                self.add_feature(&mut vector, &trigram, 1, TRIGRAM_WEIGHT);
            }
        }

        let magnitude = vector.iter().map(|x| x * x).sum::<f32>().sqrt();
        if magnitude > 0.0 {
            for value in &mut vector {
                *value /= magnitude;
            }
        }
        Ok(vector)
    }
}

impl EmbeddingProvider for HashedNgramEmbedder {
    fn embed_batch(&self, texts: &[&str]) -> Result<Vec<Vec<f32>>> {
        texts.iter().map(|t| self.embed_one(t)).collect()
    }

    fn dimension(&self) -> usize {
        self.dimension
    }

    fn model_id(&self) -> &str {
        &self.model_id
    }
}
