//! Embedding provider abstraction.
//!
//! Header classification compares short lines against curated vocabularies
//! by cosine similarity. The vectors come from an [`EmbeddingProvider`],
//! which is treated as a deterministic, potentially blocking black box.
//! [`HashedNgramEmbedder`] is the built-in provider; real sentence-embedding
//! models plug in through the same trait.

mod hashed;

pub use hashed::HashedNgramEmbedder;

use crate::error::{Error, Result};
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

/// A source of fixed-size text embeddings.
///
/// Implementations must be deterministic for a given model version: the
/// same text always yields the same vector.
pub trait EmbeddingProvider: Send + Sync {
    /// Embed a batch of texts, returning one vector per input in order.
    fn embed_batch(&self, texts: &[&str]) -> Result<Vec<Vec<f32>>>;

    /// Dimension of the vectors produced.
    fn dimension(&self) -> usize;

    /// Identifier of the model and version.
    fn model_id(&self) -> &str;

    /// Embed a single text.
    fn embed(&self, text: &str) -> Result<Vec<f32>> {
        let mut batch = self.embed_batch(&[text])?;
        match batch.pop() {
            Some(vector) if batch.is_empty() => Ok(vector),
            _ => Err(Error::DimensionMismatch {
                expected: 1,
                actual: batch.len() + 1,
            }),
        }
    }
}

/// An embedding vector with its precomputed magnitude.
#[derive(Debug, Clone, PartialEq)]
pub struct Embedding {
    /// Raw vector
    pub vector: Vec<f32>,
    /// Euclidean norm of `vector`
    pub magnitude: f32,
}

impl Embedding {
    /// Wrap a vector, computing its magnitude.
    pub fn new(vector: Vec<f32>) -> Self {
        let magnitude = vector.iter().map(|x| x * x).sum::<f32>().sqrt();
        Self { vector, magnitude }
    }

    /// Dimension of the vector.
    pub fn dimension(&self) -> usize {
        self.vector.len()
    }

    /// Cosine similarity in `[-1, 1]`; 0.0 when either vector is zero or
    /// the dimensions differ.
    pub fn cosine_similarity(&self, other: &Embedding) -> f32 {
        if self.magnitude == 0.0 || other.magnitude == 0.0 {
            return 0.0;
        }
        if self.vector.len() != other.vector.len() {
            return 0.0;
        }

        let dot: f32 = self
            .vector
            .iter()
            .zip(other.vector.iter())
            .map(|(a, b)| a * b)
            .sum();

        dot / (self.magnitude * other.magnitude)
    }
}

/// Embed `texts` and check the provider honoured its contract.
pub(crate) fn embed_checked(
    provider: &dyn EmbeddingProvider,
    texts: &[&str],
) -> Result<Vec<Embedding>> {
    if texts.iter().any(|t| t.trim().is_empty()) {
        return Err(Error::EmptyInput);
    }

    let vectors = provider.embed_batch(texts)?;
    if vectors.len() != texts.len() {
        return Err(Error::DimensionMismatch {
            expected: texts.len(),
            actual: vectors.len(),
        });
    }

    let dimension = provider.dimension();
    vectors
        .into_iter()
        .map(|v| {
            if v.len() == dimension {
                Ok(Embedding::new(v))
            } else {
                Err(Error::DimensionMismatch {
                    expected: dimension,
                    actual: v.len(),
                })
            }
        })
        .collect()
}

/// Text-keyed embedding cache.
///
/// Entries are written once per key and never replaced, so a populated entry
/// can be read concurrently by any number of pipelines. Once `capacity`
/// entries exist, new texts are still embedded but no longer stored.
#[derive(Debug)]
pub struct EmbeddingCache {
    entries: RwLock<HashMap<String, Arc<Embedding>>>,
    capacity: usize,
}

impl Default for EmbeddingCache {
    fn default() -> Self {
        Self::with_capacity(Self::DEFAULT_CAPACITY)
    }
}

impl EmbeddingCache {
    /// Default maximum number of cached entries.
    pub const DEFAULT_CAPACITY: usize = 10_000;

    /// Create an empty cache with the default capacity.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty cache holding at most `capacity` entries.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
            capacity,
        }
    }

    /// Look up a cached embedding.
    pub fn get(&self, text: &str) -> Option<Arc<Embedding>> {
        self.entries
            .read()
            .ok()
            .and_then(|entries| entries.get(text).cloned())
    }

    /// Return the cached embedding for `text`, embedding it on a miss.
    ///
    /// If another caller populated the key concurrently, the first stored
    /// value wins and is returned.
    pub fn get_or_embed(
        &self,
        provider: &dyn EmbeddingProvider,
        text: &str,
    ) -> Result<Arc<Embedding>> {
        if let Some(hit) = self.get(text) {
            return Ok(hit);
        }

        let embedding = embed_checked(provider, &[text])?
            .pop()
            .map(Arc::new)
            .ok_or(Error::EmptyInput)?;

        let mut entries = self
            .entries
            .write()
            .map_err(|_| Error::Other("embedding cache lock poisoned".to_string()))?;
        if let Some(existing) = entries.get(text) {
            return Ok(Arc::clone(existing));
        }
        if entries.len() < self.capacity {
            entries.insert(text.to_string(), Arc::clone(&embedding));
        }
        Ok(embedding)
    }

    /// Number of cached entries.
    pub fn len(&self) -> usize {
        self.entries.read().map(|e| e.len()).unwrap_or(0)
    }

    /// Check if the cache is empty.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct CountingProvider {
        inner: HashedNgramEmbedder,
        calls: AtomicUsize,
    }

    impl EmbeddingProvider for CountingProvider {
        fn embed_batch(&self, texts: &[&str]) -> Result<Vec<Vec<f32>>> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.inner.embed_batch(texts)
        }

        fn dimension(&self) -> usize {
            self.inner.dimension()
        }

        fn model_id(&self) -> &str {
            "counting"
        }
    }

    struct ShortProvider;

    impl EmbeddingProvider for ShortProvider {
        fn embed_batch(&self, texts: &[&str]) -> Result<Vec<Vec<f32>>> {
            Ok(texts.iter().map(|_| vec![1.0, 0.0]).collect())
        }

        fn dimension(&self) -> usize {
            3
        }

        fn model_id(&self) -> &str {
            "short"
        }
    }

    #[test]
    fn test_cosine_similarity() {
        let a = Embedding::new(vec![1.0, 0.0, 0.0]);
        let b = Embedding::new(vec![1.0, 0.0, 0.0]);
        let c = Embedding::new(vec![0.0, 1.0, 0.0]);
        let d = Embedding::new(vec![-1.0, 0.0, 0.0]);

        assert!((a.cosine_similarity(&b) - 1.0).abs() < 1e-6);
        assert!(a.cosine_similarity(&c).abs() < 1e-6);
        assert!((a.cosine_similarity(&d) + 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_cosine_similarity_zero_vector() {
        let a = Embedding::new(vec![0.0, 0.0]);
        let b = Embedding::new(vec![1.0, 0.0]);
        assert_eq!(a.cosine_similarity(&b), 0.0);
    }

    #[test]
    fn test_cache_embeds_once_per_key() {
        let provider = CountingProvider {
            inner: HashedNgramEmbedder::default(),
            calls: AtomicUsize::new(0),
        };
        let cache = EmbeddingCache::new();

        let first = cache.get_or_embed(&provider, "Experience").unwrap();
        let second = cache.get_or_embed(&provider, "Experience").unwrap();

        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(provider.calls.load(Ordering::SeqCst), 1);
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_cache_capacity() {
        let provider = HashedNgramEmbedder::default();
        let cache = EmbeddingCache::with_capacity(1);

        cache.get_or_embed(&provider, "Skills").unwrap();
        cache.get_or_embed(&provider, "Education").unwrap();

        assert_eq!(cache.len(), 1);
        assert!(cache.get("Education").is_none());
    }

    #[test]
    fn test_embed_checked_rejects_empty_and_bad_dimension() {
        let provider = HashedNgramEmbedder::default();
        assert!(matches!(
            embed_checked(&provider, &["  "]),
            Err(Error::EmptyInput)
        ));
        assert!(matches!(
            embed_checked(&ShortProvider, &["Skills"]),
            Err(Error::DimensionMismatch { expected: 3, actual: 2 })
        ));
    }
}
