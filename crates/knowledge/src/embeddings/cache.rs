//! Request-scoped embedding cache.

use super::provider::EmbeddingProvider;
use lexlink_core::{AppError, AppResult};
use sha2::{Digest, Sha256};
use std::collections::{HashMap, HashSet};

/// SHA-256 hex digest of a text.
pub fn content_hash(text: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(text.as_bytes());
    format!("{:x}", hasher.finalize())
}

/// Caches document embeddings for the lifetime of one request.
///
/// Keys are `"{model}:{sha256(text)}"`, so duplicate texts in a corpus are
/// embedded once and vectors from different models never mix.
#[derive(Debug, Default)]
pub struct EmbeddingCache {
    entries: HashMap<String, Vec<f32>>,
    hits: usize,
    misses: usize,
}

impl EmbeddingCache {
    pub fn new() -> Self {
        Self::default()
    }

    fn key(model: &str, text: &str) -> String {
        format!("{}:{}", model, content_hash(text))
    }

    /// Embed `texts` in order, calling the provider only for unseen texts.
    pub async fn embed_documents(
        &mut self,
        provider: &dyn EmbeddingProvider,
        texts: &[String],
    ) -> AppResult<Vec<Vec<f32>>> {
        let model = provider.model_name().to_string();
        let keys: Vec<String> = texts.iter().map(|t| Self::key(&model, t)).collect();

        let mut pending = HashSet::new();
        let mut pending_keys = Vec::new();
        let mut pending_texts = Vec::new();
        for (key, text) in keys.iter().zip(texts) {
            if self.entries.contains_key(key) || !pending.insert(key.as_str()) {
                self.hits += 1;
            } else {
                self.misses += 1;
                pending_keys.push(key.clone());
                pending_texts.push(text.clone());
            }
        }

        if !pending_texts.is_empty() {
            let vectors = provider.embed_batch(&pending_texts).await?;
            if vectors.len() != pending_texts.len() {
                return Err(AppError::Knowledge(format!(
                    "Embedding provider returned {} vectors for {} texts",
                    vectors.len(),
                    pending_texts.len()
                )));
            }
            self.entries.extend(pending_keys.into_iter().zip(vectors));
        }

        tracing::debug!(
            hits = self.hits,
            misses = self.misses,
            "Embedding cache lookup complete"
        );

        keys.iter()
            .map(|key| {
                self.entries
                    .get(key)
                    .cloned()
                    .ok_or_else(|| AppError::Knowledge("Embedding missing from cache".to_string()))
            })
            .collect()
    }

    pub fn hits(&self) -> usize {
        self.hits
    }

    pub fn misses(&self) -> usize {
        self.misses
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct CountingProvider {
        texts_embedded: AtomicUsize,
    }

    #[async_trait::async_trait]
    impl EmbeddingProvider for CountingProvider {
        fn provider_name(&self) -> &str {
            "counting"
        }

        fn model_name(&self) -> &str {
            "count-v1"
        }

        async fn embed_batch(&self, texts: &[String]) -> AppResult<Vec<Vec<f32>>> {
            self.texts_embedded.fetch_add(texts.len(), Ordering::SeqCst);
            Ok(texts.iter().map(|t| vec![t.len() as f32]).collect())
        }
    }

    #[test]
    fn test_content_hash() {
        let hash = content_hash("Hello, world!");
        assert_eq!(hash.len(), 64);
        assert_eq!(hash, content_hash("Hello, world!"));
        assert_ne!(hash, content_hash("Different text"));
    }

    #[tokio::test]
    async fn test_duplicates_embedded_once() {
        let provider = CountingProvider {
            texts_embedded: AtomicUsize::new(0),
        };
        let mut cache = EmbeddingCache::new();
        let texts = vec!["a".to_string(), "bb".to_string(), "a".to_string()];

        let vectors = cache.embed_documents(&provider, &texts).await.unwrap();

        assert_eq!(vectors, vec![vec![1.0], vec![2.0], vec![1.0]]);
        assert_eq!(provider.texts_embedded.load(Ordering::SeqCst), 2);
        assert_eq!(cache.misses(), 2);
        assert_eq!(cache.hits(), 1);
        assert_eq!(cache.len(), 2);
    }

    #[tokio::test]
    async fn test_large_input_embeds_each_unique_text_once() {
        let provider = CountingProvider {
            texts_embedded: AtomicUsize::new(0),
        };
        let mut cache = EmbeddingCache::new();
        let texts: Vec<String> = (0..50_000).map(|i| format!("term-{}", i % 10_000)).collect();

        let vectors = cache.embed_documents(&provider, &texts).await.unwrap();

        assert_eq!(vectors.len(), 50_000);
        assert_eq!(vectors[10_007], vectors[7]);
        assert_eq!(provider.texts_embedded.load(Ordering::SeqCst), 10_000);
        assert_eq!(cache.misses(), 10_000);
        assert_eq!(cache.hits(), 40_000);
        assert_eq!(cache.len(), 10_000);
    }

    #[tokio::test]
    async fn test_second_pass_is_all_hits() {
        let provider = CountingProvider {
            texts_embedded: AtomicUsize::new(0),
        };
        let mut cache = EmbeddingCache::new();
        let texts = vec!["x".to_string(), "y".to_string()];

        cache.embed_documents(&provider, &texts).await.unwrap();
        cache.embed_documents(&provider, &texts).await.unwrap();

        assert_eq!(provider.texts_embedded.load(Ordering::SeqCst), 2);
        assert_eq!(cache.hits(), 2);
    }
}
