//! Deterministic local embedding provider.

use crate::embeddings::provider::EmbeddingProvider;
use lexlink_core::AppResult;

const DEFAULT_DIMENSIONS: usize = 384;

/// Mock provider for tests and offline development.
///
/// Hashes whole words and padded character trigrams into a fixed number of
/// buckets and L2-normalizes the result. Texts sharing words or word
/// fragments end up close to each other; identical texts get identical
/// vectors.
#[derive(Debug, Clone)]
pub struct MockProvider {
    dimensions: usize,
}

impl Default for MockProvider {
    fn default() -> Self {
        Self::new(DEFAULT_DIMENSIONS)
    }
}

impl MockProvider {
    /// Create a new mock provider with specified dimensions.
    pub fn new(dimensions: usize) -> Self {
        Self {
            dimensions: dimensions.max(1),
        }
    }

    /// Output vector length.
    pub fn dimensions(&self) -> usize {
        self.dimensions
    }

    fn bucket(&self, token: &str) -> usize {
        // FNV-1a
        let hash = token
            .bytes()
            .fold(0xcbf2_9ce4_8422_2325u64, |acc, b| {
                (acc ^ b as u64).wrapping_mul(0x0100_0000_01b3)
            });
        (hash % self.dimensions as u64) as usize
    }

    fn vectorize(&self, text: &str) -> Vec<f32> {
        let mut vector = vec![0.0f32; self.dimensions];

        let lower = text.to_lowercase();
        let words = lower
            .split(|c: char| !c.is_alphanumeric())
            .filter(|w| !w.is_empty());

        for word in words {
            vector[self.bucket(word)] += 1.0;

            let padded: Vec<char> = std::iter::once('^')
                .chain(word.chars())
                .chain(std::iter::once('$'))
                .collect();
            for window in padded.windows(3) {
                let trigram: String = window.iter().collect();
                vector[self.bucket(&trigram)] += 0.5;
            }
        }

        let norm: f32 = vector.iter().map(|x| x * x).sum::<f32>().sqrt();
        if norm > 0.0 {
            vector.iter_mut().for_each(|v| *v /= norm);
        }

        vector
    }
}

#[async_trait::async_trait]
impl EmbeddingProvider for MockProvider {
    fn provider_name(&self) -> &str {
        "mock"
    }

    fn model_name(&self) -> &str {
        "trigram-v1"
    }

    async fn embed_batch(&self, texts: &[String]) -> AppResult<Vec<Vec<f32>>> {
        Ok(texts.iter().map(|text| self.vectorize(text)).collect())
    }
}
