//! Ephemeral in-memory similarity index.
//!
//! Built per request from a set of documents, queried a few times and
//! dropped. Nothing is persisted or shared between requests.

use crate::document::{ScoredDocument, SearchDocument};
use crate::embeddings::{EmbeddingCache, EmbeddingProvider};
use lexlink_core::{AppError, AppResult};
use std::sync::Arc;
use std::time::Instant;

/// Cosine similarity; 0.0 when either vector has zero magnitude.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    let dot: f32 = a.iter().zip(b.iter()).map(|(x, y)| x * y).sum();
    let norm_a: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let norm_b: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();
    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }
    dot / (norm_a * norm_b)
}

/// Documents paired with their embeddings, searchable by query text.
pub struct SimilarityIndex {
    embedder: Arc<dyn EmbeddingProvider>,
    documents: Vec<SearchDocument>,
    vectors: Vec<Vec<f32>>,
}

impl SimilarityIndex {
    /// Embed `documents` through `cache` and build the index.
    pub async fn build(
        embedder: Arc<dyn EmbeddingProvider>,
        documents: Vec<SearchDocument>,
        cache: &mut EmbeddingCache,
    ) -> AppResult<Self> {
        let start = Instant::now();
        let texts: Vec<String> = documents.iter().map(|d| d.page_content.clone()).collect();
        let vectors = cache.embed_documents(embedder.as_ref(), &texts).await?;

        tracing::info!(
            documents = documents.len(),
            cache_hits = cache.hits(),
            cache_misses = cache.misses(),
            elapsed_ms = start.elapsed().as_millis() as u64,
            "Built similarity index"
        );

        Self::from_embeddings(embedder, documents, vectors)
    }

    /// Build an index from precomputed vectors.
    pub fn from_embeddings(
        embedder: Arc<dyn EmbeddingProvider>,
        documents: Vec<SearchDocument>,
        vectors: Vec<Vec<f32>>,
    ) -> AppResult<Self> {
        if documents.len() != vectors.len() {
            return Err(AppError::Knowledge(format!(
                "{} documents but {} embeddings",
                documents.len(),
                vectors.len()
            )));
        }

        Ok(Self {
            embedder,
            documents,
            vectors,
        })
    }

    /// Top-`k` documents nearest to `query`, best first.
    pub async fn search(&self, query: &str, k: usize) -> AppResult<Vec<ScoredDocument>> {
        if self.documents.is_empty() || k == 0 {
            return Ok(Vec::new());
        }

        let query_vector = self.embedder.embed(query).await?;
        Ok(self.search_by_vector(&query_vector, k))
    }

    /// Top-`k` documents nearest to `vector`. Ties keep insertion order.
    pub fn search_by_vector(&self, vector: &[f32], k: usize) -> Vec<ScoredDocument> {
        let mut scored: Vec<(usize, f32)> = self
            .vectors
            .iter()
            .enumerate()
            .map(|(i, v)| (i, cosine_similarity(v, vector)))
            .collect();

        scored.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));
        scored.truncate(k);

        scored
            .into_iter()
            .map(|(i, score)| ScoredDocument {
                document: self.documents[i].clone(),
                score,
            })
            .collect()
    }

    pub fn documents(&self) -> &[SearchDocument] {
        &self.documents
    }

    pub fn len(&self) -> usize {
        self.documents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }
}
