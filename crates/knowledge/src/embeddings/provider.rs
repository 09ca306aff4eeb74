//! Embedding provider trait and factory.

use super::providers::{mock::MockProvider, openai::OpenAiEmbeddingProvider};
use lexlink_core::{AppError, AppResult};
use std::sync::Arc;

/// Trait for embedding providers.
#[async_trait::async_trait]
pub trait EmbeddingProvider: Send + Sync {
    /// Get provider name (e.g., "mock", "openai")
    fn provider_name(&self) -> &str;

    /// Get model identifier
    fn model_name(&self) -> &str;

    /// Generate embeddings for multiple texts in a batch, in input order.
    async fn embed_batch(&self, texts: &[String]) -> AppResult<Vec<Vec<f32>>>;

    /// Generate embedding for a single text (convenience method).
    async fn embed(&self, text: &str) -> AppResult<Vec<f32>> {
        let mut results = self.embed_batch(&[text.to_string()]).await?;
        results
            .pop()
            .ok_or_else(|| AppError::Knowledge("No embedding returned".to_string()))
    }
}

/// Create an embedding provider.
///
/// * `"mock"` - deterministic local provider, no network
/// * `"openai"` - api.openai.com (or `endpoint`), API key required
/// * `"openai-compatible"` - any server speaking the embeddings protocol at `endpoint`
pub fn create_provider(
    provider: &str,
    model: &str,
    endpoint: Option<&str>,
    api_key: Option<&str>,
) -> AppResult<Arc<dyn EmbeddingProvider>> {
    match provider {
        "mock" => Ok(Arc::new(MockProvider::default())),

        "openai" => {
            let api_key = api_key.ok_or_else(|| {
                AppError::Config("OpenAI embedding provider requires an API key".to_string())
            })?;
            let mut embedder = OpenAiEmbeddingProvider::new(api_key).with_model(model);
            if let Some(url) = endpoint {
                embedder = embedder.with_base_url(url);
            }
            Ok(Arc::new(embedder))
        }

        "openai-compatible" => {
            let url = endpoint.ok_or_else(|| {
                AppError::Config("openai-compatible embedding provider requires an endpoint".to_string())
            })?;
            let mut embedder = OpenAiEmbeddingProvider::anonymous(url).with_model(model);
            if let Some(key) = api_key {
                embedder = embedder.with_api_key(key);
            }
            Ok(Arc::new(embedder))
        }

        _ => Err(AppError::Config(format!(
            "Unknown embedding provider: '{}'. Supported providers: mock, openai, openai-compatible",
            provider
        ))),
    }
}
