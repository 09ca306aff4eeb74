//! OpenAI embeddings provider.
//!
//! Calls `POST {base}/embeddings` on api.openai.com or any compatible
//! server. Inputs are sent in batches; results are reordered by the
//! `index` field of the response.

use crate::embeddings::provider::EmbeddingProvider;
use lexlink_core::{AppError, AppResult};
use serde::{Deserialize, Serialize};
use tracing::{debug, error};

const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";
const DEFAULT_MODEL: &str = "text-embedding-ada-002";

/// Maximum number of inputs per request.
const MAX_BATCH_SIZE: usize = 512;

#[derive(Serialize)]
struct EmbeddingRequest<'a> {
    model: &'a str,
    input: &'a [String],
}

#[derive(Deserialize)]
struct EmbeddingResponse {
    data: Vec<EmbeddingData>,
}

#[derive(Deserialize)]
struct EmbeddingData {
    #[serde(default)]
    index: usize,
    embedding: Vec<f32>,
}

#[derive(Deserialize)]
struct ErrorResponse {
    error: ErrorDetail,
}

#[derive(Deserialize)]
struct ErrorDetail {
    message: String,
}

/// Embedding provider backed by the OpenAI embeddings API.
pub struct OpenAiEmbeddingProvider {
    client: reqwest::Client,
    base_url: String,
    api_key: Option<String>,
    model: String,
}

impl OpenAiEmbeddingProvider {
    /// Provider for api.openai.com.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: DEFAULT_BASE_URL.to_string(),
            api_key: Some(api_key.into()),
            model: DEFAULT_MODEL.to_string(),
        }
    }

    /// Provider for a server that needs no API key.
    pub fn anonymous(base_url: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: String::new(),
            api_key: None,
            model: DEFAULT_MODEL.to_string(),
        }
        .with_base_url(base_url)
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    async fn embed_chunk(&self, texts: &[String]) -> AppResult<Vec<Vec<f32>>> {
        let url = format!("{}/embeddings", self.base_url);
        let body = EmbeddingRequest {
            model: &self.model,
            input: texts,
        };

        let mut request = self.client.post(&url).json(&body);
        if let Some(key) = self.api_key.as_deref() {
            request = request.bearer_auth(key);
        }

        let response = request.send().await.map_err(|e| {
            error!(provider = "openai", error = %e, "embedding request failed");
            AppError::Upstream(format!("Embedding request to {} failed: {}", url, e))
        })?;

        if !response.status().is_success() {
            let status = response.status();
            let text = response.text().await.unwrap_or_default();
            let detail = serde_json::from_str::<ErrorResponse>(&text)
                .map(|e| e.error.message)
                .unwrap_or(text);

            error!(provider = "openai", %status, "embedding API error");
            return Err(AppError::Upstream(format!(
                "Embedding API returned {}: {}",
                status, detail
            )));
        }

        let parsed: EmbeddingResponse = response.json().await.map_err(|e| {
            AppError::Upstream(format!("Failed to parse embedding response: {}", e))
        })?;

        into_ordered(parsed, texts.len())
    }
}

fn into_ordered(response: EmbeddingResponse, expected: usize) -> AppResult<Vec<Vec<f32>>> {
    if response.data.len() != expected {
        return Err(AppError::Upstream(format!(
            "Embedding API returned {} vectors for {} inputs",
            response.data.len(),
            expected
        )));
    }

    let mut data = response.data;
    data.sort_by_key(|d| d.index);
    Ok(data.into_iter().map(|d| d.embedding).collect())
}

#[async_trait::async_trait]
impl EmbeddingProvider for OpenAiEmbeddingProvider {
    fn provider_name(&self) -> &str {
        "openai"
    }

    fn model_name(&self) -> &str {
        &self.model
    }

    async fn embed_batch(&self, texts: &[String]) -> AppResult<Vec<Vec<f32>>> {
        if texts.is_empty() {
            return Ok(Vec::new());
        }

        debug!(
            provider = "openai",
            batch_size = texts.len(),
            model = %self.model,
            "embedding batch"
        );

        let mut embeddings = Vec::with_capacity(texts.len());
        for chunk in texts.chunks(MAX_BATCH_SIZE) {
            embeddings.extend(self.embed_chunk(chunk).await?);
        }
        Ok(embeddings)
    }
}
