//! Services shared by the answering and linking pipelines.

use crate::embeddings::EmbeddingProvider;
use lexlink_core::AppResult;
use lexlink_llm::{LlmClient, LlmRequest};
use lexlink_prompt::{load_prompt, BuiltPrompt, PromptDefinition};
use std::path::PathBuf;
use std::sync::Arc;

/// Model clients and prompt location for one pipeline run.
#[derive(Clone)]
pub struct PipelineContext {
    pub llm: Arc<dyn LlmClient>,
    pub embedder: Arc<dyn EmbeddingProvider>,
    /// Chat model identifier
    pub model: String,
    /// Directory with prompt overrides
    pub prompts_dir: Option<PathBuf>,
}

impl PipelineContext {
    pub fn new(
        llm: Arc<dyn LlmClient>,
        embedder: Arc<dyn EmbeddingProvider>,
        model: impl Into<String>,
    ) -> Self {
        Self {
            llm,
            embedder,
            model: model.into(),
            prompts_dir: None,
        }
    }

    pub fn with_prompts_dir(mut self, prompts_dir: Option<PathBuf>) -> Self {
        self.prompts_dir = prompts_dir;
        self
    }

    /// Load a prompt definition, honouring overrides.
    pub fn prompt(&self, id: &str) -> AppResult<PromptDefinition> {
        load_prompt(self.prompts_dir.as_deref(), id)
    }

    /// Send a rendered prompt at temperature 0 and return the completion text.
    pub async fn complete(&self, prompt: &BuiltPrompt) -> AppResult<String> {
        tracing::debug!(
            prompt = %prompt.metadata.source_prompt_id,
            sections = ?prompt.metadata.sections_included,
            "Submitting prompt"
        );

        let request = LlmRequest::new(prompt.text.clone(), self.model.clone()).deterministic();
        let response = self.llm.complete(&request).await?;

        tracing::debug!(
            prompt = %prompt.metadata.source_prompt_id,
            total_tokens = response.usage.total_tokens,
            "Completion received"
        );

        Ok(response.content)
    }
}
