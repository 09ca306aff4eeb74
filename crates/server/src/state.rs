//! Shared application state.

use lexlink_core::{AppConfig, AppError, AppResult};
use lexlink_knowledge::{
    create_provider, EmbeddingProvider, PipelineContext, SapHelpSearch, SearchProvider,
    WikipediaSearch,
};
use lexlink_llm::{create_client, LlmClient};
use std::sync::Arc;

/// Clients and settings shared by every request.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub pipeline: PipelineContext,
    pub wikipedia: Arc<dyn SearchProvider>,
    pub sap_help: Arc<dyn SearchProvider>,
}

impl AppState {
    pub fn new(
        config: AppConfig,
        pipeline: PipelineContext,
        wikipedia: Arc<dyn SearchProvider>,
        sap_help: Arc<dyn SearchProvider>,
    ) -> Self {
        Self {
            config: Arc::new(config),
            pipeline,
            wikipedia,
            sap_help,
        }
    }

    /// Build the model clients and search providers from configuration.
    pub fn from_config(config: AppConfig) -> AppResult<Self> {
        let llm_settings = &config.llm;
        let endpoint = llm_settings.endpoint.as_deref();
        let api_key = llm_settings.api_key.as_deref();

        let llm = create_client(&llm_settings.provider, endpoint, api_key).map_err(AppError::Config)?;
        let embedder = create_provider(
            &llm_settings.embedding_provider,
            &llm_settings.embedding_model,
            endpoint,
            api_key,
        )?;

        tracing::debug!(
            provider = llm.provider_name(),
            model = %llm_settings.model,
            embeddings = embedder.provider_name(),
            embedding_model = embedder.model_name(),
            "Model clients ready"
        );

        let pipeline = PipelineContext::new(llm, embedder, llm_settings.model.clone())
            .with_prompts_dir(config.rag.prompts_dir.clone());

        let wikipedia = Arc::new(WikipediaSearch::new(config.search.wikipedia_endpoint.clone()));
        let sap_help = Arc::new(SapHelpSearch::new(config.search.sap_help_endpoint.clone()));

        Ok(Self::new(config, pipeline, wikipedia, sap_help))
    }
}
