//! Retrieval-augmented answering.
//!
//! Loads the source material into page documents, indexes them for this
//! request only, retrieves the nearest pages and asks the model for a
//! sourced answer.

use crate::context::PipelineContext;
use crate::document::SearchDocument;
use crate::embeddings::EmbeddingCache;
use crate::index::SimilarityIndex;
use crate::rag::compress::compress_documents;
use crate::rag::types::{AnswerResult, Scenario, SourceMaterial};
use lexlink_core::AppResult;
use lexlink_prompt::{build_prompt, BuiltPrompt, PromptDefinition, RAG_ANSWER};
use std::collections::HashMap;

/// Parameters of one answering request.
#[derive(Debug, Clone)]
pub struct AnswerRequest {
    pub question: String,
    pub scenario: Scenario,
    pub source: SourceMaterial,
    /// Retrieval width
    pub top_k: usize,
    /// Run the extraction pass over retrieved documents
    pub compress: bool,
}

/// Answer a question from uploaded or corpus material.
pub async fn answer_question(ctx: &PipelineContext, request: AnswerRequest) -> AppResult<AnswerResult> {
    tracing::info!(
        scenario = request.scenario.selector(),
        corpus = request.source.is_corpus(),
        "Answering question: {}",
        request.question
    );

    let forbid_pretrained = request.source.is_corpus();
    let documents = request.source.load().await?;

    answer_from_documents(
        ctx,
        &request.question,
        request.scenario,
        documents,
        request.top_k,
        forbid_pretrained,
        request.compress,
    )
    .await
}

/// Steps 2-6 of the pipeline over already loaded documents.
pub async fn answer_from_documents(
    ctx: &PipelineContext,
    question: &str,
    scenario: Scenario,
    documents: Vec<SearchDocument>,
    top_k: usize,
    forbid_pretrained: bool,
    compress: bool,
) -> AppResult<AnswerResult> {
    let mut cache = EmbeddingCache::new();
    let index = SimilarityIndex::build(ctx.embedder.clone(), documents, &mut cache).await?;

    let mut retrieved: Vec<SearchDocument> = index
        .search(question, top_k)
        .await?
        .into_iter()
        .map(|scored| scored.document)
        .collect();

    tracing::debug!(retrieved = retrieved.len(), top_k, "Retrieved documents");

    if compress {
        retrieved = compress_documents(ctx, question, retrieved).await?;
    }

    let definition = ctx.prompt(RAG_ANSWER)?;
    let prompt = build_answer_prompt(&definition, question, &retrieved, scenario, forbid_pretrained)?;
    let text = ctx.complete(&prompt).await?;

    Ok(AnswerResult {
        text,
        source_documents: retrieved,
    })
}

/// Join document contents into the prompt's context block.
pub fn format_context(documents: &[SearchDocument]) -> String {
    documents
        .iter()
        .map(|d| d.page_content.as_str())
        .collect::<Vec<_>>()
        .join("\n\n")
}

/// Render the answering prompt for `scenario`.
pub fn build_answer_prompt(
    definition: &PromptDefinition,
    question: &str,
    documents: &[SearchDocument],
    scenario: Scenario,
    forbid_pretrained: bool,
) -> AppResult<BuiltPrompt> {
    let mut variables = HashMap::new();
    variables.insert("context".to_string(), format_context(documents));
    variables.insert("question".to_string(), question.to_string());

    let mut sections: Vec<&str> = scenario.example_sections().to_vec();
    if forbid_pretrained {
        sections.push("noPretrainedKnowledge");
    }

    build_prompt(definition, variables, &sections)
}
