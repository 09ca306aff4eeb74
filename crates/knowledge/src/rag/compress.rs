//! Contextual compression of retrieved documents.
//!
//! Each document is passed through the model with the question; only the
//! passages the model copies back are kept. Documents with nothing relevant
//! are dropped.

use crate::context::PipelineContext;
use crate::document::SearchDocument;
use futures::future::join_all;
use lexlink_core::AppResult;
use lexlink_prompt::{build_prompt, RAG_COMPRESS};
use std::collections::HashMap;

/// Marker the model returns when a document has nothing relevant.
pub const NO_OUTPUT: &str = "NO_OUTPUT";

/// Keep only question-relevant passages, preserving document order.
pub async fn compress_documents(
    ctx: &PipelineContext,
    question: &str,
    documents: Vec<SearchDocument>,
) -> AppResult<Vec<SearchDocument>> {
    let definition = ctx.prompt(RAG_COMPRESS)?;
    let before = documents.len();

    let extractions = join_all(documents.iter().map(|doc| {
        let mut variables = HashMap::new();
        variables.insert("question".to_string(), question.to_string());
        variables.insert("context".to_string(), doc.page_content.clone());
        let definition = &definition;

        async move {
            let prompt = build_prompt(definition, variables, &[])?;
            ctx.complete(&prompt).await
        }
    }))
    .await;

    let mut kept = Vec::with_capacity(before);
    for (doc, extraction) in documents.into_iter().zip(extractions) {
        let extracted = extraction?;
        let extracted = extracted.trim();
        if extracted.is_empty() || extracted == NO_OUTPUT {
            continue;
        }
        kept.push(SearchDocument {
            page_content: extracted.to_string(),
            metadata: doc.metadata,
        });
    }

    tracing::debug!(before, after = kept.len(), "Compressed retrieved documents");
    Ok(kept)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::testing::StubLlm;
    use crate::embeddings::MockProvider;
    use std::sync::Arc;

    fn ctx(llm: StubLlm) -> PipelineContext {
        PipelineContext::new(Arc::new(llm), Arc::new(MockProvider::default()), "gpt-3.5-turbo")
    }

    #[tokio::test]
    async fn test_keeps_extracted_text_and_metadata() {
        let ctx = ctx(StubLlm::with(|prompt| {
            if prompt.contains("capital investments") {
                "  capital investments  ".to_string()
            } else {
                NO_OUTPUT.to_string()
            }
        }));
        let docs = vec![
            SearchDocument::new("IM supports capital investments.", "a.pdf"),
            SearchDocument::new("Unrelated page.", "b.pdf"),
        ];

        let kept = compress_documents(&ctx, "Which investments?", docs).await.unwrap();

        assert_eq!(kept.len(), 1);
        assert_eq!(kept[0].page_content, "capital investments");
        assert_eq!(kept[0].source(), Some("a.pdf"));
    }

    #[tokio::test]
    async fn test_empty_extraction_dropped() {
        let ctx = ctx(StubLlm::fixed("   "));
        let docs = vec![SearchDocument::new("text", "a.pdf")];

        assert!(compress_documents(&ctx, "q", docs).await.unwrap().is_empty());
    }
}
