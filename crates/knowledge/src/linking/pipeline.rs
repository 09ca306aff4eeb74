//! Entity linking: extract, fetch candidates, index, pick nearest.

use crate::context::PipelineContext;
use crate::document::{ScoredDocument, SearchDocument};
use crate::embeddings::EmbeddingCache;
use crate::index::SimilarityIndex;
use crate::linking::extraction::ExtractionResult;
use crate::search::{search_with_retry, SearchProvider};
use futures::future::join_all;
use lexlink_core::{AppResult, EmptyResultPolicy};
use lexlink_prompt::{build_prompt, EL_EXTRACT};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;

/// The document an entity was linked to.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LinkedEntity {
    pub entity: String,
    /// `None` when the candidate pool was empty
    pub document: Option<ScoredDocument>,
}

/// Extraction fields plus the links and the candidate pool.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LinkingResult {
    #[serde(flatten)]
    pub extraction: ExtractionResult,

    pub entity_linking: Vec<LinkedEntity>,

    #[serde(rename = "sourceDocuments")]
    pub source_documents: Vec<SearchDocument>,
}

/// Links entities in free text against one search provider.
pub struct EntityLinker {
    ctx: PipelineContext,
    search: Arc<dyn SearchProvider>,
    corpus: Vec<SearchDocument>,
    policy: EmptyResultPolicy,
}

impl EntityLinker {
    pub fn new(ctx: PipelineContext, search: Arc<dyn SearchProvider>) -> Self {
        Self {
            ctx,
            search,
            corpus: Vec::new(),
            policy: EmptyResultPolicy::default(),
        }
    }

    /// Static documents placed ahead of the fetched candidates in the pool.
    pub fn with_corpus(mut self, corpus: Vec<SearchDocument>) -> Self {
        self.corpus = corpus;
        self
    }

    pub fn with_empty_result_policy(mut self, policy: EmptyResultPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Ask the model for entities, candidates and disambiguation hints.
    pub async fn extract(&self, text: &str) -> AppResult<ExtractionResult> {
        let definition = self.ctx.prompt(EL_EXTRACT)?;
        let mut variables = HashMap::new();
        variables.insert("text".to_string(), text.to_string());

        let prompt = build_prompt(&definition, variables, &[])?;
        let reply = self.ctx.complete(&prompt).await?;

        match ExtractionResult::parse(&reply) {
            Ok(extraction) => Ok(extraction),
            Err(e) => {
                tracing::warn!(reply = %reply, "Unusable extraction reply: {}", e);
                Err(e.into())
            }
        }
    }

    /// Run the full linking pipeline over `text`.
    pub async fn link(&self, text: &str) -> AppResult<LinkingResult> {
        let extraction = self.extract(text).await?;
        let entities: Vec<String> = extraction
            .named_entities
            .iter()
            .map(|e| e.trim().to_string())
            .collect();

        tracing::info!(
            provider = self.search.name(),
            entities = ?entities,
            "Linking entities"
        );

        let fetched = join_all(
            entities
                .iter()
                .map(|entity| search_with_retry(self.search.as_ref(), entity, self.policy)),
        )
        .await;

        let mut pool = self.corpus.clone();
        for documents in fetched {
            pool.extend(documents?);
        }

        let mut cache = EmbeddingCache::new();
        let index = SimilarityIndex::build(self.ctx.embedder.clone(), pool, &mut cache).await?;

        let lookups = join_all(entities.iter().map(|entity| {
            let query = extraction.linking_query(entity);
            let index = &index;
            async move { index.search(&query, 1).await }
        }))
        .await;

        let mut entity_linking = Vec::with_capacity(entities.len());
        for (entity, nearest) in entities.into_iter().zip(lookups) {
            let document = nearest?.into_iter().next();
            tracing::debug!(
                entity = %entity,
                linked = ?document.as_ref().and_then(|d| d.document.source()),
                "Linked entity"
            );
            entity_linking.push(LinkedEntity { entity, document });
        }

        Ok(LinkingResult {
            extraction,
            entity_linking,
            source_documents: index.documents().to_vec(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::testing::StubLlm;
    use crate::embeddings::MockProvider;
    use lexlink_core::AppError;
    use std::sync::Mutex;
    use std::time::Duration;

    const EXTRACTION: &str = "```json\n{\"named_entities\": [\"Elon Musk\", \"SpaceX\"], \"candidate_entities\": {\"Elon Musk\": [\"Elon Musk\"], \"SpaceX\": [\"SpaceX\"]}, \"disambiguation\": {\"Elon Musk\": \"business magnate\", \"SpaceX\": \"spacecraft manufacturer\"}}\n```";

    /// Returns one document per query; the first query answers last.
    struct SlowFirstProvider {
        queries: Mutex<Vec<String>>,
    }

    #[async_trait::async_trait]
    impl SearchProvider for SlowFirstProvider {
        fn name(&self) -> &str {
            "slow-first"
        }

        async fn search(&self, query: &str) -> AppResult<Vec<SearchDocument>> {
            self.queries.lock().unwrap().push(query.to_string());
            if query == "Elon Musk" {
                tokio::time::sleep(Duration::from_millis(50)).await;
            }
            Ok(vec![SearchDocument::new(
                format!("{} - {}", query, "encyclopedia article"),
                format!("https://en.wikipedia.org/wiki/{}", query),
            )
            .with_meta("search", query)])
        }
    }

    struct EmptyProvider;

    #[async_trait::async_trait]
    impl SearchProvider for EmptyProvider {
        fn name(&self) -> &str {
            "empty"
        }

        async fn search(&self, _query: &str) -> AppResult<Vec<SearchDocument>> {
            Ok(Vec::new())
        }
    }

    fn ctx(reply: &str) -> PipelineContext {
        PipelineContext::new(
            Arc::new(StubLlm::fixed(reply)),
            Arc::new(MockProvider::default()),
            "gpt-3.5-turbo",
        )
    }

    fn slow_first() -> Arc<SlowFirstProvider> {
        Arc::new(SlowFirstProvider {
            queries: Mutex::new(Vec::new()),
        })
    }

    #[tokio::test]
    async fn test_links_every_entity() {
        let linker = EntityLinker::new(ctx(EXTRACTION), slow_first());
        let result = linker.link("Elon Musk founded SpaceX.").await.unwrap();

        assert_eq!(result.entity_linking.len(), 2);
        assert!(result.entity_linking.iter().all(|l| l.document.is_some()));
        assert_eq!(result.source_documents.len(), 2);
        assert_eq!(result.extraction.named_entities, vec!["Elon Musk", "SpaceX"]);
    }

    #[tokio::test]
    async fn test_order_follows_extraction_not_completion() {
        let provider = slow_first();
        let linker = EntityLinker::new(ctx(EXTRACTION), provider.clone());
        let result = linker.link("Elon Musk founded SpaceX.").await.unwrap();

        let entities: Vec<&str> = result.entity_linking.iter().map(|l| l.entity.as_str()).collect();
        assert_eq!(entities, vec!["Elon Musk", "SpaceX"]);

        let pool_order: Vec<&str> = result
            .source_documents
            .iter()
            .map(|d| d.metadata["search"].as_str().unwrap())
            .collect();
        assert_eq!(pool_order, vec!["Elon Musk", "SpaceX"]);

        let mut queries = provider.queries.lock().unwrap().clone();
        queries.sort();
        assert_eq!(queries, vec!["Elon Musk", "SpaceX"]);
    }

    #[tokio::test]
    async fn test_corpus_precedes_fetched_documents() {
        let glossary = SearchDocument::new(
            "Space Technology (ST)\nSpaceX\nLaunch provider",
            "docs/sap_glossary.json",
        );
        let linker = EntityLinker::new(ctx(EXTRACTION), slow_first()).with_corpus(vec![glossary]);
        let result = linker.link("Elon Musk founded SpaceX.").await.unwrap();

        assert_eq!(result.source_documents.len(), 3);
        assert_eq!(result.source_documents[0].source(), Some("docs/sap_glossary.json"));
    }

    #[tokio::test]
    async fn test_empty_pool_links_to_nothing() {
        let linker = EntityLinker::new(ctx(EXTRACTION), Arc::new(EmptyProvider));
        let result = linker.link("Elon Musk founded SpaceX.").await.unwrap();

        assert_eq!(result.entity_linking.len(), 2);
        assert!(result.entity_linking.iter().all(|l| l.document.is_none()));
        assert!(result.source_documents.is_empty());
    }

    #[tokio::test]
    async fn test_strict_policy_fails_on_empty_pool() {
        let linker = EntityLinker::new(ctx(EXTRACTION), Arc::new(EmptyProvider))
            .with_empty_result_policy(EmptyResultPolicy::Fail);

        let result = linker.link("Elon Musk founded SpaceX.").await;
        assert!(matches!(result, Err(AppError::Upstream(_))));
    }

    #[tokio::test]
    async fn test_malformed_extraction_fails() {
        let linker = EntityLinker::new(ctx("Sorry, I cannot help with that."), slow_first());
        let result = linker.link("Elon Musk founded SpaceX.").await;

        assert!(matches!(result, Err(AppError::Parse(_))));
    }

    #[tokio::test]
    async fn test_entities_trimmed() {
        let reply = "{\"named_entities\": [\" SpaceX \"], \"candidate_entities\": {}, \"disambiguation\": {}}";
        let provider = slow_first();
        let linker = EntityLinker::new(ctx(reply), provider.clone());
        let result = linker.link("SpaceX").await.unwrap();

        assert_eq!(result.entity_linking[0].entity, "SpaceX");
        assert_eq!(*provider.queries.lock().unwrap(), vec!["SpaceX"]);
    }

    #[test]
    fn test_result_shape() {
        let result = LinkingResult {
            extraction: ExtractionResult::parse(EXTRACTION).unwrap(),
            entity_linking: vec![LinkedEntity {
                entity: "SpaceX".to_string(),
                document: None,
            }],
            source_documents: Vec::new(),
        };

        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json["named_entities"][0], "Elon Musk");
        assert!(json["disambiguation"].is_object());
        assert_eq!(json["entity_linking"][0]["entity"], "SpaceX");
        assert!(json["entity_linking"][0]["document"].is_null());
        assert!(json["sourceDocuments"].is_array());
    }
}
