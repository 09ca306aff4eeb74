//! Search providers that turn a query into candidate documents.
//!
//! Every provider normalizes its upstream response into [`SearchDocument`]s,
//! so indexing and linking never see provider-specific shapes.

pub mod sap_help;
pub mod wikipedia;

pub use sap_help::SapHelpSearch;
pub use wikipedia::WikipediaSearch;

use crate::document::SearchDocument;
use lexlink_core::{AppError, AppResult, EmptyResultPolicy};

/// A remote search backend.
#[async_trait::async_trait]
pub trait SearchProvider: Send + Sync {
    /// Short provider name used in logs.
    fn name(&self) -> &str;

    /// Run one search. An empty result is not an error.
    async fn search(&self, query: &str) -> AppResult<Vec<SearchDocument>>;
}

/// Search, retrying exactly once with the same query if nothing came back.
///
/// A second empty result is "no match" under [`EmptyResultPolicy::Accept`]
/// and an upstream error under [`EmptyResultPolicy::Fail`].
pub async fn search_with_retry(
    provider: &dyn SearchProvider,
    query: &str,
    policy: EmptyResultPolicy,
) -> AppResult<Vec<SearchDocument>> {
    let documents = provider.search(query).await?;
    if !documents.is_empty() {
        return Ok(documents);
    }

    tracing::debug!(provider = provider.name(), query, "Empty search result, retrying once");
    let documents = provider.search(query).await?;
    if !documents.is_empty() {
        return Ok(documents);
    }

    match policy {
        EmptyResultPolicy::Accept => {
            tracing::info!(provider = provider.name(), query, "No documents found");
            Ok(Vec::new())
        }
        EmptyResultPolicy::Fail => Err(AppError::Upstream(format!(
            "{} returned no documents for '{}'",
            provider.name(),
            query
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    /// Replays a fixed sequence of result counts and records the queries.
    struct ScriptedProvider {
        counts: Mutex<Vec<usize>>,
        queries: Mutex<Vec<String>>,
    }

    impl ScriptedProvider {
        fn new(counts: Vec<usize>) -> Self {
            Self {
                counts: Mutex::new(counts),
                queries: Mutex::new(Vec::new()),
            }
        }

        fn queries(&self) -> Vec<String> {
            self.queries.lock().unwrap().clone()
        }
    }

    #[async_trait::async_trait]
    impl SearchProvider for ScriptedProvider {
        fn name(&self) -> &str {
            "scripted"
        }

        async fn search(&self, query: &str) -> AppResult<Vec<SearchDocument>> {
            self.queries.lock().unwrap().push(query.to_string());
            let count = self.counts.lock().unwrap().remove(0);
            Ok((0..count)
                .map(|i| SearchDocument::new(format!("{} {}", query, i), "scripted"))
                .collect())
        }
    }

    #[tokio::test]
    async fn test_no_retry_when_first_call_has_results() {
        let provider = ScriptedProvider::new(vec![2]);
        let docs = search_with_retry(&provider, "SpaceX", EmptyResultPolicy::Accept)
            .await
            .unwrap();

        assert_eq!(docs.len(), 2);
        assert_eq!(provider.queries(), vec!["SpaceX"]);
    }

    #[tokio::test]
    async fn test_empty_result_retried_once_with_same_query() {
        let provider = ScriptedProvider::new(vec![0, 1]);
        let docs = search_with_retry(&provider, "Elon Musk", EmptyResultPolicy::Accept)
            .await
            .unwrap();

        assert_eq!(docs.len(), 1);
        assert_eq!(provider.queries(), vec!["Elon Musk", "Elon Musk"]);
    }

    #[tokio::test]
    async fn test_two_empties_accepted() {
        let provider = ScriptedProvider::new(vec![0, 0, 5]);
        let docs = search_with_retry(&provider, "Nothing", EmptyResultPolicy::Accept)
            .await
            .unwrap();

        assert!(docs.is_empty());
        assert_eq!(provider.queries().len(), 2);
    }

    #[tokio::test]
    async fn test_two_empties_fail_under_strict_policy() {
        let provider = ScriptedProvider::new(vec![0, 0]);
        let result = search_with_retry(&provider, "Nothing", EmptyResultPolicy::Fail).await;

        assert!(matches!(result, Err(AppError::Upstream(_))));
        assert_eq!(provider.queries().len(), 2);
    }
}
