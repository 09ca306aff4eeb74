//! SAP Help Portal documentation search.

use super::SearchProvider;
use crate::document::SearchDocument;
use lexlink_core::{AppError, AppResult};
use serde::Deserialize;

const HELP_BASE_URL: &str = "https://help.sap.com";
const SEARCH_PAGE_URL: &str = "https://help.sap.com/docs/search";

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    data: Option<SearchData>,
}

#[derive(Debug, Deserialize)]
struct SearchData {
    #[serde(default)]
    results: Vec<SearchHit>,
}

#[derive(Debug, Deserialize)]
struct SearchHit {
    #[serde(default)]
    title: String,
    #[serde(default)]
    snippet: String,
    #[serde(default)]
    url: String,
}

/// Product documentation search provider.
pub struct SapHelpSearch {
    client: reqwest::Client,
    endpoint: String,
}

impl SapHelpSearch {
    /// `endpoint` is the search URL, e.g. `https://help.sap.com/http.svc/elasticsearch`.
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            endpoint: endpoint.into(),
        }
    }
}

fn query_params(query: &str) -> Vec<(&'static str, &str)> {
    vec![
        ("area", "content"),
        ("version", "6.18.latest"),
        ("language", "en-US"),
        ("state", "PRODUCTION"),
        ("q", query),
        ("transtype", "standard,html,pdf,others"),
        ("product", "SAP_ERP"),
        ("to", "19"),
        ("advancedSearch", "0"),
        ("excludeNotSearchable", "1"),
    ]
}

fn normalize(body: SearchResponse, query: &str) -> Vec<SearchDocument> {
    body.data
        .map(|data| data.results)
        .unwrap_or_default()
        .into_iter()
        .map(|hit| {
            SearchDocument::new(format!("{} - {}", hit.title, hit.snippet), SEARCH_PAGE_URL)
                .with_meta("term", hit.title)
                .with_meta("url", format!("{}{}", HELP_BASE_URL, hit.url))
                .with_meta("search", query)
        })
        .collect()
}

#[async_trait::async_trait]
impl SearchProvider for SapHelpSearch {
    fn name(&self) -> &str {
        "sap-help"
    }

    async fn search(&self, query: &str) -> AppResult<Vec<SearchDocument>> {
        let response = self
            .client
            .get(&self.endpoint)
            .query(&query_params(query))
            .send()
            .await
            .map_err(|e| AppError::Upstream(format!("SAP Help request failed: {}", e)))?;

        if !response.status().is_success() {
            return Err(AppError::Upstream(format!(
                "SAP Help returned {}",
                response.status()
            )));
        }

        let body: SearchResponse = response
            .json()
            .await
            .map_err(|e| AppError::Upstream(format!("Unexpected SAP Help response: {}", e)))?;

        let documents = normalize(body, query);
        tracing::debug!(query, documents = documents.len(), "SAP Help search");
        Ok(documents)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_query_params() {
        let params = query_params("asset class");
        assert!(params.contains(&("q", "asset class")));
        assert!(params.contains(&("product", "SAP_ERP")));
        assert!(params.contains(&("to", "19")));
    }

    #[test]
    fn test_normalize_results() {
        let body: SearchResponse = serde_json::from_value(json!({
            "status": "OK",
            "data": {
                "results": [
                    {
                        "title": "Asset Classes",
                        "snippet": "The asset class is the main criterion for classifying assets.",
                        "url": "/docs/SAP_ERP/abc/def.html",
                        "product": "SAP_ERP"
                    }
                ]
            }
        }))
        .unwrap();

        let docs = normalize(body, "asset class");

        assert_eq!(docs.len(), 1);
        assert_eq!(
            docs[0].page_content,
            "Asset Classes - The asset class is the main criterion for classifying assets."
        );
        assert_eq!(docs[0].source(), Some("https://help.sap.com/docs/search"));
        assert_eq!(docs[0].metadata["term"], "Asset Classes");
        assert_eq!(docs[0].metadata["url"], "https://help.sap.com/docs/SAP_ERP/abc/def.html");
        assert_eq!(docs[0].metadata["search"], "asset class");
    }

    #[test]
    fn test_missing_data_yields_nothing() {
        let body: SearchResponse = serde_json::from_value(json!({ "status": "OK" })).unwrap();
        assert!(normalize(body, "x").is_empty());
    }
}
