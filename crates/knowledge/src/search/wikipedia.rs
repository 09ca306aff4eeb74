//! Wikipedia prefix search via the MediaWiki action API.

use super::SearchProvider;
use crate::document::SearchDocument;
use lexlink_core::{AppError, AppResult};
use serde::Deserialize;
use std::collections::HashMap;

const ARTICLE_BASE_URL: &str = "https://en.wikipedia.org/wiki/";

#[derive(Debug, Deserialize)]
struct QueryResponse {
    #[serde(default)]
    query: Option<QueryPages>,
}

#[derive(Debug, Deserialize)]
struct QueryPages {
    #[serde(default)]
    pages: Option<HashMap<String, Page>>,
}

#[derive(Debug, Deserialize)]
struct Page {
    #[serde(default)]
    pageid: Option<u64>,
    title: String,
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    extract: Option<String>,
}

/// Encyclopedia search provider.
pub struct WikipediaSearch {
    client: reqwest::Client,
    endpoint: String,
}

impl WikipediaSearch {
    /// `endpoint` is the `api.php` URL, e.g. `https://en.wikipedia.org/w/api.php`.
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            endpoint: endpoint.into(),
        }
    }
}

fn query_params(query: &str) -> Vec<(&'static str, &str)> {
    vec![
        ("action", "query"),
        ("format", "json"),
        ("generator", "prefixsearch"),
        ("redirects", ""),
        ("prop", "pageprops|pageimages|description|extracts"),
        ("ppprop", "displaytitle"),
        ("piprop", "thumbnail"),
        ("pithumbsize", "60"),
        ("pilimit", "6"),
        ("gpssearch", query),
        ("gpsnamespace", "0"),
        ("gpslimit", "6"),
        ("exintro", "1"),
    ]
}

/// Convert a MediaWiki response into documents, ordered by page id.
fn normalize(body: QueryResponse, query: &str) -> Vec<SearchDocument> {
    let Some(pages) = body.query.and_then(|q| q.pages) else {
        return Vec::new();
    };

    let mut pages: Vec<(String, Page)> = pages.into_iter().collect();
    pages.sort_by_key(|(key, _)| (key.parse::<i64>().unwrap_or(i64::MAX), key.clone()));

    pages
        .into_iter()
        .map(|(_, page)| {
            let summary = page
                .description
                .as_deref()
                .or(page.extract.as_deref())
                .unwrap_or_default();
            let content = format!("{} - {}", page.title, summary);

            SearchDocument::new(content, format!("{}{}", ARTICLE_BASE_URL, page.title))
                .with_meta("pageId", page.pageid)
                .with_meta("search", query)
        })
        .collect()
}

#[async_trait::async_trait]
impl SearchProvider for WikipediaSearch {
    fn name(&self) -> &str {
        "wikipedia"
    }

    async fn search(&self, query: &str) -> AppResult<Vec<SearchDocument>> {
        let response = self
            .client
            .get(&self.endpoint)
            .query(&query_params(query))
            .send()
            .await
            .map_err(|e| AppError::Upstream(format!("Wikipedia request failed: {}", e)))?;

        if !response.status().is_success() {
            return Err(AppError::Upstream(format!(
                "Wikipedia returned {}",
                response.status()
            )));
        }

        let body: QueryResponse = response
            .json()
            .await
            .map_err(|e| AppError::Upstream(format!("Unexpected Wikipedia response: {}", e)))?;

        let documents = normalize(body, query);
        tracing::debug!(query, documents = documents.len(), "Wikipedia search");
        Ok(documents)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn parse(value: serde_json::Value) -> QueryResponse {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_query_params() {
        let params = query_params("SpaceX");
        assert!(params.contains(&("gpssearch", "SpaceX")));
        assert!(params.contains(&("generator", "prefixsearch")));
        assert!(params.contains(&("redirects", "")));
        assert!(params.contains(&("exintro", "1")));
    }

    #[test]
    fn test_normalize_pages() {
        let body = parse(json!({
            "batchcomplete": "",
            "query": {
                "pages": {
                    "832774": {
                        "pageid": 832774,
                        "ns": 0,
                        "title": "SpaceX",
                        "index": 1,
                        "description": "American spacecraft manufacturer",
                        "extract": "<p>Space Exploration Technologies Corp.</p>"
                    },
                    "9988187": {
                        "pageid": 9988187,
                        "ns": 0,
                        "title": "SpaceX Starship",
                        "index": 2,
                        "extract": "<p>Starship is a super heavy-lift launch vehicle.</p>"
                    }
                }
            }
        }));

        let docs = normalize(body, "SpaceX");

        assert_eq!(docs.len(), 2);
        assert_eq!(docs[0].page_content, "SpaceX - American spacecraft manufacturer");
        assert_eq!(docs[0].source(), Some("https://en.wikipedia.org/wiki/SpaceX"));
        assert_eq!(docs[0].metadata["pageId"], 832774);
        assert_eq!(docs[0].metadata["search"], "SpaceX");
        assert_eq!(
            docs[1].page_content,
            "SpaceX Starship - <p>Starship is a super heavy-lift launch vehicle.</p>"
        );
    }

    #[test]
    fn test_pages_ordered_numerically() {
        let body = parse(json!({
            "query": { "pages": {
                "10": { "pageid": 10, "title": "Ten" },
                "9": { "pageid": 9, "title": "Nine" }
            } }
        }));

        let docs = normalize(body, "n");
        assert_eq!(docs[0].page_content, "Nine - ");
        assert_eq!(docs[1].page_content, "Ten - ");
    }

    #[test]
    fn test_missing_pages_yield_nothing() {
        assert!(normalize(parse(json!({ "batchcomplete": "" })), "zzz").is_empty());
        assert!(normalize(parse(json!({ "query": {} })), "zzz").is_empty());
    }
}
