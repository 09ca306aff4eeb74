//! Document types shared by loaders, search providers and the index.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Provenance metadata attached to a document.
pub type Metadata = Map<String, Value>;

/// A unit of retrievable text plus where it came from.
///
/// Every constructor sets a `source` metadata entry so a citation can always
/// be rebuilt from the document alone.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchDocument {
    #[serde(rename = "pageContent")]
    pub page_content: String,

    #[serde(default)]
    pub metadata: Metadata,
}

impl SearchDocument {
    /// Create a document with its `source` metadata entry.
    pub fn new(page_content: impl Into<String>, source: impl Into<String>) -> Self {
        let mut metadata = Map::new();
        metadata.insert("source".to_string(), Value::String(source.into()));
        Self {
            page_content: page_content.into(),
            metadata,
        }
    }

    /// Add a metadata entry.
    pub fn with_meta(mut self, key: &str, value: impl Into<Value>) -> Self {
        self.metadata.insert(key.to_string(), value.into());
        self
    }

    /// Citation source of the document.
    pub fn source(&self) -> Option<&str> {
        self.metadata.get("source").and_then(Value::as_str)
    }
}

/// A document returned by a similarity search, with its score.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoredDocument {
    #[serde(flatten)]
    pub document: SearchDocument,

    /// Cosine similarity to the query (higher is closer)
    pub score: f32,
}
