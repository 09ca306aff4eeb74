//! SAP glossary records and the glossary corpus used for entity linking.

use crate::document::SearchDocument;
use lexlink_core::AppResult;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::path::Path;

const GLOSSARY_TERM_URL: &str = "https://help.sap.com/glossary/?locale=en-US&term=";

/// One record from the SAP glossary service.
///
/// The four fields used for linking are typed; everything else the service
/// returns is kept in `extra` and written back unchanged.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GlossaryEntry {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sterm: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub scomponent: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub scompdesc: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub sglossary: Option<String>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl GlossaryEntry {
    pub fn term(&self) -> &str {
        self.sterm.as_deref().unwrap_or_default()
    }

    /// Glossary page URL for the term.
    pub fn url(&self) -> String {
        let encoded: String = url::form_urlencoded::byte_serialize(self.term().as_bytes()).collect();
        format!("{}{}", GLOSSARY_TERM_URL, encoded.replace('+', "%20"))
    }

    /// Convert to a searchable document. `line` is the record's position in
    /// the glossary file.
    pub fn to_document(&self, source: &str, line: usize) -> SearchDocument {
        let content = format!(
            "{} ({})\n{}\n{}",
            self.scompdesc.as_deref().unwrap_or_default(),
            self.scomponent.as_deref().unwrap_or_default(),
            self.term(),
            self.sglossary.as_deref().unwrap_or_default()
        );

        SearchDocument::new(content, source)
            .with_meta("term", self.term())
            .with_meta("url", self.url())
            .with_meta("line", line)
    }
}

/// Load the harvested glossary as documents.
///
/// A missing file yields an empty corpus; a malformed file is an error.
pub fn load_glossary(path: &Path) -> AppResult<Vec<SearchDocument>> {
    if !path.exists() {
        tracing::warn!("Glossary file {:?} not found; linking without glossary corpus", path);
        return Ok(Vec::new());
    }

    let contents = std::fs::read_to_string(path)?;
    let entries: Vec<GlossaryEntry> = serde_json::from_str(&contents)?;
    let source = path.display().to_string();

    tracing::debug!("Loaded {} glossary entries from {:?}", entries.len(), path);

    Ok(entries
        .iter()
        .enumerate()
        .map(|(line, entry)| entry.to_document(&source, line))
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tempfile::TempDir;

    fn entry() -> GlossaryEntry {
        serde_json::from_value(json!({
            "sterm": "asset class",
            "scomponent": "FI-AA",
            "scompdesc": "Asset Accounting",
            "sglossary": "The main criterion for classifying fixed assets.",
            "slanguage": "en-US",
            "id": 4711
        }))
        .unwrap()
    }

    #[test]
    fn test_unknown_fields_preserved() {
        let entry = entry();
        assert_eq!(entry.extra["slanguage"], "en-US");

        let value = serde_json::to_value(&entry).unwrap();
        assert_eq!(value["id"], 4711);
        assert_eq!(value["sterm"], "asset class");
    }

    #[test]
    fn test_missing_fields_not_serialized() {
        let entry: GlossaryEntry = serde_json::from_value(json!({ "sterm": "BOM" })).unwrap();
        let value = serde_json::to_value(&entry).unwrap();
        assert!(value.get("sglossary").is_none());
    }

    #[test]
    fn test_to_document() {
        let doc = entry().to_document("docs/sap_glossary.json", 7);

        assert_eq!(
            doc.page_content,
            "Asset Accounting (FI-AA)\nasset class\nThe main criterion for classifying fixed assets."
        );
        assert_eq!(doc.source(), Some("docs/sap_glossary.json"));
        assert_eq!(doc.metadata["term"], "asset class");
        assert_eq!(
            doc.metadata["url"],
            "https://help.sap.com/glossary/?locale=en-US&term=asset%20class"
        );
        assert_eq!(doc.metadata["line"], 7);
    }

    #[test]
    fn test_url_encodes_reserved_characters() {
        let entry = GlossaryEntry {
            sterm: Some("G/L account & more".to_string()),
            ..Default::default()
        };
        assert_eq!(
            entry.url(),
            "https://help.sap.com/glossary/?locale=en-US&term=G%2FL%20account%20%26%20more"
        );
    }

    #[test]
    fn test_load_missing_glossary_is_empty() {
        let temp = TempDir::new().unwrap();
        let docs = load_glossary(&temp.path().join("absent.json")).unwrap();
        assert!(docs.is_empty());
    }

    #[test]
    fn test_load_glossary_file() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("glossary.json");
        std::fs::write(&path, json!([entry(), { "sterm": "BOM" }]).to_string()).unwrap();

        let docs = load_glossary(&path).unwrap();
        assert_eq!(docs.len(), 2);
        assert_eq!(docs[1].metadata["term"], "BOM");
        assert_eq!(docs[1].metadata["line"], 1);
    }

    #[test]
    fn test_load_malformed_glossary() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("glossary.json");
        std::fs::write(&path, "{ not json").unwrap();

        assert!(load_glossary(&path).is_err());
    }
}
