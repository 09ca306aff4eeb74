//! Parsing of the model's entity extraction output.

use lexlink_core::AppError;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;

/// Structured result of the extraction prompt.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExtractionResult {
    /// Entities in the order the model listed them
    pub named_entities: Vec<String>,

    /// Entity -> ranked candidate list
    pub candidate_entities: Map<String, Value>,

    /// Entity -> description of the selected match
    pub disambiguation: Map<String, Value>,
}

/// Why a model reply could not be used.
#[derive(Debug, Error, PartialEq)]
pub enum ExtractionError {
    #[error("model output is not JSON: {0}")]
    NotJson(String),

    #[error("model output has the wrong shape: {0}")]
    WrongShape(String),
}

impl From<ExtractionError> for AppError {
    fn from(err: ExtractionError) -> Self {
        AppError::Parse(err.to_string())
    }
}

impl ExtractionResult {
    /// Parse a raw model reply, tolerating a surrounding markdown fence.
    pub fn parse(raw: &str) -> Result<Self, ExtractionError> {
        let body = strip_code_fences(raw);

        let value: Value =
            serde_json::from_str(body).map_err(|e| ExtractionError::NotJson(e.to_string()))?;

        serde_json::from_value(value).map_err(|e| ExtractionError::WrongShape(e.to_string()))
    }

    /// Disambiguation hint for `entity`, matching keys after trimming.
    pub fn disambiguation_for(&self, entity: &str) -> Option<String> {
        let value = self.disambiguation.get(entity).or_else(|| {
            self.disambiguation
                .iter()
                .find(|(key, _)| key.trim() == entity)
                .map(|(_, value)| value)
        })?;

        match value {
            Value::Null => None,
            Value::String(s) if s.trim().is_empty() => None,
            Value::String(s) => Some(s.clone()),
            other => Some(other.to_string()),
        }
    }

    /// Lookup query for `entity`: `"{entity} - {disambiguation}"`, or the
    /// entity alone when there is no hint.
    pub fn linking_query(&self, entity: &str) -> String {
        match self.disambiguation_for(entity) {
            Some(hint) => format!("{} - {}", entity, hint),
            None => entity.to_string(),
        }
    }
}

/// Return the content of the first fenced block, or the trimmed input when
/// there is no fence.
pub fn strip_code_fences(raw: &str) -> &str {
    let trimmed = raw.trim();
    let Some(open) = trimmed.find("```") else {
        return trimmed;
    };

    let after_open = &trimmed[open + 3..];
    let lang_len = after_open
        .find(|c: char| !c.is_ascii_alphanumeric())
        .unwrap_or(after_open.len());
    let body = &after_open[lang_len..];

    match body.rfind("```") {
        Some(close) => body[..close].trim(),
        None => body.trim(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const FENCED: &str = "Here you go:\n```json\n{\n  \"named_entities\": [\"Elon Musk\", \"SpaceX\"],\n  \"candidate_entities\": {\"Elon Musk\": [\"Elon Musk\"], \"SpaceX\": [\"SpaceX\", \"SpaceX Starship\"]},\n  \"disambiguation\": {\"Elon Musk\": \"entrepreneur\", \"SpaceX\": \"American spacecraft manufacturer\"}\n}\n```\n";

    #[test]
    fn test_strip_code_fences() {
        assert_eq!(strip_code_fences("```json\n{}\n```"), "{}");
        assert_eq!(strip_code_fences("```\n[1]\n```"), "[1]");
        assert_eq!(strip_code_fences("  {\"a\": 1}  "), "{\"a\": 1}");
        assert_eq!(strip_code_fences("```json\n{\"a\": 1}"), "{\"a\": 1}");
    }

    #[test]
    fn test_parse_fenced_reply() {
        let result = ExtractionResult::parse(FENCED).unwrap();

        assert_eq!(result.named_entities, vec!["Elon Musk", "SpaceX"]);
        assert_eq!(result.candidate_entities["SpaceX"][1], "SpaceX Starship");
        assert_eq!(
            result.linking_query("SpaceX"),
            "SpaceX - American spacecraft manufacturer"
        );
    }

    #[test]
    fn test_not_json() {
        let err = ExtractionResult::parse("I could not find any entities.").unwrap_err();
        assert!(matches!(err, ExtractionError::NotJson(_)));
    }

    #[test]
    fn test_wrong_shape() {
        let err = ExtractionResult::parse("```json\n{\"entities\": [\"SpaceX\"]}\n```").unwrap_err();
        assert!(matches!(err, ExtractionError::WrongShape(_)));

        let err = ExtractionResult::parse(
            "{\"named_entities\": \"SpaceX\", \"candidate_entities\": {}, \"disambiguation\": {}}",
        )
        .unwrap_err();
        assert!(matches!(err, ExtractionError::WrongShape(_)));
    }

    #[test]
    fn test_converts_to_parse_error() {
        let err: AppError = ExtractionError::NotJson("eof".to_string()).into();
        assert!(matches!(err, AppError::Parse(_)));
    }

    #[test]
    fn test_missing_disambiguation_queries_entity_alone() {
        let result = ExtractionResult::parse(
            "{\"named_entities\": [\"SAP\"], \"candidate_entities\": {}, \"disambiguation\": {\"Other\": \"x\"}}",
        )
        .unwrap();
        assert_eq!(result.linking_query("SAP"), "SAP");
    }

    #[test]
    fn test_disambiguation_key_with_whitespace() {
        let result = ExtractionResult::parse(
            "{\"named_entities\": [\" SAP \"], \"candidate_entities\": {}, \"disambiguation\": {\" SAP \": \"software company\"}}",
        )
        .unwrap();
        assert_eq!(result.linking_query("SAP"), "SAP - software company");
    }
}
