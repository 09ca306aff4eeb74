//! Answering pipeline types.

use crate::document::SearchDocument;
use crate::loader;
use lexlink_core::{AppError, AppResult};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// How many worked examples precede the question.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Scenario {
    /// No examples
    #[default]
    ZeroShot,
    /// First example only
    OneShot,
    /// First example plus the further examples
    FewShot,
}

impl Scenario {
    /// Map the wire selector to a scenario; out-of-range values clamp to
    /// the nearest valid one.
    pub fn from_selector(selector: i64) -> Self {
        match selector {
            i64::MIN..=0 => Self::ZeroShot,
            1 => Self::OneShot,
            _ => Self::FewShot,
        }
    }

    pub fn selector(&self) -> u8 {
        match self {
            Self::ZeroShot => 0,
            Self::OneShot => 1,
            Self::FewShot => 2,
        }
    }

    /// Prompt sections rendered for this scenario.
    pub fn example_sections(&self) -> &'static [&'static str] {
        match self {
            Self::ZeroShot => &[],
            Self::OneShot => &["firstExample"],
            Self::FewShot => &["firstExample", "otherExamples"],
        }
    }
}

/// Where the documents to answer from come from.
#[derive(Debug, Clone)]
pub enum SourceMaterial {
    /// An uploaded PDF
    Upload { file_name: String, bytes: Vec<u8> },
    /// The configured fixed corpus PDF
    Corpus(PathBuf),
}

impl SourceMaterial {
    /// Answers from the fixed corpus must not draw on model knowledge.
    pub fn is_corpus(&self) -> bool {
        matches!(self, Self::Corpus(_))
    }

    /// Parse into page documents on the blocking pool.
    pub async fn load(self) -> AppResult<Vec<SearchDocument>> {
        tokio::task::spawn_blocking(move || match self {
            Self::Upload { file_name, bytes } => loader::load_pdf_bytes(&bytes, &file_name),
            Self::Corpus(path) => loader::load_pdf_file(&path),
        })
        .await
        .map_err(|e| AppError::Other(format!("PDF loading task failed: {}", e)))?
    }
}

/// Answer plus the documents it was generated from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnswerResult {
    pub text: String,

    #[serde(rename = "sourceDocuments")]
    pub source_documents: Vec<SearchDocument>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scenario_clamping() {
        assert_eq!(Scenario::from_selector(-3), Scenario::ZeroShot);
        assert_eq!(Scenario::from_selector(0), Scenario::ZeroShot);
        assert_eq!(Scenario::from_selector(1), Scenario::OneShot);
        assert_eq!(Scenario::from_selector(2), Scenario::FewShot);
        assert_eq!(Scenario::from_selector(7), Scenario::FewShot);
    }

    #[test]
    fn test_example_sections() {
        assert!(Scenario::ZeroShot.example_sections().is_empty());
        assert_eq!(Scenario::OneShot.example_sections(), &["firstExample"]);
        assert_eq!(Scenario::FewShot.example_sections().len(), 2);
        assert_eq!(Scenario::FewShot.selector(), 2);
    }

    #[test]
    fn test_answer_result_shape() {
        let result = AnswerResult {
            text: "FI-AA capitalizes costs.".to_string(),
            source_documents: vec![SearchDocument::new("page", "blob")],
        };

        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json["text"], "FI-AA capitalizes costs.");
        assert_eq!(json["sourceDocuments"][0]["pageContent"], "page");
    }

    #[tokio::test]
    async fn test_upload_with_invalid_pdf_fails() {
        let source = SourceMaterial::Upload {
            file_name: "upload.pdf".to_string(),
            bytes: b"not a pdf".to_vec(),
        };
        assert!(!source.is_corpus());
        assert!(source.load().await.is_err());
    }

    #[tokio::test]
    async fn test_missing_corpus_fails() {
        let source = SourceMaterial::Corpus(PathBuf::from("/nonexistent/sap_docs.pdf"));
        assert!(source.is_corpus());
        assert!(source.load().await.is_err());
    }
}
