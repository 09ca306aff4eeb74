//! Prompt types for lexlink.
//!
//! This module defines the domain entities for the prompt system.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};

/// A prompt definition loaded from YAML.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PromptDefinition {
    /// Unique prompt identifier
    pub id: String,

    /// Human-readable title
    pub title: String,

    /// API version for schema evolution
    #[serde(rename = "apiVersion")]
    pub api_version: String,

    /// Creator identifier
    #[serde(rename = "createdBy", default)]
    pub created_by: String,

    /// Input specification
    #[serde(default)]
    pub input: PromptInputSpec,

    /// Optional blocks, switched on per request. A disabled section renders
    /// as an empty string.
    #[serde(default)]
    pub sections: BTreeMap<String, String>,

    /// Template string with Handlebars syntax
    pub template: String,

    /// Output specification
    pub output: PromptOutputSpec,
}

/// Input specification for the prompt.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PromptInputSpec {
    /// Variables that must be supplied when building the prompt
    #[serde(default)]
    pub required: Vec<String>,
}

/// Output specification for the prompt.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PromptOutputSpec {
    /// Output format (e.g., "text", "json")
    pub format: String,
}

/// A fully rendered prompt ready for LLM execution.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BuiltPrompt {
    /// Rendered prompt text
    pub text: String,

    /// Metadata about the built prompt
    pub metadata: BuiltPromptMetadata,
}

/// Metadata about a built prompt.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BuiltPromptMetadata {
    /// Source prompt ID
    #[serde(rename = "sourcePromptId")]
    pub source_prompt_id: String,

    /// Sections that were rendered into the prompt
    #[serde(rename = "sectionsIncluded")]
    pub sections_included: Vec<String>,

    /// Template variables that were resolved
    #[serde(rename = "resolvedVariables")]
    pub resolved_variables: HashMap<String, String>,
}

impl BuiltPrompt {
    /// Create a new built prompt.
    pub fn new(
        text: String,
        source_prompt_id: String,
        sections_included: Vec<String>,
        resolved_variables: HashMap<String, String>,
    ) -> Self {
        Self {
            text,
            metadata: BuiltPromptMetadata {
                source_prompt_id,
                sections_included,
                resolved_variables,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prompt_definition_deserialization() {
        let yaml = r#"
id: test.prompt
title: Test Prompt
apiVersion: "1.0"
createdBy: test
input:
  required: [question]
sections:
  hint: "Think twice."
template: "{{hint}}{{question}}"
output:
  format: text
"#;

        let def: PromptDefinition = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(def.id, "test.prompt");
        assert_eq!(def.input.required, vec!["question".to_string()]);
        assert_eq!(def.sections.get("hint").map(String::as_str), Some("Think twice."));
    }

    #[test]
    fn test_sections_and_input_are_optional() {
        let yaml = r#"
id: bare
title: Bare
apiVersion: "1.0"
template: "hi"
output:
  format: text
"#;

        let def: PromptDefinition = serde_yaml::from_str(yaml).unwrap();
        assert!(def.sections.is_empty());
        assert!(def.input.required.is_empty());
        assert!(def.created_by.is_empty());
    }

    #[test]
    fn test_built_prompt_metadata_serialization() {
        let built = BuiltPrompt::new(
            "rendered".to_string(),
            "test.prompt".to_string(),
            vec!["hint".to_string()],
            HashMap::new(),
        );

        let json = serde_json::to_value(&built).unwrap();
        assert_eq!(json["text"], "rendered");
        assert_eq!(json["metadata"]["sourcePromptId"], "test.prompt");
        assert_eq!(json["metadata"]["sectionsIncluded"][0], "hint");
    }
}
