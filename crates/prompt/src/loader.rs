//! Prompt loader for built-in and user-supplied YAML prompt definitions.

use crate::types::PromptDefinition;
use lexlink_core::{AppError, AppResult};
use std::path::Path;

/// Prompt used to answer a question from retrieved documents.
pub const RAG_ANSWER: &str = "rag.answer";

/// Prompt used to extract question-relevant passages from a document.
pub const RAG_COMPRESS: &str = "rag.compress";

/// Prompt used to extract and disambiguate named entities.
pub const EL_EXTRACT: &str = "el.extract";

const BUILTIN_PROMPTS: [(&str, &str); 3] = [
    (RAG_ANSWER, include_str!("../prompts/rag.answer.yml")),
    (RAG_COMPRESS, include_str!("../prompts/rag.compress.yml")),
    (EL_EXTRACT, include_str!("../prompts/el.extract.yml")),
];

/// Load a prompt definition by ID.
///
/// When `overrides_dir` contains a file named `<id>.yml` it takes precedence
/// over the built-in definition of the same ID.
///
/// # Arguments
/// * `overrides_dir` - Optional directory with user prompt files
/// * `prompt_id` - Prompt identifier (e.g., "rag.answer")
///
/// # Returns
/// A parsed `PromptDefinition` or an error if not found/invalid.
pub fn load_prompt(overrides_dir: Option<&Path>, prompt_id: &str) -> AppResult<PromptDefinition> {
    if let Some(dir) = overrides_dir {
        let prompt_file = dir.join(format!("{}.yml", prompt_id));
        if prompt_file.exists() {
            tracing::debug!("Loading prompt from: {:?}", prompt_file);

            let contents = std::fs::read_to_string(&prompt_file).map_err(|e| {
                AppError::Prompt(format!(
                    "Failed to read prompt file {:?}: {}",
                    prompt_file, e
                ))
            })?;

            let definition = parse_prompt(&contents, &prompt_file.display().to_string())?;
            tracing::info!("Loaded prompt override: {} ({})", definition.id, definition.title);
            return Ok(definition);
        }
    }

    let (_, contents) = BUILTIN_PROMPTS
        .iter()
        .find(|(id, _)| *id == prompt_id)
        .ok_or_else(|| AppError::Prompt(format!("Unknown prompt: {}", prompt_id)))?;

    parse_prompt(contents, prompt_id)
}

/// List all available prompt IDs, built-in and overrides, sorted.
pub fn list_prompts(overrides_dir: Option<&Path>) -> AppResult<Vec<String>> {
    let mut prompt_ids: Vec<String> = BUILTIN_PROMPTS
        .iter()
        .map(|(id, _)| id.to_string())
        .collect();

    if let Some(dir) = overrides_dir.filter(|dir| dir.exists()) {
        for entry in walkdir::WalkDir::new(dir)
            .max_depth(1)
            .into_iter()
            .filter_map(|e| e.ok())
        {
            let path = entry.path();
            if path.is_file() && path.extension().and_then(|s| s.to_str()) == Some("yml") {
                if let Some(stem) = path.file_stem().and_then(|s| s.to_str()) {
                    prompt_ids.push(stem.to_string());
                }
            }
        }
    }

    prompt_ids.sort();
    prompt_ids.dedup();
    Ok(prompt_ids)
}

fn parse_prompt(contents: &str, origin: &str) -> AppResult<PromptDefinition> {
    let definition: PromptDefinition = serde_yaml::from_str(contents)
        .map_err(|e| AppError::Prompt(format!("Failed to parse prompt YAML {}: {}", origin, e)))?;

    validate_prompt(&definition)?;
    Ok(definition)
}

/// Validate a prompt definition.
fn validate_prompt(def: &PromptDefinition) -> AppResult<()> {
    if def.id.is_empty() {
        return Err(AppError::Prompt("Prompt ID cannot be empty".to_string()));
    }

    if def.title.is_empty() {
        return Err(AppError::Prompt("Prompt title cannot be empty".to_string()));
    }

    if def.template.is_empty() {
        return Err(AppError::Prompt(
            "Prompt template cannot be empty".to_string(),
        ));
    }

    if !def.api_version.contains('.') {
        return Err(AppError::Prompt(format!(
            "Invalid apiVersion format: {}. Expected format: 'x.y'",
            def.api_version
        )));
    }

    Ok(())
}
