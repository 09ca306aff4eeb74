//! Prompt system for lexlink.
//!
//! This crate provides structured prompt management with:
//! - YAML-based prompt definitions, built in and overridable from a directory
//! - Optional sections toggled per request (few-shot example blocks)
//! - Handlebars template rendering

pub mod builder;
pub mod loader;
pub mod types;

// Re-export main types
pub use builder::build_prompt;
pub use loader::{list_prompts, load_prompt, EL_EXTRACT, RAG_ANSWER, RAG_COMPRESS};
pub use types::{BuiltPrompt, BuiltPromptMetadata, PromptDefinition, PromptInputSpec, PromptOutputSpec};
