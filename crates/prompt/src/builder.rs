//! Prompt builder for rendering templates with optional sections.

use crate::types::{BuiltPrompt, PromptDefinition};
use handlebars::Handlebars;
use lexlink_core::{AppError, AppResult};
use std::collections::HashMap;

/// Build a prompt from a definition and input variables.
///
/// This function:
/// 1. Checks that every required input variable is present
/// 2. Resolves each declared section to its text (enabled) or `""` (disabled)
/// 3. Renders the template using Handlebars without HTML escaping
///
/// # Arguments
/// * `definition` - Prompt definition loaded from YAML
/// * `variables` - Template variables (e.g., "question" -> user input)
/// * `enabled_sections` - Names of the sections to render
///
/// # Example
/// ```no_run
/// use lexlink_prompt::{build_prompt, load_prompt};
/// use std::collections::HashMap;
///
/// # fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let def = load_prompt(None, "rag.answer")?;
/// let mut vars = HashMap::new();
/// vars.insert("context".to_string(), "FI-AA is Asset Accounting.".to_string());
/// vars.insert("question".to_string(), "What is FI-AA?".to_string());
///
/// let built = build_prompt(&def, vars, &["firstExample"])?;
/// println!("{}", built.text);
/// # Ok(())
/// # }
/// ```
pub fn build_prompt(
    definition: &PromptDefinition,
    mut variables: HashMap<String, String>,
    enabled_sections: &[&str],
) -> AppResult<BuiltPrompt> {
    tracing::debug!("Building prompt: {}", definition.id);

    for required in &definition.input.required {
        if !variables.contains_key(required) {
            return Err(AppError::Prompt(format!(
                "Prompt '{}' requires variable '{}'",
                definition.id, required
            )));
        }
    }

    if let Some(unknown) = enabled_sections
        .iter()
        .find(|name| !definition.sections.contains_key(**name))
    {
        return Err(AppError::Prompt(format!(
            "Prompt '{}' has no section '{}'",
            definition.id, unknown
        )));
    }

    let mut sections_included = Vec::new();
    for (name, text) in &definition.sections {
        if enabled_sections.contains(&name.as_str()) {
            variables.insert(name.clone(), text.clone());
            sections_included.push(name.clone());
        } else {
            variables.insert(name.clone(), String::new());
        }
    }

    let text = render_template(&definition.template, &variables)?;

    Ok(BuiltPrompt::new(
        text,
        definition.id.clone(),
        sections_included,
        variables,
    ))
}

/// Render a Handlebars template with variables.
fn render_template(template: &str, variables: &HashMap<String, String>) -> AppResult<String> {
    let mut handlebars = Handlebars::new();

    // Plain text prompts; documents may contain markup
    handlebars.register_escape_fn(handlebars::no_escape);

    handlebars
        .register_template_string("prompt", template)
        .map_err(|e| AppError::Prompt(format!("Failed to register template: {}", e)))?;

    let rendered = handlebars
        .render("prompt", &variables)
        .map_err(|e| AppError::Prompt(format!("Failed to render template: {}", e)))?;

    Ok(rendered)
}
