//! LLM provider factory.
//!
//! Builds an LLM client from the configured provider name, resolving the
//! endpoint and API key requirements of each provider.

use crate::client::LlmClient;
use crate::providers::OpenAiClient;
use crate::types::ProviderType;
use std::sync::Arc;

/// Create an LLM client based on the provider name.
///
/// # Arguments
/// * `provider` - Provider identifier ("openai", "openai-compatible")
/// * `endpoint` - Optional custom base URL
/// * `api_key` - Optional API key
///
/// # Errors
/// Returns error if the provider is unknown or its required settings are
/// missing.
pub fn create_client(
    provider: &str,
    endpoint: Option<&str>,
    api_key: Option<&str>,
) -> Result<Arc<dyn LlmClient>, String> {
    match ProviderType::parse(provider) {
        Some(ProviderType::OpenAI) => {
            let api_key = api_key.ok_or_else(|| "OpenAI provider requires API key".to_string())?;
            let client = match endpoint {
                Some(url) => OpenAiClient::with_base_url(url, Some(api_key.to_string())),
                None => OpenAiClient::new(api_key),
            };
            Ok(Arc::new(client))
        }
        Some(ProviderType::OpenAiCompatible) => {
            let url = endpoint
                .ok_or_else(|| "openai-compatible provider requires an endpoint".to_string())?;
            Ok(Arc::new(OpenAiClient::with_base_url(
                url,
                api_key.map(str::to_string),
            )))
        }
        None => Err(format!("Unknown provider: {}", provider)),
    }
}
