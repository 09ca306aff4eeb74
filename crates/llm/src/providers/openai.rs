//! OpenAI-compatible chat completion provider.
//!
//! Works against api.openai.com and any server exposing the same
//! `/chat/completions` contract (vLLM, llama.cpp server, LocalAI, ...).

use crate::client::{LlmClient, LlmRequest, LlmResponse, LlmUsage};
use lexlink_core::{AppError, AppResult};
use serde::{Deserialize, Serialize};

/// Default base URL for the OpenAI API.
pub const DEFAULT_OPENAI_URL: &str = "https://api.openai.com/v1";

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_tokens: Option<u32>,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    model: String,
    choices: Vec<ChatChoice>,
    #[serde(default)]
    usage: Option<ChatUsage>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChatChoiceMessage {
    #[serde(default)]
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ChatUsage {
    #[serde(default)]
    prompt_tokens: u32,
    #[serde(default)]
    completion_tokens: u32,
}

/// Chat client for OpenAI-compatible APIs.
pub struct OpenAiClient {
    base_url: String,
    api_key: Option<String>,
    client: reqwest::Client,
}

impl OpenAiClient {
    /// Create a client for api.openai.com.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self::with_base_url(DEFAULT_OPENAI_URL, Some(api_key.into()))
    }

    /// Create a client for a custom base URL (trailing slash is ignored).
    pub fn with_base_url(base_url: impl Into<String>, api_key: Option<String>) -> Self {
        let base_url: String = base_url.into();
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key,
            client: reqwest::Client::new(),
        }
    }

    fn to_chat_request<'a>(&self, request: &'a LlmRequest) -> ChatRequest<'a> {
        let mut messages = Vec::with_capacity(2);
        if let Some(system) = request.system.as_deref() {
            messages.push(ChatMessage {
                role: "system",
                content: system,
            });
        }
        messages.push(ChatMessage {
            role: "user",
            content: &request.prompt,
        });

        ChatRequest {
            model: &request.model,
            messages,
            temperature: request.temperature,
            max_tokens: request.max_tokens,
        }
    }

    fn convert_response(&self, request: &LlmRequest, response: ChatResponse) -> AppResult<LlmResponse> {
        let content = response
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .ok_or_else(|| AppError::Llm("OpenAI response contained no choices".to_string()))?;

        let usage = response
            .usage
            .map(|u| LlmUsage::new(u.prompt_tokens, u.completion_tokens))
            .unwrap_or_default();

        let model = if response.model.is_empty() {
            request.model.clone()
        } else {
            response.model
        };

        Ok(LlmResponse {
            content,
            model,
            usage,
        })
    }
}

#[async_trait::async_trait]
impl LlmClient for OpenAiClient {
    fn provider_name(&self) -> &str {
        "openai"
    }

    async fn complete(&self, request: &LlmRequest) -> AppResult<LlmResponse> {
        tracing::info!(model = %request.model, "Sending chat completion request");
        tracing::debug!("Request: {:?}", request);

        let url = format!("{}/chat/completions", self.base_url);
        let mut builder = self.client.post(&url).json(&self.to_chat_request(request));
        if let Some(key) = self.api_key.as_deref() {
            builder = builder.bearer_auth(key);
        }

        let response = builder
            .send()
            .await
            .map_err(|e| AppError::Llm(format!("Failed to send request to {}: {}", url, e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(AppError::Llm(format!(
                "Chat completion API error ({}): {}",
                status, error_text
            )));
        }

        let chat_response: ChatResponse = response
            .json()
            .await
            .map_err(|e| AppError::Llm(format!("Failed to parse chat completion: {}", e)))?;

        let converted = self.convert_response(request, chat_response)?;

        tracing::info!(
            prompt_tokens = converted.usage.prompt_tokens,
            completion_tokens = converted.usage.completion_tokens,
            "Received chat completion"
        );

        Ok(converted)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base_url_trailing_slash() {
        let client = OpenAiClient::with_base_url("http://localhost:8000/v1/", None);
        assert_eq!(client.base_url, "http://localhost:8000/v1");
    }

    #[test]
    fn test_chat_request_conversion() {
        let client = OpenAiClient::new("sk-test");
        let request = LlmRequest::new("What is FI-AA?", "gpt-3.5-turbo")
            .deterministic()
            .with_system("Answer from context only.");

        let chat = client.to_chat_request(&request);
        let json = serde_json::to_value(&chat).unwrap();

        assert_eq!(json["model"], "gpt-3.5-turbo");
        assert_eq!(json["temperature"], 0.0);
        assert_eq!(json["messages"][0]["role"], "system");
        assert_eq!(json["messages"][1]["role"], "user");
        assert_eq!(json["messages"][1]["content"], "What is FI-AA?");
        assert!(json.get("max_tokens").is_none());
    }

    #[test]
    fn test_response_conversion() {
        let client = OpenAiClient::new("sk-test");
        let request = LlmRequest::new("hi", "gpt-3.5-turbo");
        let raw: ChatResponse = serde_json::from_value(serde_json::json!({
            "model": "gpt-3.5-turbo-0125",
            "choices": [{ "index": 0, "message": { "role": "assistant", "content": "hello" } }],
            "usage": { "prompt_tokens": 3, "completion_tokens": 1, "total_tokens": 4 }
        }))
        .unwrap();

        let response = client.convert_response(&request, raw).unwrap();
        assert_eq!(response.content, "hello");
        assert_eq!(response.model, "gpt-3.5-turbo-0125");
        assert_eq!(response.usage.total_tokens, 4);
    }

    #[test]
    fn test_response_without_choices_is_error() {
        let client = OpenAiClient::new("sk-test");
        let request = LlmRequest::new("hi", "gpt-3.5-turbo");
        let raw: ChatResponse =
            serde_json::from_value(serde_json::json!({ "choices": [] })).unwrap();

        assert!(client.convert_response(&request, raw).is_err());
    }
}
