//! LLM integration crate for lexlink.
//!
//! Provider-agnostic access to hosted chat models behind the [`LlmClient`]
//! trait.
//!
//! # Example
//! ```no_run
//! use lexlink_llm::{LlmClient, LlmRequest, OpenAiClient};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let client = OpenAiClient::new("sk-...");
//! let request = LlmRequest::new("Hello, world!", "gpt-3.5-turbo").deterministic();
//! let response = client.complete(&request).await?;
//! println!("{}", response.content);
//! # Ok(())
//! # }
//! ```

pub mod client;
pub mod factory;
pub mod providers;
pub mod types;

// Re-export main types
pub use client::{LlmClient, LlmRequest, LlmResponse, LlmUsage};
pub use factory::create_client;
pub use providers::OpenAiClient;
pub use types::ProviderType;
