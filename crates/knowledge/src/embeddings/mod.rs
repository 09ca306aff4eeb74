//! Embedding generation.
//!
//! Provider-agnostic embedding behind [`EmbeddingProvider`], plus the
//! request-scoped [`EmbeddingCache`].

pub mod cache;
pub mod provider;
pub mod providers;

pub use cache::{content_hash, EmbeddingCache};
pub use provider::{create_provider, EmbeddingProvider};
pub use providers::{MockProvider, OpenAiEmbeddingProvider};
