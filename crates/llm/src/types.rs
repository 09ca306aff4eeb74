//! Provider identification.

/// Provider type enum for matching.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProviderType {
    /// api.openai.com (API key required)
    OpenAI,
    /// Any server speaking the OpenAI chat/embeddings protocol
    OpenAiCompatible,
}

impl ProviderType {
    /// Parse provider type from string.
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "openai" => Some(Self::OpenAI),
            "openai-compatible" | "compatible" => Some(Self::OpenAiCompatible),
            _ => None,
        }
    }

    /// Get the canonical provider name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::OpenAI => "openai",
            Self::OpenAiCompatible => "openai-compatible",
        }
    }
}
