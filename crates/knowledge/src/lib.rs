//! Retrieval and entity linking over search results and PDF documents.
//!
//! Every request builds its own similarity index from freshly loaded or
//! fetched documents; nothing is persisted between requests except the
//! harvested glossary file.

pub mod context;
pub mod document;
pub mod embeddings;
pub mod glossary;
pub mod harvest;
pub mod index;
pub mod linking;
pub mod loader;
pub mod rag;
pub mod search;

// Re-export commonly used types
pub use context::PipelineContext;
pub use document::{Metadata, ScoredDocument, SearchDocument};
pub use embeddings::{create_provider, EmbeddingCache, EmbeddingProvider};
pub use glossary::{load_glossary, GlossaryEntry};
pub use harvest::{harvest, GlossaryPageSource, HarvestOptions, HarvestStats, SapGlossaryClient};
pub use index::SimilarityIndex;
pub use linking::{EntityLinker, ExtractionError, ExtractionResult, LinkedEntity, LinkingResult};
pub use rag::{answer_question, AnswerRequest, AnswerResult, Scenario, SourceMaterial};
pub use search::{search_with_retry, SapHelpSearch, SearchProvider, WikipediaSearch};
