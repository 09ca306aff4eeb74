//! Retrieval-augmented answering over uploaded documents or the fixed corpus.

pub mod answer;
pub mod compress;
pub mod types;

pub use answer::{answer_from_documents, answer_question, build_answer_prompt, AnswerRequest};
pub use compress::compress_documents;
pub use types::{AnswerResult, Scenario, SourceMaterial};
