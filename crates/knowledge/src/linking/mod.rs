//! Entity linking against encyclopedia or product documentation search.

pub mod extraction;
pub mod pipeline;

pub use extraction::{strip_code_fences, ExtractionError, ExtractionResult};
pub use pipeline::{EntityLinker, LinkedEntity, LinkingResult};
