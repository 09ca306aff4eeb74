//! Command handlers for the lexlink CLI.

pub mod harvest;
pub mod serve;

pub use harvest::HarvestCommand;
pub use serve::ServeCommand;
