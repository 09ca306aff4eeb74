//! lexlink core library
//!
//! Foundational pieces shared by every lexlink crate:
//! - Error handling (`AppError`, `AppResult`)
//! - Logging infrastructure
//! - Configuration management

pub mod config;
pub mod error;
pub mod logging;

// Re-export commonly used types
pub use config::{AppConfig, EmptyResultPolicy};
pub use error::{AppError, AppResult};
