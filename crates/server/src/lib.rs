//! HTTP API for lexlink.
//!
//! Exposes the answering and entity linking pipelines:
//! - `GET  /`             liveness
//! - `POST /api/sap/qa`   answer from the SAP documentation corpus
//! - `POST /api/sap/el`   link entities against SAP Help and the glossary
//! - `POST /api/docs/qa`  answer from an uploaded PDF (multipart)
//! - `POST /api/docs/el`  link entities against Wikipedia

pub mod error;
pub mod handlers;
pub mod routes;
pub mod server;
pub mod state;
pub mod types;

pub use error::ApiError;
pub use server::{app, serve};
pub use state::AppState;
