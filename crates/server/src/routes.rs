//! Route table.

use crate::handlers;
use crate::state::AppState;
use axum::routing::{get, post};
use axum::Router;

/// Create the application router (without middleware layers).
pub fn routes(state: AppState) -> Router {
    Router::new()
        .route("/", get(handlers::root))
        // SAP documentation corpus and SAP Help search
        .route("/api/sap/qa", post(handlers::sap_qa))
        .route("/api/sap/el", post(handlers::sap_el))
        // Uploaded documents and Wikipedia search
        .route("/api/docs/qa", post(handlers::docs_qa))
        .route("/api/docs/el", post(handlers::docs_el))
        .with_state(state)
}
