//! HTTP server implementation

use crate::routes;
use crate::state::AppState;
use axum::extract::DefaultBodyLimit;
use axum::http::header::{ACCEPT, CONTENT_TYPE, ORIGIN};
use axum::http::{HeaderName, Method};
use axum::Router;
use lexlink_core::AppResult;
use tower_http::cors::{AllowOrigin, CorsLayer};
use tower_http::trace::TraceLayer;

/// Browsers may call from any origin with credentials, so the request
/// origin is echoed back instead of `*`.
fn cors_layer() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(AllowOrigin::mirror_request())
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::OPTIONS,
            Method::PUT,
            Method::PATCH,
            Method::DELETE,
        ])
        .allow_headers([
            HeaderName::from_static("x-requested-with"),
            CONTENT_TYPE,
            ORIGIN,
            ACCEPT,
        ])
        .allow_credentials(true)
}

/// Router with tracing, CORS and the upload size limit applied.
pub fn app(state: AppState) -> Router {
    let max_upload_bytes = state.config.server.max_upload_bytes;

    routes::routes(state)
        .layer(DefaultBodyLimit::max(max_upload_bytes))
        .layer(TraceLayer::new_for_http())
        .layer(cors_layer())
}

/// Bind and serve until the process is stopped.
pub async fn serve(state: AppState) -> AppResult<()> {
    let addr = format!("{}:{}", state.config.server.host, state.config.server.port);
    let app = app(state);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("lexlink listening on http://{}", addr);
    tracing::info!("Available endpoints:");
    tracing::info!("  GET  /             - Liveness check");
    tracing::info!("  POST /api/sap/qa   - Answer from the SAP documentation corpus");
    tracing::info!("  POST /api/sap/el   - Link entities against SAP Help and the glossary");
    tracing::info!("  POST /api/docs/qa  - Answer from an uploaded PDF");
    tracing::info!("  POST /api/docs/el  - Link entities against Wikipedia");

    axum::serve(listener, app).await?;

    Ok(())
}
