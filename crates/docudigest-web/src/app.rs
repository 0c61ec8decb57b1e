use std::sync::Arc;

use axum::Router;
use axum::extract::DefaultBodyLimit;
use axum::routing::{get, post};
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::trace::TraceLayer;

use crate::error;
use crate::handlers;
use crate::state::AppState;

/// Room for multipart boundaries and part headers on top of the file itself.
const MULTIPART_OVERHEAD: usize = 64 * 1024;

pub fn router(state: Arc<AppState>) -> Router {
    let body_limit =
        DefaultBodyLimit::max(state.config.max_upload_bytes().saturating_add(MULTIPART_OVERHEAD));

    Router::new()
        .route("/", get(handlers::index::index))
        .route("/health", get(handlers::health::health))
        .route(
            "/api/summarize",
            post(handlers::summarize::summarize)
                .fallback(handlers::summarize::method_not_allowed),
        )
        .layer(body_limit)
        .layer(CatchPanicLayer::custom(error::panic_response))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
