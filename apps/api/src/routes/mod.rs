pub mod health;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};

use crate::certificate::handlers;
use crate::state::AppState;

/// Allowance for the JSON `request` part and multipart framing on top of the backdrop.
const MULTIPART_OVERHEAD_BYTES: usize = 64 * 1024;

pub fn build_router(state: AppState) -> Router {
    let generate_limit = state
        .config
        .max_backdrop_bytes
        .saturating_add(MULTIPART_OVERHEAD_BYTES);

    Router::new()
        .route("/health", get(health::health_handler))
        // Layout API
        .route("/api/v1/layout/px-to-mm", post(handlers::handle_px_to_mm))
        .route("/api/v1/layout/mm-to-px", post(handlers::handle_mm_to_px))
        .route("/api/v1/layout/dpi", post(handlers::handle_dpi))
        // Certificate API
        .route(
            "/api/v1/certificates/preview",
            post(handlers::handle_preview),
        )
        .route(
            "/api/v1/certificates/generate",
            post(handlers::handle_generate).layer(DefaultBodyLimit::max(generate_limit)),
        )
        .with_state(state)
}
