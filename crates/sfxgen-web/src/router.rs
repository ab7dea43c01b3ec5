use axum::extract::Request;
use axum::routing::{get, post};
use axum::{middleware, Router};
use tower_http::trace::TraceLayer;
use tracing::info_span;

use crate::handlers;
use crate::request_context::{attach_request_context, REQUEST_ID_HEADER};
use crate::state::AppState;

/// Build the application router.
pub fn create_router(state: AppState) -> Router {
    let trace_layer = TraceLayer::new_for_http().make_span_with(|request: &Request| {
        let request_id = request
            .headers()
            .get(REQUEST_ID_HEADER)
            .and_then(|v| v.to_str().ok())
            .unwrap_or("-");
        info_span!(
            "http_request",
            method = %request.method(),
            uri = %request.uri(),
            request_id = %request_id
        )
    });

    let api_routes = Router::new()
        .route("/generate", post(handlers::api_generate))
        .route("/controls", get(handlers::api_controls));

    Router::new()
        .route("/", get(handlers::index))
        .route("/generate", post(handlers::generate_page))
        .route("/health", get(handlers::health))
        .nest("/api", api_routes)
        .layer(trace_layer)
        .layer(middleware::from_fn(attach_request_context))
        .with_state(state)
}
