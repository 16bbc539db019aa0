use axum::extract::DefaultBodyLimit;
use axum::routing::{get, post};
use axum::Router;
use tower_http::trace::TraceLayer;

use crate::handler;
use crate::host::Host;

/// Default request body limit, matching [`ServerConfig`](crate::ServerConfig).
pub const DEFAULT_MAX_BODY_BYTES: usize = 1024 * 1024;

/// Build the axum router with all FileStore endpoints.
pub fn build_router(host: Host) -> Router {
    build_router_with_limit(host, DEFAULT_MAX_BODY_BYTES)
}

pub fn build_router_with_limit(host: Host, max_body_bytes: usize) -> Router {
    Router::new()
        .route("/v1/health", get(handler::health_handler))
        .route("/v1/info", get(handler::info_handler))
        .route("/v1/transactions", post(handler::invoke_handler))
        .route(
            "/v1/files",
            get(handler::list_files).post(handler::create_file),
        )
        .route(
            "/v1/files/:id",
            get(handler::get_file)
                .put(handler::update_file)
                .delete(handler::delete_file),
        )
        .route("/v1/files/:id/exists", get(handler::file_exists))
        .layer(DefaultBodyLimit::max(max_body_bytes))
        .layer(TraceLayer::new_for_http())
        .with_state(host)
}
