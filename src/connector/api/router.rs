use std::sync::Arc;

use axum::extract::DefaultBodyLimit;
use axum::routing::{get, post};
use axum::Router;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::cors::CorsLayer;

use super::container::Container;
use super::controller::{health_controller, rerank_controller, root_controller};
use super::error::panic_response;

/// Up to 1000 documents per request can easily exceed axum's 2 MiB default.
const MAX_BODY_BYTES: usize = 32 * 1024 * 1024;

pub fn build_router(container: Arc<Container>) -> Router {
    let routes = Router::new()
        .route("/", get(root_controller::root))
        .route("/docs", get(root_controller::docs))
        .route("/health", get(health_controller::health))
        .route("/rerank", post(rerank_controller::rerank))
        .with_state(container);

    with_service_layers(routes)
}

/// Browser clients may call from any origin, with credentials.
fn with_service_layers(router: Router) -> Router {
    router
        .layer(DefaultBodyLimit::max(MAX_BODY_BYTES))
        .layer(CatchPanicLayer::custom(panic_response))
        .layer(CorsLayer::very_permissive())
}
