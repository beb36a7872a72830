use std::sync::Arc;

use axum::extract::State;
use axum::Json;

use crate::connector::api::Container;
use crate::domain::HealthResponse;

/// Reports liveness and whether the model is usable. Always answers 200.
pub async fn health(State(container): State<Arc<Container>>) -> Json<HealthResponse> {
    Json(container.health())
}
