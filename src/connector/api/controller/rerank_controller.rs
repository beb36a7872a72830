use std::sync::Arc;

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::Json;
use tracing::info;

use crate::connector::api::{ApiError, Container};
use crate::domain::{RerankRequest, RerankResponse};

pub async fn rerank(
    State(container): State<Arc<Container>>,
    payload: Result<Json<RerankRequest>, JsonRejection>,
) -> Result<Json<RerankResponse>, ApiError> {
    let Json(request) = payload?;

    let use_case = container.rerank_use_case();
    let response = use_case.execute(request).await?;

    info!(
        "Reranked {} documents, returned {} in {:.2}ms",
        response.total_documents, response.returned_results, response.processing_time_ms
    );

    Ok(Json(response))
}
