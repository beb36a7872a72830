use std::any::Any;

use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::{error, warn};

use crate::domain::DomainError;

/// JSON body of every non-2xx response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub detail: Option<serde_json::Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_code: Option<String>,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>, error_code: &str) -> Self {
        Self {
            error: error.into(),
            detail: None,
            error_code: Some(error_code.to_string()),
        }
    }

    pub fn with_detail(mut self, detail: serde_json::Value) -> Self {
        self.detail = Some(detail);
        self
    }
}

#[derive(Debug)]
pub enum ApiError {
    Domain(DomainError),
    /// The body could not be read or decoded into the expected request.
    Rejected(JsonRejection),
}

impl From<DomainError> for ApiError {
    fn from(err: DomainError) -> Self {
        Self::Domain(err)
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self::Rejected(rejection)
    }
}

impl ApiError {
    fn status_and_body(self) -> (StatusCode, ErrorResponse) {
        match self {
            Self::Rejected(rejection) => {
                let status = match rejection.status() {
                    StatusCode::PAYLOAD_TOO_LARGE => StatusCode::PAYLOAD_TOO_LARGE,
                    _ => StatusCode::UNPROCESSABLE_ENTITY,
                };
                warn!("Rejected request body: {}", rejection.body_text());
                (
                    status,
                    ErrorResponse::new("Validation error", "VALIDATION_ERROR").with_detail(json!({
                        "field": "body",
                        "message": rejection.body_text(),
                    })),
                )
            }
            Self::Domain(DomainError::Validation { field, message }) => {
                warn!("Rejected request: invalid `{}`: {}", field, message);
                (
                    StatusCode::UNPROCESSABLE_ENTITY,
                    ErrorResponse::new("Validation error", "VALIDATION_ERROR").with_detail(json!({
                        "field": field,
                        "message": message,
                    })),
                )
            }
            Self::Domain(DomainError::NotLoaded) => {
                warn!("Refused request: model not loaded");
                (
                    StatusCode::SERVICE_UNAVAILABLE,
                    ErrorResponse::new("Model not loaded", "MODEL_NOT_LOADED"),
                )
            }
            Self::Domain(DomainError::ModelLoad(msg)) => {
                warn!("Refused request: model unavailable: {}", msg);
                (
                    StatusCode::SERVICE_UNAVAILABLE,
                    ErrorResponse::new("Model not loaded", "MODEL_NOT_LOADED")
                        .with_detail(json!(msg)),
                )
            }
            Self::Domain(DomainError::Scoring(msg)) => {
                error!("Error during reranking: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ErrorResponse::new("Reranking failed", "SCORING_ERROR").with_detail(json!(msg)),
                )
            }
            Self::Domain(DomainError::Internal(msg)) => {
                error!("Unhandled error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ErrorResponse::new("Internal server error", "INTERNAL_ERROR"),
                )
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, body) = self.status_and_body();
        (status, Json(body)).into_response()
    }
}

/// Turns a handler panic into the generic 500 body.
pub fn panic_response(panic: Box<dyn Any + Send + 'static>) -> Response {
    let message = if let Some(s) = panic.downcast_ref::<String>() {
        s.clone()
    } else if let Some(s) = panic.downcast_ref::<&str>() {
        s.to_string()
    } else {
        "unknown panic payload".to_string()
    };

    ApiError::Domain(DomainError::internal(format!("Handler panicked: {}", message)))
        .into_response()
}
