use axum::Json;
use serde::{Deserialize, Serialize};

pub const SERVICE_NAME: &str = "BGE Reranker v2-m3 API Server";
pub const SERVICE_DESCRIPTION: &str = "High-performance multilingual text reranking service";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceInfo {
    pub name: String,
    pub version: String,
    pub description: String,
    pub docs_url: String,
    pub health_url: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EndpointDoc {
    pub method: String,
    pub path: String,
    pub description: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiDocs {
    pub title: String,
    pub version: String,
    pub endpoints: Vec<EndpointDoc>,
}

fn endpoint(method: &str, path: &str, description: &str) -> EndpointDoc {
    EndpointDoc {
        method: method.to_string(),
        path: path.to_string(),
        description: description.to_string(),
    }
}

pub async fn root() -> Json<ServiceInfo> {
    Json(ServiceInfo {
        name: SERVICE_NAME.to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        description: SERVICE_DESCRIPTION.to_string(),
        docs_url: "/docs".to_string(),
        health_url: "/health".to_string(),
    })
}

pub async fn docs() -> Json<ApiDocs> {
    Json(ApiDocs {
        title: SERVICE_NAME.to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        endpoints: vec![
            endpoint("GET", "/", "Service metadata"),
            endpoint("GET", "/docs", "This endpoint listing"),
            endpoint("GET", "/health", "Liveness and model status"),
            endpoint(
                "POST",
                "/rerank",
                "Score documents against a query and return them ranked by relevance",
            ),
        ],
    })
}
