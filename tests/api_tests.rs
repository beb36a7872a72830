//! HTTP-level tests for the reranking service.
//!
//! Each test starts the real axum app on an ephemeral port with a scripted
//! cross-encoder and talks to it over TCP.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use serde_json::{json, Value};
use tokio::net::TcpListener;

use bge_reranker_server::{
    serve, Container, ContainerConfig, CrossEncoder, CrossEncoderLoader, DomainError, ModelConfig,
    RawScores,
};

enum Script {
    Scores(RawScores),
    Fail(&'static str),
}

struct ScriptedEncoder {
    script: Script,
    calls: AtomicUsize,
}

impl CrossEncoder for ScriptedEncoder {
    fn compute_scores(
        &self,
        _pairs: &[(&str, &str)],
        _normalize: bool,
    ) -> Result<RawScores, DomainError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match &self.script {
            Script::Scores(raw) => Ok(raw.clone()),
            Script::Fail(msg) => Err(DomainError::scoring(*msg)),
        }
    }

    fn model_name(&self) -> &str {
        "scripted"
    }
}

struct ScriptedLoader(Option<Arc<ScriptedEncoder>>);

impl CrossEncoderLoader for ScriptedLoader {
    fn load(&self, _config: &ModelConfig) -> Result<Arc<dyn CrossEncoder>, DomainError> {
        match &self.0 {
            Some(encoder) => Ok(encoder.clone() as Arc<dyn CrossEncoder>),
            None => Err(DomainError::model_load("scoring backend unavailable")),
        }
    }
}

struct TestApp {
    base_url: String,
    client: reqwest::Client,
    encoder: Option<Arc<ScriptedEncoder>>,
}

impl TestApp {
    fn scoring_calls(&self) -> usize {
        self.encoder
            .as_ref()
            .map_or(0, |e| e.calls.load(Ordering::SeqCst))
    }

    async fn get(&self, path: &str) -> (u16, Value) {
        let resp = self
            .client
            .get(format!("{}{}", self.base_url, path))
            .send()
            .await
            .expect("request failed");
        let status = resp.status().as_u16();
        (status, resp.json().await.expect("invalid JSON body"))
    }

    async fn rerank(&self, body: Value) -> (u16, Value) {
        let resp = self
            .client
            .post(format!("{}/rerank", self.base_url))
            .json(&body)
            .send()
            .await
            .expect("request failed");
        let status = resp.status().as_u16();
        (status, resp.json().await.expect("invalid JSON body"))
    }
}

async fn start(container: Container, encoder: Option<Arc<ScriptedEncoder>>) -> TestApp {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    tokio::spawn(serve(
        listener,
        Arc::new(container),
        std::future::pending::<()>(),
    ));

    TestApp {
        base_url: format!("http://{}", addr),
        client: reqwest::Client::new(),
        encoder,
    }
}

fn config() -> ContainerConfig {
    ContainerConfig {
        model: ModelConfig::new("BAAI/bge-reranker-v2-m3", false),
        mock_model: false,
    }
}

async fn spawn_with(script: Script) -> TestApp {
    let encoder = Arc::new(ScriptedEncoder {
        script,
        calls: AtomicUsize::new(0),
    });
    let container = Container::with_loader(config(), Arc::new(ScriptedLoader(Some(encoder.clone()))));
    assert!(container.load_model().await);
    start(container, Some(encoder)).await
}

async fn spawn_scores(scores: Vec<f64>) -> TestApp {
    spawn_with(Script::Scores(RawScores::from(scores))).await
}

async fn spawn_unloaded() -> TestApp {
    let container = Container::with_loader(config(), Arc::new(ScriptedLoader(None)));
    assert!(!container.load_model().await);
    start(container, None).await
}

#[tokio::test]
async fn test_root_endpoint() {
    let app = spawn_scores(vec![]).await;

    let (status, body) = app.get("/").await;

    assert_eq!(status, 200);
    assert_eq!(body["name"], "BGE Reranker v2-m3 API Server");
    assert_eq!(body["version"], env!("CARGO_PKG_VERSION"));
    assert!(body["description"].is_string());
    assert_eq!(body["docs_url"], "/docs");
    assert_eq!(body["health_url"], "/health");
}

#[tokio::test]
async fn test_docs_endpoint_lists_rerank() {
    let app = spawn_scores(vec![]).await;

    let (status, body) = app.get("/docs").await;

    assert_eq!(status, 200);
    let paths: Vec<&str> = body["endpoints"]
        .as_array()
        .unwrap()
        .iter()
        .filter_map(|e| e["path"].as_str())
        .collect();
    assert!(paths.contains(&"/rerank"));
    assert!(paths.contains(&"/health"));
}

#[tokio::test]
async fn test_health_when_loaded() {
    let app = spawn_scores(vec![]).await;

    let (status, body) = app.get("/health").await;

    assert_eq!(status, 200);
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["model_loaded"], true);
    assert_eq!(body["model_name"], "BAAI/bge-reranker-v2-m3");
    assert_eq!(body["version"], env!("CARGO_PKG_VERSION"));
}

#[tokio::test]
async fn test_health_degraded_when_load_failed() {
    let app = spawn_unloaded().await;

    let (status, body) = app.get("/health").await;

    assert_eq!(status, 200);
    assert_eq!(body["status"], "degraded");
    assert_eq!(body["model_loaded"], false);
}

#[tokio::test]
async fn test_rerank_end_to_end() {
    let app = spawn_scores(vec![0.9, 0.1]).await;

    let (status, body) = app
        .rerank(json!({
            "query": "Python编程语言",
            "documents": ["Python是一种编程语言", "今天天气很好"],
        }))
        .await;

    assert_eq!(status, 200);
    assert_eq!(body["query"], "Python编程语言");
    assert_eq!(body["total_documents"], 2);
    assert_eq!(body["returned_results"], 2);
    assert!(body["processing_time_ms"].as_f64().unwrap() >= 0.0);
    assert_eq!(
        body["results"],
        json!([
            {"index": 0, "score": 0.9, "document": "Python是一种编程语言"},
            {"index": 1, "score": 0.1, "document": "今天天气很好"},
        ])
    );
}

#[tokio::test]
async fn test_rerank_top_k_truncates_after_sorting() {
    let app = spawn_scores(vec![0.3, 0.9, 0.7]).await;

    let (status, body) = app
        .rerank(json!({
            "query": "q",
            "documents": ["doc1", "doc2", "doc3"],
            "top_k": 2,
        }))
        .await;

    assert_eq!(status, 200);
    assert_eq!(body["total_documents"], 3);
    assert_eq!(body["returned_results"], 2);
    assert_eq!(
        body["results"],
        json!([
            {"index": 1, "score": 0.9, "document": "doc2"},
            {"index": 2, "score": 0.7, "document": "doc3"},
        ])
    );
}

#[tokio::test]
async fn test_rerank_single_scalar_score() {
    let app = spawn_with(Script::Scores(RawScores::Scalar(Some(0.95)))).await;

    let (status, body) = app
        .rerank(json!({"query": "q", "documents": ["only"], "top_k": 10}))
        .await;

    assert_eq!(status, 200);
    assert_eq!(
        body["results"],
        json!([{"index": 0, "score": 0.95, "document": "only"}])
    );
}

#[tokio::test]
async fn test_rerank_without_returning_documents() {
    let app = spawn_scores(vec![0.2, 0.8]).await;

    let (status, body) = app
        .rerank(json!({
            "query": "编程语言",
            "documents": ["Python是一种解释型编程语言。", "Java是一种面向对象的编程语言。"],
            "return_documents": false,
        }))
        .await;

    assert_eq!(status, 200);
    assert_eq!(
        body["results"],
        json!([
            {"index": 1, "score": 0.8, "document": ""},
            {"index": 0, "score": 0.2, "document": ""},
        ])
    );
}

#[tokio::test]
async fn test_rerank_validation_errors_never_reach_the_model() {
    let app = spawn_scores(vec![0.5]).await;

    let cases = [
        (json!({"query": "", "documents": ["a"]}), "query"),
        (json!({"query": "q", "documents": []}), "documents"),
        (json!({"query": "q", "documents": ["a"], "top_k": 0}), "top_k"),
    ];

    for (body, field) in cases {
        let (status, resp) = app.rerank(body).await;
        assert_eq!(status, 422);
        assert_eq!(resp["error_code"], "VALIDATION_ERROR");
        assert_eq!(resp["detail"]["field"], field);
    }

    assert_eq!(app.scoring_calls(), 0);
}

#[tokio::test]
async fn test_rerank_rejects_too_many_documents() {
    let app = spawn_scores(vec![]).await;
    let documents: Vec<String> = (0..1001).map(|i| format!("doc {}", i)).collect();

    let (status, body) = app.rerank(json!({"query": "q", "documents": documents})).await;

    assert_eq!(status, 422);
    assert_eq!(body["detail"]["field"], "documents");
    assert_eq!(app.scoring_calls(), 0);
}

#[tokio::test]
async fn test_rerank_malformed_bodies_are_422() {
    let app = spawn_scores(vec![]).await;

    let (status, body) = app.rerank(json!({"documents": ["a"]})).await;
    assert_eq!(status, 422);
    assert_eq!(body["error_code"], "VALIDATION_ERROR");

    let (status, _) = app.rerank(json!({"query": "q", "documents": ["a"], "top_k": -3})).await;
    assert_eq!(status, 422);

    let resp = app
        .client
        .post(format!("{}/rerank", app.base_url))
        .header("content-type", "application/json")
        .body("{not json")
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status().as_u16(), 422);

    assert_eq!(app.scoring_calls(), 0);
}

#[tokio::test]
async fn test_rerank_unavailable_without_model() {
    let app = spawn_unloaded().await;

    let (status, body) = app
        .rerank(json!({"query": "q", "documents": ["a", "b"]}))
        .await;

    assert_eq!(status, 503);
    assert_eq!(body["error"], "Model not loaded");
    assert_eq!(body["error_code"], "MODEL_NOT_LOADED");
}

#[tokio::test]
async fn test_rerank_scoring_failure_is_500_with_detail() {
    let app = spawn_with(Script::Fail("CUDA out of memory")).await;

    let (status, body) = app
        .rerank(json!({"query": "q", "documents": ["a", "b"]}))
        .await;

    assert_eq!(status, 500);
    assert_eq!(body["error_code"], "SCORING_ERROR");
    assert!(body["detail"].as_str().unwrap().contains("CUDA out of memory"));
}

#[tokio::test]
async fn test_rerank_with_mock_model_keeps_ranking_properties() {
    let container = Container::new(ContainerConfig {
        model: ModelConfig::new("mock", false),
        mock_model: true,
    });
    assert!(container.load_model().await);
    let app = start(container, None).await;

    let documents: Vec<String> = (0..1000).map(|i| format!("document number {}", i)).collect();
    let request = json!({"query": "find document", "documents": documents, "top_k": 25});

    let (status, first) = app.rerank(request.clone()).await;
    let (_, second) = app.rerank(request).await;

    assert_eq!(status, 200);
    assert_eq!(first["results"], second["results"]);

    let results = first["results"].as_array().unwrap();
    assert_eq!(results.len(), 25);

    let scores: Vec<f64> = results.iter().map(|r| r["score"].as_f64().unwrap()).collect();
    assert!(scores.windows(2).all(|w| w[0] >= w[1]));

    for result in results {
        let index = result["index"].as_u64().unwrap() as usize;
        assert_eq!(result["document"], documents[index]);
    }
}

#[tokio::test]
async fn test_cors_allows_any_origin_with_credentials() {
    let app = spawn_scores(vec![0.5]).await;
    let origin = "http://frontend.example:3000";

    let preflight = app
        .client
        .request(reqwest::Method::OPTIONS, format!("{}/rerank", app.base_url))
        .header("origin", origin)
        .header("access-control-request-method", "POST")
        .header("access-control-request-headers", "content-type")
        .send()
        .await
        .unwrap();

    assert!(preflight.status().is_success());
    let headers = preflight.headers();
    assert_eq!(headers["access-control-allow-origin"], origin);
    assert_eq!(headers["access-control-allow-credentials"], "true");
    assert!(headers["access-control-allow-methods"]
        .to_str()
        .unwrap()
        .contains("POST"));

    let resp = app
        .client
        .get(format!("{}/health", app.base_url))
        .header("origin", origin)
        .send()
        .await
        .unwrap();

    assert_eq!(resp.status().as_u16(), 200);
    assert_eq!(resp.headers()["access-control-allow-origin"], origin);
}
