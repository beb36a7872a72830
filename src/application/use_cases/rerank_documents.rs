use std::sync::Arc;

use tracing::debug;

use crate::application::ScoringService;
use crate::domain::{DomainError, RankedDocuments, RerankRequest, RerankResponse, ScoredResult};

/// Pairs a query with its documents, scores them and returns them ranked.
#[derive(Clone)]
pub struct RerankDocumentsUseCase {
    scoring: Arc<ScoringService>,
}

impl RerankDocumentsUseCase {
    pub fn new(scoring: Arc<ScoringService>) -> Self {
        Self { scoring }
    }

    /// Ranks `documents` by descending score, keeping input order for ties,
    /// and keeps at most `top_k` of them.
    pub fn rank(
        &self,
        query: &str,
        documents: Vec<String>,
        top_k: Option<usize>,
        normalize: bool,
    ) -> Result<RankedDocuments, DomainError> {
        let batch = self.scoring.score(query, &documents, normalize)?;

        let mut results: Vec<ScoredResult> = documents
            .into_iter()
            .zip(batch.scores)
            .enumerate()
            .map(|(index, (document, score))| ScoredResult::new(index, score, document))
            .collect();

        // sort_by is stable, which is what keeps tied documents in input order.
        results.sort_by(|a, b| {
            b.score
                .partial_cmp(&a.score)
                .unwrap_or(std::cmp::Ordering::Equal)
        });

        if let Some(k) = top_k {
            results.truncate(k);
        }

        Ok(RankedDocuments {
            results,
            elapsed_ms: batch.elapsed_ms,
        })
    }

    /// Validates the request, ranks on the blocking pool and shapes the response.
    pub async fn execute(&self, request: RerankRequest) -> Result<RerankResponse, DomainError> {
        request.validate()?;

        let RerankRequest {
            query,
            documents,
            top_k,
            normalize,
            return_documents,
        } = request;
        let total_documents = documents.len();

        debug!(
            "Reranking {} documents (top_k={:?}, normalize={})",
            total_documents, top_k, normalize
        );

        let use_case = self.clone();
        let task_query = query.clone();
        let mut ranked = tokio::task::spawn_blocking(move || {
            use_case.rank(&task_query, documents, top_k, normalize)
        })
        .await
        .map_err(|e| DomainError::internal(format!("Scoring task failed: {}", e)))??;

        if !return_documents {
            for result in &mut ranked.results {
                result.document.clear();
            }
        }

        debug!(
            "Reranking complete, returning {} of {} documents in {:.2}ms",
            ranked.results.len(),
            total_documents,
            ranked.elapsed_ms
        );

        Ok(RerankResponse::new(query, total_documents, ranked))
    }
}
