use serde::{Deserialize, Serialize};

/// One document's position in the ranking.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoredResult {
    /// Original index of the document in the request
    pub index: usize,
    /// Relevance score
    pub score: f64,
    /// The document text, or empty when the caller opted out of document echo
    pub document: String,
}

impl ScoredResult {
    pub fn new(index: usize, score: f64, document: impl Into<String>) -> Self {
        Self {
            index,
            score,
            document: document.into(),
        }
    }

    /// Drops the echoed text while keeping index and score.
    pub fn without_document(mut self) -> Self {
        self.document.clear();
        self
    }
}

/// Ranked results as produced by the orchestrator, before response shaping.
#[derive(Debug, Clone, PartialEq)]
pub struct RankedDocuments {
    pub results: Vec<ScoredResult>,
    pub elapsed_ms: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RerankResponse {
    /// Results in ranking order (highest score first)
    pub results: Vec<ScoredResult>,
    pub query: String,
    pub total_documents: usize,
    pub returned_results: usize,
    pub processing_time_ms: f64,
}

impl RerankResponse {
    pub fn new(
        query: impl Into<String>,
        total_documents: usize,
        ranked: RankedDocuments,
    ) -> Self {
        Self {
            returned_results: ranked.results.len(),
            results: ranked.results,
            query: query.into(),
            total_documents,
            processing_time_ms: ranked.elapsed_ms,
        }
    }

    pub fn scores(&self) -> Vec<f64> {
        self.results.iter().map(|r| r.score).collect()
    }

    pub fn indices(&self) -> Vec<usize> {
        self.results.iter().map(|r| r.index).collect()
    }
}
