use serde::{Deserialize, Serialize};

use crate::domain::DomainError;

/// Upper bound on the number of documents accepted in a single request.
pub const MAX_DOCUMENTS: usize = 1000;

fn default_true() -> bool {
    true
}

/// A query plus the candidate documents to be scored against it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RerankRequest {
    /// The search query
    pub query: String,

    /// Documents to rerank, in caller order
    pub documents: Vec<String>,

    /// Number of top results to return (default: return all)
    #[serde(default)]
    pub top_k: Option<usize>,

    /// Whether to squash raw logits through a sigmoid
    #[serde(default = "default_true")]
    pub normalize: bool,

    /// Whether to echo document text in the results
    #[serde(default = "default_true")]
    pub return_documents: bool,
}

impl RerankRequest {
    pub fn new(query: impl Into<String>, documents: Vec<String>) -> Self {
        Self {
            query: query.into(),
            documents,
            top_k: None,
            normalize: true,
            return_documents: true,
        }
    }

    pub fn with_top_k(mut self, top_k: usize) -> Self {
        self.top_k = Some(top_k);
        self
    }

    pub fn with_normalize(mut self, normalize: bool) -> Self {
        self.normalize = normalize;
        self
    }

    pub fn with_return_documents(mut self, return_documents: bool) -> Self {
        self.return_documents = return_documents;
        self
    }

    /// Checks the request shape. Must pass before any scoring happens.
    pub fn validate(&self) -> Result<(), DomainError> {
        if self.query.is_empty() {
            return Err(DomainError::validation(
                "query",
                "must contain at least 1 character",
            ));
        }

        if self.documents.is_empty() {
            return Err(DomainError::validation(
                "documents",
                "must contain at least 1 item",
            ));
        }

        if self.documents.len() > MAX_DOCUMENTS {
            return Err(DomainError::validation(
                "documents",
                format!(
                    "must contain at most {} items, got {}",
                    MAX_DOCUMENTS,
                    self.documents.len()
                ),
            ));
        }

        if self.top_k == Some(0) {
            return Err(DomainError::validation(
                "top_k",
                "must be greater than or equal to 1",
            ));
        }

        Ok(())
    }
}
