use std::sync::Arc;

use crate::domain::{DomainError, ModelConfig};

/// Raw output of a cross-encoder batch call.
///
/// Scoring libraries commonly hand back a bare scalar when given a single pair
/// and a sequence otherwise, and may leave holes for pairs they could not score.
#[derive(Debug, Clone, PartialEq)]
pub enum RawScores {
    Scalar(Option<f64>),
    Batch(Vec<Option<f64>>),
}

impl RawScores {
    pub fn len(&self) -> usize {
        match self {
            Self::Scalar(_) => 1,
            Self::Batch(scores) => scores.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl From<Vec<f64>> for RawScores {
    fn from(scores: Vec<f64>) -> Self {
        Self::Batch(scores.into_iter().map(Some).collect())
    }
}

impl From<f64> for RawScores {
    fn from(score: f64) -> Self {
        Self::Scalar(Some(score))
    }
}

/// A loaded model that jointly scores (query, document) pairs.
pub trait CrossEncoder: Send + Sync {
    /// Score every pair in order. When `normalize` is set, scores are mapped
    /// through a sigmoid; otherwise raw logits are returned.
    fn compute_scores(
        &self,
        pairs: &[(&str, &str)],
        normalize: bool,
    ) -> Result<RawScores, DomainError>;

    /// Get the model name used for scoring
    fn model_name(&self) -> &str;
}

/// Acquires a [`CrossEncoder`] from wherever its weights live.
pub trait CrossEncoderLoader: Send + Sync {
    fn load(&self, config: &ModelConfig) -> Result<Arc<dyn CrossEncoder>, DomainError>;
}
