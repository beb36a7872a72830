use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

use crate::application::{CrossEncoder, CrossEncoderLoader, RawScores};
use crate::domain::{DomainError, ModelConfig};

/// Deterministic stand-in for a real cross-encoder.
///
/// Scores are derived from a hash of the pair, so the same inputs always rank
/// the same way. Like common scoring libraries it answers a single pair with a
/// bare scalar.
pub struct MockCrossEncoder;

impl MockCrossEncoder {
    pub fn new() -> Self {
        Self
    }

    fn logit(query: &str, document: &str) -> f64 {
        let mut hasher = DefaultHasher::new();
        query.hash(&mut hasher);
        document.hash(&mut hasher);
        (hasher.finish() % 20_000) as f64 / 1_000.0 - 10.0
    }
}

impl Default for MockCrossEncoder {
    fn default() -> Self {
        Self::new()
    }
}

impl CrossEncoder for MockCrossEncoder {
    fn compute_scores(
        &self,
        pairs: &[(&str, &str)],
        normalize: bool,
    ) -> Result<RawScores, DomainError> {
        let mut scores: Vec<f64> = pairs
            .iter()
            .map(|(query, document)| {
                let logit = Self::logit(query, document);
                if normalize {
                    1.0 / (1.0 + (-logit).exp())
                } else {
                    logit
                }
            })
            .collect();

        if scores.len() == 1 {
            return Ok(RawScores::Scalar(scores.pop()));
        }

        Ok(RawScores::from(scores))
    }

    fn model_name(&self) -> &str {
        "mock-cross-encoder"
    }
}

#[derive(Debug, Default, Clone, Copy)]
pub struct MockCrossEncoderLoader;

impl CrossEncoderLoader for MockCrossEncoderLoader {
    fn load(&self, _config: &ModelConfig) -> Result<Arc<dyn CrossEncoder>, DomainError> {
        Ok(Arc::new(MockCrossEncoder::new()))
    }
}
