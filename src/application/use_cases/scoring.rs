use std::sync::{Arc, Mutex, OnceLock};
use std::time::Instant;

use tracing::{debug, error, info, warn};

use crate::application::{CrossEncoder, CrossEncoderLoader, RawScores};
use crate::domain::{DomainError, ModelConfig, ModelState};

/// Scores aligned with the input documents, plus the time spent producing them.
#[derive(Debug, Clone, PartialEq)]
pub struct ScoreBatch {
    pub scores: Vec<f64>,
    pub elapsed_ms: f64,
}

/// Owns the cross-encoder's lifecycle and is the only way to reach it.
///
/// One instance exists per process. `load` is gated so the underlying model is
/// initialized at most once even if startup races; `score` is safe to call
/// concurrently once loading has succeeded.
pub struct ScoringService {
    loader: Arc<dyn CrossEncoderLoader>,
    config: ModelConfig,
    encoder: OnceLock<Arc<dyn CrossEncoder>>,
    load_gate: Mutex<()>,
}

impl ScoringService {
    pub fn new(loader: Arc<dyn CrossEncoderLoader>, config: ModelConfig) -> Self {
        Self {
            loader,
            config,
            encoder: OnceLock::new(),
            load_gate: Mutex::new(()),
        }
    }

    pub fn load(&self) -> Result<(), DomainError> {
        if self.encoder.get().is_some() {
            return Ok(());
        }

        let _gate = self
            .load_gate
            .lock()
            .map_err(|e| DomainError::internal(format!("Failed to lock load gate: {}", e)))?;

        if self.encoder.get().is_some() {
            debug!("Model already loaded by a concurrent caller");
            return Ok(());
        }

        info!(
            "Loading cross-encoder model: {} (fp16: {})",
            self.config.model_name, self.config.use_fp16
        );

        let encoder = self.loader.load(&self.config).map_err(|e| match e {
            DomainError::ModelLoad(_) => e,
            other => DomainError::model_load(other.to_string()),
        })?;

        if self.encoder.set(encoder).is_err() {
            return Err(DomainError::internal("Model handle initialized twice"));
        }

        info!("Model loaded successfully: {}", self.config.model_name);
        Ok(())
    }

    pub fn state(&self) -> ModelState {
        if self.encoder.get().is_some() {
            ModelState::Loaded
        } else {
            ModelState::Unloaded
        }
    }

    pub fn is_loaded(&self) -> bool {
        self.state().is_loaded()
    }

    pub fn model_name(&self) -> &str {
        &self.config.model_name
    }

    /// Scores each document against `query`, preserving input order.
    pub fn score(
        &self,
        query: &str,
        documents: &[String],
        normalize: bool,
    ) -> Result<ScoreBatch, DomainError> {
        let encoder = self.encoder.get().ok_or(DomainError::NotLoaded)?;

        let start_time = Instant::now();

        let pairs: Vec<(&str, &str)> = documents
            .iter()
            .map(|doc| (query, doc.as_str()))
            .collect();

        let raw = encoder
            .compute_scores(&pairs, normalize)
            .map_err(|e| {
                error!("Error computing scores: {}", e);
                match e {
                    DomainError::Scoring(_) => e,
                    other => DomainError::scoring(other.to_string()),
                }
            })?;

        let scores = coerce_scores(raw, documents.len())?;
        let elapsed_ms = start_time.elapsed().as_secs_f64() * 1000.0;

        debug!(
            "Scored {} pairs with {} in {:.2}ms",
            scores.len(),
            encoder.model_name(),
            elapsed_ms
        );

        Ok(ScoreBatch { scores, elapsed_ms })
    }
}

/// Turns whatever the encoder returned into exactly `expected` finite scores.
///
/// Missing and non-finite values become `0.0` instead of failing the request.
/// This keeps callers working when a scorer leaves holes, at the price of
/// ranking those documents as neutral.
pub fn coerce_scores(raw: RawScores, expected: usize) -> Result<Vec<f64>, DomainError> {
    let values = match raw {
        RawScores::Scalar(score) => vec![score],
        RawScores::Batch(scores) => scores,
    };

    if values.len() != expected {
        return Err(DomainError::scoring(format!(
            "Model returned {} scores for {} documents",
            values.len(),
            expected
        )));
    }

    let mut substituted = 0usize;
    let scores: Vec<f64> = values
        .into_iter()
        .map(|score| match score {
            Some(s) if s.is_finite() => s,
            _ => {
                substituted += 1;
                0.0
            }
        })
        .collect();

    if substituted > 0 {
        warn!(
            "Substituted 0.0 for {} missing or non-finite scores",
            substituted
        );
    }

    Ok(scores)
}
