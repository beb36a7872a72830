use std::sync::Arc;

use tracing::{debug, error, warn};

use crate::application::{CrossEncoderLoader, RerankDocumentsUseCase, ScoringService};
use crate::connector::{MockCrossEncoderLoader, OrtCrossEncoderLoader};
use crate::domain::{HealthResponse, ModelConfig};

pub struct ContainerConfig {
    pub model: ModelConfig,
    /// Score with the deterministic mock instead of an ONNX model.
    pub mock_model: bool,
}

/// Process-wide application context handed to every request handler.
pub struct Container {
    scoring_service: Arc<ScoringService>,
    config: ContainerConfig,
}

impl Container {
    pub fn new(config: ContainerConfig) -> Self {
        let loader: Arc<dyn CrossEncoderLoader> = if config.mock_model {
            debug!("Using mock cross-encoder");
            Arc::new(MockCrossEncoderLoader)
        } else {
            debug!("Using ONNX cross-encoder");
            Arc::new(OrtCrossEncoderLoader)
        };

        Self::with_loader(config, loader)
    }

    pub fn with_loader(config: ContainerConfig, loader: Arc<dyn CrossEncoderLoader>) -> Self {
        let scoring_service = Arc::new(ScoringService::new(loader, config.model.clone()));

        Self {
            scoring_service,
            config,
        }
    }

    /// Attempts the one-time model load and reports whether it succeeded.
    ///
    /// A failure is logged and absorbed: the server keeps running so that
    /// `/health` can report the degraded state.
    pub async fn load_model(&self) -> bool {
        let scoring_service = self.scoring_service.clone();

        match tokio::task::spawn_blocking(move || scoring_service.load()).await {
            Ok(Ok(())) => true,
            Ok(Err(e)) => {
                error!("Failed to load model: {}", e);
                warn!("Continuing without a model; rerank requests will be refused");
                false
            }
            Err(e) => {
                error!("Model loading task failed: {}", e);
                false
            }
        }
    }

    pub fn scoring_service(&self) -> Arc<ScoringService> {
        self.scoring_service.clone()
    }

    pub fn rerank_use_case(&self) -> RerankDocumentsUseCase {
        RerankDocumentsUseCase::new(self.scoring_service.clone())
    }

    pub fn health(&self) -> HealthResponse {
        HealthResponse::new(
            self.scoring_service.state(),
            self.scoring_service.model_name(),
        )
    }

    pub fn model_config(&self) -> &ModelConfig {
        &self.config.model
    }
}
