pub mod application;
pub mod cli;
pub mod connector;
pub mod domain;

pub use application::{
    coerce_scores, CrossEncoder, CrossEncoderLoader, RawScores, RerankDocumentsUseCase,
    ScoreBatch, ScoringService,
};

pub use connector::{
    build_router, serve, shutdown_signal, ApiError, Container, ContainerConfig, ErrorResponse,
    MockCrossEncoder, MockCrossEncoderLoader, OrtCrossEncoder, OrtCrossEncoderLoader,
};

pub use domain::{
    DomainError, HealthResponse, HealthStatus, ModelConfig, ModelState, RankedDocuments,
    RerankRequest, RerankResponse, ScoredResult, DEFAULT_MODEL_NAME, MAX_DOCUMENTS,
};
