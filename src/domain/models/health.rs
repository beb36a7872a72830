use serde::{Deserialize, Serialize};

use super::ModelState;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HealthStatus {
    Healthy,
    /// The process is up but the model failed to load; scoring is unavailable.
    Degraded,
}

impl From<ModelState> for HealthStatus {
    fn from(state: ModelState) -> Self {
        if state.is_loaded() {
            Self::Healthy
        } else {
            Self::Degraded
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: HealthStatus,
    pub model_loaded: bool,
    pub version: String,
    pub model_name: String,
}

impl HealthResponse {
    pub fn new(state: ModelState, model_name: impl Into<String>) -> Self {
        Self {
            status: state.into(),
            model_loaded: state.is_loaded(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            model_name: model_name.into(),
        }
    }
}
