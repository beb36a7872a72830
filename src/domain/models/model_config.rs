use serde::{Deserialize, Serialize};

pub const DEFAULT_MODEL_NAME: &str = "BAAI/bge-reranker-v2-m3";

/// Selects which cross-encoder gets loaded and at what precision.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModelConfig {
    /// Hugging Face model id, or a local directory holding the model files
    pub model_name: String,
    /// Prefer a reduced-precision (fp16) export when the model provides one
    pub use_fp16: bool,
}

impl ModelConfig {
    pub fn new(model_name: impl Into<String>, use_fp16: bool) -> Self {
        Self {
            model_name: model_name.into(),
            use_fp16,
        }
    }
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            model_name: DEFAULT_MODEL_NAME.to_string(),
            use_fp16: true,
        }
    }
}
