use thiserror::Error;

#[derive(Debug, Error)]
pub enum DomainError {
    #[error("Invalid `{field}`: {message}")]
    Validation { field: String, message: String },

    #[error("Model load error: {0}")]
    ModelLoad(String),

    #[error("Model is not loaded")]
    NotLoaded,

    #[error("Scoring error: {0}")]
    Scoring(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl DomainError {
    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Validation {
            field: field.into(),
            message: message.into(),
        }
    }

    pub fn model_load(msg: impl Into<String>) -> Self {
        Self::ModelLoad(msg.into())
    }

    pub fn scoring(msg: impl Into<String>) -> Self {
        Self::Scoring(msg.into())
    }

    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }

    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation { .. })
    }

    pub fn is_not_loaded(&self) -> bool {
        matches!(self, Self::NotLoaded)
    }

    pub fn is_scoring(&self) -> bool {
        matches!(self, Self::Scoring(_))
    }
}
