//! # Domain Layer
//!
//! Request/response models, model lifecycle state and the error taxonomy.
//! This layer is independent of the inference runtime and the HTTP framework.

pub mod error;
pub mod models;

pub use error::*;
pub use models::*;
