//! # Application Layer
//!
//! Scoring lifecycle and reranking orchestration on top of the domain models.

pub mod interfaces;
pub mod use_cases;

pub use interfaces::*;
pub use use_cases::*;
