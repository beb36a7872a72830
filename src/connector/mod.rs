//! # Connector Layer
//!
//! External integrations implementing the application interfaces:
//! - Cross-encoder inference (ONNX Runtime, plus a deterministic mock)
//! - HTTP API (axum router, controllers, error mapping)

pub mod adapter;
pub mod api;

pub use adapter::*;
pub use api::*;
