pub mod health_controller;
pub mod rerank_controller;
pub mod root_controller;
