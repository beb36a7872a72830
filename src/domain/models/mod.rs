mod health;
mod model_config;
mod model_state;
mod rerank_request;
mod rerank_response;

pub use health::*;
pub use model_config::*;
pub use model_state::*;
pub use rerank_request::*;
pub use rerank_response::*;
