mod rerank_documents;
mod scoring;

pub use rerank_documents::*;
pub use scoring::*;
