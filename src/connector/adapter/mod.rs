mod mock_cross_encoder;
mod ort_cross_encoder;

pub use mock_cross_encoder::*;
pub use ort_cross_encoder::*;
