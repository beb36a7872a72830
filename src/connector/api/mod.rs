pub mod container;
pub mod controller;
pub mod error;
pub mod router;
pub mod server;

pub use container::{Container, ContainerConfig};
pub use error::{panic_response, ApiError, ErrorResponse};
pub use router::build_router;
pub use server::{serve, shutdown_signal};
