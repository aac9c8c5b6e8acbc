//! fleet-core: Shared infrastructure for the fleet account services.
pub mod config;
pub mod error;
pub mod observability;

pub use serde;
pub use tracing;
pub use validator;
