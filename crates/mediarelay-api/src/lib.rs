//! Mediarelay API Library
//!
//! HTTP handlers, the streaming relay and its failure policy, and application setup.

mod api_doc;
mod handlers;

pub mod error;
pub mod relay;
pub mod setup;
pub mod state;

// Re-exports
pub use api_doc::{get_openapi_spec, ApiDoc};
pub use error::{ErrorResponse, HttpAppError};
