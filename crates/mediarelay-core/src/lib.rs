//! Mediarelay Core Library
//!
//! Domain models, error types and configuration shared by every Mediarelay crate.

pub mod config;
pub mod constants;
pub mod error;
pub mod models;

// Re-export commonly used types
pub use config::{BaseConfig, BodyStrategy, Config, FailurePolicy, LogFormat, RelayConfig};
pub use error::{AppError, ErrorMetadata, LogLevel};
pub use models::{MediaKind, MediaLocation, MediaRecord};
