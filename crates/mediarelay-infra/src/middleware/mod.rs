//! Shared HTTP middleware for the relay service

pub mod request_id;
pub mod security_headers;

pub use request_id::{get_request_id, request_id_middleware, RequestId, X_REQUEST_ID};
pub use security_headers::{security_headers_middleware, SecurityHeadersConfig};
