//! Error types module
//!
//! This module provides the core error type used throughout Mediarelay.
//! `AppError` self-describes its HTTP rendering through [`ErrorMetadata`]; the api crate
//! turns it into a response. Upstream failures on the stream path are not `AppError`s:
//! they go through the failure policy instead.

/// Log level for error reporting
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    /// Debug level - for expected errors like unknown ids
    Debug,
    /// Warning level - for recoverable issues
    Warn,
    /// Error level - for unexpected failures
    Error,
}

/// Metadata for error responses - defines how an error should be presented
pub trait ErrorMetadata {
    /// HTTP status code to return
    fn http_status_code(&self) -> u16;

    /// Machine-readable error code (e.g., "NOT_FOUND")
    fn error_code(&self) -> &'static str;

    /// Whether this error is recoverable (can be retried)
    fn is_recoverable(&self) -> bool;

    /// Suggested action for the client
    fn suggested_action(&self) -> Option<&'static str>;

    /// Client-facing message (may differ from internal error message)
    fn client_message(&self) -> String;

    /// Whether details should be hidden in production
    fn is_sensitive(&self) -> bool;

    /// Log level for this error
    fn log_level(&self) -> LogLevel;
}

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Catalog error: {0}")]
    Catalog(String),

    #[error("Invalid origin URL: {0}")]
    InvalidOriginUrl(String),
}

/// Static metadata for each variant: (http_status, error_code, recoverable, suggested_action, sensitive, log_level).
fn app_error_static_metadata(
    err: &AppError,
) -> (
    u16,
    &'static str,
    bool,
    Option<&'static str>,
    bool,
    LogLevel,
) {
    match err {
        AppError::NotFound(_) => (
            404,
            "NOT_FOUND",
            false,
            Some("Verify the resource ID exists"),
            false,
            LogLevel::Debug,
        ),
        AppError::Catalog(_) => (
            500,
            "CATALOG_ERROR",
            true,
            Some("Retry after a short delay"),
            true,
            LogLevel::Error,
        ),
        AppError::InvalidOriginUrl(_) => (
            500,
            "INVALID_ORIGIN_URL",
            false,
            Some("Contact support if this error persists"),
            true,
            LogLevel::Error,
        ),
    }
}

impl AppError {
    /// Get the error type name for detailed error responses
    pub fn error_type(&self) -> &str {
        match self {
            AppError::NotFound(_) => "NotFound",
            AppError::Catalog(_) => "Catalog",
            AppError::InvalidOriginUrl(_) => "InvalidOriginUrl",
        }
    }
}

impl ErrorMetadata for AppError {
    fn http_status_code(&self) -> u16 {
        app_error_static_metadata(self).0
    }

    fn error_code(&self) -> &'static str {
        app_error_static_metadata(self).1
    }

    fn is_recoverable(&self) -> bool {
        app_error_static_metadata(self).2
    }

    fn suggested_action(&self) -> Option<&'static str> {
        app_error_static_metadata(self).3
    }

    fn is_sensitive(&self) -> bool {
        app_error_static_metadata(self).4
    }

    fn log_level(&self) -> LogLevel {
        app_error_static_metadata(self).5
    }

    fn client_message(&self) -> String {
        match self {
            AppError::NotFound(ref msg) => msg.clone(),
            AppError::Catalog(_) => "Failed to look up media".to_string(),
            AppError::InvalidOriginUrl(_) => "Stored media location is invalid".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_metadata_not_found() {
        let err = AppError::NotFound("Media not found".to_string());
        assert_eq!(err.http_status_code(), 404);
        assert_eq!(err.error_code(), "NOT_FOUND");
        assert!(!err.is_recoverable());
        assert_eq!(err.client_message(), "Media not found");
        assert!(!err.is_sensitive());
        assert_eq!(err.log_level(), LogLevel::Debug);
    }

    #[test]
    fn test_error_metadata_catalog_is_sensitive() {
        let err = AppError::Catalog("file unreadable".to_string());
        assert_eq!(err.http_status_code(), 500);
        assert_eq!(err.error_code(), "CATALOG_ERROR");
        assert!(err.is_recoverable());
        assert!(err.is_sensitive());
        assert_eq!(err.client_message(), "Failed to look up media");
    }

    #[test]
    fn test_error_metadata_invalid_origin_url() {
        let err = AppError::InvalidOriginUrl("ftp://example.com/a.mp4".to_string());
        assert_eq!(err.http_status_code(), 500);
        assert_eq!(err.error_code(), "INVALID_ORIGIN_URL");
        assert!(!err.client_message().contains("ftp"));
        assert_eq!(err.log_level(), LogLevel::Error);
    }

    #[test]
    fn test_every_variant_is_a_lookup_or_origin_failure() {
        let errors = [
            AppError::NotFound("Media not found".to_string()),
            AppError::Catalog("unreadable".to_string()),
            AppError::InvalidOriginUrl("ftp://x".to_string()),
        ];
        let codes: Vec<_> = errors.iter().map(|e| e.error_code()).collect();
        assert_eq!(codes, ["NOT_FOUND", "CATALOG_ERROR", "INVALID_ORIGIN_URL"]);
        assert_eq!(errors[1].error_type(), "Catalog");
    }
}
