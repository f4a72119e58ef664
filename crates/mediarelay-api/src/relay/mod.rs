//! Response relay and failure policy for `GET /media/{id}/stream`
//!
//! One stream request moves through these states:
//!
//! ```text
//! Init ──open ok, 2xx──────────> Relaying ──end of body─────> RelayingComplete
//!  │                                │
//!  │                                └──body error/disconnect─> Aborted
//!  ├──timeout/unreachable/3xx-5xx──> FallbackRedirectSent   (redirect policy)
//!  └──timeout/unreachable/3xx-5xx──> ErrorReported          (bad_gateway policy)
//! ```
//!
//! Headers are only ever produced in `Init`; once a relayed response is returned its
//! status and headers are committed and the body is the only thing left to fail.

pub mod body;
pub mod headers;
pub mod policy;

pub use body::RelayBody;
pub use headers::{relay_headers, relay_status};
pub use policy::{FailureResponder, UpstreamErrorBody, UpstreamFailure};

use uuid::Uuid;

/// Lifecycle of one stream request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RelayState {
    Init,
    Relaying,
    RelayingComplete,
    FallbackRedirectSent,
    Aborted,
    ErrorReported,
}

impl RelayState {
    pub fn is_terminal(&self) -> bool {
        !matches!(self, RelayState::Init | RelayState::Relaying)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            RelayState::Init => "init",
            RelayState::Relaying => "relaying",
            RelayState::RelayingComplete => "relaying_complete",
            RelayState::FallbackRedirectSent => "fallback_redirect_sent",
            RelayState::Aborted => "aborted",
            RelayState::ErrorReported => "error_reported",
        }
    }
}

/// What the relay knows about the request it serves, for decisions and logs.
#[derive(Debug, Clone)]
pub struct StreamTarget {
    pub media_id: Uuid,
    /// Stored origin URL, trimmed. Used both for the fetch and as the redirect target.
    pub origin_url: String,
    pub origin_host: String,
    pub mime_type: Option<String>,
}

impl StreamTarget {
    pub fn new(media_id: Uuid, origin_url: String, mime_type: Option<String>) -> Self {
        let origin_url = origin_url.trim().to_string();
        let origin_host = origin_url
            .split_once("://")
            .map(|(_, rest)| rest)
            .and_then(|rest| rest.split(['/', '?', '#']).next())
            .map(|authority| authority.rsplit('@').next().unwrap_or(authority))
            .unwrap_or_default()
            .to_string();

        Self {
            media_id,
            origin_url,
            origin_host,
            mime_type,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn terminal_states() {
        assert!(!RelayState::Init.is_terminal());
        assert!(!RelayState::Relaying.is_terminal());
        assert!(RelayState::RelayingComplete.is_terminal());
        assert!(RelayState::FallbackRedirectSent.is_terminal());
        assert!(RelayState::Aborted.is_terminal());
        assert!(RelayState::ErrorReported.is_terminal());
    }

    #[test]
    fn origin_host_strips_credentials_and_path() {
        let target = StreamTarget::new(
            Uuid::nil(),
            "https://user:pw@cdn.example.com:8443/a/b.mp4?sig=1".to_string(),
            None,
        );
        assert_eq!(target.origin_host, "cdn.example.com:8443");

        let bare = StreamTarget::new(Uuid::nil(), "not a url".to_string(), None);
        assert_eq!(bare.origin_host, "");
    }

    #[test]
    fn stored_url_is_trimmed_once() {
        let target = StreamTarget::new(
            Uuid::nil(),
            "  https://cdn.example.com/a.mp4 \n".to_string(),
            None,
        );
        assert_eq!(target.origin_url, "https://cdn.example.com/a.mp4");
        assert_eq!(target.origin_host, "cdn.example.com");
    }
}
