//! Range header parser/forwarder
//!
//! Extracts the client's `Range` header for forwarding to the origin. The value is
//! forwarded verbatim: byte-range syntax is the origin's business, and an origin that
//! cannot satisfy a range simply answers 200 with the whole object.

use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, RANGE};

/// Headers sent on the upstream request.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ForwardHeaders {
    range: Option<HeaderValue>,
}

impl ForwardHeaders {
    /// Request the whole resource.
    pub fn whole_resource() -> Self {
        Self::default()
    }

    /// Build from the inbound request headers. Never fails.
    ///
    /// The `Range` value is kept only when exactly one header is present and it is a
    /// plain visible-ASCII string. Repeated, empty or opaque values are treated as
    /// absent, i.e. a request for the whole resource.
    pub fn from_request_headers(headers: &HeaderMap) -> Self {
        let mut values = headers.get_all(RANGE).iter();
        let range = match (values.next(), values.next()) {
            (Some(value), None) => value
                .to_str()
                .ok()
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .and_then(|s| HeaderValue::from_str(s).ok()),
            _ => None,
        };

        Self { range }
    }

    pub fn range(&self) -> Option<&HeaderValue> {
        self.range.as_ref()
    }

    pub fn has_range(&self) -> bool {
        self.range.is_some()
    }

    /// Header map for the upstream request: `Range` when present, and always `Accept: */*`.
    pub fn to_header_map(&self) -> HeaderMap {
        let mut headers = HeaderMap::with_capacity(2);
        headers.insert(ACCEPT, HeaderValue::from_static("*/*"));
        if let Some(range) = &self.range {
            headers.insert(RANGE, range.clone());
        }
        headers
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn headers_with(values: &[&[u8]]) -> HeaderMap {
        let mut headers = HeaderMap::new();
        for value in values {
            headers.append(RANGE, HeaderValue::from_bytes(value).unwrap());
        }
        headers
    }

    #[test]
    fn absent_range_requests_whole_resource() {
        let forward = ForwardHeaders::from_request_headers(&HeaderMap::new());
        assert_eq!(forward, ForwardHeaders::whole_resource());

        let map = forward.to_header_map();
        assert_eq!(map.get(ACCEPT).unwrap(), "*/*");
        assert!(map.get(RANGE).is_none());
    }

    #[test]
    fn single_range_is_forwarded_verbatim() {
        let forward = ForwardHeaders::from_request_headers(&headers_with(&[b"bytes=0-1023"]));
        assert!(forward.has_range());

        let map = forward.to_header_map();
        assert_eq!(map.get(RANGE).unwrap(), "bytes=0-1023");
        assert_eq!(map.get(ACCEPT).unwrap(), "*/*");
    }

    #[test]
    fn range_syntax_is_not_validated() {
        let forward = ForwardHeaders::from_request_headers(&headers_with(&[b"items=5-"]));
        assert_eq!(forward.range().unwrap(), "items=5-");
    }

    #[test]
    fn repeated_range_header_is_ignored() {
        let forward =
            ForwardHeaders::from_request_headers(&headers_with(&[b"bytes=0-1", b"bytes=2-3"]));
        assert!(!forward.has_range());
    }

    #[test]
    fn empty_or_opaque_range_is_ignored() {
        assert!(!ForwardHeaders::from_request_headers(&headers_with(&[b"   "])).has_range());
        assert!(
            !ForwardHeaders::from_request_headers(&headers_with(&[b"bytes=\xff-1"])).has_range()
        );
    }
}
