//! Request and response header filtering.
//!
//! # Responsibilities
//! - Forward only allow-listed client headers to the origin
//! - Always propagate the request id for correlation
//! - Scrub origin response headers the edge layer manages itself
//! - Tag responses that passed through the proxy
//!
//! # Design Decisions
//! - Host is never forwarded; the client sets it from the target URL
//! - Multi-value headers (set-cookie) are preserved intact

use axum::http::{HeaderMap, HeaderName, HeaderValue};

/// Response marker header added to everything the proxy serves.
pub const PROXY_MARKER: &str = "x-visibility-proxy";

/// Request id header, forwarded whenever present.
pub const X_REQUEST_ID: &str = "x-request-id";

/// Copy allow-listed headers from the client request.
pub fn forward_headers(request: &HeaderMap, allow: &[String]) -> HeaderMap {
    let mut headers = HeaderMap::new();
    for name in allow {
        if let Ok(name) = name.parse::<HeaderName>() {
            if let Some(value) = request.get(&name) {
                headers.insert(name, value.clone());
            }
        }
    }
    if let Some(request_id) = request.get(X_REQUEST_ID) {
        headers.insert(HeaderName::from_static(X_REQUEST_ID), request_id.clone());
    }
    headers
}

/// Rebuild origin response headers, dropping the exclude list and adding
/// the proxy marker.
pub fn response_headers(origin: &HeaderMap, exclude: &[String]) -> HeaderMap {
    let mut headers = HeaderMap::new();
    for (name, value) in origin {
        if exclude
            .iter()
            .any(|excluded| name.as_str().eq_ignore_ascii_case(excluded))
        {
            continue;
        }
        headers.append(name.clone(), value.clone());
    }
    headers.insert(
        HeaderName::from_static(PROXY_MARKER),
        HeaderValue::from_static(env!("CARGO_PKG_VERSION")),
    );
    headers
}

#[cfg(test)]
mod tests {
    use super::*;

    fn allow() -> Vec<String> {
        vec!["accept".to_string(), "cookie".to_string()]
    }

    #[test]
    fn forwards_only_allow_listed_headers() {
        let mut request = HeaderMap::new();
        request.insert("accept", HeaderValue::from_static("text/html"));
        request.insert("authorization", HeaderValue::from_static("Bearer t"));

        let forwarded = forward_headers(&request, &allow());
        assert_eq!(forwarded.get("accept").unwrap(), "text/html");
        assert!(forwarded.get("authorization").is_none());
    }

    #[test]
    fn request_id_is_always_forwarded() {
        let mut request = HeaderMap::new();
        request.insert(X_REQUEST_ID, HeaderValue::from_static("abc-123"));

        let forwarded = forward_headers(&request, &allow());
        assert_eq!(forwarded.get(X_REQUEST_ID).unwrap(), "abc-123");
    }

    #[test]
    fn scrubs_excluded_response_headers() {
        let mut origin = HeaderMap::new();
        origin.insert("content-type", HeaderValue::from_static("text/html"));
        origin.insert("content-length", HeaderValue::from_static("120"));
        origin.insert("transfer-encoding", HeaderValue::from_static("chunked"));

        let exclude = vec![
            "content-length".to_string(),
            "transfer-encoding".to_string(),
        ];
        let headers = response_headers(&origin, &exclude);
        assert_eq!(headers.get("content-type").unwrap(), "text/html");
        assert!(headers.get("content-length").is_none());
        assert!(headers.get("transfer-encoding").is_none());
    }

    #[test]
    fn marks_the_response() {
        let headers = response_headers(&HeaderMap::new(), &[]);
        assert_eq!(
            headers.get(PROXY_MARKER).unwrap(),
            env!("CARGO_PKG_VERSION")
        );
    }

    #[test]
    fn preserves_repeated_headers() {
        let mut origin = HeaderMap::new();
        origin.append("set-cookie", HeaderValue::from_static("a=1"));
        origin.append("set-cookie", HeaderValue::from_static("b=2"));

        let headers = response_headers(&origin, &[]);
        assert_eq!(headers.get_all("set-cookie").iter().count(), 2);
    }
}
