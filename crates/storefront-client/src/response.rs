//! HTTP response handling.

use http::header::{HeaderMap, HeaderName, HeaderValue, CONTENT_LENGTH, CONTENT_TYPE};
use http::StatusCode;
use serde::de::DeserializeOwned;

/// An HTTP response with its body fully read.
#[derive(Debug, Clone)]
pub struct HttpResponse {
    /// The HTTP status code.
    pub status: u16,
    /// The response headers.
    pub headers: HeaderMap,
    /// The response body.
    pub body: Vec<u8>,
}

impl HttpResponse {
    /// Create a new response.
    pub fn new(status: u16, headers: HeaderMap, body: Vec<u8>) -> Self {
        Self {
            status,
            headers,
            body,
        }
    }

    /// Response with a `Content-Type: application/json` header and a JSON
    /// body.
    pub fn json_body(status: u16, body: &serde_json::Value) -> Self {
        Self::with_content_type(status, "application/json", body.to_string().into_bytes())
    }

    /// Response with the given content type.
    pub fn with_content_type(status: u16, content_type: &str, body: impl Into<Vec<u8>>) -> Self {
        let mut headers = HeaderMap::new();
        if let Ok(value) = HeaderValue::from_str(content_type) {
            headers.insert(CONTENT_TYPE, value);
        }
        Self::new(status, headers, body.into())
    }

    /// Check if the response was successful (2xx status).
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Check if the response was a client error (4xx status).
    pub fn is_client_error(&self) -> bool {
        (400..500).contains(&self.status)
    }

    /// Check if the response was a server error (5xx status).
    pub fn is_server_error(&self) -> bool {
        (500..600).contains(&self.status)
    }

    /// Canonical reason phrase, e.g. "Not Found".
    pub fn reason(&self) -> &'static str {
        StatusCode::from_u16(self.status)
            .ok()
            .and_then(|s| s.canonical_reason())
            .unwrap_or("")
    }

    /// Get the response body as text, replacing invalid UTF-8.
    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }

    /// First `max_chars` characters of the body, for logging.
    pub fn preview(&self, max_chars: usize) -> String {
        self.text().chars().take(max_chars).collect()
    }

    /// Parse the response body as JSON.
    pub fn json<T: DeserializeOwned>(&self) -> Result<T, serde_json::Error> {
        serde_json::from_slice(&self.body)
    }

    /// Get the raw response body.
    pub fn bytes(&self) -> &[u8] {
        &self.body
    }

    /// Get a header value. Lookup is case-insensitive.
    pub fn header(&self, key: &str) -> Option<&str> {
        let name = HeaderName::from_bytes(key.as_bytes()).ok()?;
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }

    /// Get the Content-Type header.
    pub fn content_type(&self) -> Option<&str> {
        self.headers.get(CONTENT_TYPE).and_then(|v| v.to_str().ok())
    }

    /// Get the Content-Length header.
    pub fn content_length(&self) -> Option<usize> {
        self.headers
            .get(CONTENT_LENGTH)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.parse().ok())
    }

    /// True when Content-Type mentions `application/json`.
    pub fn is_json(&self) -> bool {
        self.content_type()
            .is_some_and(|ct| ct.to_ascii_lowercase().contains("application/json"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_response(status: u16, body: &[u8]) -> HttpResponse {
        HttpResponse::new(status, HeaderMap::new(), body.to_vec())
    }

    fn make_response_with_headers(
        status: u16,
        headers: Vec<(&'static str, &'static str)>,
        body: &[u8],
    ) -> HttpResponse {
        let mut map = HeaderMap::new();
        for (k, v) in headers {
            map.insert(HeaderName::from_static(k), HeaderValue::from_static(v));
        }
        HttpResponse::new(status, map, body.to_vec())
    }

    #[test]
    fn test_response_status_ranges() {
        assert!(make_response(200, b"").is_success());
        assert!(make_response(299, b"").is_success());
        assert!(!make_response(300, b"").is_success());
        assert!(make_response(404, b"").is_client_error());
        assert!(!make_response(500, b"").is_client_error());
        assert!(make_response(503, b"").is_server_error());
        assert!(!make_response(600, b"").is_server_error());
    }

    #[test]
    fn test_response_reason() {
        assert_eq!(make_response(404, b"").reason(), "Not Found");
        assert_eq!(make_response(599, b"").reason(), "");
    }

    #[test]
    fn test_response_text_lossy() {
        assert_eq!(make_response(200, b"Hello").text(), "Hello");
        assert_eq!(make_response(200, &[0x61, 0xff]).text(), "a\u{fffd}");
    }

    #[test]
    fn test_response_preview() {
        let body = "x".repeat(500);
        assert_eq!(make_response(200, body.as_bytes()).preview(200).len(), 200);
        assert_eq!(make_response(200, b"short").preview(200), "short");
    }

    #[test]
    fn test_response_json() {
        #[derive(serde::Deserialize, Debug, PartialEq)]
        struct Data {
            value: i32,
        }

        let resp = make_response(200, br#"{"value": 42}"#);
        assert_eq!(resp.json::<Data>().unwrap(), Data { value: 42 });
        assert!(make_response(200, b"not json").json::<Data>().is_err());
    }

    #[test]
    fn test_response_header_case_insensitive() {
        let resp = make_response_with_headers(200, vec![("content-type", "text/html")], b"");
        assert_eq!(resp.header("Content-Type"), Some("text/html"));
        assert_eq!(resp.header("CONTENT-TYPE"), Some("text/html"));
        assert_eq!(resp.header("X-Missing"), None);
    }

    #[test]
    fn test_response_content_length() {
        let resp = make_response_with_headers(200, vec![("content-length", "42")], b"");
        assert_eq!(resp.content_length(), Some(42));
        let bad = make_response_with_headers(200, vec![("content-length", "nope")], b"");
        assert_eq!(bad.content_length(), None);
    }

    #[test]
    fn test_is_json() {
        let charset = HttpResponse::with_content_type(200, "application/json; charset=utf-8", "{}");
        assert!(charset.is_json());
        assert!(!HttpResponse::with_content_type(200, "text/html", "<html>").is_json());
        assert!(!make_response(200, b"{}").is_json());
    }
}
