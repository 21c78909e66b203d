//! Request descriptors and the wire-level request handed to a transport.

use crate::ApiError;
use http::header::{HeaderMap, HeaderName, HeaderValue, ACCEPT, AUTHORIZATION, CONTENT_TYPE};
use serde::Serialize;
use serde_json::Value;

/// HTTP methods used by the storefront API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Method {
    Get,
    Post,
    Put,
    Delete,
}

impl Method {
    /// Convert to HTTP method string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Method::Get => "GET",
            Method::Post => "POST",
            Method::Put => "PUT",
            Method::Delete => "DELETE",
        }
    }

    pub fn as_http(&self) -> http::Method {
        match self {
            Method::Get => http::Method::GET,
            Method::Post => http::Method::POST,
            Method::Put => http::Method::PUT,
            Method::Delete => http::Method::DELETE,
        }
    }

    /// Only POST and PUT carry a body.
    pub fn allows_body(&self) -> bool {
        matches!(self, Method::Post | Method::Put)
    }
}

/// One logical API call: what to send and whether to attach the session
/// token.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiRequest {
    pub method: Method,
    /// Path relative to the base URL, or an absolute URL.
    pub path: String,
    pub body: Option<Value>,
    pub requires_auth: bool,
}

impl ApiRequest {
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            body: None,
            requires_auth: false,
        }
    }

    pub fn get(path: impl Into<String>) -> Self {
        Self::new(Method::Get, path)
    }

    pub fn post(path: impl Into<String>) -> Self {
        Self::new(Method::Post, path)
    }

    pub fn put(path: impl Into<String>) -> Self {
        Self::new(Method::Put, path)
    }

    pub fn delete(path: impl Into<String>) -> Self {
        Self::new(Method::Delete, path)
    }

    /// Attach a JSON body. Ignored on the wire for GET and DELETE.
    pub fn json<T: Serialize + ?Sized>(mut self, body: &T) -> Result<Self, ApiError> {
        let value =
            serde_json::to_value(body).map_err(|e| ApiError::InvalidRequest(e.to_string()))?;
        self.body = Some(value);
        Ok(self)
    }

    /// Mark whether the session token should be attached.
    pub fn auth(mut self, requires_auth: bool) -> Self {
        self.requires_auth = requires_auth;
        self
    }
}

/// A fully resolved request as sent by a [`Transport`](crate::Transport).
#[derive(Debug, Clone)]
pub struct HttpRequest {
    pub method: Method,
    pub url: String,
    pub headers: HeaderMap,
    pub body: Option<Vec<u8>>,
}

impl HttpRequest {
    /// Create a new request with no headers.
    pub fn new(method: Method, url: impl Into<String>) -> Self {
        Self {
            method,
            url: url.into(),
            headers: HeaderMap::new(),
            body: None,
        }
    }

    /// Create a request with the JSON `Content-Type` and `Accept` headers
    /// every API call carries.
    pub fn json_api(method: Method, url: impl Into<String>) -> Self {
        let mut request = Self::new(method, url);
        let json = HeaderValue::from_static("application/json");
        request.headers.insert(CONTENT_TYPE, json.clone());
        request.headers.insert(ACCEPT, json);
        request
    }

    /// Add a header to the request.
    pub fn header(mut self, name: HeaderName, value: HeaderValue) -> Self {
        self.headers.insert(name, value);
        self
    }

    /// Set the request body as raw bytes.
    pub fn body(mut self, body: impl Into<Vec<u8>>) -> Self {
        self.body = Some(body.into());
        self
    }

    /// Add a bearer token authorization header.
    ///
    /// The value is marked sensitive so it is redacted from `Debug` output.
    pub fn bearer_auth(mut self, token: &str) -> Result<Self, ApiError> {
        let mut value = HeaderValue::from_str(&format!("Bearer {}", token))
            .map_err(|_| ApiError::InvalidRequest("token contains invalid header characters".into()))?;
        value.set_sensitive(true);
        self.headers.insert(AUTHORIZATION, value);
        Ok(self)
    }

    /// Get a header value as a string.
    pub fn header_str(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }

    /// Body parsed as JSON, for inspection in tests and logs.
    pub fn json_body(&self) -> Option<Value> {
        self.body
            .as_deref()
            .and_then(|b| serde_json::from_slice(b).ok())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_method_as_str() {
        assert_eq!(Method::Get.as_str(), "GET");
        assert_eq!(Method::Delete.as_http(), http::Method::DELETE);
        assert!(Method::Post.allows_body());
        assert!(Method::Put.allows_body());
        assert!(!Method::Get.allows_body());
        assert!(!Method::Delete.allows_body());
    }

    #[test]
    fn test_api_request_builder() {
        let request = ApiRequest::post("/api/discounts/validate")
            .json(&json!({"code": "SAVE", "amount": 35}))
            .unwrap()
            .auth(false);
        assert_eq!(request.method, Method::Post);
        assert_eq!(request.body, Some(json!({"code": "SAVE", "amount": 35})));
        assert!(!request.requires_auth);
    }

    #[test]
    fn test_json_api_headers() {
        let request = HttpRequest::json_api(Method::Get, "http://api.test/x");
        assert_eq!(request.header_str("content-type"), Some("application/json"));
        assert_eq!(request.header_str("Accept"), Some("application/json"));
        assert!(request.header_str("authorization").is_none());
    }

    #[test]
    fn test_bearer_auth() {
        let request = HttpRequest::new(Method::Get, "http://api.test/x")
            .bearer_auth("abc")
            .unwrap();
        assert_eq!(request.header_str("Authorization"), Some("Bearer abc"));
        assert!(!format!("{:?}", request.headers).contains("abc"));
    }

    #[test]
    fn test_bearer_auth_rejects_newline() {
        let result = HttpRequest::new(Method::Get, "http://api.test/x").bearer_auth("a\nb");
        assert!(matches!(result, Err(ApiError::InvalidRequest(_))));
    }

    #[test]
    fn test_json_body() {
        let request = HttpRequest::new(Method::Post, "http://api.test/x").body(br#"{"a":1}"#.to_vec());
        assert_eq!(request.json_body(), Some(json!({"a": 1})));
    }
}
