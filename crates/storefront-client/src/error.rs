//! Typed API errors.
//!
//! Every failure of an API call is reported as one [`ApiError`]. Status code
//! `0` always means the request never produced a usable server answer
//! (timeout, unreachable host, non-JSON or malformed body); any code >= 100
//! came from a parsed server response.

use serde_json::Value;
use std::collections::BTreeMap;
use thiserror::Error;

/// Field name to validation messages.
pub type FieldErrors = BTreeMap<String, Vec<String>>;

/// Message used for timeouts.
pub const TIMEOUT_MESSAGE: &str = "Request timeout. Please try again.";

/// Broad classification of an [`ApiError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorClass {
    /// The request never got a usable answer (status 0).
    Transport,
    /// The server answered with a non-2xx status.
    Application,
    /// Anything else (status 0).
    Unknown,
}

/// Errors returned by the API client.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ApiError {
    /// Request exceeded the configured timeout.
    #[error("Request timeout. Please try again.")]
    Timeout,

    /// Could not reach the server. The message carries configuration
    /// diagnostics.
    #[error("{message}")]
    Network { url: String, message: String },

    /// The server answered with something other than JSON.
    #[error("{message}")]
    NonJson {
        http_status: u16,
        content_type: Option<String>,
        message: String,
    },

    /// The body claimed to be JSON but did not parse.
    #[error("Failed to parse JSON response: {0}")]
    MalformedJson(String),

    /// The payload parsed but did not match the expected shape.
    #[error("Unexpected response payload: {0}")]
    Decode(String),

    /// The request could not be built (body serialization, header value).
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// The server rejected the request.
    #[error("{message}")]
    Server {
        status: u16,
        message: String,
        errors: Option<FieldErrors>,
    },

    /// Any other failure.
    #[error("{0}")]
    Unknown(String),
}

impl ApiError {
    /// Server status for [`ApiError::Server`], `0` for everything else.
    pub fn status_code(&self) -> u16 {
        match self {
            ApiError::Server { status, .. } => *status,
            _ => 0,
        }
    }

    /// User-facing message.
    pub fn message(&self) -> String {
        self.to_string()
    }

    /// Per-field validation messages, if the server sent any.
    pub fn field_errors(&self) -> Option<&FieldErrors> {
        match self {
            ApiError::Server { errors, .. } => errors.as_ref(),
            _ => None,
        }
    }

    pub fn class(&self) -> ErrorClass {
        match self {
            ApiError::Timeout
            | ApiError::Network { .. }
            | ApiError::NonJson { .. }
            | ApiError::MalformedJson(_) => ErrorClass::Transport,
            ApiError::Server { .. } => ErrorClass::Application,
            ApiError::Decode(_) | ApiError::InvalidRequest(_) | ApiError::Unknown(_) => {
                ErrorClass::Unknown
            }
        }
    }

    pub fn is_timeout(&self) -> bool {
        matches!(self, ApiError::Timeout)
    }

    /// 401 from the server.
    pub fn is_unauthorized(&self) -> bool {
        self.status_code() == 401
    }
}

/// Errors reported by a [`Transport`](crate::Transport) implementation.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TransportError {
    #[error("Transport timeout")]
    Timeout,

    /// Connection could not be established or was dropped.
    #[error("Connection failed: {0}")]
    Connect(String),

    #[error("{0}")]
    Other(String),
}

/// Error body shape sent by the backend on non-2xx responses:
/// `{"message": "...", "errors": {"field": ["..."]}}`.
#[derive(Debug, Default, PartialEq)]
pub(crate) struct ErrorBody {
    pub message: Option<String>,
    pub errors: Option<FieldErrors>,
}

impl ErrorBody {
    /// Pull what we can out of a parsed body. Unexpected shapes are ignored.
    pub(crate) fn from_value(body: &Value) -> Self {
        let message = body
            .get("message")
            .and_then(Value::as_str)
            .filter(|m| !m.trim().is_empty())
            .map(str::to_string);

        Self {
            message,
            errors: body.get("errors").and_then(field_errors_from_value),
        }
    }
}

/// Accepts `{"field": ["a", "b"]}` as well as `{"field": "a"}`.
fn field_errors_from_value(value: &Value) -> Option<FieldErrors> {
    let map = value.as_object()?;
    let errors: FieldErrors = map
        .iter()
        .filter_map(|(field, messages)| match messages {
            Value::String(message) => Some((field.clone(), vec![message.clone()])),
            Value::Array(items) => Some((
                field.clone(),
                items
                    .iter()
                    .filter_map(Value::as_str)
                    .map(str::to_string)
                    .collect(),
            )),
            _ => None,
        })
        .collect();

    (!errors.is_empty()).then_some(errors)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_code_zero_for_transport_errors() {
        assert_eq!(ApiError::Timeout.status_code(), 0);
        assert_eq!(ApiError::MalformedJson("eof".into()).status_code(), 0);
        assert_eq!(
            ApiError::NonJson {
                http_status: 404,
                content_type: Some("text/html".into()),
                message: "x".into()
            }
            .status_code(),
            0
        );
        assert_eq!(ApiError::Unknown("boom".into()).status_code(), 0);
    }

    #[test]
    fn test_server_error_accessors() {
        let mut errors = FieldErrors::new();
        errors.insert("phone".into(), vec!["invalid".into()]);
        let err = ApiError::Server {
            status: 422,
            message: "bad".into(),
            errors: Some(errors),
        };

        assert_eq!(err.status_code(), 422);
        assert_eq!(err.message(), "bad");
        assert_eq!(err.class(), ErrorClass::Application);
        assert_eq!(err.field_errors().unwrap()["phone"], vec!["invalid".to_string()]);
    }

    #[test]
    fn test_classification() {
        assert_eq!(ApiError::Timeout.class(), ErrorClass::Transport);
        assert_eq!(ApiError::Decode("x".into()).class(), ErrorClass::Unknown);
        assert_eq!(ApiError::Timeout.message(), TIMEOUT_MESSAGE);
    }

    #[test]
    fn test_error_body_field_error_shapes() {
        let body = ErrorBody::from_value(&serde_json::json!({
            "message": "Validation failed",
            "errors": {"phone": ["invalid", "too short"], "email": "taken", "n": 3}
        }));
        assert_eq!(body.message.as_deref(), Some("Validation failed"));
        let errors = body.errors.unwrap();
        assert_eq!(errors["phone"].len(), 2);
        assert_eq!(errors["email"], vec!["taken".to_string()]);
        assert!(!errors.contains_key("n"));
    }

    #[test]
    fn test_error_body_odd_shapes() {
        let body = ErrorBody::from_value(&serde_json::json!({"message": "nope", "errors": "whatever"}));
        assert_eq!(body.message.as_deref(), Some("nope"));
        assert!(body.errors.is_none());

        assert_eq!(ErrorBody::from_value(&serde_json::json!({"message": ""})), ErrorBody::default());
        assert_eq!(ErrorBody::from_value(&serde_json::json!([1, 2])), ErrorBody::default());
    }
}
