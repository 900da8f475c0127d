//! Error handling for the EventHub client

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

use crate::scheduling::ValidationResult;

/// Unified error type for the EventHub client
#[derive(Error, Debug)]
pub enum Error {
    /// Network or HTTP related errors
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// JSON serialization or deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// URL parsing errors
    #[error("URL error: {0}")]
    Url(#[from] url::ParseError),

    /// A request reached the API and was rejected
    #[error("API error: {0}")]
    Api(#[from] ApiError),

    /// Authentication errors raised locally (no session, no refresh token)
    #[error("Authentication error: {0}")]
    Auth(String),

    /// A session window was rejected by the time conflict validator
    #[error("Validation failed: {}", .0.errors.join("; "))]
    Validation(ValidationResult),

    /// Missing or invalid configuration
    #[error("Configuration error: {0}")]
    Config(String),

    /// General errors
    #[error("{0}")]
    General(String),
}

impl Error {
    /// Create a new authentication error
    pub fn auth<T: fmt::Display>(msg: T) -> Self {
        Error::Auth(msg.to_string())
    }

    /// Create a new configuration error
    pub fn config<T: fmt::Display>(msg: T) -> Self {
        Error::Config(msg.to_string())
    }

    /// Create a new general error
    pub fn general<T: fmt::Display>(msg: T) -> Self {
        Error::General(msg.to_string())
    }

    /// The API error kind, if this error came back from the server
    pub fn api_kind(&self) -> Option<ApiErrorKind> {
        match self {
            Error::Api(err) => Some(err.kind),
            Error::Http(err) if err.is_decode() => Some(ApiErrorKind::UnknownError),
            Error::Http(_) => Some(ApiErrorKind::NetworkError),
            _ => None,
        }
    }

    /// Whether the server rejected the bearer token
    pub fn is_unauthorized(&self) -> bool {
        self.api_kind() == Some(ApiErrorKind::AuthenticationError)
    }
}

/// Closed set of failure kinds reported by the transport layer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ApiErrorKind {
    ValidationError,
    AuthenticationError,
    AuthorizationError,
    NotFound,
    NetworkError,
    ServerError,
    UnknownError,
}

impl ApiErrorKind {
    /// Map an HTTP status code to its kind
    pub fn from_status(status: u16) -> Self {
        match status {
            400 | 422 => ApiErrorKind::ValidationError,
            401 => ApiErrorKind::AuthenticationError,
            403 => ApiErrorKind::AuthorizationError,
            404 => ApiErrorKind::NotFound,
            500..=599 => ApiErrorKind::ServerError,
            _ => ApiErrorKind::UnknownError,
        }
    }

    /// Convert the kind to its string representation
    pub fn as_str(&self) -> &'static str {
        match self {
            ApiErrorKind::ValidationError => "validation error",
            ApiErrorKind::AuthenticationError => "authentication error",
            ApiErrorKind::AuthorizationError => "authorization error",
            ApiErrorKind::NotFound => "not found",
            ApiErrorKind::NetworkError => "network error",
            ApiErrorKind::ServerError => "server error",
            ApiErrorKind::UnknownError => "unknown error",
        }
    }

    fn default_message(&self) -> &'static str {
        match self {
            ApiErrorKind::ValidationError => "The request contains invalid data",
            ApiErrorKind::AuthenticationError => "Authentication required",
            ApiErrorKind::AuthorizationError => "You do not have permission to perform this action",
            ApiErrorKind::NotFound => "The requested resource was not found",
            ApiErrorKind::NetworkError => "Could not reach the server",
            ApiErrorKind::ServerError => "The server encountered an error",
            ApiErrorKind::UnknownError => "An unexpected error occurred",
        }
    }
}

impl fmt::Display for ApiErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Field-level detail attached to a validation failure
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

/// An error response from the API, classified by kind
#[derive(Error, Debug, Clone, PartialEq)]
#[error("{kind}: {message}")]
pub struct ApiError {
    pub kind: ApiErrorKind,
    /// HTTP status, absent for network failures
    pub status: Option<u16>,
    pub message: String,
    pub details: Vec<FieldError>,
}

impl ApiError {
    /// Build an error from a failed response's status and body.
    ///
    /// The body is inspected for a `message`, `error` or `detail` string and
    /// for an `errors` collection, which may be a list of `{field, message}`
    /// objects or a map of field names to one or more messages.
    pub fn from_response(status: u16, body: &str) -> Self {
        let kind = ApiErrorKind::from_status(status);
        let parsed = serde_json::from_str::<Value>(body).ok();

        let message = parsed
            .as_ref()
            .and_then(|value| {
                ["message", "error", "detail"]
                    .iter()
                    .find_map(|key| value.get(*key).and_then(Value::as_str))
                    .map(str::to_string)
            })
            .or_else(|| {
                let text = body.trim();
                (parsed.is_none() && !text.is_empty()).then(|| text.to_string())
            })
            .unwrap_or_else(|| kind.default_message().to_string());

        let details = parsed
            .as_ref()
            .and_then(|value| value.get("errors"))
            .map(parse_field_errors)
            .unwrap_or_default();

        Self {
            kind,
            status: Some(status),
            message,
            details,
        }
    }
}

fn parse_field_errors(errors: &Value) -> Vec<FieldError> {
    match errors {
        Value::Array(items) => items
            .iter()
            .filter_map(|item| {
                let message = item.get("message").and_then(Value::as_str)?;
                let field = item
                    .get("field")
                    .and_then(Value::as_str)
                    .unwrap_or_default();
                Some(FieldError {
                    field: field.to_string(),
                    message: message.to_string(),
                })
            })
            .collect(),
        Value::Object(map) => map
            .iter()
            .flat_map(|(field, messages)| {
                let messages: Vec<String> = match messages {
                    Value::String(message) => vec![message.clone()],
                    Value::Array(list) => list
                        .iter()
                        .filter_map(Value::as_str)
                        .map(str::to_string)
                        .collect(),
                    _ => Vec::new(),
                };
                messages.into_iter().map(move |message| FieldError {
                    field: field.clone(),
                    message,
                })
            })
            .collect(),
        _ => Vec::new(),
    }
}
