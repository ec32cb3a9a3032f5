//! Pipeline errors and their wire contracts.
//!
//! [`ContourError`] covers every way a request can fail once it reaches an
//! endpoint, plus the router's not-found case. Each variant knows its HTTP
//! status and its response body:
//!
//! | Variant | Status | Body |
//! |---|---|---|
//! | `Input` | 200 | envelope `Invalid <channel>` with the schema error as `data` |
//! | `MissingSchemas` / `MissingHandler` | 500 | envelope with a fixed message |
//! | `Middleware` / `Handler` | 400 | the error value, verbatim |
//! | `MiddlewareOutput` | 500 | envelope `Invalid middleware output` with the schema error |
//! | `NotFound` | 404 | envelope `Path Not Found` |
//! | `Encoding` | 500 | envelope with the failure message |
//!
//! Input errors answer with 200 by default; servers that prefer a 4xx can
//! override the status per route.

use crate::channel::Channel;
use crate::schema::SchemaError;
use http::StatusCode;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

/// Result type alias using [`ContourError`].
pub type ContourResult<T> = Result<T, ContourError>;

/// Message of the not-found envelope.
pub const NOT_FOUND_MESSAGE: &str = "Path Not Found";

/// Message returned when an endpoint declares neither input nor output.
pub const MISSING_SCHEMAS_MESSAGE: &str = "Both input type and output type were not specified";

/// Message returned when an endpoint has no handler.
pub const MISSING_HANDLER_MESSAGE: &str = "No logic specified by the server";

/// Categories of pipeline failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCategory {
    /// A channel failed to parse or validate.
    Input,
    /// The endpoint is incompletely declared.
    Configuration,
    /// A middleware stage or the handler rejected the request.
    Domain,
    /// No route matched.
    NotFound,
    /// The response could not be produced.
    Internal,
}

impl ErrorCategory {
    /// Returns the snake_case name, as used in serialization and metric
    /// labels.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Input => "input",
            Self::Configuration => "configuration",
            Self::Domain => "domain",
            Self::NotFound => "not_found",
            Self::Internal => "internal",
        }
    }
}

/// A failed request.
#[derive(Error, Debug, Clone)]
pub enum ContourError {
    /// A channel failed to parse or validate.
    #[error("Invalid {channel}")]
    Input {
        /// The failing channel.
        channel: Channel,
        /// The structured schema error.
        #[source]
        error: SchemaError,
    },

    /// The endpoint declares neither input nor output schemas.
    #[error("{}", MISSING_SCHEMAS_MESSAGE)]
    MissingSchemas,

    /// The endpoint has no handler.
    #[error("{}", MISSING_HANDLER_MESSAGE)]
    MissingHandler,

    /// A middleware stage returned an error value.
    #[error("middleware `{stage}` rejected the request")]
    Middleware {
        /// Name of the failing stage.
        stage: String,
        /// The error value, sent verbatim.
        error: Value,
    },

    /// A middleware stage produced output that does not match its schema.
    #[error("Invalid middleware output")]
    MiddlewareOutput {
        /// Name of the stage.
        stage: String,
        /// The structured schema error.
        #[source]
        error: SchemaError,
    },

    /// The handler returned an error value.
    #[error("handler rejected the request")]
    Handler(Value),

    /// No route matched the request.
    #[error("{}", NOT_FOUND_MESSAGE)]
    NotFound,

    /// The response could not be encoded.
    #[error("failed to encode response: {0}")]
    Encoding(String),
}

impl ContourError {
    /// Creates an input error for `channel`.
    #[must_use]
    pub fn input(channel: Channel, error: SchemaError) -> Self {
        Self::Input { channel, error }
    }

    /// Creates a middleware error.
    #[must_use]
    pub fn middleware(stage: impl Into<String>, error: Value) -> Self {
        Self::Middleware {
            stage: stage.into(),
            error,
        }
    }

    /// Returns the error category.
    #[must_use]
    pub const fn category(&self) -> ErrorCategory {
        match self {
            Self::Input { .. } => ErrorCategory::Input,
            Self::MissingSchemas | Self::MissingHandler | Self::MiddlewareOutput { .. } => {
                ErrorCategory::Configuration
            }
            Self::Middleware { .. } | Self::Handler(_) => ErrorCategory::Domain,
            Self::NotFound => ErrorCategory::NotFound,
            Self::Encoding(_) => ErrorCategory::Internal,
        }
    }

    /// Returns the default HTTP status for this error.
    #[must_use]
    pub const fn status_code(&self) -> StatusCode {
        match self.category() {
            ErrorCategory::Input => StatusCode::OK,
            ErrorCategory::Configuration | ErrorCategory::Internal => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
            ErrorCategory::Domain => StatusCode::BAD_REQUEST,
            ErrorCategory::NotFound => StatusCode::NOT_FOUND,
        }
    }

    /// Renders the response body.
    #[must_use]
    pub fn to_body(&self) -> Value {
        match self {
            Self::Middleware { error, .. } | Self::Handler(error) => error.clone(),
            Self::Input { error, .. } | Self::MiddlewareOutput { error, .. } => {
                ErrorEnvelope::with_data(self.to_string(), error.to_value()).to_value()
            }
            _ => ErrorEnvelope::new(self.to_string()).to_value(),
        }
    }
}

/// The `{ status, message, data? }` error envelope.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorEnvelope {
    /// Always `"error"`.
    pub status: String,
    /// Human-readable message.
    pub message: String,
    /// Structured details.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
}

impl ErrorEnvelope {
    /// Creates an envelope without data.
    #[must_use]
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            status: "error".to_string(),
            message: message.into(),
            data: None,
        }
    }

    /// Creates an envelope carrying structured data.
    #[must_use]
    pub fn with_data(message: impl Into<String>, data: Value) -> Self {
        Self {
            data: Some(data),
            ..Self::new(message)
        }
    }

    /// Converts the envelope to JSON.
    #[must_use]
    pub fn to_value(&self) -> Value {
        let mut body = serde_json::json!({
            "status": self.status,
            "message": self.message,
        });
        if let (Some(data), Value::Object(map)) = (&self.data, &mut body) {
            map.insert("data".to_string(), data.clone());
        }
        body
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use indexmap::IndexMap;
    use serde_json::json;

    #[test]
    fn test_input_error_envelope() {
        let mut fields = IndexMap::new();
        fields.insert(
            "username".to_string(),
            SchemaError::message("Expected a string, but found number"),
        );
        let error = ContourError::input(Channel::Body, SchemaError::Fields(fields));

        assert_eq!(error.status_code(), StatusCode::OK);
        assert_eq!(
            error.to_body(),
            json!({
                "status": "error",
                "message": "Invalid body",
                "data": { "username": { "message": "Expected a string, but found number" } }
            })
        );
    }

    #[test]
    fn test_configuration_errors() {
        assert_eq!(
            ContourError::MissingHandler.status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            ContourError::MissingSchemas.to_body(),
            json!({ "status": "error", "message": "Both input type and output type were not specified" })
        );
        assert_eq!(
            ContourError::MissingHandler.to_body(),
            json!({ "status": "error", "message": "No logic specified by the server" })
        );
    }

    #[test]
    fn test_domain_errors_are_verbatim() {
        let error = ContourError::Handler(json!({ "reason": "taken" }));
        assert_eq!(error.status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(error.to_body(), json!({ "reason": "taken" }));

        let error = ContourError::middleware("auth", json!("denied"));
        assert_eq!(error.category(), ErrorCategory::Domain);
        assert_eq!(error.to_body(), json!("denied"));
    }

    #[test]
    fn test_middleware_output_mismatch() {
        let error = ContourError::MiddlewareOutput {
            stage: "auth".to_string(),
            error: SchemaError::message("Expected a string, but found number"),
        };
        assert_eq!(error.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(
            error.to_body(),
            json!({
                "status": "error",
                "message": "Invalid middleware output",
                "data": { "message": "Expected a string, but found number" }
            })
        );
    }

    #[test]
    fn test_not_found() {
        assert_eq!(ContourError::NotFound.status_code(), StatusCode::NOT_FOUND);
        assert_eq!(ContourError::NotFound.category().as_str(), "not_found");
        assert_eq!(
            ContourError::NotFound.to_body(),
            json!({ "status": "error", "message": "Path Not Found" })
        );
    }

    #[test]
    fn test_envelope_serde() {
        let envelope = ErrorEnvelope::new("boom");
        let json = serde_json::to_string(&envelope).unwrap();
        assert!(!json.contains("data"));
        let back: ErrorEnvelope = serde_json::from_str(&json).unwrap();
        assert_eq!(back, envelope);
        assert_eq!(serde_json::to_value(&envelope).unwrap(), envelope.to_value());
    }
}
