//! Handler contract.
//!
//! A handler receives a [`HandlerInput`] and resolves to either an
//! [`Output`] or an error value. The error value is sent back verbatim with
//! status 400, so it should match the endpoint's declared error schema.

use crate::file::FileMap;
use bytes::Bytes;
use serde_json::{Map, Value};
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

/// A boxed, sendable future.
pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// Outcome of a handler.
pub type HandlerResult = Result<Output, Value>;

/// A type-erased handler.
pub type ErasedHandler = Arc<dyn Fn(HandlerInput) -> BoxFuture<'static, HandlerResult> + Send + Sync>;

/// Everything a middleware stage or handler sees about a request.
///
/// Channels with a declared schema carry the parsed value, the others the
/// raw extracted value. `middleware` holds the merged output of every stage
/// that ran before.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct HandlerInput {
    /// The request body.
    pub body: Value,
    /// The query parameters.
    pub query: Value,
    /// The path parameters.
    pub params: Value,
    /// The request headers, keyed by lowercase name.
    pub headers: Value,
    /// The uploaded files.
    pub files: FileMap,
    /// Accumulated middleware output.
    pub middleware: Map<String, Value>,
}

impl HandlerInput {
    /// Returns a string field of the path parameters.
    #[must_use]
    pub fn param(&self, name: &str) -> Option<&str> {
        self.params.get(name).and_then(Value::as_str)
    }

    /// Returns a field of the query parameters.
    #[must_use]
    pub fn query_value(&self, name: &str) -> Option<&Value> {
        self.query.get(name)
    }

    /// Returns a header value as a string.
    #[must_use]
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .get(name.to_ascii_lowercase())
            .and_then(Value::as_str)
    }

    /// Returns a value produced by an earlier middleware stage.
    #[must_use]
    pub fn middleware_value(&self, key: &str) -> Option<&Value> {
        self.middleware.get(key)
    }
}

/// A successful handler result.
///
/// # Example
///
/// ```
/// use contour_core::Output;
/// use serde_json::json;
///
/// let output = Output::json(json!({ "id": 7 })).header("x-request-cost", 3);
/// assert_eq!(output.headers["x-request-cost"], json!(3));
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Output {
    /// The response body. Absent bodies are sent as `{}`.
    pub body: Option<Value>,
    /// Response headers. Strings are sent as-is, numbers and booleans are
    /// stringified and arrays become repeated headers.
    pub headers: Map<String, Value>,
    /// Files to send back as multipart parts.
    pub files: FileMap,
    /// A pre-encoded body. When set it replaces `body` and `files`.
    pub raw: Option<RawBody>,
}

/// A response body sent as-is under its own content type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawBody {
    /// Value of the `Content-Type` header.
    pub content_type: String,
    /// The encoded payload.
    pub bytes: Bytes,
}

impl Output {
    /// Creates an empty output.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an output with a JSON body.
    #[must_use]
    pub fn json(body: Value) -> Self {
        Self {
            body: Some(body),
            ..Self::default()
        }
    }

    /// Creates an output sent verbatim with `content_type`.
    #[must_use]
    pub fn raw(content_type: impl Into<String>, bytes: impl Into<Bytes>) -> Self {
        Self {
            raw: Some(RawBody {
                content_type: content_type.into(),
                bytes: bytes.into(),
            }),
            ..Self::default()
        }
    }

    /// Creates a `text/html` output.
    #[must_use]
    pub fn html(page: impl Into<String>) -> Self {
        Self::raw("text/html; charset=utf-8", page.into())
    }

    /// Sets the body.
    #[must_use]
    pub fn body(mut self, body: Value) -> Self {
        self.body = Some(body);
        self
    }

    /// Adds a response header.
    #[must_use]
    pub fn header(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.headers.insert(name.into(), value.into());
        self
    }

    /// Adds a file.
    #[must_use]
    pub fn file(mut self, field: impl Into<String>, file: crate::UploadedFile) -> Self {
        self.files.insert(field.into(), file);
        self
    }
}

/// Erases an async handler function.
pub fn erase<F, Fut>(handler: F) -> ErasedHandler
where
    F: Fn(HandlerInput) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = HandlerResult> + Send + 'static,
{
    Arc::new(move |input: HandlerInput| -> BoxFuture<'static, HandlerResult> {
        Box::pin(handler(input))
    })
}

/// Erases a synchronous handler function.
pub fn erase_sync<F>(handler: F) -> ErasedHandler
where
    F: Fn(HandlerInput) -> HandlerResult + Send + Sync + 'static,
{
    let handler = Arc::new(handler);
    Arc::new(move |input: HandlerInput| -> BoxFuture<'static, HandlerResult> {
        let handler = Arc::clone(&handler);
        Box::pin(async move { handler(input) })
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn test_erased_async_handler() {
        let handler = erase(|input: HandlerInput| async move {
            let name = input.param("name").unwrap_or("nobody").to_string();
            Ok::<_, Value>(Output::json(json!({ "hello": name })))
        });
        let input = HandlerInput {
            params: json!({ "name": "Ada" }),
            ..HandlerInput::default()
        };
        let output = handler(input).await.unwrap();
        assert_eq!(output.body, Some(json!({ "hello": "Ada" })));
    }

    #[tokio::test]
    async fn test_erased_sync_handler_error() {
        let handler = erase_sync(|_| Err(json!({ "reason": "nope" })));
        let error = handler(HandlerInput::default()).await.unwrap_err();
        assert_eq!(error, json!({ "reason": "nope" }));
    }

    #[test]
    fn test_header_lookup_is_case_insensitive() {
        let input = HandlerInput {
            headers: json!({ "x-token": "abc" }),
            ..HandlerInput::default()
        };
        assert_eq!(input.header("X-Token"), Some("abc"));
        assert_eq!(input.header("missing"), None);
    }

    #[test]
    fn test_html_output_is_raw() {
        let output = Output::html("<p>hi</p>");
        let raw = output.raw.unwrap();
        assert_eq!(raw.content_type, "text/html; charset=utf-8");
        assert_eq!(raw.bytes, Bytes::from_static(b"<p>hi</p>"));
        assert!(output.body.is_none());
    }
}
