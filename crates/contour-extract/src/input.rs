//! Gathering every channel of a request.

use contour_core::{file, Channel, FileMap};
use serde_json::{Map, Value};

use crate::body::decode_body;
use crate::context::ExtractionContext;
use crate::header::header_map;
use crate::multipart::MultipartConfig;
use crate::path::params_map;
use crate::query::query_map;

/// The raw, unchecked values of every input channel of one request.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ExtractedInput {
    /// The decoded body: JSON, a raw string, or the text parts of a
    /// multipart body.
    pub body: Value,
    /// Query parameters.
    pub query: Map<String, Value>,
    /// Decoded path parameters.
    pub params: Map<String, Value>,
    /// Headers keyed by lowercase name.
    pub headers: Map<String, Value>,
    /// Files from multipart parts, keyed by field name.
    pub files: FileMap,
}

impl ExtractedInput {
    /// Reads all channels from `ctx`.
    ///
    /// Extraction has no failure path. Bodies that cannot be decoded fall
    /// back to a raw string, and malformed multipart bodies keep the parts
    /// decoded before the error.
    ///
    /// # Example
    ///
    /// ```rust
    /// use bytes::Bytes;
    /// use contour_extract::{ExtractedInput, ExtractionContext, MultipartConfig};
    /// use contour_router::Params;
    /// use http::Request;
    /// use serde_json::json;
    ///
    /// # tokio_test::block_on(async {
    /// let request = Request::post("/users?notify=true")
    ///     .body(Bytes::from_static(br#"{"username":"Tarin"}"#))
    ///     .unwrap();
    /// let ctx = ExtractionContext::new(request, Params::new());
    ///
    /// let input = ExtractedInput::extract(&ctx, &MultipartConfig::default()).await;
    /// assert_eq!(input.body, json!({"username": "Tarin"}));
    /// assert_eq!(input.query["notify"], json!("true"));
    /// # });
    /// ```
    pub async fn extract(ctx: &ExtractionContext, config: &MultipartConfig) -> Self {
        let decoded = decode_body(ctx.content_type(), ctx.body().clone(), config).await;
        Self {
            body: decoded.body,
            query: query_map(ctx.query_string()),
            params: params_map(ctx.params()),
            headers: header_map(ctx.headers()),
            files: decoded.files,
        }
    }

    /// Returns the raw value of a channel. Files are described by their
    /// metadata.
    #[must_use]
    pub fn channel_value(&self, channel: Channel) -> Value {
        match channel {
            Channel::Body => self.body.clone(),
            Channel::Query => Value::Object(self.query.clone()),
            Channel::Params => Value::Object(self.params.clone()),
            Channel::Headers => Value::Object(self.headers.clone()),
            Channel::Files => file::metadata(&self.files),
        }
    }
}
