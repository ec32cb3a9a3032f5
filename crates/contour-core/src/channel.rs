//! Input and output channels.
//!
//! A request carries up to five channels of input (body, query, params,
//! headers, files) and a response up to three (body, headers, files). An
//! endpoint may attach a schema to each; a channel without a schema passes
//! its raw value through unchecked.

use crate::schema::Schema;
use serde::{Deserialize, Serialize};
use std::fmt;

/// One input channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Channel {
    /// The request body.
    Body,
    /// The query string.
    Query,
    /// The path parameters.
    Params,
    /// The request headers.
    Headers,
    /// The uploaded files.
    Files,
}

impl Channel {
    /// Channels checked by `parse`, in order. Files are only validated.
    pub const PARSED: [Channel; 4] = [Self::Body, Self::Query, Self::Params, Self::Headers];

    /// Channels checked by `validate`, in order.
    pub const VALIDATED: [Channel; 5] = [
        Self::Body,
        Self::Query,
        Self::Params,
        Self::Headers,
        Self::Files,
    ];

    /// Returns the lowercase channel name.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Body => "body",
            Self::Query => "query",
            Self::Params => "params",
            Self::Headers => "headers",
            Self::Files => "files",
        }
    }
}

impl fmt::Display for Channel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Schemas for the input channels of an endpoint.
///
/// # Example
///
/// ```
/// use contour_core::{schema, Channel, InputSchemas};
///
/// let input = InputSchemas::new()
///     .params(schema::object().field("id", schema::string()))
///     .query(schema::object().field("verbose", schema::boolean().optional()));
///
/// assert!(input.get(Channel::Params).is_some());
/// assert!(input.get(Channel::Body).is_none());
/// ```
#[derive(Debug, Clone, Default)]
pub struct InputSchemas {
    body: Option<Schema>,
    query: Option<Schema>,
    params: Option<Schema>,
    headers: Option<Schema>,
    files: Option<Schema>,
}

impl InputSchemas {
    /// Creates a bundle with no channel schemas.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the body schema.
    #[must_use]
    pub fn body(mut self, schema: impl Into<Schema>) -> Self {
        self.body = Some(schema.into());
        self
    }

    /// Sets the query schema.
    #[must_use]
    pub fn query(mut self, schema: impl Into<Schema>) -> Self {
        self.query = Some(schema.into());
        self
    }

    /// Sets the path parameter schema.
    #[must_use]
    pub fn params(mut self, schema: impl Into<Schema>) -> Self {
        self.params = Some(schema.into());
        self
    }

    /// Sets the header schema. Header names are matched lowercase.
    #[must_use]
    pub fn headers(mut self, schema: impl Into<Schema>) -> Self {
        self.headers = Some(schema.into());
        self
    }

    /// Sets the files schema.
    #[must_use]
    pub fn files(mut self, schema: impl Into<Schema>) -> Self {
        self.files = Some(schema.into());
        self
    }

    /// Returns the schema attached to `channel`.
    #[must_use]
    pub fn get(&self, channel: Channel) -> Option<&Schema> {
        match channel {
            Channel::Body => self.body.as_ref(),
            Channel::Query => self.query.as_ref(),
            Channel::Params => self.params.as_ref(),
            Channel::Headers => self.headers.as_ref(),
            Channel::Files => self.files.as_ref(),
        }
    }
}

/// Schemas for the output channels of an endpoint.
#[derive(Debug, Clone, Default)]
pub struct OutputSchemas {
    body: Option<Schema>,
    headers: Option<Schema>,
    files: Option<Schema>,
}

impl OutputSchemas {
    /// Creates a bundle with no channel schemas.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the body schema.
    #[must_use]
    pub fn body(mut self, schema: impl Into<Schema>) -> Self {
        self.body = Some(schema.into());
        self
    }

    /// Sets the header schema.
    #[must_use]
    pub fn headers(mut self, schema: impl Into<Schema>) -> Self {
        self.headers = Some(schema.into());
        self
    }

    /// Sets the files schema. Declaring it switches responses to multipart.
    #[must_use]
    pub fn files(mut self, schema: impl Into<Schema>) -> Self {
        self.files = Some(schema.into());
        self
    }

    /// Returns the body schema.
    #[must_use]
    pub fn body_schema(&self) -> Option<&Schema> {
        self.body.as_ref()
    }

    /// Returns the header schema.
    #[must_use]
    pub fn headers_schema(&self) -> Option<&Schema> {
        self.headers.as_ref()
    }

    /// Returns the files schema.
    #[must_use]
    pub fn files_schema(&self) -> Option<&Schema> {
        self.files.as_ref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema;

    #[test]
    fn test_channel_order() {
        let names: Vec<&str> = Channel::VALIDATED.iter().map(Channel::as_str).collect();
        assert_eq!(names, ["body", "query", "params", "headers", "files"]);
        assert!(!Channel::PARSED.contains(&Channel::Files));
    }

    #[test]
    fn test_channel_serializes_lowercase() {
        assert_eq!(serde_json::to_string(&Channel::Params).unwrap(), "\"params\"");
        assert_eq!(Channel::Headers.to_string(), "headers");
    }

    #[test]
    fn test_output_bundle() {
        let output = OutputSchemas::new()
            .body(schema::object().field("ok", schema::boolean()))
            .files(schema::object().field("report", schema::file()));
        assert!(output.body_schema().is_some());
        assert!(output.files_schema().is_some());
        assert!(output.headers_schema().is_none());
    }
}
