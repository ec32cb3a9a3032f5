//! Serving the generated document.
//!
//! The document is served by an ordinary `GET` endpoint, so it goes through
//! the same pipeline and encoder as every other route.

use std::sync::Arc;

use contour_core::{schema, Endpoint, Output, OutputSchemas};
use serde_json::Value;

use crate::error::DocsResult;
use crate::openapi::OpenApi;

/// Default path of the documentation endpoint.
pub const DEFAULT_DOCS_PATH: &str = "/api-docs.json";

/// Builds a `GET` endpoint at `path` that answers with `document`.
///
/// # Errors
///
/// Returns an error if the document cannot be serialized.
///
/// # Example
///
/// ```rust
/// use contour_docs::{docs_endpoint, OpenApiGenerator};
///
/// let doc = OpenApiGenerator::new().generate(&[]);
/// let endpoint = docs_endpoint("/openapi.json", &doc).unwrap();
/// assert_eq!(endpoint.path(), "/openapi.json");
/// ```
pub fn docs_endpoint(path: impl Into<String>, document: &OpenApi) -> DocsResult<Endpoint> {
    let value = serde_json::to_value(document)?;
    Ok(value_endpoint(path, value))
}

/// Builds a `GET` endpoint at `path` that answers with a prebuilt JSON
/// document.
#[must_use]
pub fn value_endpoint(path: impl Into<String>, document: Value) -> Endpoint {
    let document = Arc::new(document);
    Endpoint::get(path)
        .summary("OpenAPI document")
        .output(OutputSchemas::new().body(schema::object()))
        .handle_sync(move |_| Ok(Output::json(document.as_ref().clone())))
}
