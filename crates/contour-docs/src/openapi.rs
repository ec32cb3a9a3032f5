//! OpenAPI document types and generation.
//!
//! The document is built from what endpoints declare: the shape of each
//! input channel becomes parameters and a request body, the output bundle a
//! `200` response, and the error schema a `400` response. Schemas are the
//! nodes' own descriptions (see [`Schema::describe`]).
//!
//! <https://spec.openapis.org/oas/v3.1.0>

use std::sync::Arc;

use contour_core::schema::SchemaDescription;
use contour_core::{Channel, Endpoint, InputSchemas, OutputSchemas, Schema};
use http::Method;
use indexmap::IndexMap;
use serde::Serialize;
use serde_json::Value;

use crate::error::DocsResult;

/// OpenAPI version emitted.
pub const OPENAPI_VERSION: &str = "3.1.0";

/// Default document title.
pub const DEFAULT_TITLE: &str = "API Documentation";

/// Default document version.
pub const DEFAULT_VERSION: &str = "1.0.0";

const JSON: &str = "application/json";
const MULTIPART: &str = "multipart/form-data";

/// OpenAPI document root object.
#[derive(Debug, Clone, Serialize)]
pub struct OpenApi {
    /// OpenAPI version.
    pub openapi: String,
    /// API metadata.
    pub info: Info,
    /// Operations by path.
    pub paths: IndexMap<String, PathItem>,
}

/// API metadata.
#[derive(Debug, Clone, Serialize)]
pub struct Info {
    /// API title.
    pub title: String,
    /// API version.
    pub version: String,
    /// API description.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// The operations of one path.
#[derive(Debug, Clone, Default, Serialize)]
pub struct PathItem {
    /// GET operation.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub get: Option<Operation>,
    /// PUT operation.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub put: Option<Operation>,
    /// POST operation.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub post: Option<Operation>,
    /// DELETE operation.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub delete: Option<Operation>,
    /// OPTIONS operation.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub options: Option<Operation>,
    /// HEAD operation.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub head: Option<Operation>,
    /// PATCH operation.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub patch: Option<Operation>,
    /// TRACE operation.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub trace: Option<Operation>,
}

impl PathItem {
    /// Sets the operation for `method`. Returns `false` for methods the
    /// path item has no slot for.
    pub fn set(&mut self, method: &Method, operation: Operation) -> bool {
        let slot = match *method {
            Method::GET => &mut self.get,
            Method::PUT => &mut self.put,
            Method::POST => &mut self.post,
            Method::DELETE => &mut self.delete,
            Method::OPTIONS => &mut self.options,
            Method::HEAD => &mut self.head,
            Method::PATCH => &mut self.patch,
            Method::TRACE => &mut self.trace,
            _ => return false,
        };
        *slot = Some(operation);
        true
    }
}

/// An API operation.
#[derive(Debug, Clone, Default, Serialize)]
pub struct Operation {
    /// Short summary.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
    /// Parameters.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub parameters: Vec<Parameter>,
    /// Request body.
    #[serde(rename = "requestBody", skip_serializing_if = "Option::is_none")]
    pub request_body: Option<RequestBody>,
    /// Responses by status.
    #[serde(skip_serializing_if = "IndexMap::is_empty")]
    pub responses: IndexMap<String, Response>,
}

/// Parameter location.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ParameterIn {
    /// Query string parameter.
    Query,
    /// URL path parameter.
    Path,
    /// HTTP header.
    Header,
}

/// An operation parameter.
#[derive(Debug, Clone, Serialize)]
pub struct Parameter {
    /// Parameter name.
    pub name: String,
    /// Parameter location.
    #[serde(rename = "in")]
    pub location: ParameterIn,
    /// Whether required.
    pub required: bool,
    /// Parameter schema.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub schema: Option<SchemaDescription>,
}

/// Request body.
#[derive(Debug, Clone, Serialize)]
pub struct RequestBody {
    /// Content by media type.
    pub content: IndexMap<String, MediaType>,
}

/// Media type content.
#[derive(Debug, Clone, Serialize)]
pub struct MediaType {
    /// Schema for this media type.
    pub schema: SchemaDescription,
}

/// Response definition.
#[derive(Debug, Clone, Serialize)]
pub struct Response {
    /// Description.
    pub description: String,
    /// Response headers.
    #[serde(skip_serializing_if = "IndexMap::is_empty")]
    pub headers: IndexMap<String, Header>,
    /// Response content by media type.
    #[serde(skip_serializing_if = "IndexMap::is_empty")]
    pub content: IndexMap<String, MediaType>,
}

/// Response header.
#[derive(Debug, Clone, Serialize)]
pub struct Header {
    /// Whether the header is always sent.
    pub required: bool,
    /// Header schema.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub schema: Option<SchemaDescription>,
}

/// OpenAPI generator.
///
/// # Example
///
/// ```rust
/// use contour_core::{schema, Endpoint, InputSchemas, OutputSchemas};
/// use contour_docs::OpenApiGenerator;
/// use std::sync::Arc;
///
/// let endpoints = vec![Arc::new(
///     Endpoint::get("/users/:id")
///         .input(InputSchemas::new().params(schema::object().field("id", schema::string())))
///         .output(OutputSchemas::new().body(schema::object().field("name", schema::string()))),
/// )];
///
/// let doc = OpenApiGenerator::new().title("Users").generate(&endpoints);
/// assert!(doc.paths.contains_key("/users/{id}"));
/// ```
#[derive(Debug, Clone)]
pub struct OpenApiGenerator {
    title: String,
    version: String,
    description: Option<String>,
}

impl Default for OpenApiGenerator {
    fn default() -> Self {
        Self::new()
    }
}

impl OpenApiGenerator {
    /// Creates a generator with the default title and version.
    #[must_use]
    pub fn new() -> Self {
        Self {
            title: DEFAULT_TITLE.to_string(),
            version: DEFAULT_VERSION.to_string(),
            description: None,
        }
    }

    /// Sets the API title.
    #[must_use]
    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    /// Sets the API version.
    #[must_use]
    pub fn version(mut self, version: impl Into<String>) -> Self {
        self.version = version.into();
        self
    }

    /// Sets the API description.
    #[must_use]
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Builds the document. Paths appear in endpoint order; a later
    /// endpoint with the same path and method replaces an earlier one.
    #[must_use]
    pub fn generate(&self, endpoints: &[Arc<Endpoint>]) -> OpenApi {
        let mut paths: IndexMap<String, PathItem> = IndexMap::new();

        for endpoint in endpoints {
            let path = openapi_path(endpoint.path());
            let item = paths.entry(path).or_default();
            item.set(&endpoint.method(), operation(endpoint));
        }

        OpenApi {
            openapi: OPENAPI_VERSION.to_string(),
            info: Info {
                title: self.title.clone(),
                version: self.version.clone(),
                description: self.description.clone(),
            },
            paths,
        }
    }

    /// Builds the document as a JSON value.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn generate_value(&self, endpoints: &[Arc<Endpoint>]) -> DocsResult<Value> {
        Ok(serde_json::to_value(self.generate(endpoints))?)
    }

    /// Builds the document as pretty-printed JSON.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn generate_json(&self, endpoints: &[Arc<Endpoint>]) -> DocsResult<String> {
        Ok(serde_json::to_string_pretty(&self.generate(endpoints))?)
    }
}

/// Rewrites `:name` parameters as `{name}`.
#[must_use]
pub fn openapi_path(template: &str) -> String {
    let mut out = String::with_capacity(template.len() + 2);
    let mut chars = template.chars().peekable();

    while let Some(c) = chars.next() {
        if c != ':' {
            out.push(c);
            continue;
        }
        let mut name = String::new();
        while let Some(&next) = chars.peek() {
            if next.is_ascii_alphanumeric() || next == '_' {
                name.push(next);
                chars.next();
            } else {
                break;
            }
        }
        if name.is_empty() {
            out.push(':');
        } else {
            out.push('{');
            out.push_str(&name);
            out.push('}');
        }
    }
    out
}

fn operation(endpoint: &Endpoint) -> Operation {
    let mut operation = Operation {
        summary: endpoint.summary_text().map(str::to_string),
        ..Operation::default()
    };

    if let Some(input) = endpoint.input_schemas() {
        operation.parameters = parameters(input);
        operation.request_body = request_body(input);
    }

    if let Some(output) = endpoint.output_schemas() {
        if let Some(response) = success_response(output) {
            operation.responses.insert("200".to_string(), response);
            if let Some(error) = endpoint.error_schema() {
                operation.responses.insert(
                    "400".to_string(),
                    Response {
                        description: "Rejected request".to_string(),
                        headers: IndexMap::new(),
                        content: content(JSON, error.describe()),
                    },
                );
            }
        }
    }

    operation
}

fn parameters(input: &InputSchemas) -> Vec<Parameter> {
    let mut parameters = Vec::new();
    let channels = [
        (Channel::Query, ParameterIn::Query),
        (Channel::Params, ParameterIn::Path),
        (Channel::Headers, ParameterIn::Header),
    ];

    for (channel, location) in channels {
        let Some(schema) = input.get(channel) else {
            continue;
        };
        for (name, field) in fields(schema) {
            parameters.push(Parameter {
                name: name.to_string(),
                location,
                required: field.is_required(),
                schema: Some(field.describe()),
            });
        }
    }
    parameters
}

fn request_body(input: &InputSchemas) -> Option<RequestBody> {
    let (media_type, schema) = channel_content(input.get(Channel::Body), input.get(Channel::Files))?;
    Some(RequestBody {
        content: content(media_type, schema),
    })
}

fn success_response(output: &OutputSchemas) -> Option<Response> {
    let (media_type, schema) = channel_content(output.body_schema(), output.files_schema())?;

    let headers = output
        .headers_schema()
        .map(|schema| {
            fields(schema)
                .into_iter()
                .map(|(name, field)| {
                    let header = Header {
                        required: field.is_required(),
                        schema: Some(field.describe()),
                    };
                    (name.to_string(), header)
                })
                .collect()
        })
        .unwrap_or_default();

    Some(Response {
        description: "Successful response".to_string(),
        headers,
        content: content(media_type, schema),
    })
}

/// With files, the files' properties plus a `data` property for the body,
/// sent as multipart. Otherwise the body as JSON.
fn channel_content(
    body: Option<&Schema>,
    files: Option<&Schema>,
) -> Option<(&'static str, SchemaDescription)> {
    match (body, files) {
        (body, Some(files)) => {
            let mut schema = SchemaDescription::new("object");
            schema.merge_properties(&files.describe());
            if let Some(body) = body {
                schema.insert_property("data", body.describe());
            }
            Some((MULTIPART, schema))
        }
        (Some(body), None) => Some((JSON, body.describe())),
        (None, None) => None,
    }
}

fn content(media_type: &str, schema: SchemaDescription) -> IndexMap<String, MediaType> {
    let mut content = IndexMap::new();
    content.insert(media_type.to_string(), MediaType { schema });
    content
}

/// The top-level fields of an object schema in declaration order.
fn fields(schema: &Schema) -> Vec<(&str, &Schema)> {
    schema
        .as_object()
        .map(|object| object.fields().collect())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use contour_core::schema;
    use serde_json::json;

    #[test]
    fn test_openapi_path() {
        assert_eq!(openapi_path("/users/:id"), "/users/{id}");
        assert_eq!(openapi_path("/files/:name.:ext"), "/files/{name}.{ext}");
        assert_eq!(openapi_path("/plain"), "/plain");
        assert_eq!(openapi_path("/odd/:"), "/odd/:");
    }

    #[test]
    fn test_defaults() {
        let doc = OpenApiGenerator::new().generate(&[]);
        let value = serde_json::to_value(doc).unwrap();
        assert_eq!(
            value,
            json!({
                "openapi": "3.1.0",
                "info": { "title": "API Documentation", "version": "1.0.0" },
                "paths": {}
            })
        );
    }

    #[test]
    fn test_parameters_keep_required_flags() {
        let endpoint = Endpoint::get("/search/:kind")
            .input(
                InputSchemas::new()
                    .params(schema::object().field("kind", schema::string()))
                    .query(
                        schema::object()
                            .field("q", schema::string())
                            .field("page", schema::number().optional()),
                    )
                    .headers(schema::object().field("x-api-key", schema::string())),
            );
        let op = operation(&endpoint);
        let summary: Vec<(&str, ParameterIn, bool)> = op
            .parameters
            .iter()
            .map(|p| (p.name.as_str(), p.location, p.required))
            .collect();
        assert_eq!(
            summary,
            [
                ("q", ParameterIn::Query, true),
                ("page", ParameterIn::Query, false),
                ("kind", ParameterIn::Path, true),
                ("x-api-key", ParameterIn::Header, true),
            ]
        );
        assert!(op.request_body.is_none());
        assert!(op.responses.is_empty());
    }

    #[test]
    fn test_multipart_request_body() {
        let input = InputSchemas::new()
            .body(schema::object().field("caption", schema::string()))
            .files(schema::object().field("avatar", schema::file()));
        let body = request_body(&input).unwrap();
        let value = serde_json::to_value(&body).unwrap();
        let schema = &value["content"]["multipart/form-data"]["schema"];
        assert_eq!(schema["type"], "object");
        assert_eq!(schema["properties"]["avatar"]["format"], "binary");
        assert_eq!(schema["properties"]["data"]["properties"]["caption"]["type"], "string");
    }

    #[test]
    fn test_error_response_needs_output() {
        let endpoint = Endpoint::post("/x").error(schema::object().field("reason", schema::string()));
        assert!(operation(&endpoint).responses.is_empty());

        let endpoint = Endpoint::post("/x")
            .output(
                OutputSchemas::new()
                    .body(schema::object())
                    .headers(schema::object().field("x-total", schema::number().optional())),
            )
            .error(schema::object().field("reason", schema::string()));
        let op = operation(&endpoint);
        assert_eq!(op.responses.keys().collect::<Vec<_>>(), ["200", "400"]);
        assert!(!op.responses["200"].headers["x-total"].required);
    }
}
