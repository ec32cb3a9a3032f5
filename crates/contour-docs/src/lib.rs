//! # Contour Docs
//!
//! OpenAPI 3.1 documents generated from endpoint declarations.
//!
//! Every endpoint already declares the shape of its input and output
//! channels; this crate turns those declarations into paths, parameters,
//! request bodies and responses.
//!
//! ## Quick Start
//!
//! ```rust
//! use contour_core::{schema, Endpoint, InputSchemas, OutputSchemas};
//! use contour_docs::{docs_endpoint, OpenApiGenerator};
//! use std::sync::Arc;
//!
//! let endpoints = vec![Arc::new(
//!     Endpoint::post("/users")
//!         .input(InputSchemas::new().body(schema::object().field("name", schema::string())))
//!         .output(OutputSchemas::new().body(schema::object().field("id", schema::number()))),
//! )];
//!
//! let doc = OpenApiGenerator::new()
//!     .title("Users")
//!     .version("2.0.0")
//!     .generate(&endpoints);
//!
//! // Serve it next to the API.
//! let endpoint = docs_endpoint("/openapi.json", &doc).unwrap();
//! assert_eq!(endpoint.path(), "/openapi.json");
//! ```
//!
//! [`SwaggerUi`] adds an interactive page at `/api-docs` that reads the
//! document from `/api-docs.json`.

#![doc(html_root_url = "https://docs.rs/contour-docs/0.1.0")]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod error;
mod openapi;
mod serve;
mod swagger;

pub use error::{DocsError, DocsResult};
pub use openapi::{
    openapi_path, Header, Info, MediaType, OpenApi, OpenApiGenerator, Operation, Parameter,
    ParameterIn, PathItem, RequestBody, Response, DEFAULT_TITLE, DEFAULT_VERSION,
    OPENAPI_VERSION,
};
pub use serve::{docs_endpoint, value_endpoint, DEFAULT_DOCS_PATH};
pub use swagger::{DocExpansion, SwaggerUi, DEFAULT_SWAGGER_VERSION, DEFAULT_UI_PATH};
