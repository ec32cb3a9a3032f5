//! # Contour Core
//!
//! Core types for the Contour request pipeline.
//!
//! - [`schema`] - the schema engine: validation, lenient parsing and
//!   self-description of typed value trees
//! - [`InputSchemas`] / [`OutputSchemas`] - per-channel schema bundles
//! - [`Endpoint`] - a declared operation with its middleware and handler
//! - [`HandlerInput`] / [`Output`] - the handler contract
//! - [`Middleware`] - the middleware stage contract
//! - [`ContourError`] - pipeline errors and their wire envelopes
//! - [`UploadedFile`] - files received from or sent as multipart parts

#![doc(html_root_url = "https://docs.rs/contour-core/0.1.0")]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod channel;
mod endpoint;
mod error;
pub mod file;
pub mod handler;
pub mod middleware;
pub mod schema;

pub use channel::{Channel, InputSchemas, OutputSchemas};
pub use endpoint::Endpoint;
pub use error::{
    ContourError, ContourResult, ErrorCategory, ErrorEnvelope, MISSING_HANDLER_MESSAGE,
    MISSING_SCHEMAS_MESSAGE, NOT_FOUND_MESSAGE,
};
pub use file::{FileMap, UploadedFile};
pub use handler::{BoxFuture, ErasedHandler, HandlerInput, HandlerResult, Output, RawBody};
pub use middleware::{FnMiddleware, Middleware, MiddlewareResult};
pub use schema::{Schema, SchemaError};
