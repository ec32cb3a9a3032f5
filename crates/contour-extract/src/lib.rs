//! # Contour Extract
//!
//! Reads the raw input channels of a buffered request.
//!
//! | Channel | Source | Function |
//! |---------|--------|----------|
//! | body | request body (JSON, raw string or multipart text parts) | [`decode_body`] |
//! | query | query string, first value wins | [`query_map`] |
//! | params | router captures, percent-decoded | [`params_map`] |
//! | headers | header map, lowercase names | [`header_map`] |
//! | files | multipart parts with a filename | [`decode_multipart`] |
//!
//! [`ExtractedInput::extract`] runs all of them at once. Extraction never
//! fails; schema checking happens later in the pipeline.

#![doc(html_root_url = "https://docs.rs/contour-extract/0.1.0")]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod body;
mod context;
mod header;
mod input;
mod multipart;
mod path;
mod query;

pub use body::{decode_body, DecodedBody, DEFAULT_CONTENT_TYPE};
pub use context::ExtractionContext;
pub use header::header_map;
pub use input::ExtractedInput;
pub use multipart::{
    decode_multipart, MultipartConfig, MultipartData, DEFAULT_MAX_BODY_SIZE,
    DEFAULT_MAX_FIELDS, DEFAULT_MAX_FIELD_SIZE,
};
pub use path::params_map;
pub use query::query_map;

// Re-export useful types from dependencies
pub use contour_router::Params;
