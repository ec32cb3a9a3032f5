//! Multipart form data decoding.
//!
//! A part that carries a filename becomes an [`UploadedFile`] keyed by its
//! field name; any other named part becomes a string field of the body.
//! Decoding never fails: a malformed body is logged and the parts decoded
//! up to that point are kept.

use bytes::Bytes;
use contour_core::{FileMap, UploadedFile};
use serde_json::{Map, Value};
use std::io;

/// Default maximum total body size for multipart (50 MB).
pub const DEFAULT_MAX_BODY_SIZE: usize = 50 * 1024 * 1024;

/// Default maximum size per field (10 MB).
pub const DEFAULT_MAX_FIELD_SIZE: usize = 10 * 1024 * 1024;

/// Default maximum number of parts.
pub const DEFAULT_MAX_FIELDS: usize = 100;

/// Limits applied while decoding multipart bodies.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MultipartConfig {
    /// Maximum total body size in bytes.
    pub max_body_size: usize,
    /// Maximum size per part in bytes.
    pub max_field_size: usize,
    /// Maximum number of parts.
    pub max_fields: usize,
}

impl Default for MultipartConfig {
    fn default() -> Self {
        Self {
            max_body_size: DEFAULT_MAX_BODY_SIZE,
            max_field_size: DEFAULT_MAX_FIELD_SIZE,
            max_fields: DEFAULT_MAX_FIELDS,
        }
    }
}

impl MultipartConfig {
    /// Create a new configuration with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the maximum body size.
    #[must_use]
    pub fn max_body_size(mut self, size: usize) -> Self {
        self.max_body_size = size;
        self
    }

    /// Set the maximum field size.
    #[must_use]
    pub fn max_field_size(mut self, size: usize) -> Self {
        self.max_field_size = size;
        self
    }

    /// Set the maximum number of fields.
    #[must_use]
    pub fn max_fields(mut self, count: usize) -> Self {
        self.max_fields = count;
        self
    }
}

/// The decoded parts of a multipart body.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MultipartData {
    /// Text parts, keyed by part name.
    pub fields: Map<String, Value>,
    /// File parts, keyed by part name.
    pub files: FileMap,
}

/// Decodes a `multipart/form-data` body.
///
/// `content_type` is the full header value, including the boundary.
pub async fn decode_multipart(
    content_type: &str,
    body: Bytes,
    config: &MultipartConfig,
) -> MultipartData {
    let mut data = MultipartData::default();

    let boundary = match multer::parse_boundary(content_type) {
        Ok(boundary) => boundary,
        Err(error) => {
            tracing::warn!(%error, "multipart body has no usable boundary");
            return data;
        }
    };

    if body.len() > config.max_body_size {
        tracing::warn!(
            size = body.len(),
            limit = config.max_body_size,
            "multipart body exceeds the size limit"
        );
        return data;
    }

    let stream = futures_util::stream::once(async move { Ok::<_, io::Error>(body) });
    let mut multipart = multer::Multipart::new(stream, boundary);
    let mut count = 0;

    loop {
        let field = match multipart.next_field().await {
            Ok(Some(field)) => field,
            Ok(None) => break,
            Err(error) => {
                tracing::warn!(%error, "malformed multipart body");
                break;
            }
        };

        count += 1;
        if count > config.max_fields {
            tracing::warn!(limit = config.max_fields, "too many multipart parts");
            break;
        }

        let name = field.name().map(str::to_string);
        let filename = field.file_name().map(str::to_string);
        let mimetype = field.content_type().map_or_else(
            || mime::APPLICATION_OCTET_STREAM.to_string(),
            ToString::to_string,
        );

        let bytes = match field.bytes().await {
            Ok(bytes) => bytes,
            Err(error) => {
                tracing::warn!(%error, "malformed multipart body");
                break;
            }
        };

        let Some(name) = name else {
            tracing::debug!("skipping multipart part without a name");
            continue;
        };

        if bytes.len() > config.max_field_size {
            tracing::warn!(
                field = %name,
                size = bytes.len(),
                limit = config.max_field_size,
                "multipart part exceeds the size limit"
            );
            continue;
        }

        match filename {
            Some(filename) => {
                data.files
                    .insert(name, UploadedFile::new(filename, mimetype, bytes));
            }
            None => {
                let text = String::from_utf8_lossy(&bytes).into_owned();
                data.fields.insert(name, Value::String(text));
            }
        }
    }

    data
}
