//! Body decoding.

use bytes::Bytes;
use contour_core::FileMap;
use serde_json::Value;

use crate::multipart::{decode_multipart, MultipartConfig};

/// Content type assumed when a request does not declare one.
pub const DEFAULT_CONTENT_TYPE: &str = "text/plain";

/// A decoded request body plus any files it carried.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DecodedBody {
    /// The body value.
    pub body: Value,
    /// Files from multipart parts.
    pub files: FileMap,
}

/// Decodes a buffered body according to its content type.
///
/// `multipart/form-data` bodies become an object of their text parts plus a
/// file map. Everything else is parsed as JSON, falling back to the body as
/// a (lossy UTF-8) string.
pub async fn decode_body(
    content_type: Option<&str>,
    body: Bytes,
    config: &MultipartConfig,
) -> DecodedBody {
    let content_type = content_type.unwrap_or(DEFAULT_CONTENT_TYPE);

    if is_multipart(content_type) {
        let data = decode_multipart(content_type, body, config).await;
        return DecodedBody {
            body: Value::Object(data.fields),
            files: data.files,
        };
    }

    let body = serde_json::from_slice(&body)
        .unwrap_or_else(|_| Value::String(String::from_utf8_lossy(&body).into_owned()));
    DecodedBody {
        body,
        files: FileMap::new(),
    }
}

fn is_multipart(content_type: &str) -> bool {
    match content_type.parse::<mime::Mime>() {
        Ok(mime) => mime.type_() == mime::MULTIPART && mime.subtype() == mime::FORM_DATA,
        Err(error) => {
            tracing::debug!(%error, content_type, "unparseable content type");
            false
        }
    }
}
