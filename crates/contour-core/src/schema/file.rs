//! File nodes.

use super::error::SchemaError;
use super::{js, Schema};
use crate::file::UploadedFile;
use serde_json::Value;

/// Constraints of a file node.
///
/// Only presence and size are checked; the declared MIME type is trusted
/// as-is.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FileSchema {
    pub(crate) max_size: Option<u64>,
}

impl FileSchema {
    /// Rejects files larger than `bytes`.
    #[must_use]
    pub fn max_size(mut self, bytes: u64) -> Self {
        self.max_size = Some(bytes);
        self
    }

    /// Marks the node optional.
    #[must_use]
    pub fn optional(self) -> Schema {
        Schema::from(self).optional()
    }

    /// Checks an uploaded file against this node.
    pub fn check(&self, file: Option<&UploadedFile>) -> Option<SchemaError> {
        let Some(file) = file else {
            return Some(missing());
        };
        match self.max_size {
            Some(max) if file.size() > max => Some(SchemaError::message(format!(
                "the file exceeds the maximum size of {max} bytes"
            ))),
            _ => None,
        }
    }

    /// Files never appear inside JSON, so a present value is a type error.
    pub(crate) fn check_value(&self, value: Option<&Value>) -> Option<SchemaError> {
        if js::is_absent(value) {
            return Some(missing());
        }
        Some(SchemaError::message(format!(
            "Expected a file, but found {}",
            js::type_name(value)
        )))
    }
}

pub(crate) fn missing() -> SchemaError {
    SchemaError::message("the file is missing")
}

#[cfg(test)]
mod tests {
    use super::*;
    use bytes::Bytes;

    #[test]
    fn test_presence_and_size() {
        let rules = FileSchema::default().max_size(3);
        assert_eq!(rules.check(None), Some(missing()));

        let small = UploadedFile::new("a.txt", "text/plain", Bytes::from_static(b"abc"));
        assert!(rules.check(Some(&small)).is_none());

        let large = UploadedFile::new("a.txt", "text/plain", Bytes::from_static(b"abcd"));
        assert_eq!(
            rules.check(Some(&large)).unwrap().as_message(),
            Some("the file exceeds the maximum size of 3 bytes")
        );
    }

    #[test]
    fn test_mime_type_is_not_inspected() {
        let rules = FileSchema::default();
        let file = UploadedFile::new("a.exe", "image/png", Bytes::from_static(b"MZ"));
        assert!(rules.check(Some(&file)).is_none());
    }

    #[test]
    #[should_panic(expected = "parsing is not supported for file schemas")]
    fn test_parse_panics() {
        let _ = Schema::from(crate::schema::file()).parse(&Value::Null);
    }
}
