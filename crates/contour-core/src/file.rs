//! Uploaded files.

use bytes::Bytes;
use indexmap::IndexMap;
use serde::Serialize;
use serde_json::{json, Value};

/// Files of one request or response, keyed by form field name.
pub type FileMap = IndexMap<String, UploadedFile>;

/// A file received in, or sent back as, a multipart part.
///
/// The content is reference-counted, so cloning a file is cheap.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UploadedFile {
    #[serde(skip)]
    buffer: Bytes,
    size: u64,
    mimetype: String,
    filename: String,
}

impl UploadedFile {
    /// Creates a file from its name, declared MIME type and content.
    #[must_use]
    pub fn new(filename: impl Into<String>, mimetype: impl Into<String>, buffer: Bytes) -> Self {
        Self {
            size: buffer.len() as u64,
            buffer,
            mimetype: mimetype.into(),
            filename: filename.into(),
        }
    }

    /// Returns the content.
    #[must_use]
    pub fn buffer(&self) -> &Bytes {
        &self.buffer
    }

    /// Returns the content size in bytes.
    #[must_use]
    pub fn size(&self) -> u64 {
        self.size
    }

    /// Returns the MIME type declared by the sender.
    #[must_use]
    pub fn mimetype(&self) -> &str {
        &self.mimetype
    }

    /// Returns the file name declared by the sender.
    #[must_use]
    pub fn filename(&self) -> &str {
        &self.filename
    }

    /// Consumes the file and returns its content.
    #[must_use]
    pub fn into_bytes(self) -> Bytes {
        self.buffer
    }

    /// Returns the file metadata as JSON (`filename`, `mimetype`, `size`).
    #[must_use]
    pub fn metadata(&self) -> Value {
        json!({
            "filename": self.filename,
            "mimetype": self.mimetype,
            "size": self.size,
        })
    }
}

/// Returns the metadata of every file, keyed by field name.
#[must_use]
pub fn metadata(files: &FileMap) -> Value {
    Value::Object(
        files
            .iter()
            .map(|(name, file)| (name.clone(), file.metadata()))
            .collect(),
    )
}
