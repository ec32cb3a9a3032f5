//! Error types for documentation generation.

use thiserror::Error;

/// Errors that can occur while producing documentation.
#[derive(Debug, Error)]
pub enum DocsError {
    /// The document could not be serialized.
    #[error("Failed to serialize OpenAPI document: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Result type for documentation operations.
pub type DocsResult<T> = Result<T, DocsError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_serialization_error() {
        let err: DocsError = serde_json::from_str::<String>("invalid")
            .unwrap_err()
            .into();
        assert!(matches!(err, DocsError::Serialization(_)));
        assert!(err.to_string().contains("serialize"));
    }
}
