//! Structured schema errors.
//!
//! A [`SchemaError`] always mirrors the shape of the schema that produced it:
//! scalar and file nodes report a single message, array nodes report a list
//! and object nodes report a map keyed by field name in declaration order.

use indexmap::IndexMap;
use serde::Serialize;
use std::fmt;

/// Message used when `parse` finds no usable value.
pub const MISSING_DATA: &str = "data is missing";

/// Error produced by [`Schema::validate`](super::Schema::validate) or
/// [`Schema::parse`](super::Schema::parse).
///
/// Serializes without a tag, so the wire form is exactly one of:
///
/// ```json
/// { "message": "Expected a string, but found number" }
/// [ { "message": "data is missing" } ]
/// { "username": { "message": "data is missing" } }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum SchemaError {
    /// A single failure for a scalar or file node.
    Message {
        /// Human-readable description of the failure.
        message: String,
    },
    /// Failures reported by an array node.
    List(Vec<SchemaError>),
    /// Failures reported by an object node, keyed by field name.
    Fields(IndexMap<String, SchemaError>),
}

impl SchemaError {
    /// Creates a single-message error.
    #[must_use]
    pub fn message(message: impl Into<String>) -> Self {
        Self::Message {
            message: message.into(),
        }
    }

    /// Creates the error returned by `parse` for an absent value.
    #[must_use]
    pub fn missing() -> Self {
        Self::message(MISSING_DATA)
    }

    /// Returns the message if this is a single-message error.
    #[must_use]
    pub fn as_message(&self) -> Option<&str> {
        match self {
            Self::Message { message } => Some(message),
            _ => None,
        }
    }

    /// Returns the nested error for `field` if this is an object error.
    #[must_use]
    pub fn field(&self, field: &str) -> Option<&SchemaError> {
        match self {
            Self::Fields(fields) => fields.get(field),
            _ => None,
        }
    }

    /// Returns the item errors if this is an array error.
    #[must_use]
    pub fn items(&self) -> Option<&[SchemaError]> {
        match self {
            Self::List(items) => Some(items),
            _ => None,
        }
    }

    /// Converts the error into its JSON wire form.
    #[must_use]
    pub fn to_value(&self) -> serde_json::Value {
        match self {
            Self::Message { message } => serde_json::json!({ "message": message }),
            Self::List(items) => {
                serde_json::Value::Array(items.iter().map(SchemaError::to_value).collect())
            }
            Self::Fields(fields) => serde_json::Value::Object(
                fields
                    .iter()
                    .map(|(name, error)| (name.clone(), error.to_value()))
                    .collect(),
            ),
        }
    }
}

impl fmt::Display for SchemaError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Message { message } => f.write_str(message),
            Self::List(items) => write!(f, "{} invalid item(s)", items.len()),
            Self::Fields(fields) => {
                let names: Vec<&str> = fields.keys().map(String::as_str).collect();
                write!(f, "invalid field(s): {}", names.join(", "))
            }
        }
    }
}

impl std::error::Error for SchemaError {}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_message_serializes_as_object() {
        let error = SchemaError::message("Invalid URL format");
        assert_eq!(
            serde_json::to_value(&error).unwrap(),
            json!({ "message": "Invalid URL format" })
        );
    }

    #[test]
    fn test_nested_shapes_serialize_untagged() {
        let mut fields = IndexMap::new();
        fields.insert(
            "tags".to_string(),
            SchemaError::List(vec![SchemaError::missing()]),
        );
        fields.insert("name".to_string(), SchemaError::message("too short"));
        let error = SchemaError::Fields(fields);

        let value = serde_json::to_value(&error).unwrap();
        assert_eq!(
            value,
            json!({
                "tags": [{ "message": "data is missing" }],
                "name": { "message": "too short" }
            })
        );
        assert_eq!(value, error.to_value());
    }

    #[test]
    fn test_field_order_is_preserved() {
        let mut fields = IndexMap::new();
        fields.insert("zeta".to_string(), SchemaError::missing());
        fields.insert("alpha".to_string(), SchemaError::missing());
        let json = serde_json::to_string(&SchemaError::Fields(fields)).unwrap();
        assert!(json.find("zeta").unwrap() < json.find("alpha").unwrap());
    }

    #[test]
    fn test_accessors() {
        let error = SchemaError::List(vec![SchemaError::missing()]);
        assert_eq!(error.items().map(<[SchemaError]>::len), Some(1));
        assert!(error.as_message().is_none());
        assert_eq!(SchemaError::missing().as_message(), Some(MISSING_DATA));
    }
}
