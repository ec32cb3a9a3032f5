//! Self-description of schema trees for documentation tooling.

use super::{Schema, SchemaKind};
use indexmap::IndexMap;
use serde::{Serialize, Serializer};

/// The resolved shape of a schema: ordered field names down to scalar kinds.
///
/// Arrays resolve to the shape of their items.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Shape {
    /// `"string"`.
    String,
    /// `"number"`.
    Number,
    /// `"boolean"`.
    Boolean,
    /// `"file"`.
    File,
    /// Named fields in declaration order.
    Object(IndexMap<String, Shape>),
}

impl Shape {
    /// Returns the field names of an object shape, in declaration order.
    pub fn field_names(&self) -> Vec<&str> {
        match self {
            Self::Object(fields) => fields.keys().map(String::as_str).collect(),
            _ => Vec::new(),
        }
    }
}

impl Serialize for Shape {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::String => serializer.serialize_str("string"),
            Self::Number => serializer.serialize_str("number"),
            Self::Boolean => serializer.serialize_str("boolean"),
            Self::File => serializer.serialize_str("file"),
            Self::Object(fields) => fields.serialize(serializer),
        }
    }
}

/// An OpenAPI-style description of one schema node.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SchemaDescription {
    /// JSON Schema type keyword.
    #[serde(rename = "type")]
    pub kind: &'static str,
    /// Format keyword (`binary`, `uri`, `uuid`).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub format: Option<&'static str>,
    /// Object properties in declaration order.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub properties: Option<IndexMap<String, SchemaDescription>>,
    /// Array item description.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub items: Option<Box<SchemaDescription>>,
    /// Whether the node is required.
    pub required: bool,
    /// Longest accepted string, or largest file in bytes.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_length: Option<u64>,
    /// Shortest accepted string.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_length: Option<u64>,
    /// Regular expression the string must contain a match of.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pattern: Option<String>,
    /// Inclusive lower bound.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub minimum: Option<f64>,
    /// Exclusive lower bound.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub exclusive_minimum: Option<f64>,
    /// Inclusive upper bound.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub maximum: Option<f64>,
    /// Exclusive upper bound.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub exclusive_maximum: Option<f64>,
    /// Required divisor.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub multiple_of: Option<f64>,
}

impl SchemaDescription {
    /// Creates a bare description of the given type.
    #[must_use]
    pub fn new(kind: &'static str) -> Self {
        Self {
            kind,
            format: None,
            properties: None,
            items: None,
            required: true,
            max_length: None,
            min_length: None,
            pattern: None,
            minimum: None,
            exclusive_minimum: None,
            maximum: None,
            exclusive_maximum: None,
            multiple_of: None,
        }
    }

    /// Adds an object property.
    pub fn insert_property(&mut self, name: impl Into<String>, property: SchemaDescription) {
        self.properties
            .get_or_insert_with(IndexMap::new)
            .insert(name.into(), property);
    }

    /// Copies every property of `other` into this description.
    pub fn merge_properties(&mut self, other: &SchemaDescription) {
        if let Some(properties) = &other.properties {
            for (name, property) in properties {
                self.insert_property(name.clone(), property.clone());
            }
        }
    }
}

impl Schema {
    /// Resolves the node into its [`Shape`].
    #[must_use]
    pub fn resolve_type(&self) -> Shape {
        match &self.kind {
            SchemaKind::String(_) => Shape::String,
            SchemaKind::Number(_) => Shape::Number,
            SchemaKind::Boolean => Shape::Boolean,
            SchemaKind::File(_) => Shape::File,
            SchemaKind::Array(item) => item.resolve_type(),
            SchemaKind::Object(object) => Shape::Object(
                object
                    .fields()
                    .map(|(name, node)| (name.to_string(), node.resolve_type()))
                    .collect(),
            ),
        }
    }

    /// Describes the node for documentation.
    #[must_use]
    pub fn describe(&self) -> SchemaDescription {
        let mut description = match &self.kind {
            SchemaKind::String(rules) => {
                let mut d = SchemaDescription::new("string");
                d.format = rules.format();
                d.max_length = rules.max_len().map(|n| n as u64);
                d.min_length = rules.min_len().map(|n| n as u64);
                d.pattern = rules.pattern().map(str::to_string);
                d
            }
            SchemaKind::Number(rules) => {
                let mut d = SchemaDescription::new(if rules.integer { "integer" } else { "number" });
                d.exclusive_minimum = rules.gt;
                d.minimum = rules.gte;
                d.exclusive_maximum = rules.lt;
                d.maximum = rules.lte;
                d.multiple_of = rules.multiple_of;
                match rules.sign_minimum() {
                    Some((bound, true)) if d.exclusive_minimum.is_none() => {
                        d.exclusive_minimum = Some(bound);
                    }
                    Some((bound, false)) if d.minimum.is_none() => d.minimum = Some(bound),
                    _ => {}
                }
                match rules.sign_maximum() {
                    Some((bound, true)) if d.exclusive_maximum.is_none() => {
                        d.exclusive_maximum = Some(bound);
                    }
                    Some((bound, false)) if d.maximum.is_none() => d.maximum = Some(bound),
                    _ => {}
                }
                d
            }
            SchemaKind::Boolean => SchemaDescription::new("boolean"),
            SchemaKind::Array(item) => {
                let mut d = SchemaDescription::new("array");
                d.items = Some(Box::new(item.describe()));
                d
            }
            SchemaKind::Object(object) => {
                let mut d = SchemaDescription::new("object");
                for (name, node) in object.fields() {
                    d.insert_property(name, node.describe());
                }
                d
            }
            SchemaKind::File(rules) => {
                let mut d = SchemaDescription::new("string");
                d.format = Some("binary");
                d.max_length = rules.max_size;
                d
            }
        };
        description.required = self.required;
        description
    }
}
