//! The schema engine.
//!
//! A [`Schema`] is a tree of typed nodes that can do three things with a
//! value:
//!
//! - [`validate`](Schema::validate) checks it strictly, without coercion;
//! - [`parse`](Schema::parse) coerces it leniently, failing only when data is
//!   missing or structurally wrong;
//! - [`describe`](Schema::describe) and [`resolve_type`](Schema::resolve_type)
//!   report its shape to documentation tooling.
//!
//! Errors mirror the node's shape: scalars yield one message, arrays a list
//! of the failing items' errors and objects a map keyed by field name.
//!
//! # Example
//!
//! ```
//! use contour_core::schema::{self, Schema};
//! use serde_json::json;
//!
//! let user: Schema = schema::object()
//!     .field("name", schema::string().min(2))
//!     .field("age", schema::number().integer().nonnegative())
//!     .field("email", schema::string().includes("@").optional())
//!     .into();
//!
//! assert!(user.validate(&json!({ "name": "Ada", "age": 36 })).is_none());
//!
//! let error = user.validate(&json!({ "name": "A", "age": "36" })).unwrap();
//! assert_eq!(
//!     error.to_value(),
//!     json!({
//!         "name": { "message": "String length must be at least 2 characters" },
//!         "age": { "message": "Expected a number, but found string" }
//!     })
//! );
//!
//! assert_eq!(
//!     user.parse(&json!({ "name": "Ada", "age": "36" })).unwrap(),
//!     json!({ "name": "Ada", "age": 36 })
//! );
//! ```

mod describe;
mod error;
mod file;
mod js;
mod number;
mod object;
mod string;

pub use describe::{SchemaDescription, Shape};
pub use error::{SchemaError, MISSING_DATA};
pub use file::FileSchema;
pub use number::NumberSchema;
pub use object::ObjectSchema;
pub use string::StringSchema;

use crate::file::{self as files, FileMap};
use serde_json::Value;

/// A schema node.
///
/// Nodes are required by default; [`optional`](Schema::optional) lets them
/// accept an absent or `null` value while keeping every other constraint.
#[derive(Debug, Clone)]
pub struct Schema {
    kind: SchemaKind,
    required: bool,
}

/// The kind of a schema node and its constraints.
#[derive(Debug, Clone)]
pub enum SchemaKind {
    /// A string.
    String(StringSchema),
    /// A number.
    Number(NumberSchema),
    /// A boolean.
    Boolean,
    /// An array whose every element matches the item node.
    Array(Box<Schema>),
    /// An object with named fields.
    Object(ObjectSchema),
    /// An uploaded file.
    File(FileSchema),
}

/// Creates a string node.
#[must_use]
pub fn string() -> StringSchema {
    StringSchema::default()
}

/// Creates a number node.
#[must_use]
pub fn number() -> NumberSchema {
    NumberSchema::default()
}

/// Creates a boolean node.
#[must_use]
pub fn boolean() -> Schema {
    Schema::new(SchemaKind::Boolean)
}

/// Creates an array node whose elements match `item`.
#[must_use]
pub fn array(item: impl Into<Schema>) -> Schema {
    Schema::new(SchemaKind::Array(Box::new(item.into())))
}

/// Creates an object node with no fields.
#[must_use]
pub fn object() -> ObjectSchema {
    ObjectSchema::default()
}

/// Creates a file node.
#[must_use]
pub fn file() -> FileSchema {
    FileSchema::default()
}

impl Schema {
    /// Creates a required node of the given kind.
    #[must_use]
    pub fn new(kind: SchemaKind) -> Self {
        Self {
            kind,
            required: true,
        }
    }

    /// Marks the node optional.
    #[must_use]
    pub fn optional(mut self) -> Self {
        self.required = false;
        self
    }

    /// Returns the node kind.
    #[must_use]
    pub fn kind(&self) -> &SchemaKind {
        &self.kind
    }

    /// Returns `false` once [`optional`](Schema::optional) was called.
    #[must_use]
    pub fn is_required(&self) -> bool {
        self.required
    }

    /// Returns the object node, if this is one.
    #[must_use]
    pub fn as_object(&self) -> Option<&ObjectSchema> {
        match &self.kind {
            SchemaKind::Object(object) => Some(object),
            _ => None,
        }
    }

    /// Returns the name of the node kind (`"string"`, `"array"`, ...).
    #[must_use]
    pub fn kind_name(&self) -> &'static str {
        match self.kind {
            SchemaKind::String(_) => "string",
            SchemaKind::Number(_) => "number",
            SchemaKind::Boolean => "boolean",
            SchemaKind::Array(_) => "array",
            SchemaKind::Object(_) => "object",
            SchemaKind::File(_) => "file",
        }
    }

    /// Checks `value` strictly. Returns `None` when it is valid.
    ///
    /// Never coerces: `"5"` is not a number here.
    #[must_use]
    pub fn validate(&self, value: &Value) -> Option<SchemaError> {
        self.check(Some(value))
    }

    pub(crate) fn check(&self, value: Option<&Value>) -> Option<SchemaError> {
        if !self.required && js::is_absent(value) {
            return None;
        }
        match &self.kind {
            SchemaKind::String(rules) => rules.check(value),
            SchemaKind::Number(rules) => rules.check(value),
            SchemaKind::Boolean => match value {
                Some(Value::Bool(_)) => None,
                _ => Some(SchemaError::message(format!(
                    "Expected a boolean, but found {}",
                    js::type_name(value)
                ))),
            },
            SchemaKind::Array(item) => object::check_array(item, value),
            SchemaKind::Object(object) => object.check(value),
            SchemaKind::File(rules) => rules.check_value(value),
        }
    }

    /// Coerces `value` into the node's type.
    ///
    /// Scalars fail only when the value is falsy (`null`, `""`, `0`, `false`)
    /// and the node is required; constraints are not re-checked.
    ///
    /// # Panics
    ///
    /// Panics when called on a file node. Files are only ever validated.
    pub fn parse(&self, value: &Value) -> Result<Value, SchemaError> {
        self.parse_field(Some(value))
    }

    pub(crate) fn parse_field(&self, value: Option<&Value>) -> Result<Value, SchemaError> {
        if let SchemaKind::File(_) = self.kind {
            panic!("parsing is not supported for file schemas");
        }
        if !self.required && js::is_absent(value) {
            return Ok(Value::Null);
        }

        match &self.kind {
            SchemaKind::Object(object) => object.parse(value),
            SchemaKind::Array(item) => match value {
                Some(v) if !(self.required && js::is_falsy(value)) => object::parse_array(item, v),
                _ => Err(SchemaError::List(vec![SchemaError::missing()])),
            },
            scalar => {
                let v = match value {
                    Some(v) if !(self.required && js::is_falsy(value)) => v,
                    _ => return Err(SchemaError::missing()),
                };
                match scalar {
                    SchemaKind::String(_) => Ok(string::coerce(v)),
                    SchemaKind::Number(_) => number::coerce(v),
                    _ => Ok(Value::Bool(!js::is_falsy(Some(v)))),
                }
            }
        }
    }

    /// Checks the files channel.
    ///
    /// Object nodes look each field up by name: file fields check presence
    /// and size, other fields only presence. Other node kinds are checked
    /// against the files' JSON metadata.
    #[must_use]
    pub fn validate_files(&self, files: &FileMap) -> Option<SchemaError> {
        match &self.kind {
            SchemaKind::Object(object) => object.check_files(files),
            SchemaKind::File(rules) => {
                let first = files.values().next();
                if first.is_none() && !self.required {
                    return None;
                }
                rules.check(first)
            }
            _ => self.validate(&files::metadata(files)),
        }
    }
}

impl From<StringSchema> for Schema {
    fn from(rules: StringSchema) -> Self {
        Self::new(SchemaKind::String(rules))
    }
}

impl From<NumberSchema> for Schema {
    fn from(rules: NumberSchema) -> Self {
        Self::new(SchemaKind::Number(rules))
    }
}

impl From<ObjectSchema> for Schema {
    fn from(object: ObjectSchema) -> Self {
        Self::new(SchemaKind::Object(object))
    }
}

impl From<FileSchema> for Schema {
    fn from(rules: FileSchema) -> Self {
        Self::new(SchemaKind::File(rules))
    }
}
