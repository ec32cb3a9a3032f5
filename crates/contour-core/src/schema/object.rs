//! Object and array nodes.

use super::error::SchemaError;
use super::{js, Schema, SchemaKind};
use crate::file::FileMap;
use indexmap::IndexMap;
use serde_json::{Map, Value};

/// An object node: an ordered set of named child nodes.
///
/// Unknown input fields are ignored. Input that is not an object is checked
/// field by field as if it were empty, so failing fields still come back
/// keyed by name. When no field fails, a required node still rejects it with
/// a single message.
#[derive(Debug, Clone, Default)]
pub struct ObjectSchema {
    fields: IndexMap<String, Schema>,
}

impl ObjectSchema {
    /// Declares a field. Re-declaring a name replaces the earlier node but
    /// keeps its position.
    #[must_use]
    pub fn field(mut self, name: impl Into<String>, node: impl Into<Schema>) -> Self {
        self.fields.insert(name.into(), node.into());
        self
    }

    /// Marks the node optional.
    #[must_use]
    pub fn optional(self) -> Schema {
        Schema::from(self).optional()
    }

    /// Returns the declared fields in declaration order.
    pub fn fields(&self) -> impl Iterator<Item = (&str, &Schema)> {
        self.fields.iter().map(|(name, node)| (name.as_str(), node))
    }

    /// Returns the node declared for `name`.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Schema> {
        self.fields.get(name)
    }

    /// Returns the number of declared fields.
    #[must_use]
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Returns `true` if no fields are declared.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub(crate) fn check(&self, value: Option<&Value>) -> Option<SchemaError> {
        let input = as_object(value);
        let errors: IndexMap<String, SchemaError> = self
            .fields
            .iter()
            .filter_map(|(name, node)| {
                node.check(input.and_then(|map| map.get(name)))
                    .map(|error| (name.clone(), error))
            })
            .collect();

        if !errors.is_empty() {
            return Some(SchemaError::Fields(errors));
        }
        input.is_none().then(|| {
            SchemaError::message(format!(
                "Expected a object, but found {}",
                js::type_name(value)
            ))
        })
    }

    pub(crate) fn parse(&self, value: Option<&Value>) -> Result<Value, SchemaError> {
        let input = as_object(value);
        let mut parsed = Map::new();
        let mut errors = IndexMap::new();

        for (name, node) in &self.fields {
            let field = input.and_then(|map| map.get(name));
            match node.parse_field(field) {
                Ok(_) if !node.is_required() && js::is_absent(field) => {}
                Ok(value) => {
                    parsed.insert(name.clone(), value);
                }
                Err(error) => {
                    errors.insert(name.clone(), error);
                }
            }
        }

        if !errors.is_empty() {
            return Err(SchemaError::Fields(errors));
        }
        match value {
            Some(Value::Object(_)) => Ok(Value::Object(parsed)),
            Some(other) if !js::is_absent(value) => Err(SchemaError::message(format!(
                "Expected object found {}",
                js::type_name(Some(other))
            ))),
            _ => Err(SchemaError::missing()),
        }
    }

    pub(crate) fn check_files(&self, files: &FileMap) -> Option<SchemaError> {
        let errors: IndexMap<String, SchemaError> = self
            .fields
            .iter()
            .filter_map(|(name, node)| {
                let file = files.get(name);
                if file.is_none() && !node.is_required() {
                    return None;
                }
                let error = match node.kind() {
                    SchemaKind::File(rules) => rules.check(file),
                    _ => file.is_none().then(super::file::missing),
                };
                error.map(|error| (name.clone(), error))
            })
            .collect();

        (!errors.is_empty()).then_some(SchemaError::Fields(errors))
    }
}

fn as_object(value: Option<&Value>) -> Option<&Map<String, Value>> {
    value.and_then(Value::as_object)
}

pub(crate) fn check_array(item: &Schema, value: Option<&Value>) -> Option<SchemaError> {
    let Some(Value::Array(items)) = value else {
        return Some(SchemaError::List(vec![SchemaError::message(format!(
            "Expected a array, but found {}",
            js::type_name(value)
        ))]));
    };

    let errors: Vec<SchemaError> = items
        .iter()
        .filter_map(|element| item.check(Some(element)))
        .collect();

    (!errors.is_empty()).then_some(SchemaError::List(errors))
}

pub(crate) fn parse_array(item: &Schema, value: &Value) -> Result<Value, SchemaError> {
    let Value::Array(items) = value else {
        return Err(SchemaError::List(vec![SchemaError::message(format!(
            "Expected array found {}",
            js::type_name(Some(value))
        ))]));
    };

    let mut parsed = Vec::with_capacity(items.len());
    let mut errors = Vec::new();
    for element in items {
        match item.parse_field(Some(element)) {
            Ok(value) => parsed.push(value),
            Err(error) => errors.push(error),
        }
    }

    if errors.is_empty() {
        Ok(Value::Array(parsed))
    } else {
        Err(SchemaError::List(errors))
    }
}
