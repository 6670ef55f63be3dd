//! Structural shape of a value, determined once and threaded through.

use serde_json::{Map, Value};

/// A borrowed view of a value tagged by its top-level shape.
#[derive(Debug, Clone, Copy)]
pub enum Shape<'a> {
    Array(&'a [Value]),
    Object(&'a Map<String, Value>),
    Primitive(&'a Value),
}

impl<'a> Shape<'a> {
    pub fn of(value: &'a Value) -> Self {
        match value {
            Value::Array(items) => Shape::Array(items),
            Value::Object(map) => Shape::Object(map),
            other => Shape::Primitive(other),
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Shape::Array(_) => "array",
            Shape::Object(_) => "object",
            Shape::Primitive(_) => "primitive",
        }
    }

    /// Compact JSON serialization.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        match self {
            Shape::Array(items) => serde_json::to_string(items),
            Shape::Object(map) => serde_json::to_string(map),
            Shape::Primitive(value) => serde_json::to_string(value),
        }
    }

    /// Owned copy of the underlying value.
    pub fn to_value(&self) -> Value {
        match self {
            Shape::Array(items) => Value::Array(items.to_vec()),
            Shape::Object(map) => Value::Object((*map).clone()),
            Shape::Primitive(value) => (*value).clone(),
        }
    }
}

/// Label of a value's JSON type, as used in type histograms.
pub fn type_label(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

pub fn is_complex(value: &Value) -> bool {
    value.is_array() || value.is_object()
}
