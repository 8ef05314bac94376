//! Conversion between [`Value`] and `serde_json::Value`.
//!
//! JSON has no binary or 32-bit float type and only string keys, so
//! [`Value::to_json`] is lossy in those spots:
//! - `Float32` widens to a double; NaN and infinities become `null`
//! - `Binary` becomes an array of byte numbers
//! - non-string map keys are rendered as their compact JSON text

use serde_json::{Map, Number, Value as JsonValue};

use crate::Value;

impl Value {
    /// Builds a value tree from JSON.
    ///
    /// Non-negative integers become `UInt`, negative ones `Int`, anything
    /// else numeric `Float64`.
    pub fn from_json(json: &JsonValue) -> Self {
        match json {
            JsonValue::Null => Value::Nil,
            JsonValue::Bool(b) => Value::Bool(*b),
            JsonValue::Number(n) => {
                if let Some(u) = n.as_u64() {
                    Value::UInt(u)
                } else if let Some(i) = n.as_i64() {
                    Value::Int(i)
                } else {
                    Value::Float64(n.as_f64().unwrap_or(f64::NAN))
                }
            }
            JsonValue::String(s) => Value::String(s.clone()),
            JsonValue::Array(items) => Value::Array(items.iter().map(Value::from_json).collect()),
            JsonValue::Object(obj) => Value::Map(
                obj.iter()
                    .map(|(k, v)| (Value::String(k.clone()), Value::from_json(v)))
                    .collect(),
            ),
        }
    }

    pub fn to_json(&self) -> JsonValue {
        match self {
            Value::Nil => JsonValue::Null,
            Value::Bool(b) => JsonValue::Bool(*b),
            Value::Int(n) => JsonValue::from(*n),
            Value::UInt(n) => JsonValue::from(*n),
            Value::Float32(f) => float_to_json(f64::from(*f)),
            Value::Float64(f) => float_to_json(*f),
            Value::String(s) => JsonValue::String(s.clone()),
            Value::Binary(bytes) => JsonValue::Array(bytes.iter().map(|&b| JsonValue::from(b)).collect()),
            Value::Array(items) => JsonValue::Array(items.iter().map(Value::to_json).collect()),
            Value::Map(entries) => {
                let mut obj = Map::with_capacity(entries.len());
                for (key, value) in entries {
                    let key = match key {
                        Value::String(s) => s.clone(),
                        other => other.to_json().to_string(),
                    };
                    obj.insert(key, value.to_json());
                }
                JsonValue::Object(obj)
            }
        }
    }
}

fn float_to_json(f: f64) -> JsonValue {
    Number::from_f64(f).map_or(JsonValue::Null, JsonValue::Number)
}

impl From<&JsonValue> for Value {
    fn from(json: &JsonValue) -> Self {
        Value::from_json(json)
    }
}

impl From<&Value> for JsonValue {
    fn from(value: &Value) -> Self {
        value.to_json()
    }
}
