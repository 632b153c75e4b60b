// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! The closed set of value shapes the codec can carry.

use crate::format::TypeTag;
use crate::{CodecError, Result};
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use serde::Serialize;
use serde_json::{Map as JsonMap, Number};

/// A dynamically-typed value.
///
/// Maps keep their pairs in insertion order and accept keys of any variant.
///
/// `Other` holds the JSON text of a host value that has no native variant. It is
/// written to the wire as `Text`, so decoding yields `Value::Text` with the same
/// content. Prefer the native variants; this path is lossy.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Value {
    #[default]
    Null,
    Bool(bool),
    Integer(i64),
    Float(f64),
    Text(String),
    Bytes(Vec<u8>),
    List(Vec<Value>),
    Map(Vec<(Value, Value)>),
    Other(String),
}

impl Value {
    //region Constructors

    /// Builds a map from key/value pairs, keeping their order.
    ///
    /// # Example
    /// ```
    /// use brandpress_codec::Value;
    ///
    /// let post = Value::map([("title", "Hello"), ("brand", "north")]);
    /// assert_eq!(post.get("brand"), Some(&Value::from("north")));
    /// ```
    pub fn map<K, V, I>(pairs: I) -> Value
    where
        K: Into<Value>,
        V: Into<Value>,
        I: IntoIterator<Item = (K, V)>,
    {
        Value::Map(
            pairs
                .into_iter()
                .map(|(key, value)| (key.into(), value.into()))
                .collect(),
        )
    }

    pub fn list<T, I>(items: I) -> Value
    where
        T: Into<Value>,
        I: IntoIterator<Item = T>,
    {
        Value::List(items.into_iter().map(Into::into).collect())
    }

    pub fn bytes(bytes: impl Into<Vec<u8>>) -> Value {
        Value::Bytes(bytes.into())
    }

    /// Wraps a host value without a native variant as its JSON text.
    ///
    /// Fails with [`CodecError::UnsupportedType`] if the value cannot be
    /// serialized to JSON either.
    ///
    /// # Example
    /// ```
    /// use brandpress_codec::Value;
    /// use std::collections::BTreeSet;
    ///
    /// let tags: BTreeSet<&str> = ["launch", "voice"].into_iter().collect();
    /// let value = Value::other(&tags).unwrap();
    /// assert_eq!(value, Value::Other(r#"["launch","voice"]"#.to_string()));
    /// ```
    pub fn other<T: Serialize + ?Sized>(value: &T) -> Result<Value> {
        serde_json::to_string(value)
            .map(Value::Other)
            .map_err(|e| CodecError::UnsupportedType(format!("Value is not JSON serializable: {}", e)))
    }

    /// Converts any serializable host value through its JSON form.
    ///
    /// Integers that only fit a u64 have no native variant and fall back to `Other`.
    pub fn from_serializable<T: Serialize + ?Sized>(value: &T) -> Result<Value> {
        serde_json::to_value(value)
            .map(Value::from)
            .map_err(|e| CodecError::UnsupportedType(format!("Value is not JSON serializable: {}", e)))
    }

    //endregion

    //region Inspection

    /// Wire type this value is written as
    pub fn type_tag(&self) -> TypeTag {
        match self {
            Value::Null => TypeTag::Null,
            Value::Bool(_) => TypeTag::Bool,
            Value::Integer(_) => TypeTag::Integer,
            Value::Float(_) => TypeTag::Float,
            Value::Text(_) | Value::Other(_) => TypeTag::Text,
            Value::Bytes(_) => TypeTag::Bytes,
            Value::List(_) => TypeTag::List,
            Value::Map(_) => TypeTag::Map,
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Value::Integer(i) => Some(*i),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Float(f) => Some(*f),
            _ => None,
        }
    }

    /// Text content, including the JSON text held by `Other`
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Text(s) | Value::Other(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_bytes(&self) -> Option<&[u8]> {
        match self {
            Value::Bytes(b) => Some(b),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[Value]> {
        match self {
            Value::List(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_map(&self) -> Option<&[(Value, Value)]> {
        match self {
            Value::Map(pairs) => Some(pairs),
            _ => None,
        }
    }

    /// First map entry whose key is the given text
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.as_map()?
            .iter()
            .find(|(k, _)| matches!(k, Value::Text(text) if text == key))
            .map(|(_, v)| v)
    }

    /// True if an `Other` appears anywhere in this value
    pub fn contains_other(&self) -> bool {
        match self {
            Value::Other(_) => true,
            Value::List(items) => items.iter().any(Value::contains_other),
            Value::Map(pairs) => pairs
                .iter()
                .any(|(k, v)| k.contains_other() || v.contains_other()),
            _ => false,
        }
    }

    //endregion

    //region JSON

    /// Renders this value as JSON.
    ///
    /// Bytes become base64 text, non finite floats become null and map keys that
    /// are not text are replaced by their own JSON rendering.
    pub fn to_json(&self) -> serde_json::Value {
        match self {
            Value::Null => serde_json::Value::Null,
            Value::Bool(b) => serde_json::Value::Bool(*b),
            Value::Integer(i) => serde_json::Value::Number(Number::from(*i)),
            Value::Float(f) => Number::from_f64(*f)
                .map(serde_json::Value::Number)
                .unwrap_or(serde_json::Value::Null),
            Value::Text(s) | Value::Other(s) => serde_json::Value::String(s.clone()),
            Value::Bytes(b) => serde_json::Value::String(BASE64.encode(b)),
            Value::List(items) => {
                serde_json::Value::Array(items.iter().map(Value::to_json).collect())
            }
            Value::Map(pairs) => {
                let mut object = JsonMap::with_capacity(pairs.len());
                for (key, value) in pairs {
                    let key = match key {
                        Value::Text(s) => s.clone(),
                        other => other.to_json().to_string(),
                    };
                    object.insert(key, value.to_json());
                }
                serde_json::Value::Object(object)
            }
        }
    }

    //endregion
}

impl From<serde_json::Value> for Value {
    fn from(json: serde_json::Value) -> Self {
        match json {
            serde_json::Value::Null => Value::Null,
            serde_json::Value::Bool(b) => Value::Bool(b),
            serde_json::Value::Number(n) => {
                if let Some(i) = n.as_i64() {
                    Value::Integer(i)
                } else if n.is_u64() {
                    Value::Other(n.to_string())
                } else {
                    Value::Float(n.as_f64().unwrap_or(f64::NAN))
                }
            }
            serde_json::Value::String(s) => Value::Text(s),
            serde_json::Value::Array(items) => {
                Value::List(items.into_iter().map(Value::from).collect())
            }
            serde_json::Value::Object(object) => Value::Map(
                object
                    .into_iter()
                    .map(|(k, v)| (Value::Text(k), Value::from(v)))
                    .collect(),
            ),
        }
    }
}

macro_rules! impl_from_integer {
    ($($t:ty),*) => {
        $(impl From<$t> for Value {
            fn from(value: $t) -> Self {
                Value::Integer(value as i64)
            }
        })*
    };
}

impl_from_integer!(i8, i16, i32, i64, u8, u16, u32);

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Value::Bool(value)
    }
}

impl From<f32> for Value {
    fn from(value: f32) -> Self {
        Value::Float(value as f64)
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Value::Float(value)
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::Text(value.to_string())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Value::Text(value)
    }
}

impl From<&[u8]> for Value {
    fn from(value: &[u8]) -> Self {
        Value::Bytes(value.to_vec())
    }
}

impl From<Vec<Value>> for Value {
    fn from(value: Vec<Value>) -> Self {
        Value::List(value)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(value: Option<T>) -> Self {
        value.map(Into::into).unwrap_or(Value::Null)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::collections::HashMap;

    #[test]
    fn test_from_json_keeps_integer_and_bool_apart() {
        let value = Value::from(json!({"count": 1, "flag": true, "ratio": 0.5}));
        assert_eq!(value.get("count"), Some(&Value::Integer(1)));
        assert_eq!(value.get("flag"), Some(&Value::Bool(true)));
        assert_eq!(value.get("ratio"), Some(&Value::Float(0.5)));
    }

    #[test]
    fn test_large_unsigned_falls_back_to_other() {
        let value = Value::from_serializable(&u64::MAX).unwrap();
        assert_eq!(value, Value::Other("18446744073709551615".to_string()));
    }

    #[test]
    fn test_non_serializable_is_unsupported() {
        // JSON object keys must be strings
        let mut by_position: HashMap<(i32, i32), &str> = HashMap::new();
        by_position.insert((0, 1), "header");
        assert!(matches!(
            Value::other(&by_position),
            Err(CodecError::UnsupportedType(_))
        ));
        assert!(matches!(
            Value::from_serializable(&by_position),
            Err(CodecError::UnsupportedType(_))
        ));
    }

    #[test]
    fn test_to_json_renders_bytes_and_foreign_keys() {
        let value = Value::Map(vec![
            (Value::Integer(7), Value::bytes(b"hi".to_vec())),
            (Value::from("nan"), Value::Float(f64::NAN)),
        ]);
        assert_eq!(value.to_json(), json!({"7": "aGk=", "nan": null}));
    }

    #[test]
    fn test_contains_other() {
        let nested = Value::list([Value::map([("meta", Value::Other("{}".into()))])]);
        assert!(nested.contains_other());
        assert!(!Value::list([1, 2, 3]).contains_other());
    }

    #[test]
    fn test_option_conversion() {
        assert_eq!(Value::from(None::<i32>), Value::Null);
        assert_eq!(Value::from(Some("x")), Value::from("x"));
    }
}
