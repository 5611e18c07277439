//! Dynamic value model validated by schemas
//!
//! Copyright (c) 2025 Shapecheck Team
//! Licensed under the Apache-2.0 license

use crate::types::Class;
use std::collections::BTreeMap;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

/// Ordered string-keyed map used for object and instance fields
pub type Map = BTreeMap<String, Value>;

static NEXT_SYMBOL_ID: AtomicU64 = AtomicU64::new(1);

/// A unique token. Two symbols are equal only if they come from the same
/// `Symbol::new` call, whatever their descriptions.
#[derive(Debug, Clone)]
pub struct Symbol {
    id: u64,
    description: Option<Arc<str>>,
}

impl Symbol {
    /// Create a fresh symbol with an optional description
    pub fn new(description: Option<&str>) -> Self {
        Self {
            id: NEXT_SYMBOL_ID.fetch_add(1, Ordering::Relaxed),
            description: description.map(Arc::from),
        }
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }
}

impl PartialEq for Symbol {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Symbol({})", self.description().unwrap_or(""))
    }
}

/// A value constructed from a nominal [`Class`]
#[derive(Debug, Clone, PartialEq)]
pub struct Instance {
    class: Arc<Class>,
    fields: Map,
}

impl Instance {
    pub fn new(class: &Arc<Class>) -> Self {
        Self {
            class: Arc::clone(class),
            fields: Map::new(),
        }
    }

    /// Attach a field, builder style
    pub fn with_field<K: Into<String>, V: Into<Value>>(mut self, key: K, value: V) -> Self {
        self.fields.insert(key.into(), value.into());
        self
    }

    pub fn class(&self) -> &Arc<Class> {
        &self.class
    }

    pub fn fields(&self) -> &Map {
        &self.fields
    }

    pub fn fields_mut(&mut self) -> &mut Map {
        &mut self.fields
    }
}

/// Any value a schema can be asked to validate
#[derive(Debug, Clone, Default, PartialEq)]
pub enum Value {
    #[default]
    Null,
    Bool(bool),
    Number(f64),
    Text(String),
    Symbol(Symbol),
    Array(Vec<Value>),
    Object(Map),
    Instance(Instance),
    /// A class used as a value, such as a type handed around for later
    /// construction
    Class(Arc<Class>),
}

impl Value {
    /// Create an empty object
    pub fn object() -> Self {
        Value::Object(Map::new())
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Whether this value can hold keyed fields a schema walks over
    pub fn is_container(&self) -> bool {
        matches!(self, Value::Object(_) | Value::Array(_) | Value::Instance(_))
    }

    /// Truthiness: `null`, `false`, `0`, `NaN` and `""` are falsy.
    pub fn is_truthy(&self) -> bool {
        match self {
            Value::Null => false,
            Value::Bool(b) => *b,
            Value::Number(n) => *n != 0.0 && !n.is_nan(),
            Value::Text(s) => !s.is_empty(),
            _ => true,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Number(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Text(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_instance(&self) -> Option<&Instance> {
        match self {
            Value::Instance(instance) => Some(instance),
            _ => None,
        }
    }

    pub fn as_class(&self) -> Option<&Arc<Class>> {
        match self {
            Value::Class(class) => Some(class),
            _ => None,
        }
    }

    /// Look up a field by key. Arrays are indexed by the key's decimal value.
    pub fn get(&self, key: &str) -> Option<&Value> {
        match self {
            Value::Object(map) => map.get(key),
            Value::Instance(instance) => instance.fields.get(key),
            Value::Array(items) => key.parse::<usize>().ok().and_then(|i| items.get(i)),
            _ => None,
        }
    }

    /// Mutable lookup, same keying as [`Value::get`]
    pub fn get_mut(&mut self, key: &str) -> Option<&mut Value> {
        match self {
            Value::Object(map) => map.get_mut(key),
            Value::Instance(instance) => instance.fields.get_mut(key),
            Value::Array(items) => key.parse::<usize>().ok().and_then(move |i| items.get_mut(i)),
            _ => None,
        }
    }

    /// Store a field by key. Hands the value back when this value cannot
    /// hold the key. Arrays accept an existing index or the one just past
    /// the end.
    pub fn set(&mut self, key: &str, value: Value) -> Result<(), Value> {
        match self {
            Value::Object(map) => {
                map.insert(key.to_string(), value);
                Ok(())
            }
            Value::Instance(instance) => {
                instance.fields.insert(key.to_string(), value);
                Ok(())
            }
            Value::Array(items) => match key.parse::<usize>() {
                Ok(index) if index == items.len() => {
                    items.push(value);
                    Ok(())
                }
                Ok(index) => match items.get_mut(index) {
                    Some(slot) => {
                        *slot = value;
                        Ok(())
                    }
                    None => Err(value),
                },
                Err(_) => Err(value),
            },
            _ => Err(value),
        }
    }

    /// Render as JSON. Symbols become `"Symbol(description)"`, classes
    /// become `"class Name"` and instances become their fields plus a
    /// `"$class"` entry.
    pub fn to_json(&self) -> serde_json::Value {
        match self {
            Value::Null => serde_json::Value::Null,
            Value::Bool(b) => serde_json::Value::Bool(*b),
            Value::Number(n) => serde_json::Number::from_f64(*n)
                .map(serde_json::Value::Number)
                .unwrap_or(serde_json::Value::Null),
            Value::Text(s) => serde_json::Value::String(s.clone()),
            Value::Symbol(symbol) => serde_json::Value::String(symbol.to_string()),
            Value::Array(items) => serde_json::Value::Array(items.iter().map(Value::to_json).collect()),
            Value::Object(map) => serde_json::Value::Object(
                map.iter().map(|(k, v)| (k.clone(), v.to_json())).collect(),
            ),
            Value::Instance(instance) => {
                let mut object: serde_json::Map<String, serde_json::Value> = instance
                    .fields
                    .iter()
                    .map(|(k, v)| (k.clone(), v.to_json()))
                    .collect();
                object.insert(
                    "$class".to_string(),
                    serde_json::Value::String(instance.class.name().to_string()),
                );
                serde_json::Value::Object(object)
            }
            Value::Class(class) => serde_json::Value::String(format!("class {}", class.name())),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_json())
    }
}

impl From<serde_json::Value> for Value {
    fn from(value: serde_json::Value) -> Self {
        match value {
            serde_json::Value::Null => Value::Null,
            serde_json::Value::Bool(b) => Value::Bool(b),
            serde_json::Value::Number(n) => Value::Number(n.as_f64().unwrap_or(f64::NAN)),
            serde_json::Value::String(s) => Value::Text(s),
            serde_json::Value::Array(items) => Value::Array(items.into_iter().map(Value::from).collect()),
            serde_json::Value::Object(map) => {
                Value::Object(map.into_iter().map(|(k, v)| (k, Value::from(v))).collect())
            }
        }
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Value::Number(n)
    }
}

impl From<i32> for Value {
    fn from(n: i32) -> Self {
        Value::Number(f64::from(n))
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Text(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Text(s)
    }
}

impl From<Symbol> for Value {
    fn from(symbol: Symbol) -> Self {
        Value::Symbol(symbol)
    }
}

impl From<Instance> for Value {
    fn from(instance: Instance) -> Self {
        Value::Instance(instance)
    }
}

impl From<Arc<Class>> for Value {
    fn from(class: Arc<Class>) -> Self {
        Value::Class(class)
    }
}

impl From<&Arc<Class>> for Value {
    fn from(class: &Arc<Class>) -> Self {
        Value::Class(Arc::clone(class))
    }
}

impl From<Vec<Value>> for Value {
    fn from(items: Vec<Value>) -> Self {
        Value::Array(items)
    }
}

impl From<Map> for Value {
    fn from(map: Map) -> Self {
        Value::Object(map)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_truthiness() {
        assert!(!Value::Null.is_truthy());
        assert!(!Value::Bool(false).is_truthy());
        assert!(!Value::Number(0.0).is_truthy());
        assert!(!Value::Number(f64::NAN).is_truthy());
        assert!(!Value::from("").is_truthy());

        assert!(Value::from("x").is_truthy());
        assert!(Value::Array(vec![]).is_truthy());
        assert!(Value::object().is_truthy());
        assert!(Value::Symbol(Symbol::new(None)).is_truthy());
    }

    #[test]
    fn test_symbol_identity() {
        let a = Symbol::new(Some("tag"));
        let b = Symbol::new(Some("tag"));
        assert_ne!(a, b);
        assert_eq!(a, a.clone());
        assert_eq!(a.to_string(), "Symbol(tag)");
    }

    #[test]
    fn test_array_get_and_set() {
        let mut value = Value::from(json!([1, "a"]));
        assert_eq!(value.get("1"), Some(&Value::from("a")));
        assert_eq!(value.get("x"), None);

        assert!(value.set("2", Value::Bool(true)).is_ok());
        assert!(value.set("0", Value::from("b")).is_ok());
        assert_eq!(value.to_json(), json!(["b", "a", true]));
        assert_eq!(value.set("nope", Value::Null), Err(Value::Null));
    }

    #[test]
    fn test_array_set_refuses_gaps() {
        let mut value = Value::Array(vec![]);
        assert_eq!(value.set("1", Value::from(1)), Err(Value::from(1)));
        assert_eq!(
            value.set("18446744073709551615", Value::from(1)),
            Err(Value::from(1))
        );
        assert_eq!(value.set("4000000000", Value::Null), Err(Value::Null));
        assert_eq!(value, Value::Array(vec![]));
    }

    #[test]
    fn test_class_values() {
        let class = Class::new("Widget");
        let value = Value::from(&class);
        assert!(value.is_truthy());
        assert!(!value.is_container());
        assert_eq!(value.as_class(), Some(&class));
        assert_eq!(value.to_json(), json!("class Widget"));
    }

    #[test]
    fn test_scalars_cannot_hold_fields() {
        let mut value = Value::from(5);
        assert_eq!(value.get("a"), None);
        assert!(value.set("a", Value::Null).is_err());
    }

    #[test]
    fn test_json_round_trip_of_instance() {
        let class = Class::new("Point");
        let value = Value::from(Instance::new(&class).with_field("x", 1));
        assert_eq!(value.to_json(), json!({"x": 1.0, "$class": "Point"}));
    }
}
