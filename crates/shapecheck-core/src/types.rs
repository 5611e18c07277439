//! Primitive categories, nominal classes and field type descriptors
//!
//! Copyright (c) 2025 Shapecheck Team
//! Licensed under the Apache-2.0 license

use crate::context::ValidationMode;
use crate::value::Value;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

static NEXT_CLASS_ID: AtomicU64 = AtomicU64::new(1);

/// Coarse runtime classification of a value
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Symbol,
    Number,
    Sequence,
    Text,
    Boolean,
    Object,
    /// Classes passed around as values
    Class,
}

impl Category {
    /// Category of a value; `None` for null. Instances are objects, while a
    /// class value has its own category.
    pub fn of(value: &Value) -> Option<Self> {
        match value {
            Value::Null => None,
            Value::Bool(_) => Some(Category::Boolean),
            Value::Number(_) => Some(Category::Number),
            Value::Text(_) => Some(Category::Text),
            Value::Symbol(_) => Some(Category::Symbol),
            Value::Array(_) => Some(Category::Sequence),
            Value::Object(_) | Value::Instance(_) => Some(Category::Object),
            Value::Class(_) => Some(Category::Class),
        }
    }

    /// Category equality under the given mode. In compatible mode sequences
    /// and objects are the same category.
    pub fn matches(self, other: Category, mode: ValidationMode) -> bool {
        if self == other {
            return true;
        }
        mode == ValidationMode::Compatible
            && matches!(
                (self, other),
                (Category::Sequence, Category::Object) | (Category::Object, Category::Sequence)
            )
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Category::Symbol => "symbol",
            Category::Number => "number",
            Category::Sequence => "sequence",
            Category::Text => "text",
            Category::Boolean => "boolean",
            Category::Object => "object",
            Category::Class => "class",
        };
        f.write_str(name)
    }
}

/// A nominal type. Identity is a process-unique identifier assigned at
/// creation, so two classes with the same name are still different types.
#[derive(Debug)]
pub struct Class {
    id: u64,
    name: String,
    parent: Option<Arc<Class>>,
}

impl Class {
    /// Create a root class
    pub fn new<N: Into<String>>(name: N) -> Arc<Self> {
        Arc::new(Self {
            id: NEXT_CLASS_ID.fetch_add(1, Ordering::Relaxed),
            name: name.into(),
            parent: None,
        })
    }

    /// Create a class deriving from `parent`
    pub fn extends<N: Into<String>>(name: N, parent: &Arc<Class>) -> Arc<Self> {
        Arc::new(Self {
            id: NEXT_CLASS_ID.fetch_add(1, Ordering::Relaxed),
            name: name.into(),
            parent: Some(Arc::clone(parent)),
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn parent(&self) -> Option<&Arc<Class>> {
        self.parent.as_ref()
    }

    /// Whether this class is `other` or derives from it
    pub fn is_a(&self, other: &Class) -> bool {
        let mut current = Some(self);
        while let Some(class) = current {
            if class.id == other.id {
                return true;
            }
            current = class.parent.as_deref();
        }
        false
    }
}

impl PartialEq for Class {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Class {}

/// Expected type of a field
#[derive(Debug, Clone, PartialEq)]
pub enum TypeSpec {
    Primitive(Category),
    Class(Arc<Class>),
}

impl TypeSpec {
    pub const SYMBOL: TypeSpec = TypeSpec::Primitive(Category::Symbol);
    pub const NUMBER: TypeSpec = TypeSpec::Primitive(Category::Number);
    pub const SEQUENCE: TypeSpec = TypeSpec::Primitive(Category::Sequence);
    pub const TEXT: TypeSpec = TypeSpec::Primitive(Category::Text);
    pub const BOOLEAN: TypeSpec = TypeSpec::Primitive(Category::Boolean);
    pub const OBJECT: TypeSpec = TypeSpec::Primitive(Category::Object);
    /// Any class value, whatever the class
    pub const CLASS: TypeSpec = TypeSpec::Primitive(Category::Class);

    /// Runtime category of the type itself. A class type is a class value,
    /// so without an instance check it only matches other class values.
    pub fn category(&self) -> Category {
        match self {
            TypeSpec::Primitive(category) => *category,
            TypeSpec::Class(_) => Category::Class,
        }
    }

    pub fn primitive(&self) -> Option<Category> {
        match self {
            TypeSpec::Primitive(category) => Some(*category),
            TypeSpec::Class(_) => None,
        }
    }

    pub fn class(&self) -> Option<&Arc<Class>> {
        match self {
            TypeSpec::Class(class) => Some(class),
            TypeSpec::Primitive(_) => None,
        }
    }
}

impl From<Category> for TypeSpec {
    fn from(category: Category) -> Self {
        TypeSpec::Primitive(category)
    }
}

impl From<Arc<Class>> for TypeSpec {
    fn from(class: Arc<Class>) -> Self {
        TypeSpec::Class(class)
    }
}

impl From<&Arc<Class>> for TypeSpec {
    fn from(class: &Arc<Class>) -> Self {
        TypeSpec::Class(Arc::clone(class))
    }
}

impl fmt::Display for TypeSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TypeSpec::Primitive(category) => write!(f, "{}", category),
            TypeSpec::Class(class) => write!(f, "{}", class.name()),
        }
    }
}
