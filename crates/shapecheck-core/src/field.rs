//! Field rule declarations
//!
//! A [`FieldSpec`] holds the declarative rules for one field. It never
//! validates its own options; malformed combinations are reported when the
//! spec is registered into a [`Schema`](crate::Schema).
//!
//! Copyright (c) 2025 Shapecheck Team
//! Licensed under the Apache-2.0 license

use crate::types::TypeSpec;
use crate::value::Value;
use std::fmt;
use std::sync::Arc;

/// Custom validation gate. Absent values are passed as `&Value::Null`.
pub type Predicate = Arc<dyn Fn(&Value) -> bool + Send + Sync>;

/// Options record accepted by [`FieldSpec::from_options`]. Every option
/// falls back to its documented default when left as `None`.
#[derive(Clone, Default)]
pub struct FieldOptions {
    /// Value must be present; defaults to `false`
    pub required: Option<bool>,
    /// Check nominal class membership; defaults to `false`
    pub instance: Option<bool>,
    pub custom: Option<Predicate>,
    /// Substituted when the field is absent and not required
    pub defaults: Option<Value>,
    pub type_spec: Option<TypeSpec>,
    /// Nested declaration for structured values
    pub children: Option<Fields>,
}

/// The validation rules for a single field
#[derive(Clone, Default)]
pub struct FieldSpec {
    name: String,
    required: bool,
    instance: bool,
    custom: Option<Predicate>,
    defaults: Option<Value>,
    type_spec: Option<TypeSpec>,
    children: Option<Fields>,
}

impl FieldSpec {
    /// A field with no constraints
    pub fn new() -> Self {
        Self::default()
    }

    /// Alias of [`FieldSpec::new`] for declarations that accept anything
    pub fn any() -> Self {
        Self::default()
    }

    /// A field constrained to `type_spec`
    pub fn typed<T: Into<TypeSpec>>(type_spec: T) -> Self {
        Self::default().of_type(type_spec)
    }

    /// Build a spec from an options record; unset options take their defaults
    pub fn from_options(options: FieldOptions) -> Self {
        Self {
            name: String::new(),
            required: options.required.unwrap_or(false),
            instance: options.instance.unwrap_or(false),
            custom: options.custom,
            defaults: options.defaults,
            type_spec: options.type_spec,
            children: options.children,
        }
    }

    /// Reject absent or null values
    pub fn required(mut self, required: bool) -> Self {
        self.required = required;
        self
    }

    /// Require an instance of the field's class or one of its subclasses
    pub fn instance(mut self, instance: bool) -> Self {
        self.instance = instance;
        self
    }

    /// Add a predicate that runs before every other rule except children
    pub fn custom<F>(mut self, predicate: F) -> Self
    where
        F: Fn(&Value) -> bool + Send + Sync + 'static,
    {
        self.custom = Some(Arc::new(predicate));
        self
    }

    /// Value substituted when an optional field is absent or null
    pub fn defaults<V: Into<Value>>(mut self, value: V) -> Self {
        self.defaults = Some(value.into());
        self
    }

    /// Set the expected type
    pub fn of_type<T: Into<TypeSpec>>(mut self, type_spec: T) -> Self {
        self.type_spec = Some(type_spec.into());
        self
    }

    /// Validate the field's value with a nested schema
    pub fn children<F: Into<Fields>>(mut self, children: F) -> Self {
        self.children = Some(children.into());
        self
    }

    /// Key this spec governs; empty until registered into a schema
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn is_required(&self) -> bool {
        self.required
    }

    pub fn is_instance(&self) -> bool {
        self.instance
    }

    pub fn custom_predicate(&self) -> Option<&Predicate> {
        self.custom.as_ref()
    }

    pub fn default_value(&self) -> Option<&Value> {
        self.defaults.as_ref()
    }

    pub fn type_spec(&self) -> Option<&TypeSpec> {
        self.type_spec.as_ref()
    }

    pub fn child_fields(&self) -> Option<&Fields> {
        self.children.as_ref()
    }

    pub(crate) fn named<N: Into<String>>(mut self, name: N) -> Self {
        self.name = name.into();
        self
    }
}

impl fmt::Debug for FieldSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FieldSpec")
            .field("name", &self.name)
            .field("required", &self.required)
            .field("instance", &self.instance)
            .field("custom", &self.custom.as_ref().map(|_| "<predicate>"))
            .field("defaults", &self.defaults)
            .field("type_spec", &self.type_spec)
            .field("children", &self.children)
            .finish()
    }
}

impl fmt::Debug for FieldOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FieldOptions")
            .field("required", &self.required)
            .field("instance", &self.instance)
            .field("custom", &self.custom.as_ref().map(|_| "<predicate>"))
            .field("defaults", &self.defaults)
            .field("type_spec", &self.type_spec)
            .field("children", &self.children)
            .finish()
    }
}

/// A schema declaration: named fields matched by key, or positional fields
/// matched by index against an array
#[derive(Debug, Clone)]
pub enum Fields {
    Named(Vec<(String, FieldSpec)>),
    Positional(Vec<FieldSpec>),
}

impl Fields {
    pub fn len(&self) -> usize {
        match self {
            Fields::Named(fields) => fields.len(),
            Fields::Positional(fields) => fields.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl<K: Into<String>> From<Vec<(K, FieldSpec)>> for Fields {
    fn from(fields: Vec<(K, FieldSpec)>) -> Self {
        Fields::Named(fields.into_iter().map(|(k, v)| (k.into(), v)).collect())
    }
}

impl<K: Into<String>, const N: usize> From<[(K, FieldSpec); N]> for Fields {
    fn from(fields: [(K, FieldSpec); N]) -> Self {
        Fields::Named(fields.into_iter().map(|(k, v)| (k.into(), v)).collect())
    }
}

impl From<Vec<FieldSpec>> for Fields {
    fn from(fields: Vec<FieldSpec>) -> Self {
        Fields::Positional(fields)
    }
}

impl<const N: usize> From<[FieldSpec; N]> for Fields {
    fn from(fields: [FieldSpec; N]) -> Self {
        Fields::Positional(fields.into())
    }
}
