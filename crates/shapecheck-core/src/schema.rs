//! Schema construction and the recursive validation algorithm
//!
//! Each field is checked in registration order. For one field the rules run
//! in a fixed order and the first failing rule rejects the whole value:
//!
//! 1. nested children (a child rejection is returned unchanged)
//! 2. custom predicate
//! 3. required-ness, followed by default substitution
//! 4. nominal instance check
//! 5. primitive category short-circuit
//! 6. type gate
//!
//! Copyright (c) 2025 Shapecheck Team
//! Licensed under the Apache-2.0 license

use crate::context::{ValidationContext, ValidationMode};
use crate::error::{Reason, Rejection, ValidationResult};
use crate::field::{FieldSpec, Fields};
use crate::types::{Category, TypeSpec};
use crate::value::Value;
use log::{debug, trace};
use std::collections::HashSet;
use std::sync::Arc;

/// A registered field with its compiled child schema
#[derive(Debug)]
struct Field {
    spec: Arc<FieldSpec>,
    /// Position for fields of an array-shaped schema
    index: Option<usize>,
    children: Option<Schema>,
}

impl Field {
    fn context(&self, parent: &ValidationContext) -> ValidationContext {
        match self.index {
            Some(index) => parent.child_index(index),
            None => parent.child(self.spec.name()),
        }
    }
}

/// An ordered set of field rules used to validate structured values.
///
/// Schemas are immutable once built and can be shared between threads;
/// validation only ever mutates the data being validated.
#[derive(Debug, Clone)]
pub struct Schema {
    fields: Arc<[Field]>,
    positional: bool,
}

impl Schema {
    /// Build a schema from named or positional field declarations.
    ///
    /// Fails with [`Reason::Schema`] when a declaration is malformed: an
    /// empty or duplicate name, an instance check without a class type,
    /// children on a non-structured primitive type, or any of these inside
    /// nested children.
    ///
    /// ```rust
    /// use shapecheck_core::{FieldSpec, Schema, TypeSpec};
    ///
    /// let schema = Schema::new([
    ///     ("id", FieldSpec::typed(TypeSpec::NUMBER).required(true)),
    ///     ("label", FieldSpec::typed(TypeSpec::TEXT).defaults("untitled")),
    /// ])
    /// .unwrap();
    /// assert_eq!(schema.len(), 2);
    /// ```
    pub fn new<F: Into<Fields>>(fields: F) -> ValidationResult<Self> {
        Self::compile(fields.into(), &ValidationContext::default())
    }

    fn compile(fields: Fields, ctx: &ValidationContext) -> ValidationResult<Self> {
        match fields {
            Fields::Named(declared) => {
                let mut seen = HashSet::with_capacity(declared.len());
                let mut compiled = Vec::with_capacity(declared.len());
                for (name, spec) in declared {
                    if name.is_empty() {
                        return Err(Rejection::schema(&ctx.path, "field name cannot be empty"));
                    }
                    if !seen.insert(name.clone()) {
                        return Err(Rejection::schema(
                            ctx.child(&name).path,
                            format!("field {} is declared more than once", name),
                        ));
                    }
                    let field_ctx = ctx.child(&name);
                    compiled.push(Self::compile_field(spec.named(name), None, &field_ctx)?);
                }
                Ok(Self {
                    fields: compiled.into(),
                    positional: false,
                })
            }
            Fields::Positional(declared) => {
                let compiled = declared
                    .into_iter()
                    .enumerate()
                    .map(|(index, spec)| {
                        let field_ctx = ctx.child_index(index);
                        Self::compile_field(spec.named(index.to_string()), Some(index), &field_ctx)
                    })
                    .collect::<ValidationResult<Vec<_>>>()?;
                Ok(Self {
                    fields: compiled.into(),
                    positional: true,
                })
            }
        }
    }

    fn compile_field(
        spec: FieldSpec,
        index: Option<usize>,
        ctx: &ValidationContext,
    ) -> ValidationResult<Field> {
        let spec = Arc::new(spec);

        if spec.is_instance() && spec.type_spec().and_then(TypeSpec::class).is_none() {
            return Err(Rejection::schema(
                &ctx.path,
                "instance check requires a class type",
            )
            .with_field(&spec));
        }

        let children = match spec.child_fields() {
            Some(children) => {
                if let Some(category) = spec.type_spec().and_then(TypeSpec::primitive) {
                    if !matches!(category, Category::Object | Category::Sequence) {
                        return Err(Rejection::schema(
                            &ctx.path,
                            format!("children cannot be declared on a {} field", category),
                        )
                        .with_field(&spec));
                    }
                }
                Some(Self::compile(children.clone(), ctx)?)
            }
            None => None,
        };

        Ok(Field {
            spec,
            index,
            children,
        })
    }

    /// Number of registered fields
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Whether the schema declares no fields
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Whether fields are matched by position against an array
    pub fn is_positional(&self) -> bool {
        self.positional
    }

    /// Registered field specs in registration order
    pub fn fields(&self) -> impl Iterator<Item = &FieldSpec> {
        self.fields.iter().map(|field| field.spec.as_ref())
    }

    /// Look up a registered field spec by name
    pub fn field(&self, name: &str) -> Option<&FieldSpec> {
        self.fields().find(|spec| spec.name() == name)
    }

    /// Validate `data` and return a new value carrying resolved defaults and
    /// merged children. The caller's value is left untouched.
    pub fn validate(&self, data: &Value) -> ValidationResult<Value> {
        let mut validated = data.clone();
        self.validate_with_context(&mut validated, &ValidationContext::default())?;
        Ok(validated)
    }

    /// [`Schema::validate`] with sequences and objects kept distinct
    pub fn validate_strict(&self, data: &Value) -> ValidationResult<Value> {
        let mut validated = data.clone();
        self.validate_with_context(&mut validated, &ValidationContext::new(ValidationMode::Strict))?;
        Ok(validated)
    }

    /// Validate `data`, writing resolved defaults into it as fields are
    /// processed. Substitutions made before a rejection are kept.
    pub fn validate_in_place(&self, data: &mut Value) -> ValidationResult<()> {
        self.validate_with_context(data, &ValidationContext::default())
    }

    /// Validate `data` in place at the location and mode given by `ctx`
    pub fn validate_with_context(
        &self,
        data: &mut Value,
        ctx: &ValidationContext,
    ) -> ValidationResult<()> {
        if !data.is_container() {
            let rejection = Rejection::schema(
                &ctx.path,
                format!("expected a structured value, found {}", describe(Some(&*data))),
            )
            .with_value(Some(&*data));
            debug!("{}", rejection);
            return Err(rejection);
        }

        for field in self.fields.iter() {
            let field_ctx = field.context(ctx);
            self.validate_field(field, data, &field_ctx)?;
        }

        Ok(())
    }

    fn validate_field(
        &self,
        field: &Field,
        data: &mut Value,
        ctx: &ValidationContext,
    ) -> ValidationResult<()> {
        let spec = &field.spec;
        let name = spec.name();
        let present = data.get(name).is_some_and(|value| !value.is_null());

        let mut substituted = if present || spec.is_required() {
            None
        } else {
            spec.default_value().filter(|value| !value.is_null()).cloned()
        };

        if let Some(children) = &field.children {
            let target = if present {
                data.get_mut(name)
            } else {
                substituted.as_mut()
            };
            if let Some(target) = target {
                children.validate_with_context(target, ctx)?;
            }
        }

        {
            let parameter = substituted.as_ref().or_else(|| data.get(name));

            if let Some(custom) = spec.custom_predicate() {
                trace!("{}: custom gate", ctx.path);
                if !custom(parameter.unwrap_or(&Value::Null)) {
                    return Err(reject(
                        ctx,
                        spec,
                        parameter,
                        Reason::Custom,
                        "custom predicate rejected the value".to_string(),
                    ));
                }
            }

            if spec.is_required() && parameter.map_or(true, Value::is_null) {
                return Err(reject(
                    ctx,
                    spec,
                    parameter,
                    Reason::Required,
                    format!("field {} is required", name),
                ));
            }
        }

        if let Some(value) = substituted.take() {
            debug!("{}: substituting default {}", ctx.path, value);
            if let (Some(index), Value::Array(items)) = (field.index, &mut *data) {
                if items.len() < index {
                    items.resize(index, Value::Null);
                }
            }
            if let Err(value) = data.set(name, value) {
                return Err(reject(
                    ctx,
                    spec,
                    Some(&value),
                    Reason::Schema,
                    format!("default for {} cannot be stored in {}", name, describe(Some(&*data))),
                ));
            }
        }

        let parameter = data.get(name);

        if spec.is_instance() {
            trace!("{}: instance gate", ctx.path);
            let expected = spec.type_spec().and_then(TypeSpec::class);
            let is_instance = match (parameter.and_then(Value::as_instance), expected) {
                (Some(instance), Some(class)) => instance.class().is_a(class),
                _ => false,
            };
            if !is_instance {
                let class_name = expected.map_or("<none>", |class| class.name());
                return Err(reject(
                    ctx,
                    spec,
                    parameter,
                    Reason::Instance,
                    format!("expected an instance of {}, found {}", class_name, describe(parameter)),
                ));
            }
        }

        let Some(type_spec) = spec.type_spec() else {
            return Ok(());
        };
        trace!("{}: type gate for {}", ctx.path, type_spec);

        let actual = parameter.and_then(Category::of);
        if let Some(expected) = type_spec.primitive() {
            if actual.is_some_and(|category| category.matches(expected, ctx.mode)) {
                return Ok(());
            }
        }

        let same_category =
            actual.is_some_and(|category| category.matches(type_spec.category(), ctx.mode));
        if !same_category {
            if !spec.is_required() && !parameter.is_some_and(Value::is_truthy) {
                return Ok(());
            }
            if !spec.is_instance() {
                return Err(reject(
                    ctx,
                    spec,
                    parameter,
                    Reason::Type,
                    format!("expected {}, found {}", type_spec, describe(parameter)),
                ));
            }
        }

        Ok(())
    }
}

fn reject(
    ctx: &ValidationContext,
    spec: &Arc<FieldSpec>,
    parameter: Option<&Value>,
    reason: Reason,
    message: String,
) -> Rejection {
    let rejection = Rejection::field(&ctx.path, spec, parameter, reason, message);
    debug!("{}", rejection);
    rejection
}

fn describe(value: Option<&Value>) -> String {
    match value {
        None => "nothing".to_string(),
        Some(Value::Null) => "null".to_string(),
        Some(Value::Instance(instance)) => format!("an instance of {}", instance.class().name()),
        Some(Value::Class(class)) => format!("class {}", class.name()),
        Some(value) => match Category::of(value) {
            Some(category) => category.to_string(),
            None => "null".to_string(),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Class;
    use crate::value::Instance;
    use serde_json::json;

    fn data(value: serde_json::Value) -> Value {
        Value::from(value)
    }

    #[test]
    fn test_field_names_are_forced_to_keys() {
        let schema = Schema::new([("count", FieldSpec::typed(TypeSpec::NUMBER))]).unwrap();
        assert_eq!(schema.field("count").map(FieldSpec::name), Some("count"));

        let positional = Schema::new([FieldSpec::any(), FieldSpec::any()]).unwrap();
        assert!(positional.is_positional());
        let names: Vec<_> = positional.fields().map(FieldSpec::name).collect();
        assert_eq!(names, vec!["0", "1"]);
    }

    #[test]
    fn test_duplicate_and_empty_names_rejected() {
        let duplicate = Schema::new(vec![("a", FieldSpec::any()), ("a", FieldSpec::any())]);
        assert_eq!(duplicate.unwrap_err().reason, Reason::Schema);

        let empty = Schema::new([("", FieldSpec::any())]);
        assert_eq!(empty.unwrap_err().reason, Reason::Schema);
    }

    #[test]
    fn test_instance_without_class_rejected_at_construction() {
        let err = Schema::new([("x", FieldSpec::typed(TypeSpec::NUMBER).instance(true))]).unwrap_err();
        assert_eq!(err.reason, Reason::Schema);
        assert_eq!(err.path, "$.x");
        assert_eq!(err.field_name(), Some("x"));
    }

    #[test]
    fn test_malformed_children_rejected_at_construction() {
        let err = Schema::new([(
            "root",
            FieldSpec::new().children([(
                "inner",
                FieldSpec::any().children([("leaf", FieldSpec::any().instance(true))]),
            )]),
        )])
        .unwrap_err();
        assert_eq!(err.reason, Reason::Schema);
        assert_eq!(err.path, "$.root.inner.leaf");

        let err = Schema::new([(
            "n",
            FieldSpec::typed(TypeSpec::NUMBER).children([("x", FieldSpec::any())]),
        )])
        .unwrap_err();
        assert_eq!(err.reason, Reason::Schema);
    }

    #[test]
    fn test_non_container_data_rejected() {
        let schema = Schema::new([("a", FieldSpec::any())]).unwrap();
        for value in [Value::Null, Value::from(1), Value::from("text"), Value::Bool(true)] {
            let err = schema.validate(&value).unwrap_err();
            assert_eq!(err.reason, Reason::Schema);
            assert!(err.field.is_none());
        }
    }

    #[test]
    fn test_default_not_applied_to_required_field() {
        let schema = Schema::new([("a", FieldSpec::new().required(true).defaults(1))]).unwrap();
        let err = schema.validate(&data(json!({}))).unwrap_err();
        assert_eq!(err.reason, Reason::Required);
        assert!(err.value.is_none());
    }

    #[test]
    fn test_null_counts_as_absent() {
        let schema = Schema::new([
            ("a", FieldSpec::new().defaults("x")),
            ("b", FieldSpec::new().required(true)),
        ])
        .unwrap();

        let err = schema.validate(&data(json!({"a": null, "b": null}))).unwrap_err();
        assert_eq!(err.reason, Reason::Required);
        assert_eq!(err.value, Some(Value::Null));

        let ok = schema.validate(&data(json!({"a": null, "b": 1}))).unwrap();
        assert_eq!(ok.get("a"), Some(&Value::from("x")));
    }

    #[test]
    fn test_optional_falsy_value_passes_type_gate() {
        let schema = Schema::new([("n", FieldSpec::typed(TypeSpec::NUMBER))]).unwrap();
        assert!(schema.validate(&data(json!({"n": ""}))).is_ok());
        assert!(schema.validate(&data(json!({"n": false}))).is_ok());
        assert!(schema.validate(&data(json!({}))).is_ok());
        assert_eq!(
            schema.validate(&data(json!({"n": "5"}))).unwrap_err().reason,
            Reason::Type
        );
    }

    #[test]
    fn test_class_type_without_instance_flag_accepts_class_values_only() {
        let shape = Class::new("Shape");
        let other = Class::new("Other");
        let schema = Schema::new([("s", FieldSpec::typed(&shape).required(true))]).unwrap();

        let mut value = Value::object();
        value.set("s", Value::from(&other)).unwrap();
        assert!(schema.validate(&value).is_ok());

        let candidates = vec![
            Value::from(Instance::new(&other)),
            Value::from(Instance::new(&shape)),
            Value::object(),
            data(json!([1])),
            Value::from(3),
        ];
        for candidate in candidates {
            let mut value = Value::object();
            value.set("s", candidate).unwrap();
            assert_eq!(schema.validate(&value).unwrap_err().reason, Reason::Type);
        }
    }

    #[test]
    fn test_class_default_is_substituted() {
        let shape = Class::new("Shape");
        let schema = Schema::new([
            ("kind", FieldSpec::typed(&shape).defaults(&shape)),
            ("factory", FieldSpec::typed(TypeSpec::CLASS)),
        ])
        .unwrap();

        let validated = schema.validate(&Value::object()).unwrap();
        assert_eq!(validated.get("kind"), Some(&Value::from(&shape)));

        let err = schema.validate(&data(json!({"factory": {"a": 1}}))).unwrap_err();
        assert_eq!(err.reason, Reason::Type);
        assert_eq!(err.path, "$.factory");
    }

    #[test]
    fn test_named_default_that_cannot_be_stored_is_rejected() {
        let schema = Schema::new([("label", FieldSpec::new().defaults("x"))]).unwrap();
        let err = schema.validate(&data(json!([1, 2]))).unwrap_err();
        assert_eq!(err.reason, Reason::Schema);
        assert_eq!(err.path, "$.label");
        assert_eq!(err.value, Some(Value::from("x")));

        let huge = Schema::new([("18446744073709551615", FieldSpec::new().defaults(1))]).unwrap();
        let err = huge.validate(&data(json!([]))).unwrap_err();
        assert_eq!(err.reason, Reason::Schema);

        let far = Schema::new([("4000000000", FieldSpec::new().defaults(1))]).unwrap();
        assert_eq!(far.validate(&data(json!([]))).unwrap_err().reason, Reason::Schema);
    }

    #[test]
    fn test_named_numeric_keys_address_array_elements() {
        let schema = Schema::new([
            ("0", FieldSpec::typed(TypeSpec::NUMBER).required(true)),
            ("1", FieldSpec::typed(TypeSpec::TEXT).defaults("b")),
        ])
        .unwrap();

        let validated = schema.validate(&data(json!([1]))).unwrap();
        assert_eq!(validated.to_json(), json!([1.0, "b"]));
    }

    #[test]
    fn test_positional_default_after_a_gap_pads_with_null() {
        let schema = Schema::new([
            FieldSpec::any(),
            FieldSpec::typed(TypeSpec::TEXT).defaults("last"),
        ])
        .unwrap();

        let validated = schema.validate(&data(json!([]))).unwrap();
        assert_eq!(validated.to_json(), json!([null, "last"]));
    }

    #[test]
    fn test_instance_data_is_a_container() {
        let point = Class::new("Point");
        let schema = Schema::new([("x", FieldSpec::typed(TypeSpec::NUMBER).defaults(0))]).unwrap();

        let validated = schema.validate(&Value::from(Instance::new(&point))).unwrap();
        let instance = validated.as_instance().unwrap();
        assert_eq!(instance.fields().get("x"), Some(&Value::from(0)));
    }

    #[test]
    fn test_schema_is_send_and_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<Schema>();
    }
}
