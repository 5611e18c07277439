//! Batch validation of many values against one schema
//!
//! Copyright (c) 2025 Shapecheck Team
//! Licensed under the Apache-2.0 license

use crate::config::ValidationConfig;
use crate::context::ValidationContext;
use crate::error::Rejections;
use crate::schema::Schema;
use crate::value::Value;
use log::debug;

/// Validate each value independently against `schema`.
///
/// Rejection paths are prefixed with the item index (`$[2].name`). On
/// success every validated value is returned in input order, carrying its
/// resolved defaults; the inputs themselves are not modified.
pub fn validate_batch(
    schema: &Schema,
    values: &[Value],
    config: &ValidationConfig,
) -> Result<Vec<Value>, Rejections> {
    let context = ValidationContext::new(config.mode);
    let mut validated = Vec::with_capacity(values.len());
    let mut rejections = Rejections::new();

    for (i, value) in values.iter().enumerate() {
        let item_context = context.child_index(i);
        let mut candidate = value.clone();
        match schema.validate_with_context(&mut candidate, &item_context) {
            Ok(()) => validated.push(candidate),
            Err(rejection) => {
                rejections.add(rejection);

                if config.fail_fast {
                    break;
                }

                if config.max_errors > 0 && rejections.len() >= config.max_errors {
                    break;
                }
            }
        }
    }

    debug!(
        "batch validation finished: {} accepted, {} rejected",
        validated.len(),
        rejections.len()
    );
    rejections.into_result().map(|()| validated)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Reason;
    use crate::field::FieldSpec;
    use crate::types::TypeSpec;
    use serde_json::json;

    fn schema() -> Schema {
        Schema::new([
            ("name", FieldSpec::typed(TypeSpec::TEXT).required(true)),
            ("tags", FieldSpec::typed(TypeSpec::SEQUENCE).defaults(Value::Array(vec![]))),
        ])
        .unwrap()
    }

    fn values() -> Vec<Value> {
        vec![
            Value::from(json!({"name": "a"})),
            Value::from(json!({"name": 1})),
            Value::from(json!({})),
            Value::from(json!({"name": "d", "tags": ["x"]})),
        ]
    }

    #[test]
    fn test_batch_collects_all_rejections() {
        let rejections = validate_batch(&schema(), &values(), &ValidationConfig::default()).unwrap_err();
        assert_eq!(rejections.len(), 2);
        assert_eq!(rejections.rejections[0].path, "$[1].name");
        assert_eq!(rejections.rejections[0].reason, Reason::Type);
        assert_eq!(rejections.rejections[1].path, "$[2].name");
        assert_eq!(rejections.rejections[1].reason, Reason::Required);
    }

    #[test]
    fn test_batch_fail_fast_and_max_errors() {
        let config = ValidationConfig::default().with_fail_fast();
        assert_eq!(validate_batch(&schema(), &values(), &config).unwrap_err().len(), 1);

        let config = ValidationConfig::default().with_max_errors(1);
        assert_eq!(validate_batch(&schema(), &values(), &config).unwrap_err().len(), 1);
    }

    #[test]
    fn test_batch_success_returns_defaulted_values() {
        let inputs = vec![Value::from(json!({"name": "a"})), Value::from(json!({"name": "b"}))];
        let validated = validate_batch(&schema(), &inputs, &ValidationConfig::strict()).unwrap();

        assert_eq!(validated.len(), 2);
        assert_eq!(validated[0].to_json(), json!({"name": "a", "tags": []}));
        assert_eq!(inputs[0].to_json(), json!({"name": "a"}));
    }
}
