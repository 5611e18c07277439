//! Validation demonstration example
//!
//! Copyright (c) 2025 Shapecheck Team
//! Licensed under the Apache-2.0 license

use serde_json::json;
use shapecheck_core::{
    validate_batch, Class, FieldSpec, Instance, Schema, TypeSpec, ValidationConfig, Value,
};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("=== Shapecheck Validation Demo ===\n");

    demo_record_validation()?;

    println!();

    demo_positional_validation()?;

    println!();

    demo_batch_validation()?;

    Ok(())
}

fn demo_record_validation() -> Result<(), Box<dyn std::error::Error>> {
    println!("--- Record Validation Demo ---");

    let widget = Class::new("Widget");
    let schema = Schema::new([
        ("widget", FieldSpec::typed(&widget).instance(true).required(true)),
        ("anything", FieldSpec::new().required(true)),
        (
            "threshold",
            FieldSpec::typed(TypeSpec::NUMBER).custom(|v| v.as_f64().is_some_and(|n| n > 1000.0)),
        ),
        (
            "object",
            FieldSpec::typed(TypeSpec::OBJECT)
                .defaults(Value::object())
                .children([("value", FieldSpec::typed(TypeSpec::NUMBER).defaults(0))]),
        ),
    ])?;

    let mut valid = Value::from(json!({"anything": "ok", "threshold": 1500}));
    valid.set("widget", Value::from(Instance::new(&widget))).ok();

    println!("Validating complete record:");
    match schema.validate(&valid) {
        Ok(validated) => println!("   Valid: {}", validated),
        Err(e) => println!("   Error: {}", e),
    }

    println!("\nValidating record with a low threshold:");
    let mut low = valid.clone();
    low.set("threshold", Value::from(10)).ok();
    match schema.validate(&low) {
        Ok(_) => println!("   Unexpectedly valid!"),
        Err(e) => println!("   Error: {}", e),
    }

    println!("\nValidating record with the wrong widget type:");
    let mut wrong = valid.clone();
    wrong.set("widget", Value::from(Instance::new(&Class::new("Gadget")))).ok();
    match schema.validate(&wrong) {
        Ok(_) => println!("   Unexpectedly valid!"),
        Err(e) => println!("   Error: {}", e),
    }

    Ok(())
}

fn demo_positional_validation() -> Result<(), Box<dyn std::error::Error>> {
    println!("--- Positional Validation Demo ---");

    let schema = Schema::new([
        FieldSpec::typed(TypeSpec::NUMBER),
        FieldSpec::typed(TypeSpec::TEXT),
        FieldSpec::typed(TypeSpec::BOOLEAN),
    ])?;

    for candidate in [json!([1, "a", true]), json!(["a", true, 1])] {
        match schema.validate(&Value::from(candidate.clone())) {
            Ok(_) => println!("   {} is valid", candidate),
            Err(e) => println!("   {} rejected: {}", candidate, e),
        }
    }

    Ok(())
}

fn demo_batch_validation() -> Result<(), Box<dyn std::error::Error>> {
    println!("--- Batch Validation Demo ---");

    let schema = Schema::new([
        ("name", FieldSpec::typed(TypeSpec::TEXT).required(true)),
        ("retries", FieldSpec::typed(TypeSpec::NUMBER).defaults(3)),
    ])?;

    let values = vec![
        Value::from(json!({"name": "primary"})),
        Value::from(json!({"retries": 1})),
        Value::from(json!({"name": 42})),
    ];

    match validate_batch(&schema, &values, &ValidationConfig::default()) {
        Ok(validated) => println!("   All {} values valid", validated.len()),
        Err(rejections) => {
            for rejection in rejections.iter() {
                println!("   {}", serde_json::to_string(&rejection.report())?);
            }
        }
    }

    Ok(())
}
