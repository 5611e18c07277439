//! Shapecheck Core - declarative validation of dynamic values
//!
//! A [`Schema`] maps field names (or array positions) to [`FieldSpec`]
//! rules. Validating a value walks the fields in registration order,
//! recurses into nested child schemas, fills in defaults for absent
//! optional fields, and stops at the first failing rule with a structured
//! [`Rejection`].
//!
//! ## Rule precedence
//!
//! For each field, in order:
//! - **children**: nested schema rejections surface first
//! - **custom**: a user predicate over the value
//! - **required**: absent or null values are rejected; otherwise defaults are
//!   substituted
//! - **instance**: nominal class membership (`Class::is_a`)
//! - **primitive**: a matching primitive category accepts immediately
//! - **type**: a category mismatch rejects, unless the field is optional and
//!   the value falsy
//!
//! ## Quick Start
//!
//! ```rust
//! use serde_json::json;
//! use shapecheck_core::{FieldSpec, Reason, Schema, TypeSpec, Value};
//!
//! let schema = Schema::new([
//!     ("port", FieldSpec::typed(TypeSpec::NUMBER).defaults(8080)),
//!     ("host", FieldSpec::typed(TypeSpec::TEXT).required(true)),
//! ])
//! .unwrap();
//!
//! let validated = schema.validate(&Value::from(json!({"host": "localhost"}))).unwrap();
//! assert_eq!(validated.to_json(), json!({"host": "localhost", "port": 8080.0}));
//!
//! let rejection = schema.validate(&Value::from(json!({"host": 1}))).unwrap_err();
//! assert_eq!(rejection.reason, Reason::Type);
//! assert_eq!(rejection.path, "$.host");
//! ```
//!
//! ## Validation Modes
//!
//! - **Compatible** (default): sequences and plain objects share one category
//! - **Strict**: every category is distinct
//!
//! Copyright (c) 2025 Shapecheck Team
//! Licensed under the Apache-2.0 license

pub mod batch;
pub mod config;
pub mod context;
pub mod error;
pub mod field;
pub mod schema;
pub mod types;
pub mod value;

// Re-export commonly used types for convenience
pub use batch::validate_batch;
pub use config::{ConfigError, ConfigResult, ValidationConfig};
pub use context::{ValidationContext, ValidationMode};
pub use error::{Reason, Rejection, RejectionReport, Rejections, ValidationResult};
pub use field::{FieldOptions, FieldSpec, Fields, Predicate};
pub use schema::Schema;
pub use types::{Category, Class, TypeSpec};
pub use value::{Instance, Map, Symbol, Value};
