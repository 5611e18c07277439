//! Rejection types produced by schema construction and validation
//!
//! Copyright (c) 2025 Shapecheck Team
//! Licensed under the Apache-2.0 license

use crate::field::FieldSpec;
use crate::value::Value;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;
use thiserror::Error;

/// Why a value or a declaration was rejected
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Reason {
    /// The field's custom predicate returned false
    Custom,
    /// A required field was absent or null
    Required,
    /// The value is not an instance of the field's class
    Instance,
    /// The value's category does not match the field's type
    Type,
    /// The schema declaration, or the top-level data shape, is invalid
    Schema,
}

impl Reason {
    /// Whether this reason marks a malformed declaration rather than
    /// non-conforming data
    pub fn is_construction(self) -> bool {
        self == Reason::Schema
    }
}

impl fmt::Display for Reason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Reason::Custom => "custom",
            Reason::Required => "required",
            Reason::Instance => "instance",
            Reason::Type => "type",
            Reason::Schema => "schema",
        };
        f.write_str(name)
    }
}

/// A structured rejection naming the offending field, value and reason
#[derive(Debug, Clone, Error)]
#[error("{reason} rejection at '{path}': {message}")]
pub struct Rejection {
    /// Path of the offending field
    pub path: String,
    /// The field whose rule rejected, if any
    pub field: Option<Arc<FieldSpec>>,
    /// The offending value; `None` when it was absent
    pub value: Option<Value>,
    /// Rejection reason
    pub reason: Reason,
    /// Human-readable message
    pub message: String,
}

impl Rejection {
    /// Rejection of a field during validation
    pub fn field<P, M>(
        path: P,
        field: &Arc<FieldSpec>,
        value: Option<&Value>,
        reason: Reason,
        message: M,
    ) -> Self
    where
        P: Into<String>,
        M: Into<String>,
    {
        Self {
            path: path.into(),
            field: Some(Arc::clone(field)),
            value: value.cloned(),
            reason,
            message: message.into(),
        }
    }

    /// Construction-time or shape failure
    pub fn schema<P, M>(path: P, message: M) -> Self
    where
        P: Into<String>,
        M: Into<String>,
    {
        Self {
            path: path.into(),
            field: None,
            value: None,
            reason: Reason::Schema,
            message: message.into(),
        }
    }

    /// Attach the offending value
    pub fn with_value(mut self, value: Option<&Value>) -> Self {
        self.value = value.cloned();
        self
    }

    /// Attach the offending field
    pub fn with_field(mut self, field: &Arc<FieldSpec>) -> Self {
        self.field = Some(Arc::clone(field));
        self
    }

    /// Name of the offending field, if a field was involved
    pub fn field_name(&self) -> Option<&str> {
        self.field.as_deref().map(FieldSpec::name)
    }

    /// Serializable snapshot of this rejection
    pub fn report(&self) -> RejectionReport {
        RejectionReport {
            path: self.path.clone(),
            field: self.field_name().map(str::to_string),
            reason: self.reason,
            value: self.value.as_ref().map(Value::to_json),
            message: self.message.clone(),
        }
    }
}

/// Result type for validation operations
pub type ValidationResult<T> = Result<T, Rejection>;

/// Serializable form of a [`Rejection`]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RejectionReport {
    pub path: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub field: Option<String>,
    pub reason: Reason,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<serde_json::Value>,
    pub message: String,
}

/// Multiple rejections collected during batch validation
#[derive(Debug, Clone, Error)]
pub struct Rejections {
    /// Rejections in the order they were found
    pub rejections: Vec<Rejection>,
}

impl fmt::Display for Rejections {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} value(s) rejected:", self.rejections.len())?;
        for (i, rejection) in self.rejections.iter().enumerate() {
            write!(f, "\n{}. {}", i + 1, rejection)?;
        }
        Ok(())
    }
}

impl Rejections {
    pub fn new() -> Self {
        Self {
            rejections: Vec::new(),
        }
    }

    pub fn add(&mut self, rejection: Rejection) {
        self.rejections.push(rejection);
    }

    pub fn is_empty(&self) -> bool {
        self.rejections.is_empty()
    }

    pub fn len(&self) -> usize {
        self.rejections.len()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Rejection> {
        self.rejections.iter()
    }

    /// Convert to result - Ok if no rejections, Err otherwise
    pub fn into_result(self) -> Result<(), Self> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(self)
        }
    }
}

impl Default for Rejections {
    fn default() -> Self {
        Self::new()
    }
}

impl From<Rejection> for Rejections {
    fn from(rejection: Rejection) -> Self {
        Self {
            rejections: vec![rejection],
        }
    }
}
