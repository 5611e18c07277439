//! Validation context and mode
//!
//! Copyright (c) 2025 Shapecheck Team
//! Licensed under the Apache-2.0 license

use serde::{Deserialize, Serialize};

/// How strictly primitive categories are compared
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ValidationMode {
    /// Sequences and plain objects count as the same category
    #[default]
    Compatible,
    /// Every category is distinct
    Strict,
}

/// Location and mode of the value currently being validated
#[derive(Debug, Clone)]
pub struct ValidationContext {
    /// Current path, rooted at `$`
    pub path: String,
    /// Validation mode
    pub mode: ValidationMode,
}

impl ValidationContext {
    /// Create a new root context
    pub fn new(mode: ValidationMode) -> Self {
        Self {
            path: "$".to_string(),
            mode,
        }
    }

    /// Create a child context with updated path
    pub fn child<P: AsRef<str>>(&self, path_segment: P) -> Self {
        Self {
            path: format!("{}.{}", self.path, path_segment.as_ref()),
            mode: self.mode,
        }
    }

    /// Create a child context for array index
    pub fn child_index(&self, index: usize) -> Self {
        Self {
            path: format!("{}[{}]", self.path, index),
            mode: self.mode,
        }
    }
}

impl Default for ValidationContext {
    fn default() -> Self {
        Self::new(ValidationMode::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_context_child() {
        let context = ValidationContext::new(ValidationMode::Strict);
        let child = context.child("test");
        assert_eq!(child.path, "$.test");
        assert_eq!(child.mode, ValidationMode::Strict);

        let grandchild = child.child("nested");
        assert_eq!(grandchild.path, "$.test.nested");
    }

    #[test]
    fn test_validation_context_child_index() {
        let context = ValidationContext::default().child("array");
        let indexed = context.child_index(0);
        assert_eq!(indexed.path, "$.array[0]");
        assert_eq!(indexed.mode, ValidationMode::Compatible);
    }
}
