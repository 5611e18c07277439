//! Validation configuration
//!
//! Configuration can be built in code, loaded from a YAML or JSON file, and
//! overridden from the environment:
//!
//! - `SHAPECHECK_MODE`: `compatible` or `strict`
//! - `SHAPECHECK_FAIL_FAST`: `true` or `false`
//! - `SHAPECHECK_MAX_ERRORS`: non-negative integer, `0` for unlimited
//!
//! Copyright (c) 2025 Shapecheck Team
//! Licensed under the Apache-2.0 license

use crate::context::ValidationMode;
use log::warn;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Result type for configuration loading
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Errors raised while loading a configuration file
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read file '{path}': {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse YAML file '{path}': {source}")]
    Yaml {
        path: PathBuf,
        source: serde_yaml::Error,
    },

    #[error("Failed to parse JSON file '{path}': {source}")]
    Json {
        path: PathBuf,
        source: serde_json::Error,
    },

    #[error("Unsupported file format for '{path}'. Expected .yaml, .yml, or .json")]
    UnsupportedFormat { path: PathBuf },
}

/// Validation configuration for batch operations
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ValidationConfig {
    /// Validation mode to use
    pub mode: ValidationMode,
    /// Whether to stop on the first rejected value
    pub fail_fast: bool,
    /// Maximum number of rejections to collect (0 = unlimited)
    pub max_errors: usize,
}

impl Default for ValidationConfig {
    fn default() -> Self {
        Self {
            mode: ValidationMode::Compatible,
            fail_fast: false,
            max_errors: 0,
        }
    }
}

impl ValidationConfig {
    /// Configuration with sequences and objects treated as one category
    pub fn compatible() -> Self {
        Self::default()
    }

    /// Configuration with every category kept distinct
    pub fn strict() -> Self {
        Self {
            mode: ValidationMode::Strict,
            ..Self::default()
        }
    }

    /// Enable fail-fast mode
    pub fn with_fail_fast(mut self) -> Self {
        self.fail_fast = true;
        self
    }

    /// Set maximum number of rejections to collect
    pub fn with_max_errors(mut self, max_errors: usize) -> Self {
        self.max_errors = max_errors;
        self
    }

    /// Load configuration from a `.yaml`, `.yml` or `.json` file. Missing
    /// keys take their default values.
    pub fn from_path(path: &Path) -> ConfigResult<Self> {
        let yaml = match path.extension().and_then(|ext| ext.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("yaml") || ext.eq_ignore_ascii_case("yml") => true,
            Some(ext) if ext.eq_ignore_ascii_case("json") => false,
            _ => {
                return Err(ConfigError::UnsupportedFormat {
                    path: path.to_path_buf(),
                })
            }
        };

        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        if yaml {
            serde_yaml::from_str(&content).map_err(|source| ConfigError::Yaml {
                path: path.to_path_buf(),
                source,
            })
        } else {
            serde_json::from_str(&content).map_err(|source| ConfigError::Json {
                path: path.to_path_buf(),
                source,
            })
        }
    }

    /// Apply `SHAPECHECK_*` environment overrides
    pub fn merge_with_env(&mut self) {
        self.merge_with(|key| std::env::var(key).ok());
    }

    fn merge_with<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(mode) = lookup("SHAPECHECK_MODE") {
            match mode.to_lowercase().as_str() {
                "compatible" => self.mode = ValidationMode::Compatible,
                "strict" => self.mode = ValidationMode::Strict,
                _ => warn!("Invalid validation mode: {}, keeping {:?}", mode, self.mode),
            }
        }

        if let Some(fail_fast) = lookup("SHAPECHECK_FAIL_FAST") {
            match fail_fast.parse::<bool>() {
                Ok(value) => self.fail_fast = value,
                Err(_) => warn!("Invalid SHAPECHECK_FAIL_FAST value: {}", fail_fast),
            }
        }

        if let Some(max_errors) = lookup("SHAPECHECK_MAX_ERRORS") {
            match max_errors.parse::<usize>() {
                Ok(value) => self.max_errors = value,
                Err(_) => warn!("Invalid SHAPECHECK_MAX_ERRORS value: {}", max_errors),
            }
        }
    }
}
