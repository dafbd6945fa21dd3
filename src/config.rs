//! Parse configuration.
//!
//! The limits here bound every recursive part of the pipeline so that hostile
//! input fails with a resource-limit diagnostic instead of exhausting the stack.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Maximum element nesting depth accepted by default.
pub const DEFAULT_MAX_DEPTH: usize = 128;

/// Maximum brace nesting inside one attribute expression accepted by default.
pub const DEFAULT_MAX_EXPRESSION_DEPTH: usize = 32;

/// Maximum input length in bytes accepted by default.
pub const DEFAULT_MAX_INPUT_LEN: usize = 1 << 20;

/// Limits applied to a single parse call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ParseOptions {
    pub max_input_len: usize,
    pub max_depth: usize,
    pub max_expression_depth: usize,
}

impl Default for ParseOptions {
    fn default() -> Self {
        Self {
            max_input_len: DEFAULT_MAX_INPUT_LEN,
            max_depth: DEFAULT_MAX_DEPTH,
            max_expression_depth: DEFAULT_MAX_EXPRESSION_DEPTH,
        }
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read configuration '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid JSON configuration '{path}': {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("invalid YAML configuration '{path}': {source}")]
    Yaml {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },
}

impl ParseOptions {
    /// Loads options from a `.json` file, or YAML for any other extension.
    /// Fields left out keep their defaults.
    pub fn from_path(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let is_json = path
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));
        if is_json {
            serde_json::from_str(&text).map_err(|source| ConfigError::Json {
                path: path.to_path_buf(),
                source,
            })
        } else {
            serde_yaml::from_str(&text).map_err(|source| ConfigError::Yaml {
                path: path.to_path_buf(),
                source,
            })
        }
    }
}
