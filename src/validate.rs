//! Non-failing parse front door for untrusted input.
//!
//! Markup written by a model or pasted by a user goes through [`validate`]:
//! the outcome is always a value, never an `Err` or a panic, and it
//! serializes to JSON for tool layers.

use serde::Serialize;
use std::sync::Arc;

use crate::ast::Node;
use crate::config::ParseOptions;
use crate::engine::{parse_many_with, parse_with};
use crate::errors::{AttributeWarning, SlideError};

/// Outcome of validating markup. `T` is the root, or the list of roots for
/// [`validate_many`].
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum Validation<T = Arc<Node>> {
    Valid {
        root: T,
        warnings: Vec<AttributeWarning>,
    },
    Invalid {
        message: String,
        line: Option<usize>,
        column: Option<usize>,
        /// Source window with a caret line under the failure point.
        context: Option<String>,
    },
}

impl<T> Validation<T> {
    pub fn is_valid(&self) -> bool {
        matches!(self, Validation::Valid { .. })
    }

    pub fn root(&self) -> Option<&T> {
        match self {
            Validation::Valid { root, .. } => Some(root),
            Validation::Invalid { .. } => None,
        }
    }

    pub fn warnings(&self) -> &[AttributeWarning] {
        match self {
            Validation::Valid { warnings, .. } => warnings,
            Validation::Invalid { .. } => &[],
        }
    }

    /// The failure message, if any.
    pub fn error(&self) -> Option<&str> {
        match self {
            Validation::Valid { .. } => None,
            Validation::Invalid { message, .. } => Some(message),
        }
    }

    fn from_result(result: Result<T, SlideError>, warnings: Vec<AttributeWarning>) -> Self {
        match result {
            Ok(root) => Validation::Valid { root, warnings },
            Err(error) => error.into(),
        }
    }
}

impl<T> From<SlideError> for Validation<T> {
    fn from(error: SlideError) -> Self {
        Validation::Invalid {
            message: error.message(),
            line: error.line(),
            column: error.column(),
            context: error.snippet().map(str::to_string),
        }
    }
}

pub fn validate(text: &str) -> Validation {
    validate_with(text, &ParseOptions::default())
}

pub fn validate_with(text: &str, options: &ParseOptions) -> Validation {
    let mut warnings = Vec::new();
    let result = parse_with(text, options, Some(&mut warnings));
    Validation::from_result(result, warnings)
}

/// Validates a sequence of top-level elements as one unit.
pub fn validate_many(text: &str) -> Validation<Vec<Arc<Node>>> {
    let mut warnings = Vec::new();
    let result = parse_many_with(text, &ParseOptions::default(), Some(&mut warnings));
    Validation::from_result(result, warnings)
}
