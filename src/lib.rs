//! slidekit: slide markup parsing, editing and formatting.
//!
//! Markup is scanned into raw elements, classified and expanded into a typed
//! [`ast::Node`] tree, edited by id through [`tree`], and written back as
//! canonical markup by [`serialize()`]. [`validate()`] is the entry point for
//! untrusted input.

pub use crate::engine::{parse, parse_many, parse_many_with, parse_source, parse_with};
pub use crate::errors::{AttributeWarning, ErrorCategory, ErrorKind, SlideError};
pub use crate::serialize::{serialize, serialize_many};
pub use crate::validate::{validate, validate_many, Validation};

pub mod ast;
pub mod cli;
pub mod config;
pub mod elements;
pub mod engine;
pub mod errors;
pub mod inline;
pub mod serialize;
pub mod syntax;
pub mod tree;
pub mod validate;
