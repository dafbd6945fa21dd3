//! Syntax module for the slide markup language
//!
//! This module provides the generic element tree produced by the scanner:
//! tag names, attribute lists and ordered children with source spans. Nothing
//! here knows which tags exist; classification happens in [`crate::elements`].

use serde::{Deserialize, Serialize};

use crate::ast::AttrValue;

pub mod escape;
pub mod scanner;

pub use scanner::Scanner;

/// Represents a span in the source code.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct Span {
    pub start: usize,
    pub end: usize,
}

impl Span {
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }
}

/// One `name="value"` or `name={expr}` pair.
#[derive(Debug, Clone, PartialEq)]
pub struct RawAttribute {
    pub name: String,
    pub value: AttrValue,
    pub span: Span,
}

/// A tag with its attributes and children, before classification.
#[derive(Debug, Clone, PartialEq)]
pub struct RawElement {
    pub tag: String,
    pub attributes: Vec<RawAttribute>,
    pub children: Vec<RawNode>,
    pub span: Span,
}

impl RawElement {
    /// Value of the named attribute; the last occurrence wins.
    pub fn attribute(&self, name: &str) -> Option<&AttrValue> {
        self.attributes
            .iter()
            .rev()
            .find(|attr| attr.name == name)
            .map(|attr| &attr.value)
    }

    /// Child elements in order, skipping text.
    pub fn elements(&self) -> impl Iterator<Item = &RawElement> {
        self.children.iter().filter_map(|child| match child {
            RawNode::Element(el) => Some(el),
            _ => None,
        })
    }

    /// True if the tag name matches `name` ignoring ASCII case.
    pub fn is(&self, name: &str) -> bool {
        self.tag.eq_ignore_ascii_case(name)
    }
}

/// A child of a raw element.
#[derive(Debug, Clone, PartialEq)]
pub enum RawNode {
    Element(RawElement),
    /// Text with at least one non-whitespace character, entities decoded.
    Text(String, Span),
    /// Whitespace-only text. Only the inline formatter looks at it, as a
    /// separator between inline tags.
    Whitespace(String),
}
