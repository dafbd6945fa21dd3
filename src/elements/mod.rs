//! Element classification and construction.
//!
//! The element vocabulary lives in an [`ElementRegistry`]: tag name to
//! [`ElementDef`], each with its attribute allow-list and a build function.
//! Primitive tags build their node kind directly; sugar tags expand into
//! primitive subtrees with documented defaults.
//!
//! ## Registry Invariant
//! The vocabulary is a versioned public grammar. The canonical registry is
//! built once ([`canonical_registry`]) and shared by every parse call; it is
//! never mutated after construction.

use im::Vector;
use log::debug;
use once_cell::sync::Lazy;
use std::collections::{HashMap, HashSet};
use std::fmt;
use std::sync::Arc;

use crate::ast::{Children, Node, TextNode};
use crate::errors::{AttributeWarning, ErrorKind, ErrorReporting, PhaseContext, SlideError, SourceContext};
use crate::syntax::{RawElement, RawNode, Span};

pub mod attrs;
pub mod primitives;
pub mod sugar;

pub use attrs::Attrs;

/// Attributes every element accepts.
pub const COMMON_ATTRIBUTES: &[&str] = &[
    "id", "name", "visible", "opacity", "x", "y", "width", "height", "rotation",
];

/// Builds one node from a raw element.
pub type BuildFn = fn(&RawElement, &mut BuildContext<'_>) -> Result<Node, SlideError>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ElementKind {
    Primitive,
    Sugar,
}

/// One entry of the element vocabulary.
#[derive(Clone, Copy)]
pub struct ElementDef {
    /// Canonical spelling of the tag.
    pub name: &'static str,
    pub kind: ElementKind,
    /// Tag-specific attributes accepted in addition to [`COMMON_ATTRIBUTES`].
    pub attributes: &'static [&'static str],
    pub build: BuildFn,
}

impl fmt::Debug for ElementDef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ElementDef")
            .field("name", &self.name)
            .field("kind", &self.kind)
            .field("attributes", &self.attributes)
            .finish()
    }
}

impl ElementDef {
    pub fn accepts(&self, attribute: &str) -> bool {
        COMMON_ATTRIBUTES.contains(&attribute) || self.attributes.contains(&attribute)
    }
}

/// Element vocabulary keyed by lowercased tag name.
#[derive(Debug, Clone, Default)]
pub struct ElementRegistry {
    defs: HashMap<String, ElementDef>,
}

impl ElementRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a definition, returning the one it replaced.
    pub fn register(&mut self, def: ElementDef) -> Option<ElementDef> {
        self.defs.insert(def.name.to_ascii_lowercase(), def)
    }

    /// Case-insensitive lookup.
    pub fn lookup(&self, tag: &str) -> Option<&ElementDef> {
        self.defs.get(&tag.to_ascii_lowercase())
    }

    pub fn contains(&self, tag: &str) -> bool {
        self.lookup(tag).is_some()
    }

    /// Canonical tag names, primitives first, each group alphabetical.
    pub fn names(&self) -> Vec<String> {
        let mut defs: Vec<_> = self.defs.values().collect();
        defs.sort_by_key(|def| (def.kind, def.name));
        defs.into_iter().map(|def| def.name.to_string()).collect()
    }

    pub fn len(&self) -> usize {
        self.defs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.defs.is_empty()
    }
}

/// Builds the registry holding every primitive and sugar element.
pub fn build_default_registry() -> ElementRegistry {
    let mut registry = ElementRegistry::new();
    primitives::register_primitives(&mut registry);
    sugar::register_sugar(&mut registry);
    registry
}

static CANONICAL_REGISTRY: Lazy<ElementRegistry> = Lazy::new(build_default_registry);

/// The shared default vocabulary.
pub fn canonical_registry() -> &'static ElementRegistry {
    &CANONICAL_REGISTRY
}

// ============================================================================
// BUILD CONTEXT
// ============================================================================

/// State threaded through one classification pass: error reporting, the
/// vocabulary and the caller's optional warnings sink.
pub struct BuildContext<'a> {
    errors: PhaseContext<'a>,
    registry: &'a ElementRegistry,
    warnings: Option<&'a mut Vec<AttributeWarning>>,
}

impl<'a> BuildContext<'a> {
    pub fn new(
        source: &'a SourceContext,
        registry: &'a ElementRegistry,
        warnings: Option<&'a mut Vec<AttributeWarning>>,
    ) -> Self {
        Self {
            errors: PhaseContext::new(source, "elements"),
            registry,
            warnings,
        }
    }

    /// Classifies `el` and builds its node, recursing into children.
    pub fn build(&mut self, el: &RawElement) -> Result<Node, SlideError> {
        let Some(def) = self.registry.lookup(&el.tag).copied() else {
            return Err(self.unknown_element(el, self.registry.names()));
        };
        debug!(target: "slidekit::elements", "building <{}> as {:?} {}", el.tag, def.kind, def.name);
        self.check_attributes(el, def.name, |name| def.accepts(name));
        (def.build)(el, self)
    }

    /// Builds element children in order. Loose text becomes an id-less text
    /// node; whitespace is dropped.
    pub fn build_children(&mut self, el: &RawElement) -> Result<Children, SlideError> {
        let mut children = Vector::new();
        for child in &el.children {
            match child {
                RawNode::Element(child) => children.push_back(Arc::new(self.build(child)?)),
                RawNode::Text(text, _) => {
                    children.push_back(Arc::new(Node::Text(TextNode::plain(text.trim()))))
                }
                RawNode::Whitespace(_) => {}
            }
        }
        Ok(children)
    }

    /// Warns about attributes `accepts` rejects and about duplicates.
    pub fn check_attributes(
        &mut self,
        el: &RawElement,
        canonical: &str,
        accepts: impl Fn(&str) -> bool,
    ) {
        let mut seen = HashSet::new();
        for attr in &el.attributes {
            if !seen.insert(attr.name.as_str()) {
                self.warn(&el.tag, &attr.name, "duplicate attribute; the last value wins");
            }
            if !accepts(&attr.name) {
                self.warn(
                    &el.tag,
                    &attr.name,
                    format!("unrecognized attribute for <{canonical}>"),
                );
            }
        }
    }

    /// Records a non-fatal warning. Dropped if the caller gave no sink.
    pub fn warn(&mut self, tag: &str, attribute: &str, message: impl Into<String>) {
        let warning = AttributeWarning {
            tag: tag.to_string(),
            attribute: attribute.to_string(),
            message: message.into(),
        };
        debug!(target: "slidekit::elements", "warning: {warning}");
        if let Some(sink) = self.warnings.as_deref_mut() {
            sink.push(warning);
        }
    }

    /// Error for a tag outside the vocabulary allowed at this position.
    pub fn unknown_element(&self, el: &RawElement, valid: Vec<String>) -> SlideError {
        let start = el.span.start;
        self.errors.report(
            ErrorKind::UnknownElement {
                tag: el.tag.clone(),
                valid,
            },
            Span::new(start, start + 1 + el.tag.len()),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lookup_ignores_case() {
        let registry = canonical_registry();
        assert_eq!(registry.lookup("frame").map(|d| d.name), Some("Frame"));
        assert_eq!(registry.lookup("TITLE").map(|d| d.kind), Some(ElementKind::Sugar));
        assert!(!registry.contains("Marquee"));
    }

    #[test]
    fn names_list_primitives_before_sugar() {
        let names = canonical_registry().names();
        let frame = names.iter().position(|n| n == "Frame").unwrap();
        let title = names.iter().position(|n| n == "Title").unwrap();
        assert!(frame < title);
        assert_eq!(names.len(), canonical_registry().len());
    }
}
