//! Shared helpers for the slidekit integration tests.

#![allow(dead_code)]

use std::sync::Arc;

use slidekit::ast::{ContainerNode, Node, ShapeNode, TextNode};
use slidekit::config::ParseOptions;
use slidekit::{parse_with, AttributeWarning, SlideError};

/// Routes library logs through the test harness. Safe to call repeatedly.
pub fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// Parses `source`, panicking with the rendered diagnostic on failure.
pub fn parse_ok(source: &str) -> Arc<Node> {
    init_logging();
    match slidekit::parse(source) {
        Ok(root) => root,
        Err(error) => panic!("expected {source:?} to parse, got: {error}"),
    }
}

/// Parses `source` and returns the tree with every collected warning.
pub fn parse_warn(source: &str) -> (Arc<Node>, Vec<AttributeWarning>) {
    init_logging();
    let mut warnings = Vec::new();
    match parse_with(source, &ParseOptions::default(), Some(&mut warnings)) {
        Ok(root) => (root, warnings),
        Err(error) => panic!("expected {source:?} to parse, got: {error}"),
    }
}

/// Parses `source`, expecting failure.
pub fn parse_err(source: &str) -> SlideError {
    init_logging();
    match slidekit::parse(source) {
        Ok(root) => panic!("expected {source:?} to fail, got {root:?}"),
        Err(error) => error,
    }
}

pub fn as_container(node: &Node) -> &ContainerNode {
    match node {
        Node::Container(frame) => frame,
        other => panic!("expected a container, got {other:?}"),
    }
}

pub fn as_text(node: &Node) -> &TextNode {
    match node {
        Node::Text(text) => text,
        other => panic!("expected a text node, got {other:?}"),
    }
}

pub fn as_shape(node: &Node) -> &ShapeNode {
    match node {
        Node::Shape(shape) => shape,
        other => panic!("expected a shape, got {other:?}"),
    }
}

/// The `index`-th child of a container or group.
pub fn child(node: &Node, index: usize) -> &Arc<Node> {
    let children = node
        .children()
        .unwrap_or_else(|| panic!("<{}> has no children", node.tag_name()));
    children
        .get(index)
        .unwrap_or_else(|| panic!("<{}> has no child {index}", node.tag_name()))
}
