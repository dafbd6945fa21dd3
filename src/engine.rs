use std::sync::Arc;

use log::debug;

use crate::{
    ast::Node,
    config::ParseOptions,
    elements::{canonical_registry, BuildContext},
    errors::{AttributeWarning, SlideError, SourceContext},
    syntax::Scanner,
};

// ============================================================================
// PIPELINE - text to typed tree
// ============================================================================

/// Parses a document holding exactly one top-level element.
pub fn parse(text: &str) -> Result<Arc<Node>, SlideError> {
    parse_with(text, &ParseOptions::default(), None)
}

/// Parses with explicit limits, collecting attribute warnings into `warnings`
/// when given.
pub fn parse_with(
    text: &str,
    options: &ParseOptions,
    warnings: Option<&mut Vec<AttributeWarning>>,
) -> Result<Arc<Node>, SlideError> {
    let source = SourceContext::inline(text);
    parse_source(&source, options, warnings)
}

/// Parses a named source, so diagnostics carry the file name.
pub fn parse_source(
    source: &SourceContext,
    options: &ParseOptions,
    warnings: Option<&mut Vec<AttributeWarning>>,
) -> Result<Arc<Node>, SlideError> {
    let raw = Scanner::new(source, options).parse_document()?;
    let mut cx = BuildContext::new(source, canonical_registry(), warnings);
    let root = cx.build(&raw)?;
    debug!(target: "slidekit::engine", "parsed <{}> from {}", raw.tag, source.name);
    Ok(Arc::new(root))
}

/// Parses back-to-back top-level elements into one tree each.
pub fn parse_many(text: &str) -> Result<Vec<Arc<Node>>, SlideError> {
    parse_many_with(text, &ParseOptions::default(), None)
}

pub fn parse_many_with(
    text: &str,
    options: &ParseOptions,
    warnings: Option<&mut Vec<AttributeWarning>>,
) -> Result<Vec<Arc<Node>>, SlideError> {
    let source = SourceContext::inline(text);
    parse_many_source(&source, options, warnings)
}

pub fn parse_many_source(
    source: &SourceContext,
    options: &ParseOptions,
    warnings: Option<&mut Vec<AttributeWarning>>,
) -> Result<Vec<Arc<Node>>, SlideError> {
    let elements = Scanner::new(source, options).parse_sequence()?;
    let mut cx = BuildContext::new(source, canonical_registry(), warnings);
    let roots = elements
        .iter()
        .map(|el| cx.build(el).map(Arc::new))
        .collect::<Result<Vec<_>, _>>()?;
    debug!(target: "slidekit::engine", "parsed {} roots from {}", roots.len(), source.name);
    Ok(roots)
}
