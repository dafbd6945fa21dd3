//! Slidekit Error Handling - Unified Diagnostic API
//!
//! Every fatal failure of the parse pipeline is a [`SlideError`]. Errors are
//! created through the [`ErrorReporting`] trait by a context that knows the
//! source text and the current phase, so line/column, the context snippet and
//! the miette label are always filled in consistently.

use miette::{Diagnostic, LabeledSpan, NamedSource, SourceSpan};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;
use thiserror::Error;
use unicode_width::UnicodeWidthChar;

use crate::syntax::Span;

/// Characters shown on each side of the failure point in a context snippet.
pub const SNIPPET_RADIUS: usize = 20;

// ============================================================================
// SOURCE CONTEXT - Error reporting infrastructure
// ============================================================================

/// Source text and its display name, used to build diagnostics.
#[derive(Debug, Clone)]
pub struct SourceContext {
    pub name: String,
    pub content: String,
}

impl SourceContext {
    /// Create a source context from real file content
    pub fn from_file(name: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            content: content.into(),
        }
    }

    /// Source context for text that did not come from a file
    pub fn inline(content: impl Into<String>) -> Self {
        Self::from_file("<input>", content)
    }

    /// Convert to NamedSource for use with miette error reporting
    pub fn to_named_source(&self) -> Arc<NamedSource<String>> {
        Arc::new(NamedSource::new(self.name.clone(), self.content.clone()))
    }
}

/// Resolved position of an error inside the source text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Location {
    /// 1-based line.
    pub line: usize,
    /// 1-based column, counted in characters.
    pub column: usize,
    /// Byte offset into the source.
    pub offset: usize,
    /// About 40 characters around the offset, followed by a caret line.
    pub snippet: String,
}

impl Location {
    /// Computes line, column and the caret snippet for `offset` in `source`.
    pub fn locate(source: &str, offset: usize) -> Self {
        let mut offset = offset.min(source.len());
        while !source.is_char_boundary(offset) {
            offset -= 1;
        }

        let before = &source[..offset];
        let line = before.matches('\n').count() + 1;
        let line_start = before.rfind('\n').map_or(0, |i| i + 1);
        let column = source[line_start..offset].chars().count() + 1;

        let flat = |c: char| if c.is_whitespace() { ' ' } else { c };
        let mut prefix: Vec<char> = before.chars().rev().take(SNIPPET_RADIUS).collect();
        prefix.reverse();
        let prefix: String = prefix.into_iter().map(flat).collect();
        let suffix: String = source[offset..]
            .chars()
            .take(SNIPPET_RADIUS)
            .map(flat)
            .collect();

        let caret_pad: usize = prefix.chars().map(|c| c.width().unwrap_or(0)).sum();
        let snippet = format!("{prefix}{suffix}\n{}^", " ".repeat(caret_pad));

        Self {
            line,
            column,
            offset,
            snippet,
        }
    }
}

// ============================================================================
// ERROR TYPES
// ============================================================================

/// The resource whose explicit limit was exceeded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResourceLimit {
    InputLength,
    NestingDepth,
    ExpressionDepth,
}

impl fmt::Display for ResourceLimit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            ResourceLimit::InputLength => "input length",
            ResourceLimit::NestingDepth => "element nesting depth",
            ResourceLimit::ExpressionDepth => "brace expression depth",
        };
        f.write_str(text)
    }
}

/// All fatal error types
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ErrorKind {
    #[error("unexpected {found}, expected {expected}")]
    UnexpectedToken { expected: String, found: String },

    #[error("missing tag name after '<', found {found}")]
    MissingTagName { found: String },

    #[error("missing '=' after attribute '{attribute}', found {found}")]
    MissingEquals { attribute: String, found: String },

    #[error("missing value for attribute '{attribute}': expected '\"' or '{{', found {found}")]
    MissingValue { attribute: String, found: String },

    #[error("mismatched closing tag: expected </{expected}>, found </{found}>")]
    MismatchedClosingTag { expected: String, found: String },

    #[error("unexpected end of input, expected {expected}")]
    UnexpectedEof { expected: String },

    #[error("unexpected {found} after the top-level element")]
    TrailingContent { found: String },

    #[error("unknown element <{tag}>; valid elements are: {}", .valid.join(", "))]
    UnknownElement { tag: String, valid: Vec<String> },

    #[error("{limit} limit exceeded (maximum {max})")]
    ResourceLimit { limit: ResourceLimit, max: usize },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Syntax,
    UnknownElement,
    ResourceLimit,
}

impl ErrorKind {
    /// Get the error category for callers and test assertions
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::UnexpectedToken { .. }
            | Self::MissingTagName { .. }
            | Self::MissingEquals { .. }
            | Self::MissingValue { .. }
            | Self::MismatchedClosingTag { .. }
            | Self::UnexpectedEof { .. }
            | Self::TrailingContent { .. } => ErrorCategory::Syntax,
            Self::UnknownElement { .. } => ErrorCategory::UnknownElement,
            Self::ResourceLimit { .. } => ErrorCategory::ResourceLimit,
        }
    }

    /// Get error code suffix for diagnostic codes
    pub const fn code_suffix(&self) -> &'static str {
        match self {
            Self::UnexpectedToken { .. } => "unexpected_token",
            Self::MissingTagName { .. } => "missing_tag_name",
            Self::MissingEquals { .. } => "missing_equals",
            Self::MissingValue { .. } => "missing_value",
            Self::MismatchedClosingTag { .. } => "mismatched_closing_tag",
            Self::UnexpectedEof { .. } => "unexpected_eof",
            Self::TrailingContent { .. } => "trailing_content",
            Self::UnknownElement { .. } => "unknown_element",
            Self::ResourceLimit { .. } => "resource_limit",
        }
    }

    /// The literal token actually found at the failure point, when known.
    pub fn found(&self) -> Option<&str> {
        match self {
            Self::UnexpectedToken { found, .. }
            | Self::MissingTagName { found }
            | Self::MissingEquals { found, .. }
            | Self::MissingValue { found, .. }
            | Self::MismatchedClosingTag { found, .. }
            | Self::TrailingContent { found } => Some(found),
            Self::UnknownElement { tag, .. } => Some(tag),
            Self::UnexpectedEof { .. } | Self::ResourceLimit { .. } => None,
        }
    }

    fn default_help(&self) -> Option<String> {
        match self {
            Self::MismatchedClosingTag { expected, .. } => {
                Some(format!("close the element with </{expected}>"))
            }
            Self::MissingValue { .. } => {
                Some("wrap strings in double quotes and numbers or booleans in braces, e.g. size={24}".into())
            }
            Self::ResourceLimit { .. } => {
                Some("split the input or raise the limit in the parse configuration".into())
            }
            Self::TrailingContent { .. } => {
                Some("use the batch entry point to parse several top-level elements".into())
            }
            _ => None,
        }
    }

    fn primary_label(&self) -> &'static str {
        match self {
            Self::UnexpectedToken { .. } => "unexpected token",
            Self::MissingTagName { .. } => "tag name expected here",
            Self::MissingEquals { .. } => "'=' expected here",
            Self::MissingValue { .. } => "value expected here",
            Self::MismatchedClosingTag { .. } => "mismatched closing tag",
            Self::UnexpectedEof { .. } => "input ends here",
            Self::TrailingContent { .. } => "trailing content",
            Self::UnknownElement { .. } => "unknown element",
            Self::ResourceLimit { .. } => "limit exceeded here",
        }
    }
}

/// Context-specific source information
#[derive(Debug, Clone)]
pub struct SourceInfo {
    pub source: Arc<NamedSource<String>>,
    pub primary_span: SourceSpan,
    pub phase: String,
}

/// Diagnostic enhancement data
#[derive(Debug, Clone)]
pub struct DiagnosticInfo {
    pub help: Option<String>,
    pub error_code: String,
}

/// The single fatal error type of the parse pipeline
#[derive(Debug, Clone)]
pub struct SlideError {
    /// What went wrong
    pub kind: ErrorKind,
    /// Line, column and snippet, when the error is tied to a position
    pub location: Option<Location>,
    /// Where it happened
    pub source_info: SourceInfo,
    /// How to help
    pub diagnostic_info: DiagnosticInfo,
}

impl SlideError {
    /// Human-readable message without position information.
    pub fn message(&self) -> String {
        self.kind.to_string()
    }

    pub fn line(&self) -> Option<usize> {
        self.location.as_ref().map(|l| l.line)
    }

    pub fn column(&self) -> Option<usize> {
        self.location.as_ref().map(|l| l.column)
    }

    pub fn snippet(&self) -> Option<&str> {
        self.location.as_ref().map(|l| l.snippet.as_str())
    }

    pub fn category(&self) -> ErrorCategory {
        self.kind.category()
    }
}

impl std::error::Error for SlideError {}

impl fmt::Display for SlideError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.location {
            Some(loc) => write!(
                f,
                "{} at line {}, column {}",
                self.kind, loc.line, loc.column
            ),
            None => write!(f, "{}", self.kind),
        }
    }
}

impl Diagnostic for SlideError {
    fn code<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        Some(Box::new(&self.diagnostic_info.error_code))
    }

    fn help<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        self.diagnostic_info
            .help
            .as_ref()
            .map(|h| Box::new(h) as Box<dyn fmt::Display>)
    }

    fn labels(&self) -> Option<Box<dyn Iterator<Item = LabeledSpan> + '_>> {
        let labels = vec![LabeledSpan::new_with_span(
            Some(self.kind.primary_label().to_string()),
            self.source_info.primary_span,
        )];
        Some(Box::new(labels.into_iter()))
    }

    fn source_code(&self) -> Option<&dyn miette::SourceCode> {
        Some(&*self.source_info.source)
    }
}

// ============================================================================
// ERROR CREATION
// ============================================================================

/// Context-aware error creation
pub trait ErrorReporting {
    /// Create an error with context-appropriate enhancements
    fn report(&self, kind: ErrorKind, span: Span) -> SlideError;

    fn unexpected_token(&self, expected: &str, found: String, span: Span) -> SlideError {
        self.report(
            ErrorKind::UnexpectedToken {
                expected: expected.into(),
                found,
            },
            span,
        )
    }

    fn unexpected_eof(&self, expected: &str, span: Span) -> SlideError {
        self.report(
            ErrorKind::UnexpectedEof {
                expected: expected.into(),
            },
            span,
        )
    }

    fn resource_limit(&self, limit: ResourceLimit, max: usize, span: Span) -> SlideError {
        self.report(ErrorKind::ResourceLimit { limit, max }, span)
    }
}

/// Error creation context for one phase of the pipeline over one source
#[derive(Debug, Clone, Copy)]
pub struct PhaseContext<'a> {
    pub source: &'a SourceContext,
    pub phase: &'static str,
}

impl<'a> PhaseContext<'a> {
    pub fn new(source: &'a SourceContext, phase: &'static str) -> Self {
        Self { source, phase }
    }
}

impl ErrorReporting for PhaseContext<'_> {
    fn report(&self, kind: ErrorKind, span: Span) -> SlideError {
        let error_code = format!("slidekit::{}::{}", self.phase, kind.code_suffix());
        let location = Location::locate(&self.source.content, span.start);
        let help = kind.default_help();

        SlideError {
            kind,
            source_info: SourceInfo {
                source: self.source.to_named_source(),
                primary_span: to_source_span(span),
                phase: self.phase.to_string(),
            },
            location: Some(location),
            diagnostic_info: DiagnosticInfo { help, error_code },
        }
    }
}

/// Converts a syntax Span to a miette SourceSpan.
pub fn to_source_span(span: Span) -> SourceSpan {
    SourceSpan::from(span.start..span.end.max(span.start))
}

// ============================================================================
// WARNINGS
// ============================================================================

/// A non-fatal finding about an attribute; collected, never raised.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttributeWarning {
    pub tag: String,
    pub attribute: String,
    pub message: String,
}

impl fmt::Display for AttributeWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<{}> {}: {}", self.tag, self.attribute, self.message)
    }
}

// ============================================================================
// ERROR FORMATTING UTILITIES
// ============================================================================

/// Prints a SlideError with full miette diagnostics
pub fn print_error(error: SlideError) {
    use miette::Report;
    let report = Report::new(error);
    eprintln!("{report:?}");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn locate_counts_lines_and_columns_from_one() {
        let loc = Location::locate("<Frame>\n  <Text", 10);
        assert_eq!(loc.line, 2);
        assert_eq!(loc.column, 3);
    }

    #[test]
    fn snippet_caret_points_at_offset() {
        let src = "<Frame gap=12>";
        let loc = Location::locate(src, 11);
        let mut lines = loc.snippet.lines();
        let window = lines.next().unwrap();
        let caret = lines.next().unwrap();
        assert_eq!(window, src);
        assert_eq!(caret.len(), 12);
        assert!(caret.ends_with('^'));
        assert_eq!(&window[11..12], "1");
    }

    #[test]
    fn snippet_window_is_bounded() {
        let src = "x".repeat(200);
        let loc = Location::locate(&src, 100);
        let window = loc.snippet.lines().next().unwrap();
        assert_eq!(window.chars().count(), 2 * SNIPPET_RADIUS);
    }

    #[test]
    fn snippet_flattens_newlines() {
        let loc = Location::locate("a\nb", 2);
        assert_eq!(loc.snippet, "a b\n  ^");
    }
}
