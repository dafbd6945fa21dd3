//! Inline formatting inside text elements.
//!
//! `<Text>A <B>bold</B> word</Text>` becomes the content `"A bold word"` and
//! three segments. Nested inline tags compose their overrides, inner tags
//! winning per field. The outer text is trimmed exactly once; whitespace
//! between runs is kept as written.

use crate::ast::style::BOLD_WEIGHT;
use crate::ast::{FontStyle, Segment, TextDecoration, TextStyle};
use crate::elements::{Attrs, BuildContext};
use crate::errors::SlideError;
use crate::syntax::{RawElement, RawNode};

/// Attributes a `Span` accepts as style overrides.
pub const SPAN_ATTRIBUTES: &[&str] = &[
    "fontFamily",
    "fontSize",
    "fontWeight",
    "fontStyle",
    "color",
    "textDecoration",
    "letterSpacing",
];

/// Result of formatting one text element's content.
#[derive(Debug, Clone, PartialEq)]
pub struct InlineText {
    pub content: String,
    /// `None` when the content held no inline tag. Runs without overrides
    /// still count as segments.
    pub segments: Option<Vec<Segment>>,
}

impl InlineText {
    pub fn plain(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            segments: None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InlineTag {
    Bold,
    Italic,
    Underline,
    Strike,
    Span,
}

impl InlineTag {
    /// Every accepted spelling, for diagnostics.
    pub const NAMES: &'static [&'static str] = &[
        "B", "Bold", "Strong", "I", "Em", "Italic", "U", "S", "Strike", "Span",
    ];

    pub fn classify(tag: &str) -> Option<Self> {
        let tag = match tag.to_ascii_lowercase().as_str() {
            "b" | "bold" | "strong" => InlineTag::Bold,
            "i" | "em" | "italic" => InlineTag::Italic,
            "u" => InlineTag::Underline,
            "s" | "strike" => InlineTag::Strike,
            "span" => InlineTag::Span,
            _ => return None,
        };
        Some(tag)
    }

    /// The spelling the serializer writes.
    pub fn canonical(self) -> &'static str {
        match self {
            InlineTag::Bold => "B",
            InlineTag::Italic => "I",
            InlineTag::Underline => "U",
            InlineTag::Strike => "S",
            InlineTag::Span => "Span",
        }
    }

    fn overrides(self, el: &RawElement, cx: &mut BuildContext<'_>) -> TextStyle {
        let mut style = TextStyle::default();
        match self {
            InlineTag::Bold => style.font_weight = Some(BOLD_WEIGHT),
            InlineTag::Italic => style.font_style = Some(FontStyle::Italic),
            InlineTag::Underline => style.decoration = Some(TextDecoration::Underline),
            InlineTag::Strike => style.decoration = Some(TextDecoration::LineThrough),
            InlineTag::Span => style = Attrs::new(el).text_style(cx),
        }
        style
    }
}

/// Formats the children of a text element.
pub fn format_inline(
    children: &[RawNode],
    cx: &mut BuildContext<'_>,
) -> Result<InlineText, SlideError> {
    let has_tags = children
        .iter()
        .any(|child| matches!(child, RawNode::Element(_)));
    if !has_tags {
        let text: String = children.iter().filter_map(run_text).collect();
        return Ok(InlineText::plain(text.trim()));
    }

    let mut runs = Vec::new();
    collect_runs(children, &TextStyle::default(), cx, &mut runs)?;
    trim_outer(&mut runs);

    let content = runs.iter().map(|run| run.text.as_str()).collect();
    Ok(InlineText {
        content,
        segments: Some(runs),
    })
}

fn run_text(node: &RawNode) -> Option<&str> {
    match node {
        RawNode::Text(text, _) | RawNode::Whitespace(text) => Some(text),
        RawNode::Element(_) => None,
    }
}

fn collect_runs(
    children: &[RawNode],
    style: &TextStyle,
    cx: &mut BuildContext<'_>,
    runs: &mut Vec<Segment>,
) -> Result<(), SlideError> {
    for child in children {
        let el = match child {
            RawNode::Element(el) => el,
            text => {
                push_run(runs, run_text(text).unwrap_or_default(), style);
                continue;
            }
        };
        let Some(tag) = InlineTag::classify(&el.tag) else {
            let valid = InlineTag::NAMES.iter().map(|name| name.to_string()).collect();
            return Err(cx.unknown_element(el, valid));
        };
        cx.check_attributes(el, tag.canonical(), |name| {
            tag == InlineTag::Span && SPAN_ATTRIBUTES.contains(&name)
        });
        let inner = style.merged(&tag.overrides(el, cx));
        collect_runs(&el.children, &inner, cx, runs)?;
    }
    Ok(())
}

// Empty runs are dropped and a run continuing the previous style extends it.
fn push_run(runs: &mut Vec<Segment>, text: &str, style: &TextStyle) {
    if text.is_empty() {
        return;
    }
    match runs.last_mut() {
        Some(last) if last.style == *style => last.text.push_str(text),
        _ => runs.push(Segment::new(text, style.clone())),
    }
}

fn trim_outer(runs: &mut Vec<Segment>) {
    while let Some(first) = runs.first_mut() {
        let leading = first.text.len() - first.text.trim_start().len();
        first.text.drain(..leading);
        if !first.text.is_empty() {
            break;
        }
        runs.remove(0);
    }
    while let Some(last) = runs.last_mut() {
        let end = last.text.trim_end().len();
        last.text.truncate(end);
        if !last.text.is_empty() {
            break;
        }
        runs.pop();
    }
}
