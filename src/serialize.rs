//! Typed tree back to markup.
//!
//! Output re-parses to an equivalent tree: same node kinds, attribute
//! values, child order and text. Nodes are written with their primitive
//! tags, so sugar comes back expanded. Styled text segments are written as
//! the inline tags that produce them.

use std::fmt::Write;
use std::sync::Arc;

use crate::ast::style::BOLD_WEIGHT;
use crate::ast::{
    AttrValue, ContainerNode, FontStyle, GroupNode, Keyword, Node, NodeProps, Segment, ShapeKind,
    ShapeNode, Size, TextDecoration, TextNode, TextStyle,
};
use crate::syntax::escape::escape;

/// Text bodies shorter than this, without line breaks, stay on the tag's
/// line.
pub const INLINE_TEXT_LIMIT: usize = 60;

/// Serializes one tree. No trailing newline.
pub fn serialize(root: &Node) -> String {
    let mut out = String::with_capacity(256);
    emit_node(&mut out, root, 0);
    out
}

/// Serializes several trees separated by a blank line.
pub fn serialize_many(roots: &[Arc<Node>]) -> String {
    roots
        .iter()
        .map(|root| serialize(root))
        .collect::<Vec<_>>()
        .join("\n\n")
}

fn indent(out: &mut String, depth: usize) {
    for _ in 0..depth {
        out.push_str("  ");
    }
}

fn emit_node(out: &mut String, node: &Node, depth: usize) {
    indent(out, depth);
    let tag = node.tag_name();
    out.push('<');
    out.push_str(tag);
    for (name, value) in attributes(node).0 {
        let _ = write!(out, " {name}={}", value.to_literal());
    }

    match node {
        Node::Text(text) => {
            let body = text_body(text);
            if body.is_empty() {
                out.push_str(" />");
            } else if body.chars().count() < INLINE_TEXT_LIMIT && !body.contains('\n') {
                let _ = write!(out, ">{body}</{tag}>");
            } else {
                out.push_str(">\n");
                indent(out, depth + 1);
                out.push_str(&body);
                out.push('\n');
                indent(out, depth);
                let _ = write!(out, "</{tag}>");
            }
        }
        Node::Container(ContainerNode { children, .. })
        | Node::Group(GroupNode { children, .. })
            if !children.is_empty() =>
        {
            out.push_str(">\n");
            for child in children {
                emit_node(out, child, depth + 1);
                out.push('\n');
            }
            indent(out, depth);
            let _ = write!(out, "</{tag}>");
        }
        _ => out.push_str(" />"),
    }
}

/// Attribute list in writing order.
struct AttrList(Vec<(&'static str, AttrValue)>);

impl AttrList {
    fn push<T: Into<AttrValue>>(&mut self, name: &'static str, value: Option<T>) {
        if let Some(value) = value {
            self.0.push((name, value.into()));
        }
    }

    fn text(&mut self, name: &'static str, value: &Option<String>) {
        self.push(name, value.as_deref());
    }

    fn keyword<K: Keyword>(&mut self, name: &'static str, value: Option<K>) {
        self.push(name, value.map(|k| k.as_str()));
    }

    fn size(&mut self, name: &'static str, value: Option<Size>) {
        let value = value.map(|size| match size {
            Size::Fixed(n) => AttrValue::Number(n),
            Size::Fill => AttrValue::from("fill"),
            Size::Hug => AttrValue::from("hug"),
        });
        self.push(name, value);
    }

    fn props(&mut self, props: &NodeProps) {
        self.text("name", &props.name);
        self.push("visible", props.visible);
        self.push("opacity", props.opacity);
        self.push("x", props.x);
        self.push("y", props.y);
        self.size("width", props.width);
        self.size("height", props.height);
        self.push("rotation", props.rotation);
    }
}

fn attributes(node: &Node) -> AttrList {
    let mut attrs = AttrList(Vec::new());
    attrs.text("id", &node.props().id);
    match node {
        Node::Container(frame) => container_attributes(&mut attrs, frame),
        Node::Text(text) => text_attributes(&mut attrs, text),
        Node::Shape(shape) => shape_attributes(&mut attrs, shape),
        Node::Group(_) => {}
    }
    attrs.props(node.props());
    attrs
}

fn container_attributes(attrs: &mut AttrList, frame: &ContainerNode) {
    attrs.keyword("layout", frame.layout);
    attrs.push("gap", frame.gap);
    match frame.padding.as_uniform() {
        Some(all) => attrs.push("padding", Some(all)),
        None => {
            let p = &frame.padding;
            attrs.push("paddingTop", p.top);
            attrs.push("paddingRight", p.right);
            attrs.push("paddingBottom", p.bottom);
            attrs.push("paddingLeft", p.left);
        }
    }
    attrs.keyword("align", frame.align);
    attrs.keyword("crossAlign", frame.cross_align);
    attrs.text("fill", &frame.fill);
    attrs.text("stroke", &frame.stroke);
    attrs.push("strokeWidth", frame.stroke_width);
    attrs.push("cornerRadius", frame.corner_radius);
    attrs.push("clip", frame.clip);
}

fn text_attributes(attrs: &mut AttrList, text: &TextNode) {
    attrs.text("fontFamily", &text.font_family);
    attrs.push("fontSize", text.font_size);
    attrs.push("fontWeight", text.font_weight.map(f64::from));
    attrs.keyword("fontStyle", text.font_style);
    attrs.text("color", &text.color);
    attrs.keyword("textAlign", text.text_align);
    attrs.push("lineHeight", text.line_height);
    attrs.push("letterSpacing", text.letter_spacing);
    attrs.keyword("textDecoration", text.decoration);
}

fn shape_attributes(attrs: &mut AttrList, shape: &ShapeNode) {
    match &shape.shape {
        ShapeKind::Rectangle | ShapeKind::Ellipse => {}
        ShapeKind::Path { data } => attrs.push("d", Some(data.as_str())),
        ShapeKind::Image { src, fit } => {
            attrs.push("src", Some(src.as_str()));
            attrs.keyword("fit", *fit);
        }
    }
    attrs.text("fill", &shape.fill);
    attrs.text("stroke", &shape.stroke);
    attrs.push("strokeWidth", shape.stroke_width);
    attrs.push("cornerRadius", shape.corner_radius);
}

fn text_body(text: &TextNode) -> String {
    match &text.segments {
        // Without any override the markup would read back as plain text; a
        // bare `Span` keeps the segment list.
        Some(segments) if segments.iter().all(|s| s.style.is_empty()) => {
            let inner: String = segments.iter().map(|s| escape(&s.text)).collect();
            wrap("Span", "", &inner)
        }
        Some(segments) => segments.iter().map(segment_markup).collect(),
        None => escape(&text.content).into_owned(),
    }
}

/// Inline markup for one segment: `Span` outermost, then `B`, `I` and
/// `U`/`S`. Overrides without a shorthand tag go on the `Span`.
fn segment_markup(segment: &Segment) -> String {
    let style = &segment.style;
    let mut markup = escape(&segment.text).into_owned();
    let mut span = TextStyle {
        font_family: style.font_family.clone(),
        font_size: style.font_size,
        color: style.color.clone(),
        letter_spacing: style.letter_spacing,
        ..TextStyle::default()
    };

    match style.decoration {
        Some(TextDecoration::Underline) => markup = wrap("U", "", &markup),
        Some(TextDecoration::LineThrough) => markup = wrap("S", "", &markup),
        other => span.decoration = other,
    }
    match style.font_style {
        Some(FontStyle::Italic) => markup = wrap("I", "", &markup),
        other => span.font_style = other,
    }
    match style.font_weight {
        Some(BOLD_WEIGHT) => markup = wrap("B", "", &markup),
        other => span.font_weight = other,
    }
    if !span.is_empty() {
        markup = wrap("Span", &span_attributes(&span), &markup);
    }
    markup
}

fn span_attributes(span: &TextStyle) -> String {
    let mut attrs = AttrList(Vec::new());
    attrs.text("fontFamily", &span.font_family);
    attrs.push("fontSize", span.font_size);
    attrs.push("fontWeight", span.font_weight.map(f64::from));
    attrs.keyword("fontStyle", span.font_style);
    attrs.text("color", &span.color);
    attrs.keyword("textDecoration", span.decoration);
    attrs.push("letterSpacing", span.letter_spacing);
    attrs
        .0
        .iter()
        .map(|(name, value)| format!(" {name}={}", value.to_literal()))
        .collect()
}

fn wrap(tag: &str, attributes: &str, inner: &str) -> String {
    format!("<{tag}{attributes}>{inner}</{tag}>")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::Padding;

    #[test]
    fn childless_nodes_self_close() {
        let rect = Node::Shape(ShapeNode {
            fill: Some("#fff".into()),
            ..ShapeNode::new(ShapeKind::Rectangle)
        });
        assert_eq!(serialize(&rect), r##"<Rect fill="#fff" />"##);
    }

    #[test]
    fn equal_padding_uses_the_shorthand() {
        let frame = Node::Container(ContainerNode {
            padding: Padding::uniform(12.0),
            ..ContainerNode::default()
        });
        assert_eq!(serialize(&frame), "<Frame padding={12} />");
    }

    #[test]
    fn long_text_moves_to_its_own_line() {
        let text = Node::Text(TextNode::plain("x".repeat(INLINE_TEXT_LIMIT)));
        let out = serialize(&text);
        assert!(out.starts_with("<Text>\n  x"));
        assert!(out.ends_with("\n</Text>"));
    }

    #[test]
    fn unstyled_segments_keep_a_bare_span() {
        let text = Node::Text(TextNode {
            content: "x".into(),
            segments: Some(vec![Segment::plain("x")]),
            ..TextNode::default()
        });
        assert_eq!(serialize(&text), "<Text><Span>x</Span></Text>");

        let empty = Node::Text(TextNode {
            segments: Some(Vec::new()),
            ..TextNode::default()
        });
        assert_eq!(serialize(&empty), "<Text><Span></Span></Text>");
    }

    #[test]
    fn segments_nest_span_outside_shorthands() {
        let segment = Segment::new(
            "hi",
            TextStyle {
                font_weight: Some(BOLD_WEIGHT),
                font_style: Some(FontStyle::Italic),
                color: Some("red".into()),
                ..TextStyle::default()
            },
        );
        assert_eq!(
            segment_markup(&segment),
            r#"<Span color="red"><B><I>hi</I></B></Span>"#
        );
    }
}
