//! Primitive elements: one tag, one node kind.

use crate::ast::{ContainerNode, GroupNode, Node, ShapeKind, ShapeNode, TextNode};
use crate::errors::SlideError;
use crate::inline::format_inline;
use crate::syntax::{RawElement, RawNode};

use super::{Attrs, BuildContext, ElementDef, ElementKind, ElementRegistry};

pub const FRAME_ATTRIBUTES: &[&str] = &[
    "layout",
    "gap",
    "padding",
    "paddingTop",
    "paddingRight",
    "paddingBottom",
    "paddingLeft",
    "align",
    "crossAlign",
    "fill",
    "stroke",
    "strokeWidth",
    "cornerRadius",
    "clip",
];

pub const TEXT_ATTRIBUTES: &[&str] = &[
    "fontFamily",
    "fontSize",
    "fontWeight",
    "fontStyle",
    "color",
    "textAlign",
    "lineHeight",
    "letterSpacing",
    "textDecoration",
];

pub const RECT_ATTRIBUTES: &[&str] = &["fill", "stroke", "strokeWidth", "cornerRadius"];
pub const ELLIPSE_ATTRIBUTES: &[&str] = &["fill", "stroke", "strokeWidth"];
pub const PATH_ATTRIBUTES: &[&str] = &["d", "fill", "stroke", "strokeWidth"];
pub const IMAGE_ATTRIBUTES: &[&str] = &["src", "fit", "stroke", "strokeWidth", "cornerRadius"];

pub fn register_primitives(registry: &mut ElementRegistry) {
    let defs: [(&'static str, &'static [&'static str], super::BuildFn); 7] = [
        ("Frame", FRAME_ATTRIBUTES, build_frame),
        ("Text", TEXT_ATTRIBUTES, build_text),
        ("Rect", RECT_ATTRIBUTES, build_rect),
        ("Ellipse", ELLIPSE_ATTRIBUTES, build_ellipse),
        ("Path", PATH_ATTRIBUTES, build_path),
        ("Image", IMAGE_ATTRIBUTES, build_image),
        ("Group", &[], build_group),
    ];
    for (name, attributes, build) in defs {
        registry.register(ElementDef {
            name,
            kind: ElementKind::Primitive,
            attributes,
            build,
        });
    }
}

/// Reads every container attribute and builds the children. Shared with the
/// container-shaped sugar tags.
pub fn container_from(
    el: &RawElement,
    cx: &mut BuildContext<'_>,
) -> Result<ContainerNode, SlideError> {
    let attrs = Attrs::new(el);
    Ok(ContainerNode {
        props: attrs.props(cx),
        layout: attrs.keyword(cx, "layout"),
        gap: attrs.number(cx, "gap"),
        padding: attrs.padding(cx),
        align: attrs.keyword(cx, "align"),
        cross_align: attrs.keyword(cx, "crossAlign"),
        fill: attrs.string(cx, "fill"),
        stroke: attrs.string(cx, "stroke"),
        stroke_width: attrs.number(cx, "strokeWidth"),
        corner_radius: attrs.number(cx, "cornerRadius"),
        clip: attrs.boolean(cx, "clip"),
        children: cx.build_children(el)?,
    })
}

/// Reads typography attributes and runs the inline formatter over the
/// element's content.
pub fn text_from(el: &RawElement, cx: &mut BuildContext<'_>) -> Result<TextNode, SlideError> {
    let attrs = Attrs::new(el);
    let props = attrs.props(cx);
    let inline = format_inline(&el.children, cx)?;
    Ok(TextNode {
        props,
        content: inline.content,
        segments: inline.segments,
        font_family: attrs.string(cx, "fontFamily"),
        font_size: attrs.number(cx, "fontSize"),
        font_weight: attrs.font_weight(cx, "fontWeight"),
        font_style: attrs.keyword(cx, "fontStyle"),
        color: attrs.string(cx, "color"),
        text_align: attrs.keyword(cx, "textAlign"),
        line_height: attrs.number(cx, "lineHeight"),
        letter_spacing: attrs.number(cx, "letterSpacing"),
        decoration: attrs.keyword(cx, "textDecoration"),
    })
}

/// Paint attributes common to shapes. Only the attributes in `accepted` are
/// read, so a value the tag warned about never reaches the node. Shapes have
/// no children; any content is ignored with a warning.
pub fn shape_from(
    el: &RawElement,
    cx: &mut BuildContext<'_>,
    shape: ShapeKind,
    accepted: &[&str],
) -> ShapeNode {
    let attrs = Attrs::new(el);
    let has_content = el
        .children
        .iter()
        .any(|child| !matches!(child, RawNode::Whitespace(_)));
    if has_content {
        cx.warn(&el.tag, "children", "shapes cannot have children; content ignored");
    }
    let accepts = |name: &str| accepted.contains(&name);
    ShapeNode {
        props: attrs.props(cx),
        shape,
        fill: accepts("fill").then(|| attrs.string(cx, "fill")).flatten(),
        stroke: accepts("stroke").then(|| attrs.string(cx, "stroke")).flatten(),
        stroke_width: accepts("strokeWidth")
            .then(|| attrs.number(cx, "strokeWidth"))
            .flatten(),
        corner_radius: accepts("cornerRadius")
            .then(|| attrs.number(cx, "cornerRadius"))
            .flatten(),
    }
}

fn build_frame(el: &RawElement, cx: &mut BuildContext<'_>) -> Result<Node, SlideError> {
    Ok(container_from(el, cx)?.into())
}

fn build_text(el: &RawElement, cx: &mut BuildContext<'_>) -> Result<Node, SlideError> {
    Ok(text_from(el, cx)?.into())
}

fn build_rect(el: &RawElement, cx: &mut BuildContext<'_>) -> Result<Node, SlideError> {
    Ok(shape_from(el, cx, ShapeKind::Rectangle, RECT_ATTRIBUTES).into())
}

fn build_ellipse(el: &RawElement, cx: &mut BuildContext<'_>) -> Result<Node, SlideError> {
    Ok(shape_from(el, cx, ShapeKind::Ellipse, ELLIPSE_ATTRIBUTES).into())
}

fn build_path(el: &RawElement, cx: &mut BuildContext<'_>) -> Result<Node, SlideError> {
    let data = required_string(el, cx, "d");
    Ok(shape_from(el, cx, ShapeKind::Path { data }, PATH_ATTRIBUTES).into())
}

fn build_image(el: &RawElement, cx: &mut BuildContext<'_>) -> Result<Node, SlideError> {
    let src = required_string(el, cx, "src");
    let fit = Attrs::new(el).keyword(cx, "fit");
    Ok(shape_from(el, cx, ShapeKind::Image { src, fit }, IMAGE_ATTRIBUTES).into())
}

fn build_group(el: &RawElement, cx: &mut BuildContext<'_>) -> Result<Node, SlideError> {
    let props = Attrs::new(el).props(cx);
    Ok(GroupNode {
        props,
        children: cx.build_children(el)?,
    }
    .into())
}

fn required_string(el: &RawElement, cx: &mut BuildContext<'_>, name: &str) -> String {
    let value = Attrs::new(el).string(cx, name);
    value.unwrap_or_else(|| {
        cx.warn(&el.tag, name, "missing required attribute");
        String::new()
    })
}
