//! Sugar elements.
//!
//! Each sugar tag expands into primitive nodes. Its defaults are part of the
//! grammar: an attribute the author omits takes the value documented here,
//! and an attribute the author writes always wins. Common attributes (and so
//! an explicit `id`) land on the expansion root; nodes created only by the
//! expansion get no id.

use im::Vector;
use log::debug;
use std::sync::Arc;

use crate::ast::value::split_items;
use crate::ast::{
    Align, AttrValue, ContainerNode, LayoutMode, Node, ShapeKind, Size, TextNode,
};
use crate::errors::SlideError;
use crate::inline::{format_inline, InlineText};
use crate::syntax::{RawElement, RawNode};

use super::primitives::{
    container_from, shape_from, text_from, FRAME_ATTRIBUTES, RECT_ATTRIBUTES, TEXT_ATTRIBUTES,
};
use super::{Attrs, BuildContext, BuildFn, ElementDef, ElementKind, ElementRegistry};

/// Defaults for container-shaped sugar.
#[derive(Debug, Clone, Copy)]
pub struct FrameDefaults {
    pub width: Option<Size>,
    pub height: Option<Size>,
    pub layout: Option<LayoutMode>,
    pub padding: Option<f64>,
    pub gap: Option<f64>,
    pub fill: Option<&'static str>,
    pub corner_radius: Option<f64>,
    pub clip: Option<bool>,
}

impl FrameDefaults {
    const NONE: FrameDefaults = FrameDefaults {
        width: None,
        height: None,
        layout: None,
        padding: None,
        gap: None,
        fill: None,
        corner_radius: None,
        clip: None,
    };

    /// Fills every field the author left unset.
    pub fn apply(&self, frame: &mut ContainerNode) {
        fill_unset(&mut frame.props.width, self.width);
        fill_unset(&mut frame.props.height, self.height);
        fill_unset(&mut frame.layout, self.layout);
        fill_unset(&mut frame.gap, self.gap);
        if let Some(padding) = self.padding {
            let p = &mut frame.padding;
            for side in [&mut p.top, &mut p.right, &mut p.bottom, &mut p.left] {
                side.get_or_insert(padding);
            }
        }
        fill_unset(&mut frame.fill, self.fill.map(str::to_string));
        fill_unset(&mut frame.corner_radius, self.corner_radius);
        fill_unset(&mut frame.clip, self.clip);
    }
}

/// Defaults for text-shaped sugar.
#[derive(Debug, Clone, Copy)]
pub struct TextDefaults {
    pub font_size: f64,
    pub font_weight: u16,
    pub color: &'static str,
    pub line_height: Option<f64>,
}

impl TextDefaults {
    pub fn apply(&self, text: &mut TextNode) {
        text.font_size.get_or_insert(self.font_size);
        text.font_weight.get_or_insert(self.font_weight);
        text.color.get_or_insert_with(|| self.color.to_string());
        fill_unset(&mut text.line_height, self.line_height);
    }
}

fn fill_unset<T>(field: &mut Option<T>, default: Option<T>) {
    if field.is_none() {
        *field = default;
    }
}

pub const SLIDE: FrameDefaults = FrameDefaults {
    width: Some(Size::Fixed(1920.0)),
    height: Some(Size::Fixed(1080.0)),
    layout: Some(LayoutMode::Vertical),
    padding: Some(80.0),
    gap: Some(40.0),
    fill: Some("#FFFFFF"),
    clip: Some(true),
    ..FrameDefaults::NONE
};

pub const ROW: FrameDefaults = FrameDefaults {
    layout: Some(LayoutMode::Horizontal),
    gap: Some(24.0),
    ..FrameDefaults::NONE
};

pub const COLUMN: FrameDefaults = FrameDefaults {
    layout: Some(LayoutMode::Vertical),
    gap: Some(24.0),
    ..FrameDefaults::NONE
};

pub const CARD: FrameDefaults = FrameDefaults {
    layout: Some(LayoutMode::Vertical),
    padding: Some(32.0),
    gap: Some(16.0),
    fill: Some("#F5F5F5"),
    corner_radius: Some(16.0),
    ..FrameDefaults::NONE
};

pub const SPACER: FrameDefaults = FrameDefaults {
    width: Some(Size::Fill),
    height: Some(Size::Fixed(40.0)),
    ..FrameDefaults::NONE
};

pub const TITLE: TextDefaults = TextDefaults {
    font_size: 64.0,
    font_weight: 700,
    color: "#111111",
    line_height: None,
};

pub const SUBTITLE: TextDefaults = TextDefaults {
    font_size: 36.0,
    font_weight: 400,
    color: "#555555",
    line_height: None,
};

pub const PARAGRAPH: TextDefaults = TextDefaults {
    font_size: 24.0,
    font_weight: 400,
    color: "#333333",
    line_height: Some(1.5),
};

pub const DIVIDER_HEIGHT: f64 = 2.0;
pub const DIVIDER_FILL: &str = "#E0E0E0";

pub const BULLETS_GAP: f64 = 16.0;
pub const BULLET_ROW_GAP: f64 = 12.0;
pub const BULLETS_FONT_SIZE: f64 = 24.0;
pub const BULLETS_COLOR: &str = "#333333";
pub const BULLET_MARKER: &str = "\u{2022}";

pub const BULLETS_ATTRIBUTES: &[&str] = &[
    "items",
    "ordered",
    "bullet",
    "markerColor",
    "gap",
    "fontFamily",
    "fontSize",
    "fontWeight",
    "color",
    "lineHeight",
];

/// Child tags that hold one bullet item.
pub const ITEM_TAGS: &[&str] = &["Item", "Li", "Text"];

pub fn register_sugar(registry: &mut ElementRegistry) {
    let defs: [(&'static str, &'static [&'static str], BuildFn); 10] = [
        ("Slide", FRAME_ATTRIBUTES, build_slide),
        ("Title", TEXT_ATTRIBUTES, build_title),
        ("Subtitle", TEXT_ATTRIBUTES, build_subtitle),
        ("Paragraph", TEXT_ATTRIBUTES, build_paragraph),
        ("Bullets", BULLETS_ATTRIBUTES, build_bullets),
        ("Row", FRAME_ATTRIBUTES, build_row),
        ("Column", FRAME_ATTRIBUTES, build_column),
        ("Card", FRAME_ATTRIBUTES, build_card),
        ("Divider", RECT_ATTRIBUTES, build_divider),
        ("Spacer", FRAME_ATTRIBUTES, build_spacer),
    ];
    for (name, attributes, build) in defs {
        registry.register(ElementDef {
            name,
            kind: ElementKind::Sugar,
            attributes,
            build,
        });
    }
}

fn expand_frame(
    el: &RawElement,
    cx: &mut BuildContext<'_>,
    defaults: &FrameDefaults,
) -> Result<Node, SlideError> {
    let mut frame = container_from(el, cx)?;
    defaults.apply(&mut frame);
    Ok(frame.into())
}

fn expand_text(
    el: &RawElement,
    cx: &mut BuildContext<'_>,
    defaults: &TextDefaults,
) -> Result<Node, SlideError> {
    let mut text = text_from(el, cx)?;
    defaults.apply(&mut text);
    Ok(text.into())
}

fn build_slide(el: &RawElement, cx: &mut BuildContext<'_>) -> Result<Node, SlideError> {
    expand_frame(el, cx, &SLIDE)
}

fn build_row(el: &RawElement, cx: &mut BuildContext<'_>) -> Result<Node, SlideError> {
    expand_frame(el, cx, &ROW)
}

fn build_column(el: &RawElement, cx: &mut BuildContext<'_>) -> Result<Node, SlideError> {
    expand_frame(el, cx, &COLUMN)
}

fn build_card(el: &RawElement, cx: &mut BuildContext<'_>) -> Result<Node, SlideError> {
    expand_frame(el, cx, &CARD)
}

fn build_spacer(el: &RawElement, cx: &mut BuildContext<'_>) -> Result<Node, SlideError> {
    expand_frame(el, cx, &SPACER)
}

fn build_title(el: &RawElement, cx: &mut BuildContext<'_>) -> Result<Node, SlideError> {
    expand_text(el, cx, &TITLE)
}

fn build_subtitle(el: &RawElement, cx: &mut BuildContext<'_>) -> Result<Node, SlideError> {
    expand_text(el, cx, &SUBTITLE)
}

fn build_paragraph(el: &RawElement, cx: &mut BuildContext<'_>) -> Result<Node, SlideError> {
    expand_text(el, cx, &PARAGRAPH)
}

fn build_divider(el: &RawElement, cx: &mut BuildContext<'_>) -> Result<Node, SlideError> {
    let mut rule = shape_from(el, cx, ShapeKind::Rectangle, RECT_ATTRIBUTES);
    rule.props.width.get_or_insert(Size::Fill);
    rule.props.height.get_or_insert(Size::Fixed(DIVIDER_HEIGHT));
    rule.fill.get_or_insert_with(|| DIVIDER_FILL.to_string());
    Ok(rule.into())
}

/// Typography shared by every row of a bullet list.
struct BulletStyle {
    font_family: Option<String>,
    font_size: f64,
    font_weight: Option<u16>,
    color: String,
    marker_color: String,
    line_height: Option<f64>,
}

impl BulletStyle {
    fn text(&self, content: String, color: &str) -> TextNode {
        TextNode {
            content,
            font_family: self.font_family.clone(),
            font_size: Some(self.font_size),
            font_weight: self.font_weight,
            color: Some(color.to_string()),
            line_height: self.line_height,
            ..TextNode::default()
        }
    }
}

/// `Bullets` becomes a vertical frame of horizontal rows, each a marker text
/// followed by the item text.
fn build_bullets(el: &RawElement, cx: &mut BuildContext<'_>) -> Result<Node, SlideError> {
    let attrs = Attrs::new(el);
    let props = attrs.props(cx);
    let ordered = attrs.boolean(cx, "ordered").unwrap_or(false);
    // Markers are text content, which is always stored trimmed.
    let bullet = attrs
        .string(cx, "bullet")
        .map_or_else(|| BULLET_MARKER.to_string(), |marker| marker.trim().to_string());
    let gap = attrs.number(cx, "gap").unwrap_or(BULLETS_GAP);
    let color = attrs
        .string(cx, "color")
        .unwrap_or_else(|| BULLETS_COLOR.to_string());
    let style = BulletStyle {
        font_family: attrs.string(cx, "fontFamily"),
        font_size: attrs.number(cx, "fontSize").unwrap_or(BULLETS_FONT_SIZE),
        font_weight: attrs.font_weight(cx, "fontWeight"),
        marker_color: attrs.string(cx, "markerColor").unwrap_or_else(|| color.clone()),
        color,
        line_height: attrs.number(cx, "lineHeight"),
    };

    let items = bullet_items(el, &attrs, cx)?;
    debug!(target: "slidekit::elements", "expanding <{}> into {} rows", el.tag, items.len());

    let rows: Vector<Arc<Node>> = items
        .into_iter()
        .enumerate()
        .map(|(i, item)| {
            let marker = if ordered {
                format!("{}.", i + 1)
            } else {
                bullet.clone()
            };
            let marker = style.text(marker, &style.marker_color);
            let mut body = style.text(item.content, &style.color);
            body.segments = item.segments;
            body.props.width = Some(Size::Fill);
            let row = ContainerNode {
                layout: Some(LayoutMode::Horizontal),
                gap: Some(BULLET_ROW_GAP),
                cross_align: Some(Align::Start),
                children: Vector::from(vec![Arc::new(Node::from(marker)), Arc::new(Node::from(body))]),
                ..ContainerNode::default()
            };
            Arc::new(Node::from(row))
        })
        .collect();

    Ok(ContainerNode {
        props,
        layout: Some(LayoutMode::Vertical),
        gap: Some(gap),
        children: rows,
        ..ContainerNode::default()
    }
    .into())
}

/// Items from child elements or loose text lines; the `items` attribute only
/// when there are none.
fn bullet_items(
    el: &RawElement,
    attrs: &Attrs<'_>,
    cx: &mut BuildContext<'_>,
) -> Result<Vec<InlineText>, SlideError> {
    let mut literal = Vec::new();
    for child in &el.children {
        match child {
            RawNode::Element(item) if ITEM_TAGS.iter().any(|tag| item.is(tag)) => {
                cx.check_attributes(item, "Item", |_| false);
                let text = format_inline(&item.children, cx)?;
                if !text.content.is_empty() {
                    literal.push(text);
                }
            }
            RawNode::Element(other) => {
                let valid = ITEM_TAGS.iter().map(|tag| tag.to_string()).collect();
                return Err(cx.unknown_element(other, valid));
            }
            RawNode::Text(text, _) => literal.extend(
                text.lines()
                    .map(str::trim)
                    .filter(|line| !line.is_empty())
                    .map(InlineText::plain),
            ),
            RawNode::Whitespace(_) => {}
        }
    }
    if !literal.is_empty() {
        if attrs.has("items") {
            debug!(target: "slidekit::elements", "<{}> has child items; ignoring the items attribute", el.tag);
        }
        return Ok(literal);
    }

    let items = match attrs.get("items") {
        None => Vec::new(),
        Some(AttrValue::Array(values)) => values.iter().map(AttrValue::to_plain_string).collect(),
        Some(AttrValue::Str(text)) => split_items(text),
        Some(other) => vec![other.to_plain_string()],
    };
    Ok(items
        .iter()
        .map(|item| item.trim())
        .filter(|item| !item.is_empty())
        .map(InlineText::plain)
        .collect())
}
