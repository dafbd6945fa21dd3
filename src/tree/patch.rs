//! Typed node patches.
//!
//! A patch names the node kind it targets and lists field edits. Each field
//! is a [`Patch`]: keep the current value, set a new one, or clear it. From
//! JSON, a missing field keeps, `null` clears and any other value sets:
//!
//! ```json
//! { "kind": "text", "content": "Hello", "color": null }
//! ```

use serde::{Deserialize, Deserializer};
use thiserror::Error;

use crate::ast::{
    Align, ContainerNode, FontStyle, GroupNode, ImageFit, LayoutMode, Node, NodeKind, NodeProps,
    Padding, Segment, ShapeKind, ShapeNode, Size, TextAlign, TextDecoration, TextNode,
};

/// One field edit.
#[derive(Debug, Clone, PartialEq)]
pub enum Patch<T> {
    Keep,
    Set(T),
    Clear,
}

impl<T> Default for Patch<T> {
    fn default() -> Self {
        Patch::Keep
    }
}

impl<T: Clone> Patch<T> {
    pub fn is_keep(&self) -> bool {
        matches!(self, Patch::Keep)
    }

    /// Applies the edit to an optional field.
    pub fn apply_to(&self, field: &mut Option<T>) {
        match self {
            Patch::Keep => {}
            Patch::Set(value) => *field = Some(value.clone()),
            Patch::Clear => *field = None,
        }
    }
}

impl<'de, T: Deserialize<'de>> Deserialize<'de> for Patch<T> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Ok(match Option::<T>::deserialize(deserializer)? {
            Some(value) => Patch::Set(value),
            None => Patch::Clear,
        })
    }
}

#[derive(Debug, Error, Clone, PartialEq)]
pub enum MutationError {
    #[error("node '{id}' is a {found} node, but the patch targets {expected} nodes")]
    KindMismatch {
        id: String,
        expected: NodeKind,
        found: NodeKind,
    },
    #[error("field '{field}' does not apply to <{tag}> node '{id}'")]
    FieldNotApplicable {
        id: String,
        field: &'static str,
        tag: &'static str,
    },
}

/// Edits to the properties every node carries.
#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CommonPatch {
    pub id: Patch<String>,
    pub name: Patch<String>,
    pub visible: Patch<bool>,
    pub opacity: Patch<f64>,
    pub x: Patch<f64>,
    pub y: Patch<f64>,
    pub width: Patch<Size>,
    pub height: Patch<Size>,
    pub rotation: Patch<f64>,
}

impl CommonPatch {
    fn apply(&self, props: &mut NodeProps) {
        self.id.apply_to(&mut props.id);
        self.name.apply_to(&mut props.name);
        self.visible.apply_to(&mut props.visible);
        self.opacity.apply_to(&mut props.opacity);
        self.x.apply_to(&mut props.x);
        self.y.apply_to(&mut props.y);
        self.width.apply_to(&mut props.width);
        self.height.apply_to(&mut props.height);
        self.rotation.apply_to(&mut props.rotation);
    }
}

#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ContainerPatch {
    #[serde(flatten)]
    pub common: CommonPatch,
    pub layout: Patch<LayoutMode>,
    pub gap: Patch<f64>,
    /// Replaces all four sides; clearing unsets them.
    pub padding: Patch<Padding>,
    pub align: Patch<Align>,
    pub cross_align: Patch<Align>,
    pub fill: Patch<String>,
    pub stroke: Patch<String>,
    pub stroke_width: Patch<f64>,
    pub corner_radius: Patch<f64>,
    pub clip: Patch<bool>,
}

impl ContainerPatch {
    fn apply(&self, node: &mut ContainerNode) {
        self.common.apply(&mut node.props);
        self.layout.apply_to(&mut node.layout);
        self.gap.apply_to(&mut node.gap);
        match &self.padding {
            Patch::Keep => {}
            Patch::Set(padding) => node.padding = *padding,
            Patch::Clear => node.padding = Padding::default(),
        }
        self.align.apply_to(&mut node.align);
        self.cross_align.apply_to(&mut node.cross_align);
        self.fill.apply_to(&mut node.fill);
        self.stroke.apply_to(&mut node.stroke);
        self.stroke_width.apply_to(&mut node.stroke_width);
        self.corner_radius.apply_to(&mut node.corner_radius);
        self.clip.apply_to(&mut node.clip);
    }
}

#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct TextPatch {
    #[serde(flatten)]
    pub common: CommonPatch,
    /// New plain content. Drops any segments.
    pub content: Patch<String>,
    /// New segments. The content becomes their concatenation.
    pub segments: Patch<Vec<Segment>>,
    pub font_family: Patch<String>,
    pub font_size: Patch<f64>,
    pub font_weight: Patch<u16>,
    pub font_style: Patch<FontStyle>,
    pub color: Patch<String>,
    pub text_align: Patch<TextAlign>,
    pub line_height: Patch<f64>,
    pub letter_spacing: Patch<f64>,
    pub decoration: Patch<TextDecoration>,
}

impl TextPatch {
    fn apply(&self, node: &mut TextNode) {
        self.common.apply(&mut node.props);
        match &self.content {
            Patch::Keep => {}
            Patch::Set(content) => {
                node.content = content.clone();
                node.segments = None;
            }
            Patch::Clear => {
                node.content.clear();
                node.segments = None;
            }
        }
        match &self.segments {
            Patch::Keep => {}
            Patch::Set(segments) => {
                node.content = segments.iter().map(|s| s.text.as_str()).collect();
                node.segments = (!segments.is_empty()).then(|| segments.clone());
            }
            Patch::Clear => node.segments = None,
        }
        self.font_family.apply_to(&mut node.font_family);
        self.font_size.apply_to(&mut node.font_size);
        self.font_weight.apply_to(&mut node.font_weight);
        self.font_style.apply_to(&mut node.font_style);
        self.color.apply_to(&mut node.color);
        self.text_align.apply_to(&mut node.text_align);
        self.line_height.apply_to(&mut node.line_height);
        self.letter_spacing.apply_to(&mut node.letter_spacing);
        self.decoration.apply_to(&mut node.decoration);
    }
}

#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ShapePatch {
    #[serde(flatten)]
    pub common: CommonPatch,
    pub fill: Patch<String>,
    pub stroke: Patch<String>,
    pub stroke_width: Patch<f64>,
    pub corner_radius: Patch<f64>,
    /// Path data; paths only.
    pub d: Patch<String>,
    /// Image source; images only.
    pub src: Patch<String>,
    /// Image fit; images only.
    pub fit: Patch<ImageFit>,
}

impl ShapePatch {
    fn apply(&self, node: &mut ShapeNode) -> Result<(), MutationError> {
        let is_path = matches!(node.shape, ShapeKind::Path { .. });
        let is_image = matches!(node.shape, ShapeKind::Image { .. });
        let is_ellipse = matches!(node.shape, ShapeKind::Ellipse);
        let misplaced = [
            ("d", !is_path && !self.d.is_keep()),
            ("src", !is_image && !self.src.is_keep()),
            ("fit", !is_image && !self.fit.is_keep()),
            ("fill", is_image && !self.fill.is_keep()),
            (
                "cornerRadius",
                (is_path || is_ellipse) && !self.corner_radius.is_keep(),
            ),
        ];
        if let Some((field, _)) = misplaced.into_iter().find(|(_, bad)| *bad) {
            return Err(MutationError::FieldNotApplicable {
                id: node.props.id.clone().unwrap_or_default(),
                field,
                tag: node.shape.tag_name(),
            });
        }
        match &mut node.shape {
            ShapeKind::Path { data } => set_required(&self.d, data),
            ShapeKind::Image { src, fit } => {
                set_required(&self.src, src);
                self.fit.apply_to(fit);
            }
            ShapeKind::Rectangle | ShapeKind::Ellipse => {}
        }
        self.common.apply(&mut node.props);
        self.fill.apply_to(&mut node.fill);
        self.stroke.apply_to(&mut node.stroke);
        self.stroke_width.apply_to(&mut node.stroke_width);
        self.corner_radius.apply_to(&mut node.corner_radius);
        Ok(())
    }
}

// Fields that always hold a string; clearing empties them.
fn set_required(patch: &Patch<String>, field: &mut String) {
    match patch {
        Patch::Keep => {}
        Patch::Set(value) => *field = value.clone(),
        Patch::Clear => field.clear(),
    }
}

#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct GroupPatch {
    #[serde(flatten)]
    pub common: CommonPatch,
}

impl GroupPatch {
    fn apply(&self, node: &mut GroupNode) {
        self.common.apply(&mut node.props);
    }
}

/// Field edits for one node kind.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum NodePatch {
    Container(ContainerPatch),
    Text(TextPatch),
    Shape(ShapePatch),
    Group(GroupPatch),
}

impl NodePatch {
    pub fn kind(&self) -> NodeKind {
        match self {
            NodePatch::Container(_) => NodeKind::Container,
            NodePatch::Text(_) => NodeKind::Text,
            NodePatch::Shape(_) => NodeKind::Shape,
            NodePatch::Group(_) => NodeKind::Group,
        }
    }

    /// Returns a patched copy of `node`. Children are untouched.
    pub fn apply(&self, node: &Node) -> Result<Node, MutationError> {
        let mut patched = node.clone();
        match (self, &mut patched) {
            (NodePatch::Container(patch), Node::Container(n)) => patch.apply(n),
            (NodePatch::Text(patch), Node::Text(n)) => patch.apply(n),
            (NodePatch::Shape(patch), Node::Shape(n)) => patch.apply(n)?,
            (NodePatch::Group(patch), Node::Group(n)) => patch.apply(n),
            _ => {
                return Err(MutationError::KindMismatch {
                    id: node.id().unwrap_or_default().to_string(),
                    expected: self.kind(),
                    found: node.kind(),
                })
            }
        }
        Ok(patched)
    }
}

impl From<TextPatch> for NodePatch {
    fn from(patch: TextPatch) -> Self {
        NodePatch::Text(patch)
    }
}

impl From<ContainerPatch> for NodePatch {
    fn from(patch: ContainerPatch) -> Self {
        NodePatch::Container(patch)
    }
}

impl From<ShapePatch> for NodePatch {
    fn from(patch: ShapePatch) -> Self {
        NodePatch::Shape(patch)
    }
}

impl From<GroupPatch> for NodePatch {
    fn from(patch: GroupPatch) -> Self {
        NodePatch::Group(patch)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn json_distinguishes_missing_null_and_value() {
        let patch: NodePatch =
            serde_json::from_str(r#"{"kind":"text","content":"Hi","color":null}"#).unwrap();
        let NodePatch::Text(text) = patch else {
            panic!("expected a text patch");
        };
        assert_eq!(text.content, Patch::Set("Hi".to_string()));
        assert_eq!(text.color, Patch::Clear);
        assert_eq!(text.font_size, Patch::Keep);
        assert_eq!(text.common.id, Patch::Keep);
    }

    #[test]
    fn common_fields_flatten_into_kind_patches() {
        let patch: NodePatch =
            serde_json::from_str(r#"{"kind":"container","id":"main","gap":8,"width":"fill"}"#)
                .unwrap();
        let NodePatch::Container(frame) = patch else {
            panic!("expected a container patch");
        };
        assert_eq!(frame.common.id, Patch::Set("main".to_string()));
        assert_eq!(frame.common.width, Patch::Set(Size::Fill));
        assert_eq!(frame.gap, Patch::Set(8.0));
    }

    #[test]
    fn setting_content_drops_segments() {
        let node = Node::Text(TextNode {
            content: "a b".into(),
            segments: Some(vec![Segment::plain("a "), Segment::plain("b")]),
            ..TextNode::default()
        });
        let patch = NodePatch::Text(TextPatch {
            content: Patch::Set("c".into()),
            ..TextPatch::default()
        });
        let Node::Text(patched) = patch.apply(&node).unwrap() else {
            panic!("expected text");
        };
        assert_eq!(patched.content, "c");
        assert_eq!(patched.segments, None);
    }

    #[test]
    fn path_data_on_a_rectangle_is_rejected() {
        let node = Node::Shape(ShapeNode::new(ShapeKind::Rectangle));
        let patch = NodePatch::Shape(ShapePatch {
            d: Patch::Set("M0 0".into()),
            ..ShapePatch::default()
        });
        assert!(matches!(
            patch.apply(&node),
            Err(MutationError::FieldNotApplicable { field: "d", .. })
        ));
    }

    #[test]
    fn paint_fields_follow_the_shape_attribute_lists() {
        let ellipse = Node::Shape(ShapeNode::new(ShapeKind::Ellipse));
        let rounded = NodePatch::Shape(ShapePatch {
            corner_radius: Patch::Set(4.0),
            ..ShapePatch::default()
        });
        assert!(matches!(
            rounded.apply(&ellipse),
            Err(MutationError::FieldNotApplicable { field: "cornerRadius", tag: "Ellipse", .. })
        ));

        let image = Node::Shape(ShapeNode::new(ShapeKind::Image {
            src: "a.png".into(),
            fit: None,
        }));
        let filled = NodePatch::Shape(ShapePatch {
            fill: Patch::Set("red".into()),
            ..ShapePatch::default()
        });
        assert!(matches!(
            filled.apply(&image),
            Err(MutationError::FieldNotApplicable { field: "fill", .. })
        ));
    }
}
