//! The typed slide tree.
//!
//! A parsed document is a rooted, ordered tree of [`Node`]s. Children are
//! held in persistent vectors of shared pointers, so an edited tree shares
//! every untouched subtree with the original and "did anything change" is an
//! [`Arc::ptr_eq`] check.

use im::Vector;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

pub mod style;
pub mod value;

pub use style::{
    Align, FontStyle, ImageFit, Keyword, LayoutMode, Segment, Size, TextAlign, TextDecoration,
    TextStyle,
};
pub use value::AttrValue;

/// Ordered children of a container or group.
pub type Children = Vector<Arc<Node>>;

/// Properties every node carries.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct NodeProps {
    /// Caller-assigned identifier. The parser does not enforce uniqueness.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub visible: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub opacity: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub x: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub y: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub width: Option<Size>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub height: Option<Size>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rotation: Option<f64>,
}

/// Padding per side.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Padding {
    pub top: Option<f64>,
    pub right: Option<f64>,
    pub bottom: Option<f64>,
    pub left: Option<f64>,
}

impl Padding {
    pub fn uniform(value: f64) -> Self {
        Self {
            top: Some(value),
            right: Some(value),
            bottom: Some(value),
            left: Some(value),
        }
    }

    /// The shared value when all four sides are set and equal.
    pub fn as_uniform(&self) -> Option<f64> {
        let top = self.top?;
        [self.right, self.bottom, self.left]
            .iter()
            .all(|side| *side == Some(top))
            .then_some(top)
    }

    pub fn is_unset(&self) -> bool {
        *self == Padding::default()
    }
}

/// Layout box.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ContainerNode {
    pub props: NodeProps,
    pub layout: Option<LayoutMode>,
    pub gap: Option<f64>,
    pub padding: Padding,
    pub align: Option<Align>,
    pub cross_align: Option<Align>,
    pub fill: Option<String>,
    pub stroke: Option<String>,
    pub stroke_width: Option<f64>,
    pub corner_radius: Option<f64>,
    pub clip: Option<bool>,
    pub children: Children,
}

/// A run of text, optionally split into styled segments.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct TextNode {
    pub props: NodeProps,
    pub content: String,
    /// `None` when the text had no inline formatting. When present, the
    /// segment texts concatenate to `content`.
    pub segments: Option<Vec<Segment>>,
    pub font_family: Option<String>,
    pub font_size: Option<f64>,
    pub font_weight: Option<u16>,
    pub font_style: Option<FontStyle>,
    pub color: Option<String>,
    pub text_align: Option<TextAlign>,
    pub line_height: Option<f64>,
    pub letter_spacing: Option<f64>,
    pub decoration: Option<TextDecoration>,
}

impl TextNode {
    pub fn plain(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            ..Self::default()
        }
    }
}

/// Geometry of a shape node.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum ShapeKind {
    Rectangle,
    Ellipse,
    Path { data: String },
    Image { src: String, fit: Option<ImageFit> },
}

impl ShapeKind {
    pub fn tag_name(&self) -> &'static str {
        match self {
            ShapeKind::Rectangle => "Rect",
            ShapeKind::Ellipse => "Ellipse",
            ShapeKind::Path { .. } => "Path",
            ShapeKind::Image { .. } => "Image",
        }
    }
}

/// Leaf drawing primitive.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShapeNode {
    #[serde(default)]
    pub props: NodeProps,
    pub shape: ShapeKind,
    #[serde(default)]
    pub fill: Option<String>,
    #[serde(default)]
    pub stroke: Option<String>,
    #[serde(default)]
    pub stroke_width: Option<f64>,
    #[serde(default)]
    pub corner_radius: Option<f64>,
}

impl ShapeNode {
    pub fn new(shape: ShapeKind) -> Self {
        Self {
            props: NodeProps::default(),
            shape,
            fill: None,
            stroke: None,
            stroke_width: None,
            corner_radius: None,
        }
    }
}

/// Non-layout grouping.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct GroupNode {
    pub props: NodeProps,
    pub children: Children,
}

/// Discriminant of [`Node`], used in diagnostics and patches.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeKind {
    Container,
    Text,
    Shape,
    Group,
}

impl std::fmt::Display for NodeKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let text = match self {
            NodeKind::Container => "container",
            NodeKind::Text => "text",
            NodeKind::Shape => "shape",
            NodeKind::Group => "group",
        };
        f.write_str(text)
    }
}

/// A node of the slide tree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum Node {
    Container(ContainerNode),
    Text(TextNode),
    Shape(ShapeNode),
    Group(GroupNode),
}

impl Node {
    pub fn kind(&self) -> NodeKind {
        match self {
            Node::Container(_) => NodeKind::Container,
            Node::Text(_) => NodeKind::Text,
            Node::Shape(_) => NodeKind::Shape,
            Node::Group(_) => NodeKind::Group,
        }
    }

    /// The primitive tag this node is written as.
    pub fn tag_name(&self) -> &'static str {
        match self {
            Node::Container(_) => "Frame",
            Node::Text(_) => "Text",
            Node::Shape(shape) => shape.shape.tag_name(),
            Node::Group(_) => "Group",
        }
    }

    pub fn props(&self) -> &NodeProps {
        match self {
            Node::Container(n) => &n.props,
            Node::Text(n) => &n.props,
            Node::Shape(n) => &n.props,
            Node::Group(n) => &n.props,
        }
    }

    pub fn props_mut(&mut self) -> &mut NodeProps {
        match self {
            Node::Container(n) => &mut n.props,
            Node::Text(n) => &mut n.props,
            Node::Shape(n) => &mut n.props,
            Node::Group(n) => &mut n.props,
        }
    }

    pub fn id(&self) -> Option<&str> {
        self.props().id.as_deref()
    }

    /// Ordered children, for the kinds that have them.
    pub fn children(&self) -> Option<&Children> {
        match self {
            Node::Container(n) => Some(&n.children),
            Node::Group(n) => Some(&n.children),
            Node::Text(_) | Node::Shape(_) => None,
        }
    }

    pub fn children_mut(&mut self) -> Option<&mut Children> {
        match self {
            Node::Container(n) => Some(&mut n.children),
            Node::Group(n) => Some(&mut n.children),
            Node::Text(_) | Node::Shape(_) => None,
        }
    }

    /// Text content of a text node.
    pub fn text(&self) -> Option<&str> {
        match self {
            Node::Text(n) => Some(&n.content),
            _ => None,
        }
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.props_mut().id = Some(id.into());
        self
    }
}

impl From<ContainerNode> for Node {
    fn from(node: ContainerNode) -> Self {
        Node::Container(node)
    }
}

impl From<TextNode> for Node {
    fn from(node: TextNode) -> Self {
        Node::Text(node)
    }
}

impl From<ShapeNode> for Node {
    fn from(node: ShapeNode) -> Self {
        Node::Shape(node)
    }
}

impl From<GroupNode> for Node {
    fn from(node: GroupNode) -> Self {
        Node::Group(node)
    }
}
