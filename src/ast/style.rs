//! Keyword-valued attributes, sizes and inline text styles.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Keyword attributes: parsed case-insensitively, written back canonically.
pub trait Keyword: Sized + Copy + 'static {
    /// Canonical spellings, in declaration order.
    const NAMES: &'static [&'static str];

    fn parse_keyword(text: &str) -> Option<Self>;
    fn as_str(&self) -> &'static str;
}

macro_rules! keyword_enum {
    ($(#[$meta:meta])* $name:ident { $($variant:ident => $text:literal),+ $(,)? }) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        pub enum $name {
            $(#[serde(rename = $text)] $variant),+
        }

        impl Keyword for $name {
            const NAMES: &'static [&'static str] = &[$($text),+];

            fn parse_keyword(text: &str) -> Option<Self> {
                let text = text.trim();
                $(if text.eq_ignore_ascii_case($text) {
                    return Some($name::$variant);
                })+
                None
            }

            fn as_str(&self) -> &'static str {
                match self {
                    $($name::$variant => $text),+
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(Keyword::as_str(self))
            }
        }
    };
}

keyword_enum! {
    /// Layout axis of a container.
    LayoutMode {
        None => "none",
        Horizontal => "horizontal",
        Vertical => "vertical",
    }
}

keyword_enum! {
    /// Main- or cross-axis alignment of container children.
    Align {
        Start => "start",
        Center => "center",
        End => "end",
        SpaceBetween => "space-between",
        Stretch => "stretch",
    }
}

keyword_enum! {
    FontStyle {
        Normal => "normal",
        Italic => "italic",
    }
}

keyword_enum! {
    TextDecoration {
        None => "none",
        Underline => "underline",
        LineThrough => "line-through",
    }
}

keyword_enum! {
    TextAlign {
        Left => "left",
        Center => "center",
        Right => "right",
        Justify => "justify",
    }
}

keyword_enum! {
    /// How an image fills its box.
    ImageFit {
        Fill => "fill",
        Fit => "fit",
        Crop => "crop",
        Tile => "tile",
    }
}

/// Size along one axis.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Size {
    Fixed(f64),
    /// Take all available space.
    Fill,
    /// Shrink to the content.
    Hug,
}

impl Size {
    pub fn parse_keyword(text: &str) -> Option<Self> {
        match text.trim().to_ascii_lowercase().as_str() {
            "fill" => Some(Size::Fill),
            "hug" | "auto" => Some(Size::Hug),
            _ => None,
        }
    }
}

/// Numeric font weights for the named weights authors commonly write.
pub fn weight_from_name(name: &str) -> Option<u16> {
    let weight = match name.trim().to_ascii_lowercase().as_str() {
        "thin" => 100,
        "light" => 300,
        "normal" | "regular" => 400,
        "medium" => 500,
        "semibold" => 600,
        "bold" => 700,
        "extrabold" => 800,
        "black" => 900,
        _ => return None,
    };
    Some(weight)
}

pub const BOLD_WEIGHT: u16 = 700;

/// Style overrides carried by one text segment. Unset fields inherit from
/// the enclosing text node.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct TextStyle {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub font_family: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub font_size: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub font_weight: Option<u16>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub font_style: Option<FontStyle>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub decoration: Option<TextDecoration>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub letter_spacing: Option<f64>,
}

impl TextStyle {
    pub fn is_empty(&self) -> bool {
        *self == TextStyle::default()
    }

    /// Composes `inner` over `self`; fields set by `inner` win.
    pub fn merged(&self, inner: &TextStyle) -> TextStyle {
        TextStyle {
            font_family: inner.font_family.clone().or_else(|| self.font_family.clone()),
            font_size: inner.font_size.or(self.font_size),
            font_weight: inner.font_weight.or(self.font_weight),
            font_style: inner.font_style.or(self.font_style),
            color: inner.color.clone().or_else(|| self.color.clone()),
            decoration: inner.decoration.or(self.decoration),
            letter_spacing: inner.letter_spacing.or(self.letter_spacing),
        }
    }
}

/// A styled run of text inside a text node.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Segment {
    pub text: String,
    #[serde(default, skip_serializing_if = "TextStyle::is_empty")]
    pub style: TextStyle,
}

impl Segment {
    pub fn new(text: impl Into<String>, style: TextStyle) -> Self {
        Self {
            text: text.into(),
            style,
        }
    }

    pub fn plain(text: impl Into<String>) -> Self {
        Self::new(text, TextStyle::default())
    }
}
