//! Typed attribute access for element constructors.
//!
//! Each getter resolves one attribute to the type the node field needs. A
//! value of the wrong kind is reported as a warning and treated as absent,
//! so authoring mistakes never fail a parse.

use crate::ast::style::weight_from_name;
use crate::ast::{AttrValue, Keyword, NodeProps, Padding, Size, TextStyle};
use crate::syntax::RawElement;

use super::BuildContext;

pub struct Attrs<'e> {
    el: &'e RawElement,
}

impl<'e> Attrs<'e> {
    pub fn new(el: &'e RawElement) -> Self {
        Self { el }
    }

    pub fn get(&self, name: &str) -> Option<&'e AttrValue> {
        self.el.attribute(name)
    }

    pub fn has(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    /// String attributes accept numbers and booleans in their plain form,
    /// so `color={0}` still reads as `"0"`.
    pub fn string(&self, cx: &mut BuildContext<'_>, name: &str) -> Option<String> {
        match self.get(name)? {
            AttrValue::Array(_) => {
                self.mistyped(cx, name, "a string", "array");
                None
            }
            value => Some(value.to_plain_string()),
        }
    }

    pub fn number(&self, cx: &mut BuildContext<'_>, name: &str) -> Option<f64> {
        let value = self.get(name)?;
        let number = value.as_number();
        if number.is_none() {
            self.mistyped(cx, name, "a number", value.kind_name());
        }
        number
    }

    pub fn boolean(&self, cx: &mut BuildContext<'_>, name: &str) -> Option<bool> {
        let value = self.get(name)?;
        let flag = value.as_bool();
        if flag.is_none() {
            self.mistyped(cx, name, "a boolean", value.kind_name());
        }
        flag
    }

    /// `{400}`, `"400"`, `"fill"` or `"hug"`.
    pub fn size(&self, cx: &mut BuildContext<'_>, name: &str) -> Option<Size> {
        let value = self.get(name)?;
        if let Some(n) = value.as_number() {
            return Some(Size::Fixed(n));
        }
        let size = value.as_str().and_then(Size::parse_keyword);
        if size.is_none() {
            self.mistyped(cx, name, "a number, \"fill\" or \"hug\"", value.kind_name());
        }
        size
    }

    pub fn keyword<K: Keyword>(&self, cx: &mut BuildContext<'_>, name: &str) -> Option<K> {
        let value = self.get(name)?;
        let keyword = value.as_str().and_then(K::parse_keyword);
        if keyword.is_none() {
            let tag = self.el.tag.clone();
            cx.warn(
                &tag,
                name,
                format!("expected one of {}, found {}", K::NAMES.join(", "), value),
            );
        }
        keyword
    }

    /// Numeric weights or the usual names (`bold`, `normal`, ...).
    pub fn font_weight(&self, cx: &mut BuildContext<'_>, name: &str) -> Option<u16> {
        let value = self.get(name)?;
        let weight = match value.as_number() {
            Some(n) if (1.0..=1000.0).contains(&n) => Some(n.round() as u16),
            Some(_) => None,
            None => value.as_str().and_then(weight_from_name),
        };
        if weight.is_none() {
            let tag = self.el.tag.clone();
            cx.warn(&tag, name, format!("expected a font weight, found {value}"));
        }
        weight
    }

    /// The `padding` shorthand (one, two, three or four numbers) overlaid
    /// with any per-side attributes.
    pub fn padding(&self, cx: &mut BuildContext<'_>) -> Padding {
        let mut padding = Padding::default();
        if let Some(value) = self.get("padding") {
            match shorthand_sides(value) {
                Some(sides) => padding = sides,
                None => {
                    let tag = self.el.tag.clone();
                    cx.warn(
                        &tag,
                        "padding",
                        format!("expected one to four numbers, found {value}"),
                    );
                }
            }
        }
        let sides = [
            ("paddingTop", &mut padding.top),
            ("paddingRight", &mut padding.right),
            ("paddingBottom", &mut padding.bottom),
            ("paddingLeft", &mut padding.left),
        ];
        for (name, side) in sides {
            if let Some(n) = self.number(cx, name) {
                *side = Some(n);
            }
        }
        padding
    }

    /// Properties shared by every node.
    pub fn props(&self, cx: &mut BuildContext<'_>) -> NodeProps {
        NodeProps {
            id: self.string(cx, "id"),
            name: self.string(cx, "name"),
            visible: self.boolean(cx, "visible"),
            opacity: self.number(cx, "opacity"),
            x: self.number(cx, "x"),
            y: self.number(cx, "y"),
            width: self.size(cx, "width"),
            height: self.size(cx, "height"),
            rotation: self.number(cx, "rotation"),
        }
    }

    /// Style overrides of an inline `Span`.
    pub fn text_style(&self, cx: &mut BuildContext<'_>) -> TextStyle {
        TextStyle {
            font_family: self.string(cx, "fontFamily"),
            font_size: self.number(cx, "fontSize"),
            font_weight: self.font_weight(cx, "fontWeight"),
            font_style: self.keyword(cx, "fontStyle"),
            color: self.string(cx, "color"),
            decoration: self.keyword(cx, "textDecoration"),
            letter_spacing: self.number(cx, "letterSpacing"),
        }
    }

    fn mistyped(&self, cx: &mut BuildContext<'_>, name: &str, expected: &str, found: &str) {
        let tag = self.el.tag.clone();
        cx.warn(&tag, name, format!("expected {expected}, found {found}"));
    }
}

fn shorthand_sides(value: &AttrValue) -> Option<Padding> {
    let numbers: Vec<f64> = match value {
        AttrValue::Number(n) => vec![*n],
        AttrValue::Array(items) => items.iter().map(AttrValue::as_number).collect::<Option<_>>()?,
        AttrValue::Str(s) => s
            .split(|c: char| c.is_whitespace() || c == ',')
            .filter(|part| !part.is_empty())
            .map(|part| AttrValue::Str(part.to_string()).as_number())
            .collect::<Option<_>>()?,
        AttrValue::Bool(_) => return None,
    };
    let (top, right, bottom, left) = match numbers[..] {
        [all] => (all, all, all, all),
        [vertical, horizontal] => (vertical, horizontal, vertical, horizontal),
        [top, horizontal, bottom] => (top, horizontal, bottom, horizontal),
        [top, right, bottom, left] => (top, right, bottom, left),
        _ => return None,
    };
    Some(Padding {
        top: Some(top),
        right: Some(right),
        bottom: Some(bottom),
        left: Some(left),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn padding_shorthand_follows_css_order() {
        let two = shorthand_sides(&AttrValue::Str("8 16".into())).unwrap();
        assert_eq!((two.top, two.right, two.bottom, two.left), (Some(8.0), Some(16.0), Some(8.0), Some(16.0)));

        let three = shorthand_sides(&AttrValue::Array(vec![1.0.into(), 2.0.into(), 3.0.into()])).unwrap();
        assert_eq!(three.left, Some(2.0));
        assert_eq!(three.bottom, Some(3.0));

        assert!(shorthand_sides(&AttrValue::Str("wide".into())).is_none());
        assert!(shorthand_sides(&AttrValue::Str("1 2 3 4 5".into())).is_none());
    }
}
