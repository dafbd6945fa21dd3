//! Attribute values.
//!
//! Every attribute is resolved once, at scan time, into an [`AttrValue`].
//! Consumers match on the variant instead of re-sniffing strings.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::syntax::escape::escape;

static NUMBER_LITERAL: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[+-]?(?:\d+(?:\.\d*)?|\.\d+)(?:[eE][+-]?\d+)?$").expect("valid number regex")
});

/// A literal attribute value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AttrValue {
    Bool(bool),
    Number(f64),
    Str(String),
    Array(Vec<AttrValue>),
}

impl AttrValue {
    /// Interprets the raw text between the outer braces of `name={...}`.
    pub fn from_expression(raw: &str) -> Self {
        let text = raw.trim();
        if let Some(inner) = strip_quotes(text) {
            return AttrValue::Str(inner.to_string());
        }
        match text {
            "true" => return AttrValue::Bool(true),
            "false" => return AttrValue::Bool(false),
            _ => {}
        }
        if let Some(n) = parse_number(text) {
            return AttrValue::Number(n);
        }
        if text.starts_with('[') {
            if let Some(items) = parse_array(text) {
                return AttrValue::Array(items);
            }
        }
        AttrValue::Str(text.to_string())
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            AttrValue::Str(s) => Some(s),
            _ => None,
        }
    }

    /// Numbers, or strings holding a numeric literal.
    pub fn as_number(&self) -> Option<f64> {
        match self {
            AttrValue::Number(n) => Some(*n),
            AttrValue::Str(s) => parse_number(s.trim()),
            _ => None,
        }
    }

    /// Booleans, or the strings `"true"` / `"false"`.
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            AttrValue::Bool(b) => Some(*b),
            AttrValue::Str(s) => match s.trim() {
                "true" => Some(true),
                "false" => Some(false),
                _ => None,
            },
            _ => None,
        }
    }

    pub fn kind_name(&self) -> &'static str {
        match self {
            AttrValue::Bool(_) => "boolean",
            AttrValue::Number(_) => "number",
            AttrValue::Str(_) => "string",
            AttrValue::Array(_) => "array",
        }
    }

    /// The attribute literal as it is written in markup: quoted and escaped
    /// for strings, brace-wrapped for everything else.
    pub fn to_literal(&self) -> String {
        match self {
            AttrValue::Str(s) => format!("\"{}\"", escape(s)),
            AttrValue::Number(n) => format!("{{{}}}", format_number(*n)),
            AttrValue::Bool(b) => format!("{{{b}}}"),
            AttrValue::Array(items) => {
                let json = serde_json::to_string(items).unwrap_or_else(|_| "[]".to_string());
                format!("{{{json}}}")
            }
        }
    }

    /// Plain text form, used when a value stands in for text content.
    pub fn to_plain_string(&self) -> String {
        match self {
            AttrValue::Str(s) => s.clone(),
            AttrValue::Number(n) => format_number(*n),
            AttrValue::Bool(b) => b.to_string(),
            AttrValue::Array(items) => items
                .iter()
                .map(AttrValue::to_plain_string)
                .collect::<Vec<_>>()
                .join(", "),
        }
    }
}

impl fmt::Display for AttrValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_literal())
    }
}

impl From<&str> for AttrValue {
    fn from(s: &str) -> Self {
        AttrValue::Str(s.to_string())
    }
}

impl From<String> for AttrValue {
    fn from(s: String) -> Self {
        AttrValue::Str(s)
    }
}

impl From<f64> for AttrValue {
    fn from(n: f64) -> Self {
        AttrValue::Number(n)
    }
}

impl From<bool> for AttrValue {
    fn from(b: bool) -> Self {
        AttrValue::Bool(b)
    }
}

/// Shortest text that parses back to the same `f64`.
pub fn format_number(n: f64) -> String {
    format!("{n}")
}

/// A finite numeric literal. Literals that overflow to infinity are not
/// numbers, since they have no literal form to serialize back to.
pub fn parse_number(text: &str) -> Option<f64> {
    if NUMBER_LITERAL.is_match(text) {
        text.parse().ok().filter(|n: &f64| n.is_finite())
    } else {
        None
    }
}

/// Splits a list written as text: a JSON array when it parses as one,
/// otherwise comma-separated items. Empty items are dropped.
pub fn split_items(text: &str) -> Vec<String> {
    let trimmed = text.trim();
    if trimmed.starts_with('[') {
        if let Ok(serde_json::Value::Array(items)) = serde_json::from_str(trimmed) {
            return items
                .into_iter()
                .map(|item| from_json(item).to_plain_string())
                .filter(|item| !item.trim().is_empty())
                .collect();
        }
    }
    let inner = trimmed
        .strip_prefix('[')
        .and_then(|t| t.strip_suffix(']'))
        .unwrap_or(trimmed);
    inner
        .split(',')
        .map(|item| {
            let item = item.trim();
            strip_quotes(item).unwrap_or(item).to_string()
        })
        .filter(|item| !item.is_empty())
        .collect()
}

fn strip_quotes(text: &str) -> Option<&str> {
    if text.len() < 2 {
        return None;
    }
    ['"', '\''].into_iter().find_map(|q| {
        text.strip_prefix(q)
            .and_then(|t| t.strip_suffix(q))
    })
}

fn parse_array(text: &str) -> Option<Vec<AttrValue>> {
    match serde_json::from_str::<serde_json::Value>(text) {
        Ok(serde_json::Value::Array(items)) => Some(items.into_iter().map(from_json).collect()),
        Ok(_) => None,
        Err(_) => {
            let inner = text.strip_prefix('[')?.strip_suffix(']')?;
            Some(
                inner
                    .split(',')
                    .map(str::trim)
                    .filter(|item| !item.is_empty())
                    .map(AttrValue::from_expression)
                    .collect(),
            )
        }
    }
}

fn from_json(value: serde_json::Value) -> AttrValue {
    match value {
        serde_json::Value::Bool(b) => AttrValue::Bool(b),
        serde_json::Value::Number(n) => AttrValue::Number(n.as_f64().unwrap_or_default()),
        serde_json::Value::String(s) => AttrValue::Str(s),
        serde_json::Value::Array(items) => AttrValue::Array(items.into_iter().map(from_json).collect()),
        serde_json::Value::Null => AttrValue::Str(String::new()),
        other @ serde_json::Value::Object(_) => AttrValue::Str(other.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn expression_literals_resolve_to_their_kind() {
        assert_eq!(AttrValue::from_expression(" 42 "), AttrValue::Number(42.0));
        assert_eq!(AttrValue::from_expression("-1.5e2"), AttrValue::Number(-150.0));
        assert_eq!(AttrValue::from_expression("false"), AttrValue::Bool(false));
        assert_eq!(AttrValue::from_expression("'hi'"), AttrValue::Str("hi".into()));
        assert_eq!(AttrValue::from_expression("inf"), AttrValue::Str("inf".into()));
    }

    #[test]
    fn overflowing_literals_are_not_numbers() {
        assert_eq!(parse_number("1e400"), None);
        assert_eq!(parse_number("-1e309"), None);
        assert_eq!(parse_number("1e308"), Some(1e308));
        assert_eq!(AttrValue::from_expression("1e400"), AttrValue::Str("1e400".into()));
        assert_eq!(AttrValue::Str("1e400".into()).as_number(), None);
    }

    #[test]
    fn arrays_parse_as_json_then_leniently() {
        assert_eq!(
            AttrValue::from_expression(r#"["a", 2, true]"#),
            AttrValue::Array(vec!["a".into(), 2.0.into(), true.into()])
        );
        assert_eq!(
            AttrValue::from_expression("[one, 'two', 3]"),
            AttrValue::Array(vec!["one".into(), "two".into(), 3.0.into()])
        );
    }

    #[test]
    fn split_items_prefers_json() {
        assert_eq!(split_items(r#"["a, b", "c"]"#), ["a, b", "c"]);
        assert_eq!(split_items("a, b ,, c"), ["a", "b", "c"]);
        assert_eq!(split_items("['x', 'y']"), ["x", "y"]);
    }

    #[test]
    fn literals_are_written_in_markup_form() {
        assert_eq!(AttrValue::Number(400.0).to_literal(), "{400}");
        assert_eq!(AttrValue::Number(0.5).to_literal(), "{0.5}");
        assert_eq!(AttrValue::Bool(true).to_literal(), "{true}");
        assert_eq!(AttrValue::Str("a\"<b>".into()).to_literal(), "\"a&quot;&lt;b&gt;\"");
    }
}
