//! Slide markup scanner
//!
//! Turns source text into [`RawElement`] trees. The scanner is purely
//! syntactic: it checks tag balance and attribute shape, decodes entities and
//! resolves attribute literals, but never looks at what a tag means.
//!
//! Tokens are recognised with `winnow` parsers over `&mut &str`; the element
//! structure, depth counters and diagnostics live on [`Scanner`], which turns
//! a failed token parser into a located [`SlideError`].
//!
//! Comments (`<!-- ... -->`) are skipped wherever whitespace is skipped. An
//! unterminated comment runs to the end of input.

use log::trace;
use winnow::combinator::{alt, delimited, opt, preceded, repeat, terminated};
use winnow::error::{ContextError, ErrMode};
use winnow::prelude::*;
use winnow::token::{any, rest, take_till, take_until, take_while};

use crate::ast::AttrValue;
use crate::config::ParseOptions;
use crate::errors::{ErrorKind, ErrorReporting, PhaseContext, ResourceLimit, SlideError, SourceContext};
use crate::syntax::escape::decode_entities;
use crate::syntax::{RawAttribute, RawElement, RawNode, Span};

const COMMENT_OPEN: &str = "<!--";
const COMMENT_CLOSE: &str = "-->";

/// Longest token echoed back in a diagnostic.
const MAX_FOUND_LEN: usize = 24;

fn is_name_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '-' || c == '_'
}

fn is_attr_name_char(c: char) -> bool {
    is_name_char(c) || c == ':' || c == '.'
}

// ─── Token parsers ──────────────────────────────────────────────────────

fn tag_name<'a>(input: &mut &'a str) -> ModalResult<&'a str> {
    take_while(1.., is_name_char).parse_next(input)
}

fn attribute_name<'a>(input: &mut &'a str) -> ModalResult<&'a str> {
    take_while(1.., is_attr_name_char).parse_next(input)
}

fn whitespace<'a>(input: &mut &'a str) -> ModalResult<&'a str> {
    take_while(1.., char::is_whitespace).parse_next(input)
}

fn comment<'a>(input: &mut &'a str) -> ModalResult<&'a str> {
    preceded(
        COMMENT_OPEN,
        alt((terminated(take_until(0.., COMMENT_CLOSE), COMMENT_CLOSE), rest)),
    )
    .parse_next(input)
}

/// Any run of whitespace and comments, possibly empty.
fn trivia(input: &mut &str) -> ModalResult<()> {
    repeat(0.., alt((whitespace.void(), comment.void()))).parse_next(input)
}

fn text_run<'a>(input: &mut &'a str) -> ModalResult<&'a str> {
    take_till(1.., '<').parse_next(input)
}

fn quoted<'a>(input: &mut &'a str) -> ModalResult<&'a str> {
    delimited('"', take_till(0.., '"'), '"').parse_next(input)
}

/// Expression text up to the next brace or quote.
fn expression_chunk<'a>(input: &mut &'a str) -> ModalResult<&'a str> {
    take_till(0.., ['{', '}', '"', '\'']).parse_next(input)
}

// ─── Scanner ────────────────────────────────────────────────────────────

/// Recursive-descent scanner over one source text.
pub struct Scanner<'a> {
    input: &'a str,
    rest: &'a str,
    depth: usize,
    options: &'a ParseOptions,
    ctx: PhaseContext<'a>,
}

impl<'a> Scanner<'a> {
    pub fn new(source: &'a SourceContext, options: &'a ParseOptions) -> Self {
        Self {
            input: &source.content,
            rest: &source.content,
            depth: 0,
            options,
            ctx: PhaseContext::new(source, "syntax"),
        }
    }

    // ========================================================================
    // PUBLIC API
    // ========================================================================

    /// Parses exactly one top-level element, optionally surrounded by
    /// whitespace and comments.
    pub fn parse_document(&mut self) -> Result<RawElement, SlideError> {
        self.check_input_len()?;
        self.skip_trivia();
        if self.rest.is_empty() {
            return Err(self.ctx.unexpected_eof("an element", self.here()));
        }
        let element = self.parse_element()?;
        self.skip_trivia();
        if !self.rest.is_empty() {
            return Err(self.ctx.report(
                ErrorKind::TrailingContent {
                    found: self.found(),
                },
                self.here(),
            ));
        }
        Ok(element)
    }

    /// Parses a sequence of top-level elements concatenated back to back.
    pub fn parse_sequence(&mut self) -> Result<Vec<RawElement>, SlideError> {
        self.check_input_len()?;
        let mut elements = Vec::new();
        loop {
            self.skip_trivia();
            if self.rest.is_empty() {
                return Ok(elements);
            }
            elements.push(self.parse_element()?);
        }
    }

    // ========================================================================
    // ELEMENTS
    // ========================================================================

    fn parse_element(&mut self) -> Result<RawElement, SlideError> {
        let start = self.pos();
        if self.eat('<').is_none() {
            return Err(self.ctx.unexpected_token("'<'", self.found(), self.here()));
        }

        self.depth += 1;
        if self.depth > self.options.max_depth {
            return Err(self.ctx.resource_limit(
                ResourceLimit::NestingDepth,
                self.options.max_depth,
                Span::new(start, start + 1),
            ));
        }

        self.skip_trivia();
        let Some(tag) = self.eat(tag_name) else {
            return Err(self.ctx.report(
                ErrorKind::MissingTagName {
                    found: self.found(),
                },
                self.here(),
            ));
        };
        let tag = tag.to_string();
        trace!(target: "slidekit::syntax", "element <{tag}> at offset {start}");

        let mut attributes = Vec::new();
        let children = loop {
            self.skip_trivia();
            if self.rest.is_empty() {
                return Err(self.ctx.unexpected_eof("'>' or '/>'", self.here()));
            }
            if self.eat("/>").is_some() {
                break Vec::new();
            }
            if self.eat('/').is_some() {
                return Err(self.ctx.unexpected_token("'>' after '/'", self.found(), self.here()));
            }
            if self.eat('>').is_some() {
                break self.parse_children(&tag)?;
            }
            let attr_start = self.pos();
            match self.eat(attribute_name) {
                Some(name) => attributes.push(self.parse_attribute(name, attr_start)?),
                None => {
                    return Err(self.ctx.unexpected_token(
                        "attribute name, '>' or '/>'",
                        self.found(),
                        self.here(),
                    ));
                }
            }
        };

        self.depth -= 1;
        Ok(RawElement {
            tag,
            attributes,
            children,
            span: Span::new(start, self.pos()),
        })
    }

    fn parse_children(&mut self, tag: &str) -> Result<Vec<RawNode>, SlideError> {
        let mut children = Vec::new();
        loop {
            if self.rest.is_empty() {
                return Err(self
                    .ctx
                    .unexpected_eof(&format!("closing tag </{tag}>"), self.here()));
            }
            if self.eat(comment).is_some() {
                continue;
            }
            if self.rest.starts_with("</") {
                self.parse_closing_tag(tag)?;
                return Ok(children);
            }
            if self.rest.starts_with('<') {
                children.push(RawNode::Element(self.parse_element()?));
                continue;
            }
            children.push(self.read_text());
        }
    }

    fn parse_closing_tag(&mut self, tag: &str) -> Result<(), SlideError> {
        let start = self.pos();
        let _ = self.eat("</");
        self.skip_trivia();
        let Some(found) = self.eat(tag_name) else {
            return Err(self.ctx.report(
                ErrorKind::MissingTagName {
                    found: self.found(),
                },
                self.here(),
            ));
        };
        if found != tag {
            return Err(self.ctx.report(
                ErrorKind::MismatchedClosingTag {
                    expected: tag.to_string(),
                    found: found.to_string(),
                },
                Span::new(start, self.pos()),
            ));
        }
        self.skip_trivia();
        if self.eat('>').is_none() {
            return Err(self.ctx.unexpected_token(
                &format!("'>' to close </{tag}"),
                self.found(),
                self.here(),
            ));
        }
        Ok(())
    }

    // Text runs until the next tag; comments inside are dropped and the text
    // around them joins into one run.
    fn read_text(&mut self) -> RawNode {
        let start = self.pos();
        let mut text = String::new();
        loop {
            if self.eat(comment).is_some() {
                continue;
            }
            match self.eat(text_run) {
                Some(run) => text.push_str(run),
                None => break,
            }
        }

        let decoded = decode_entities(&text).into_owned();
        if decoded.trim().is_empty() {
            RawNode::Whitespace(decoded)
        } else {
            RawNode::Text(decoded, Span::new(start, self.pos()))
        }
    }

    // ========================================================================
    // ATTRIBUTES
    // ========================================================================

    fn parse_attribute(&mut self, name: &str, start: usize) -> Result<RawAttribute, SlideError> {
        self.skip_trivia();
        if self.eat('=').is_none() {
            return Err(self.ctx.report(
                ErrorKind::MissingEquals {
                    attribute: name.to_string(),
                    found: self.found(),
                },
                self.here(),
            ));
        }
        self.skip_trivia();

        let value = if self.rest.starts_with('"') {
            self.parse_quoted()?
        } else if self.rest.starts_with('{') {
            self.parse_braced()?
        } else {
            return Err(self.ctx.report(
                ErrorKind::MissingValue {
                    attribute: name.to_string(),
                    found: self.found(),
                },
                self.here(),
            ));
        };

        Ok(RawAttribute {
            name: name.to_string(),
            value,
            span: Span::new(start, self.pos()),
        })
    }

    fn parse_quoted(&mut self) -> Result<AttrValue, SlideError> {
        let open = self.here();
        let Some(raw) = self.eat(quoted) else {
            return Err(self.ctx.unexpected_eof("closing '\"'", open));
        };
        Ok(AttrValue::Str(decode_entities(raw).into_owned()))
    }

    // Balanced `{...}`. Braces inside quoted strings do not count.
    fn parse_braced(&mut self) -> Result<AttrValue, SlideError> {
        let open = self.here();
        let _ = self.eat('{');
        let body = self.rest;
        let mut level = 1usize;

        loop {
            let _ = self.eat(expression_chunk);
            let Some(c) = self.eat(any) else {
                return Err(self.ctx.unexpected_eof("closing '}'", open));
            };
            match c {
                '{' => {
                    level += 1;
                    if level > self.options.max_expression_depth {
                        return Err(self.ctx.resource_limit(
                            ResourceLimit::ExpressionDepth,
                            self.options.max_expression_depth,
                            self.last_char(),
                        ));
                    }
                }
                '}' => {
                    level -= 1;
                    if level == 0 {
                        let raw = &body[..body.len() - self.rest.len() - 1];
                        return Ok(AttrValue::from_expression(raw));
                    }
                }
                quote => self.skip_string_literal(quote)?,
            }
        }
    }

    // The opening quote has been consumed.
    fn skip_string_literal(&mut self, quote: char) -> Result<(), SlideError> {
        let open = self.last_char();
        loop {
            let _ = self.eat(take_till(0.., [quote, '\\']));
            match self.eat(any) {
                None => {
                    return Err(self
                        .ctx
                        .unexpected_eof(&format!("closing {quote} in expression"), open))
                }
                Some('\\') => {
                    let _ = self.eat(any);
                }
                Some(_) => return Ok(()),
            }
        }
    }

    // ========================================================================
    // LOW-LEVEL HELPERS
    // ========================================================================

    /// Runs a token parser at the current position. On failure nothing is
    /// consumed.
    fn eat<O, P>(&mut self, parser: P) -> Option<O>
    where
        P: Parser<&'a str, O, ErrMode<ContextError>>,
    {
        opt(parser).parse_next(&mut self.rest).ok().flatten()
    }

    fn skip_trivia(&mut self) {
        let _ = self.eat(trivia);
    }

    fn check_input_len(&self) -> Result<(), SlideError> {
        if self.input.len() > self.options.max_input_len {
            return Err(self.ctx.resource_limit(
                ResourceLimit::InputLength,
                self.options.max_input_len,
                Span::new(self.options.max_input_len, self.options.max_input_len),
            ));
        }
        Ok(())
    }

    fn pos(&self) -> usize {
        self.input.len() - self.rest.len()
    }

    fn here(&self) -> Span {
        let pos = self.pos();
        let width = self.rest.chars().next().map_or(0, char::len_utf8);
        Span::new(pos, pos + width)
    }

    // Span of a one-byte delimiter that was just consumed.
    fn last_char(&self) -> Span {
        let pos = self.pos();
        Span::new(pos - 1, pos)
    }

    /// Describes the token at the current position for diagnostics.
    fn found(&self) -> String {
        match self.rest.chars().next() {
            None => "end of input".to_string(),
            Some(c) if is_attr_name_char(c) => {
                let token: String = self
                    .rest
                    .chars()
                    .take_while(|c| is_attr_name_char(*c))
                    .take(MAX_FOUND_LEN)
                    .collect();
                format!("'{token}'")
            }
            Some(c) if c.is_whitespace() => "whitespace".to_string(),
            Some(c) => format!("'{c}'"),
        }
    }
}
