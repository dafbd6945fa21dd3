//! Golden tests for parse diagnostics.
//!
//! These pin the message, position, snippet and miette code of each error
//! kind so error presentation stays stable across changes.

mod common;

use common::{init_logging, parse_err};
use miette::{Diagnostic, GraphicalReportHandler, GraphicalTheme};
use slidekit::config::ParseOptions;
use slidekit::errors::ResourceLimit;
use slidekit::{parse_with, ErrorCategory, ErrorKind, SlideError};

fn code_of(error: &SlideError) -> String {
    error.code().map(|code| code.to_string()).unwrap_or_default()
}

fn render(error: &SlideError) -> String {
    let mut out = String::new();
    GraphicalReportHandler::new_themed(GraphicalTheme::unicode_nocolor())
        .render_report(&mut out, error)
        .unwrap();
    out
}

fn parse_limited(source: &str, options: ParseOptions) -> SlideError {
    init_logging();
    parse_with(source, &options, None).expect_err("expected a resource limit failure")
}

// ---
// Syntax errors
// ---

#[test]
fn mismatched_closing_tag_names_both_tags() {
    let error = parse_err("<Frame></Text>");
    assert_eq!(
        error.kind,
        ErrorKind::MismatchedClosingTag {
            expected: "Frame".into(),
            found: "Text".into(),
        }
    );
    assert_eq!(
        error.message(),
        "mismatched closing tag: expected </Frame>, found </Text>"
    );
    assert_eq!(error.kind.found(), Some("Text"));
    assert_eq!(code_of(&error), "slidekit::syntax::mismatched_closing_tag");
}

#[test]
fn closing_tags_are_case_sensitive() {
    let error = parse_err("<Frame></frame>");
    assert!(matches!(error.kind, ErrorKind::MismatchedClosingTag { .. }));
}

#[test]
fn errors_carry_line_column_and_snippet() {
    let error = parse_err("<Frame>\n  <Text>hi</Txt>\n</Frame>");
    assert_eq!(error.line(), Some(2));
    assert_eq!(error.column(), Some(11));
    assert_eq!(
        error.snippet(),
        Some("<Frame>   <Text>hi</Txt> </Frame>\n                  ^")
    );
    assert_eq!(
        error.to_string(),
        "mismatched closing tag: expected </Text>, found </Txt> at line 2, column 11"
    );
}

#[test]
fn missing_equals_is_reported_at_the_next_token() {
    let error = parse_err(r#"<Rect fill "red" />"#);
    assert_eq!(
        error.kind,
        ErrorKind::MissingEquals {
            attribute: "fill".into(),
            found: "'\"'".into(),
        }
    );
    assert_eq!(error.column(), Some(12));
}

#[test]
fn bare_attribute_values_get_a_hint() {
    let error = parse_err("<Rect fill=red />");
    assert!(matches!(
        &error.kind,
        ErrorKind::MissingValue { attribute, found } if attribute == "fill" && found == "'red'"
    ));
    let help = error.help().map(|h| h.to_string()).unwrap_or_default();
    assert!(help.contains("double quotes"), "{help}");
}

#[test]
fn missing_tag_name() {
    let error = parse_err("< />");
    assert!(matches!(error.kind, ErrorKind::MissingTagName { .. }));
    assert_eq!(error.category(), ErrorCategory::Syntax);
}

#[test]
fn unclosed_elements_fail_at_end_of_input() {
    let error = parse_err("<Frame>\n  <Rect />");
    assert_eq!(
        error.kind,
        ErrorKind::UnexpectedEof {
            expected: "closing tag </Frame>".into(),
        }
    );
    assert_eq!(error.line(), Some(2));
}

#[test]
fn unterminated_strings_and_expressions_fail() {
    assert!(matches!(
        parse_err(r#"<Rect fill="red />"#).kind,
        ErrorKind::UnexpectedEof { .. }
    ));
    assert!(matches!(
        parse_err("<Rect name={{a} />").kind,
        ErrorKind::UnexpectedEof { .. }
    ));
}

#[test]
fn trailing_content_suggests_the_batch_entry_point() {
    let error = parse_err("<Rect />\ntrailing words");
    assert_eq!(
        error.kind,
        ErrorKind::TrailingContent {
            found: "'trailing'".into(),
        }
    );
    assert_eq!((error.line(), error.column()), (Some(2), Some(1)));
    assert!(error.help().is_some());
}

// ---
// Unknown elements
// ---

#[test]
fn unknown_element_lists_the_whole_vocabulary() {
    let error = parse_err("<Slide>\n  <Widget />\n</Slide>");
    assert_eq!(error.category(), ErrorCategory::UnknownElement);
    let ErrorKind::UnknownElement { tag, valid } = &error.kind else {
        panic!("unexpected error kind: {:?}", error.kind);
    };
    assert_eq!(tag, "Widget");
    for name in [
        "Frame", "Text", "Rect", "Ellipse", "Path", "Image", "Group", "Slide", "Title",
        "Subtitle", "Paragraph", "Bullets", "Row", "Column", "Card", "Divider", "Spacer",
    ] {
        assert!(valid.iter().any(|v| v == name), "{name} missing from {valid:?}");
    }
    assert_eq!(valid.len(), 17);
    assert_eq!((error.line(), error.column()), (Some(2), Some(3)));
    assert_eq!(code_of(&error), "slidekit::elements::unknown_element");
    assert!(error
        .message()
        .starts_with("unknown element <Widget>; valid elements are: Ellipse, Frame, Group, "));
}

// ---
// Resource limits
// ---

#[test]
fn deep_nesting_fails_instead_of_overflowing() {
    let depth = 10_000;
    let source = format!("{}{}", "<Frame>".repeat(depth), "</Frame>".repeat(depth));
    let error = parse_err(&source);
    assert_eq!(
        error.kind,
        ErrorKind::ResourceLimit {
            limit: ResourceLimit::NestingDepth,
            max: slidekit::config::DEFAULT_MAX_DEPTH,
        }
    );
    assert_eq!(error.category(), ErrorCategory::ResourceLimit);
}

#[test]
fn nesting_limit_is_configurable() {
    let options = ParseOptions {
        max_depth: 2,
        ..ParseOptions::default()
    };
    assert!(parse_with("<Frame><Rect /></Frame>", &options, None).is_ok());
    let error = parse_limited("<Frame><Frame><Rect /></Frame></Frame>", options);
    assert!(matches!(
        error.kind,
        ErrorKind::ResourceLimit {
            limit: ResourceLimit::NestingDepth,
            max: 2
        }
    ));
}

#[test]
fn brace_depth_is_limited() {
    let options = ParseOptions {
        max_expression_depth: 3,
        ..ParseOptions::default()
    };
    assert!(parse_with("<Rect name={{{x}}} />", &options, None).is_ok());
    let error = parse_limited("<Rect name={{{{x}}}} />", options);
    assert!(matches!(
        error.kind,
        ErrorKind::ResourceLimit {
            limit: ResourceLimit::ExpressionDepth,
            ..
        }
    ));
}

#[test]
fn input_length_is_limited() {
    let options = ParseOptions {
        max_input_len: 16,
        ..ParseOptions::default()
    };
    let error = parse_limited(r#"<Rect fill="a long colour name" />"#, options);
    assert_eq!(
        error.message(),
        "input length limit exceeded (maximum 16)"
    );
}

// ---
// Rendering
// ---

#[test]
fn miette_report_shows_code_label_and_help() {
    let error = parse_err("<Frame></Text>");
    let report = render(&error);
    assert!(report.contains("slidekit::syntax::mismatched_closing_tag"), "{report}");
    assert!(report.contains("mismatched closing tag"), "{report}");
    assert!(report.contains("close the element with </Frame>"), "{report}");
    assert!(report.contains("<input>"), "{report}");
}
