use slidekit::config::ParseOptions;
use slidekit::validate::validate_with;
use slidekit::{validate, validate_many, Validation};

#[test]
fn valid_markup_returns_the_tree_and_warnings() {
    let outcome = validate(r#"<Slide id="s"><Title glow="yes">Hi</Title></Slide>"#);
    assert!(outcome.is_valid());
    assert_eq!(outcome.root().and_then(|root| root.id()), Some("s"));
    assert_eq!(outcome.warnings().len(), 1);
    assert_eq!(outcome.warnings()[0].attribute, "glow");
    assert_eq!(outcome.error(), None);
}

#[test]
fn failures_are_values_not_errors() {
    let outcome = validate("<Frame><Widget /></Frame>");
    assert!(!outcome.is_valid());
    assert!(outcome.root().is_none());
    assert!(outcome.warnings().is_empty());
    let message = outcome.error().unwrap();
    assert!(message.starts_with("unknown element <Widget>"), "{message}");
}

#[test]
fn failures_carry_position_and_context() {
    let Validation::Invalid {
        line,
        column,
        context,
        ..
    } = validate("<Frame>\n  <Rect fill=red />\n</Frame>")
    else {
        panic!("expected an invalid outcome");
    };
    assert_eq!(line, Some(2));
    assert_eq!(column, Some(14));
    let context = context.unwrap();
    assert!(context.contains("fill=red"), "{context}");
    assert!(context.ends_with('^'));
}

#[test]
fn hostile_input_never_panics() {
    let inputs = [
        String::new(),
        "<".to_string(),
        "</>".to_string(),
        "<Frame".to_string(),
        "<Frame a=".to_string(),
        "<Frame a={".to_string(),
        "<!--".to_string(),
        "<Text><B>".to_string(),
        "&amp;".to_string(),
        "<Text>\u{1F600}</Txt>".to_string(),
        "<Frame>".repeat(5_000),
        format!("<Rect name={} />", "{".repeat(5_000)),
    ];
    for input in &inputs {
        let outcome = validate(input);
        assert!(!outcome.is_valid(), "{input:?} should be invalid");
    }
}

#[test]
fn limits_apply_to_validation() {
    let options = ParseOptions {
        max_depth: 1,
        ..ParseOptions::default()
    };
    assert!(validate_with("<Rect />", &options).is_valid());
    let outcome = validate_with("<Frame><Rect /></Frame>", &options);
    assert!(outcome.error().is_some_and(|m| m.contains("nesting depth")));
}

#[test]
fn batches_validate_as_one_unit() {
    let outcome = validate_many(r#"<Rect id="a" /><Ellipse id="b" />"#);
    assert_eq!(outcome.root().map(Vec::len), Some(2));

    let outcome = validate_many(r#"<Rect id="a" /><Bogus />"#);
    assert!(!outcome.is_valid());
}

#[test]
fn outcomes_serialize_for_tool_layers() {
    let valid = serde_json::to_value(validate(r#"<Text id="t" color={1}>x</Text>"#)).unwrap();
    assert_eq!(valid["status"], "valid");
    assert_eq!(valid["root"]["kind"], "text");
    assert_eq!(valid["root"]["content"], "x");
    assert_eq!(valid["root"]["props"]["id"], "t");
    assert_eq!(valid["warnings"].as_array().map(Vec::len), Some(0));

    let invalid = serde_json::to_value(validate("<Frame></Text>")).unwrap();
    assert_eq!(invalid["status"], "invalid");
    assert_eq!(invalid["line"], 1);
    assert_eq!(invalid["column"], 8);
    assert!(invalid["message"]
        .as_str()
        .is_some_and(|m| m.contains("</Frame>") && m.contains("</Text>")));
}
