// Regression tests for the slidekit binary.
// Requires: assert_cmd, predicates crates in [dev-dependencies]

use std::fs;
use std::path::PathBuf;

use assert_cmd::Command;
use predicates::{prelude::PredicateBooleanExt, str::contains};

const DECK: &str = r#"<Slide id="s">
  <Title id="t">Hello</Title>
  <Rect id="r" fill="red" />
</Slide>
"#;

/// Writes `content` to a fresh file under a per-test scratch directory.
fn fixture(test: &str, name: &str, content: &str) -> PathBuf {
    let dir = PathBuf::from(env!("CARGO_TARGET_TMPDIR")).join("cli").join(test);
    fs::create_dir_all(&dir).unwrap();
    let path = dir.join(name);
    fs::write(&path, content).unwrap();
    path
}

fn slidekit() -> Command {
    let mut cmd = Command::cargo_bin("slidekit").unwrap();
    cmd.env_remove("RUST_LOG");
    cmd
}

// ---
// parse / format / validate
// ---

#[test]
fn parse_prints_an_outline() {
    let file = fixture("parse_outline", "deck.slide", DECK);
    slidekit()
        .arg("parse")
        .arg(&file)
        .assert()
        .success()
        .stdout(contains("Frame #s\n  Text #t \"Hello\"\n  Rect #r\n"));
}

#[test]
fn parse_json_emits_the_typed_tree() {
    let file = fixture("parse_json", "deck.slide", DECK);
    let output = slidekit()
        .args(["parse", "--json"])
        .arg(&file)
        .output()
        .unwrap();
    assert!(output.status.success());
    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(json["kind"], "container");
    assert_eq!(json["children"][0]["fontSize"], 64.0);
}

#[test]
fn parse_reports_warnings_on_stderr() {
    let file = fixture("parse_warnings", "deck.slide", r#"<Rect glow="yes" />"#);
    slidekit()
        .arg("parse")
        .arg(&file)
        .assert()
        .success()
        .stderr(contains("warning").and(contains("<Rect> glow")));
}

#[test]
fn parse_errors_are_rendered_with_miette() {
    let file = fixture("parse_error", "bad.slide", "<Frame>\n</Text>");
    slidekit()
        .arg("parse")
        .arg(&file)
        .assert()
        .failure()
        .stderr(
            contains("slidekit::syntax::mismatched_closing_tag")
                .or(contains("help:"))
                .and(contains("</Frame>")),
        );
}

#[test]
fn format_prints_canonical_markup() {
    let file = fixture("format", "deck.slide", "<Row><Text>  hi  </Text></Row>");
    slidekit()
        .arg("format")
        .arg(&file)
        .assert()
        .success()
        .stdout("<Frame layout=\"horizontal\" gap={24}>\n  <Text>hi</Text>\n</Frame>\n");
}

#[test]
fn format_check_accepts_canonical_files() {
    let file = fixture("format_check_ok", "rect.slide", "<Rect id=\"a\" fill=\"red\" />\n");
    slidekit()
        .args(["format", "--check"])
        .arg(&file)
        .assert()
        .success()
        .stdout(contains("ok"));
}

#[test]
fn format_check_rejects_and_diffs_other_files() {
    let file = fixture("format_check_diff", "rect.slide", "<Rect fill=\"red\"   id=\"a\"/>");
    slidekit()
        .args(["format", "--check"])
        .arg(&file)
        .assert()
        .failure()
        .stdout(contains("<Rect id=\"a\" fill=\"red\" />"))
        .stderr(contains("is not formatted"));
}

#[test]
fn validate_walks_slide_files_in_a_directory() {
    fixture("validate_dir", "a_good.slide", DECK);
    fixture("validate_dir", "b_bad.slide", "<Frame><Widget /></Frame>");
    let ignored = fixture("validate_dir", "notes.txt", "<<< not markup");
    let dir = ignored.parent().unwrap().to_path_buf();
    slidekit()
        .arg("validate")
        .arg(&dir)
        .assert()
        .failure()
        .stdout(contains("a_good.slide").and(contains("notes.txt").not()))
        .stderr(contains("unknown element <Widget>").and(contains("1 file(s) failed validation")));
}

#[test]
fn validate_accepts_a_single_file() {
    let file = fixture("validate_file", "deck.slide", DECK);
    slidekit()
        .arg("validate")
        .arg(&file)
        .assert()
        .success()
        .stdout(contains("ok"));
}

#[test]
fn config_file_limits_apply() {
    let file = fixture("config", "deck.slide", DECK);
    let config = fixture("config", "limits.yaml", "maxDepth: 1\n");
    slidekit()
        .arg("--config")
        .arg(&config)
        .arg("validate")
        .arg(&file)
        .assert()
        .failure()
        .stderr(contains("nesting depth"));
}

#[test]
fn missing_files_are_reported() {
    slidekit()
        .args(["parse", "definitely/not/here.slide"])
        .assert()
        .failure()
        .stderr(contains("failed to read"));
}

// ---
// ids / find / update / replace / delete
// ---

#[test]
fn ids_lists_every_id_in_pre_order() {
    let file = fixture("ids", "deck.slide", DECK);
    slidekit()
        .arg("ids")
        .arg(&file)
        .assert()
        .success()
        .stdout("s\nt\nr\n");
}

#[test]
fn find_prints_the_subtree() {
    let file = fixture("find", "deck.slide", DECK);
    slidekit()
        .args(["find"])
        .arg(&file)
        .arg("r")
        .assert()
        .success()
        .stdout("<Rect id=\"r\" fill=\"red\" />\n");
}

#[test]
fn update_applies_a_json_patch() {
    let file = fixture("update", "deck.slide", DECK);
    slidekit()
        .arg("update")
        .arg(&file)
        .arg("t")
        .args(["--patch", r#"{"kind":"text","content":"Bye","color":null}"#])
        .assert()
        .success()
        .stdout(contains(r#"<Text id="t" fontSize={64} fontWeight={700}>Bye</Text>"#));
}

#[test]
fn update_rejects_malformed_patches() {
    let file = fixture("update_bad", "deck.slide", DECK);
    slidekit()
        .arg("update")
        .arg(&file)
        .arg("t")
        .args(["--patch", r#"{"kind":"sparkle"}"#])
        .assert()
        .failure()
        .stderr(contains("invalid patch"));
}

#[test]
fn update_of_the_wrong_kind_fails() {
    let file = fixture("update_kind", "deck.slide", DECK);
    slidekit()
        .arg("update")
        .arg(&file)
        .arg("r")
        .args(["--patch", r#"{"kind":"text","content":"x"}"#])
        .assert()
        .failure()
        .stderr(contains("is a shape node"));
}

#[test]
fn replace_swaps_in_parsed_markup() {
    let file = fixture("replace", "deck.slide", DECK);
    slidekit()
        .arg("replace")
        .arg(&file)
        .arg("r")
        .args(["--with", r#"<Ellipse id="e" />"#])
        .assert()
        .success()
        .stdout(contains(r#"<Ellipse id="e" />"#).and(contains("<Rect").not()));
}

#[test]
fn delete_removes_a_node() {
    let file = fixture("delete", "deck.slide", DECK);
    slidekit()
        .arg("delete")
        .arg(&file)
        .arg("t")
        .assert()
        .success()
        .stdout(contains("<Rect id=\"r\"").and(contains("Hello").not()));
}

#[test]
fn deleting_the_root_is_refused() {
    let file = fixture("delete_root", "deck.slide", DECK);
    slidekit()
        .arg("delete")
        .arg(&file)
        .arg("s")
        .assert()
        .failure()
        .stderr(contains("'s' is the root node and cannot be deleted"));
}

#[test]
fn unknown_ids_list_the_available_ones() {
    let file = fixture("delete_missing", "deck.slide", DECK);
    slidekit()
        .arg("delete")
        .arg(&file)
        .arg("ghost")
        .assert()
        .failure()
        .stderr(contains("no node with id 'ghost'; available ids: s, t, r"));
}
