//! Handles all user-facing output for the CLI.
//!
//! This module is responsible for outlines, colorized status lines and
//! diffs. Results go to stdout; warnings and failures go to stderr.

use difference::{Changeset, Difference};
use std::fmt::Write as _;
use std::io::Write;
use termcolor::{Color, ColorChoice, ColorSpec, StandardStream, WriteColor};

use crate::ast::Node;
use crate::errors::AttributeWarning;

// ============================================================================
// CORE OUTPUT FUNCTIONS: User-facing CLI output utilities
// ============================================================================

/// Indented one-line-per-node view of a tree.
pub fn outline(node: &Node) -> String {
    let mut out = String::new();
    write_outline(&mut out, node, 0);
    out
}

/// Prints attribute warnings to stderr.
pub fn print_warnings(warnings: &[AttributeWarning]) {
    let mut stderr = StandardStream::stderr(ColorChoice::Auto);
    for warning in warnings {
        let _ = stderr.set_color(ColorSpec::new().set_fg(Some(Color::Yellow)).set_bold(true));
        let _ = write!(stderr, "warning");
        let _ = stderr.reset();
        let _ = writeln!(stderr, ": {warning}");
    }
}

/// Prints a green status line for a file that passed.
pub fn print_ok(label: &str, detail: &str) {
    let mut stdout = StandardStream::stdout(ColorChoice::Auto);
    let _ = stdout.set_color(ColorSpec::new().set_fg(Some(Color::Green)).set_bold(true));
    let _ = write!(stdout, "ok");
    let _ = stdout.reset();
    let _ = writeln!(stdout, " {label}{detail}");
}

/// Prints a red `error:` line to stderr.
pub fn print_failure(message: &str) {
    let mut stderr = StandardStream::stderr(ColorChoice::Auto);
    let _ = stderr.set_color(ColorSpec::new().set_fg(Some(Color::Red)).set_bold(true));
    let _ = write!(stderr, "error");
    let _ = stderr.reset();
    let _ = writeln!(stderr, ": {message}");
}

/// Prints a line diff from `original` to `formatted`.
pub fn print_format_diff(original: &str, formatted: &str) {
    let mut stdout = StandardStream::stdout(ColorChoice::Auto);
    let changeset = Changeset::new(original, formatted, "\n");
    print_diff(&mut stdout, &changeset.diffs);
    let _ = stdout.reset();
}

// ============================================================================
// PRIVATE HELPERS
// ============================================================================

fn write_outline(out: &mut String, node: &Node, depth: usize) {
    for _ in 0..depth {
        out.push_str("  ");
    }
    out.push_str(node.tag_name());
    if let Some(id) = node.id() {
        let _ = write!(out, " #{id}");
    }
    if let Node::Text(text) = node {
        let _ = write!(out, " {:?}", text.content);
        if let Some(segments) = &text.segments {
            let _ = write!(out, " ({} segments)", segments.len());
        }
    }
    out.push('\n');
    for child in node.children().into_iter().flatten() {
        write_outline(out, child, depth + 1);
    }
}

fn print_diff(stdout: &mut StandardStream, diffs: &[Difference]) {
    for diff in diffs {
        match diff {
            Difference::Same(ref x) => {
                let _ = stdout.reset();
                let _ = writeln!(stdout, " {}", x.replace('\n', "\n "));
            }
            Difference::Add(ref x) => {
                let _ = stdout.set_color(ColorSpec::new().set_fg(Some(Color::Green)));
                let _ = writeln!(stdout, "+{}", x.replace('\n', "\n+"));
            }
            Difference::Rem(ref x) => {
                let _ = stdout.set_color(ColorSpec::new().set_fg(Some(Color::Red)));
                let _ = writeln!(stdout, "-{}", x.replace('\n', "\n-"));
            }
        }
    }
}
