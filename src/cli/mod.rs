//! The slidekit Command-Line Interface.
//!
//! This module is the main entry point for all CLI commands and orchestrates
//! the core library functions.

use clap::Parser;
use log::{debug, LevelFilter};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::{fs, process};
use thiserror::Error;
use walkdir::WalkDir;

use crate::ast::Node;
use crate::cli::args::{Command, SlidekitArgs};
use crate::config::{ConfigError, ParseOptions};
use crate::engine::{parse_many_source, parse_source, parse_with};
use crate::errors::{print_error, SlideError, SourceContext};
use crate::serialize::{serialize, serialize_many};
use crate::tree::{self, DeleteOutcome, MutationError, NodePatch};

pub mod args;
pub mod output;

/// Extension of slide markup files picked up by `validate <dir>`.
pub const SLIDE_EXTENSION: &str = "slide";

#[derive(Debug, Error)]
pub enum CliError {
    #[error("failed to read '{}': {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Parse(#[from] SlideError),
    #[error("invalid patch: {0}")]
    Patch(#[source] serde_json::Error),
    #[error("failed to render JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error(transparent)]
    Mutation(#[from] MutationError),
    #[error("no node with id '{id}'; available ids: {}", available_ids(.available))]
    NotFound { id: String, available: Vec<String> },
    #[error("'{0}' is the root node and cannot be deleted")]
    RootNotDeletable(String),
    #[error("{0} file(s) failed validation")]
    Invalid(usize),
    #[error("'{}' is not formatted", .0.display())]
    NotFormatted(PathBuf),
}

fn available_ids(ids: &[String]) -> String {
    if ids.is_empty() {
        "(none)".to_string()
    } else {
        ids.join(", ")
    }
}

/// The main entry point for the CLI.
pub fn run() {
    let args = SlidekitArgs::parse();
    init_logging(args.verbose);

    if let Err(error) = dispatch(&args) {
        match error {
            CliError::Parse(error) => print_error(error),
            other => output::print_failure(&other.to_string()),
        }
        process::exit(1);
    }
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    };
    let mut builder = env_logger::Builder::new();
    builder.filter_level(level).parse_default_env();
    let _ = builder.try_init();
}

fn dispatch(args: &SlidekitArgs) -> Result<(), CliError> {
    let options = match &args.config {
        Some(path) => ParseOptions::from_path(path)?,
        None => ParseOptions::default(),
    };
    debug!(target: "slidekit::cli", "parse options: {options:?}");

    match &args.command {
        Command::Parse { file, json, many } => handle_parse(file, &options, *json, *many),
        Command::Format { file, check, many } => handle_format(file, &options, *check, *many),
        Command::Validate { path } => handle_validate(path, &options),
        Command::Ids { file } => {
            let root = load_tree(file, &options)?;
            for id in tree::collect_ids(&root) {
                println!("{id}");
            }
            Ok(())
        }
        Command::Find { file, id } => {
            let root = load_tree(file, &options)?;
            let found = tree::find_with_parent(&root, id).ok_or_else(|| not_found(&root, id))?;
            if let (Some(parent), Some(index)) = (found.parent, found.index) {
                debug!(target: "slidekit::cli", "'{id}' is child {index} of <{}>", parent.tag_name());
            }
            println!("{}", serialize(found.node));
            Ok(())
        }
        Command::Update { file, id, patch } => {
            let root = load_tree(file, &options)?;
            let patch: NodePatch = serde_json::from_str(patch).map_err(CliError::Patch)?;
            require_id(&root, id)?;
            let updated = tree::update_by_id(&root, id, &patch)?;
            if Arc::ptr_eq(&root, &updated) {
                debug!(target: "slidekit::cli", "patch left '{id}' unchanged");
            }
            println!("{}", serialize(&updated));
            Ok(())
        }
        Command::Replace {
            file,
            id,
            replacement,
        } => {
            let root = load_tree(file, &options)?;
            require_id(&root, id)?;
            let replacement = parse_with(replacement, &options, None)?;
            println!("{}", serialize(&tree::replace_by_id(&root, id, replacement)));
            Ok(())
        }
        Command::Delete { file, id } => {
            let root = load_tree(file, &options)?;
            match tree::delete_by_id(&root, id) {
                DeleteOutcome::Deleted(root) => {
                    println!("{}", serialize(&root));
                    Ok(())
                }
                DeleteOutcome::NotFound => Err(not_found(&root, id)),
                DeleteOutcome::RootNotDeletable => Err(CliError::RootNotDeletable(id.clone())),
            }
        }
    }
}

fn handle_parse(
    file: &Path,
    options: &ParseOptions,
    json: bool,
    many: bool,
) -> Result<(), CliError> {
    let source = read_source(file)?;
    let mut warnings = Vec::new();
    let roots = if many {
        parse_many_source(&source, options, Some(&mut warnings))?
    } else {
        vec![parse_source(&source, options, Some(&mut warnings))?]
    };
    output::print_warnings(&warnings);

    if json {
        let text = match roots.as_slice() {
            [root] if !many => serde_json::to_string_pretty(root)?,
            _ => serde_json::to_string_pretty(&roots)?,
        };
        println!("{text}");
    } else {
        for root in &roots {
            print!("{}", output::outline(root));
        }
    }
    Ok(())
}

fn handle_format(
    file: &Path,
    options: &ParseOptions,
    check: bool,
    many: bool,
) -> Result<(), CliError> {
    let source = read_source(file)?;
    let formatted = if many {
        serialize_many(&parse_many_source(&source, options, None)?)
    } else {
        let root = parse_source(&source, options, None)?;
        serialize(&root)
    };

    if !check {
        println!("{formatted}");
        return Ok(());
    }
    let original = source.content.trim_end();
    if original == formatted {
        output::print_ok(&file.display().to_string(), "");
        Ok(())
    } else {
        output::print_format_diff(original, &formatted);
        Err(CliError::NotFormatted(file.to_path_buf()))
    }
}

fn handle_validate(path: &Path, options: &ParseOptions) -> Result<(), CliError> {
    let files: Vec<PathBuf> = if path.is_dir() {
        WalkDir::new(path)
            .sort_by_file_name()
            .into_iter()
            .filter_map(Result::ok)
            .filter(|entry| entry.file_type().is_file())
            .map(|entry| entry.into_path())
            .filter(|p| p.extension().is_some_and(|ext| ext == SLIDE_EXTENSION))
            .collect()
    } else {
        vec![path.to_path_buf()]
    };

    let mut failures = 0;
    for file in &files {
        let source = read_source(file)?;
        let mut warnings = Vec::new();
        match parse_source(&source, options, Some(&mut warnings)) {
            Ok(_) => {
                let detail = match warnings.len() {
                    0 => String::new(),
                    n => format!(" ({n} warnings)"),
                };
                output::print_ok(&file.display().to_string(), &detail);
                output::print_warnings(&warnings);
            }
            Err(error) => {
                failures += 1;
                print_error(error);
            }
        }
    }
    if failures > 0 {
        return Err(CliError::Invalid(failures));
    }
    Ok(())
}

fn read_source(path: &Path) -> Result<SourceContext, CliError> {
    let content = fs::read_to_string(path).map_err(|source| CliError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(SourceContext::from_file(path.display().to_string(), content))
}

fn load_tree(path: &Path, options: &ParseOptions) -> Result<Arc<Node>, CliError> {
    let source = read_source(path)?;
    Ok(parse_source(&source, options, None)?)
}

fn require_id(root: &Arc<Node>, id: &str) -> Result<(), CliError> {
    match tree::find_by_id(root, id) {
        Some(_) => Ok(()),
        None => Err(not_found(root, id)),
    }
}

fn not_found(root: &Arc<Node>, id: &str) -> CliError {
    CliError::NotFound {
        id: id.to_string(),
        available: tree::collect_ids(root),
    }
}
