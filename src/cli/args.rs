//! Defines the command-line arguments and subcommands for the slidekit CLI.
//!
//! This module uses the `clap` crate with its "derive" feature to create a
//! declarative and type-safe argument parsing structure.

use clap::{ArgAction, Parser, Subcommand};
use std::path::PathBuf;

/// The main CLI argument structure.
#[derive(Debug, Parser)]
#[command(
    name = "slidekit",
    version,
    about = "Parse, edit and format slide markup."
)]
pub struct SlidekitArgs {
    /// Parse limits as a JSON or YAML file.
    #[arg(long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// More log output: -v for debug, -vv for trace.
    #[arg(short, long, global = true, action = ArgAction::Count)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

/// An enumeration of all available CLI subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Print the typed tree and any attribute warnings.
    Parse {
        file: PathBuf,
        /// Print the tree as JSON instead of an outline.
        #[arg(long)]
        json: bool,
        /// The file holds several top-level elements.
        #[arg(long)]
        many: bool,
    },
    /// Print the canonical serialization of a file.
    Format {
        file: PathBuf,
        /// Exit with an error and show a diff if the file is not canonical.
        #[arg(long)]
        check: bool,
        /// The file holds several top-level elements.
        #[arg(long)]
        many: bool,
    },
    /// Validate a file, or every `.slide` file under a directory.
    Validate { path: PathBuf },
    /// List every id in pre-order.
    Ids { file: PathBuf },
    /// Print the subtree with the given id.
    Find { file: PathBuf, id: String },
    /// Apply a JSON patch to the node with the given id.
    Update {
        file: PathBuf,
        id: String,
        /// Patch as JSON, e.g. '{"kind":"text","content":"Hi"}'.
        #[arg(long)]
        patch: String,
    },
    /// Replace the node with the given id by a markup fragment.
    Replace {
        file: PathBuf,
        id: String,
        /// Replacement markup.
        #[arg(long = "with", value_name = "MARKUP")]
        replacement: String,
    },
    /// Delete the node with the given id.
    Delete { file: PathBuf, id: String },
}
