//! Command-line interface definitions for namedupe.
//!
//! This module defines all CLI arguments, subcommands, and options using the clap derive API.
//! Global options (verbosity, color, config file) apply to every subcommand.
//!
//! # Example
//!
//! ```bash
//! # List every folder under a directory with recursive sizes
//! namedupe list ~/Documents
//!
//! # Same-named files anywhere under a directory
//! namedupe find ~/Documents --files --mode full
//!
//! # Folders that appear under two drives with similar contents
//! namedupe compare /mnt/disk1 /mnt/disk2 --output json
//!
//! # Verbose mode for debugging
//! namedupe -v find ~/Documents
//! ```

use clap::{Args, Parser, Subcommand, ValueEnum};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::duplicates::SearchMode;
use crate::scanner::EntryKind;

/// Find folders and files that share a name.
///
/// namedupe walks one or more directory trees and groups entries with the
/// same (case-insensitive) name. In perfect mode, members of a group must
/// also agree on size and file count within 10%.
#[derive(Debug, Parser)]
#[command(name = "namedupe")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Increase verbosity level (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Disable colored output
    #[arg(long, global = true, env = "NO_COLOR")]
    pub no_color: bool,

    /// Path to a TOML configuration file
    ///
    /// If not specified, the platform-specific default location is used
    /// when it exists.
    #[arg(long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Print errors as JSON on stderr
    #[arg(long, global = true)]
    pub json_errors: bool,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands for namedupe.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// List every folder (or file) beneath a directory
    List(ListArgs),
    /// Find same-named folders (or files) beneath a directory
    Find(FindArgs),
    /// Find same-named folders (or files) across several directories
    Compare(CompareArgs),
    /// Print the effective configuration as TOML
    Config,
}

/// Walk options shared by every scanning subcommand.
#[derive(Debug, Args)]
pub struct WalkArgs {
    /// Operate on regular files instead of folders
    #[arg(long)]
    pub files: bool,

    /// Deepest level to report (direct children are level 0)
    #[arg(long, value_name = "N")]
    pub max_depth: Option<usize>,

    /// Skip hidden files and directories (starting with .)
    #[arg(long)]
    pub skip_hidden: bool,

    /// Glob patterns to ignore (can be specified multiple times)
    ///
    /// Patterns use gitignore syntax and are added to those from the
    /// configuration file.
    #[arg(short, long = "ignore", value_name = "PATTERN")]
    pub ignore_patterns: Vec<String>,

    /// Output format
    #[arg(short, long, value_enum)]
    pub output: Option<OutputFormat>,
}

impl WalkArgs {
    /// Which kind of entry to enumerate.
    #[must_use]
    pub fn kind(&self) -> EntryKind {
        if self.files {
            EntryKind::Files
        } else {
            EntryKind::Folders
        }
    }
}

/// Arguments for the list subcommand.
#[derive(Debug, Args)]
pub struct ListArgs {
    /// Directory to list
    #[arg(value_name = "PATH")]
    pub path: PathBuf,

    #[command(flatten)]
    pub walk: WalkArgs,
}

/// Arguments for the find subcommand.
#[derive(Debug, Args)]
pub struct FindArgs {
    /// Directory to search for duplicates
    #[arg(value_name = "PATH")]
    pub path: PathBuf,

    /// Matching strictness (default: perfect)
    #[arg(short, long, value_enum)]
    pub mode: Option<ModeArg>,

    #[command(flatten)]
    pub walk: WalkArgs,
}

/// Arguments for the compare subcommand.
#[derive(Debug, Args)]
pub struct CompareArgs {
    /// Directories to compare (at least two)
    #[arg(value_name = "PATH", required = true, num_args = 1..)]
    pub paths: Vec<PathBuf>,

    /// Matching strictness (default: perfect)
    #[arg(short, long, value_enum)]
    pub mode: Option<ModeArg>,

    #[command(flatten)]
    pub walk: WalkArgs,
}

/// Output format for scan results.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Human-readable listing
    #[default]
    Text,
    /// JSON output for scripting
    Json,
    /// CSV output for spreadsheets
    Csv,
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OutputFormat::Text => write!(f, "text"),
            OutputFormat::Json => write!(f, "json"),
            OutputFormat::Csv => write!(f, "csv"),
        }
    }
}

/// Matching strictness on the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ModeArg {
    /// Same name is enough
    Full,
    /// Same name plus size and file count within 10%
    Perfect,
}

impl From<ModeArg> for SearchMode {
    fn from(mode: ModeArg) -> Self {
        match mode {
            ModeArg::Full => SearchMode::Full,
            ModeArg::Perfect => SearchMode::Perfect,
        }
    }
}
