//! cli::args
//!
//! Command-line argument definitions using clap derive.
//!
//! # Flags
//!
//! - `--plantuml <jar>`: PlantUML jar (not needed with `--no-render`)
//! - `--repo <dir>`: repository to read
//! - `--output <image>`: image to produce; the `.uml` lands beside it
//! - `--file <path>`: keep only commits touching this path
//!   (or `--all-commits` to keep everything)
//! - `--debug`, `--quiet` / `-q`, `--json`: output control
//!
//! Everything else overrides the matching configuration key.

use clap::Parser;
use std::path::PathBuf;

use crate::core::graph::EdgePolicy;
use crate::git::commit::MessageStrategy;
use crate::git::lister::ListerKind;

/// commitviz - draw a repository's commit ancestry with PlantUML
#[derive(Parser, Debug)]
#[command(name = "commitviz")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Path to the PlantUML jar
    #[arg(long, value_name = "JAR", required_unless_present = "no_render")]
    pub plantuml: Option<PathBuf>,

    /// Repository to read (working tree or git directory)
    #[arg(long, value_name = "DIR")]
    pub repo: PathBuf,

    /// Image to produce
    #[arg(long, short, value_name = "IMAGE")]
    pub output: PathBuf,

    /// Keep only commits that touched this path
    #[arg(
        long,
        value_name = "PATH",
        required_unless_present = "all_commits",
        conflicts_with = "all_commits"
    )]
    pub file: Option<String>,

    /// Keep every reachable commit instead of filtering by path
    #[arg(long)]
    pub all_commits: bool,

    /// Write the .uml description but do not launch the renderer
    #[arg(long)]
    pub no_render: bool,

    /// Commit message extraction
    #[arg(long, value_name = "STRATEGY")]
    pub decoder: Option<MessageStrategy>,

    /// Backend for listing the paths a commit touched
    #[arg(long, value_name = "KIND")]
    pub lister: Option<ListerKind>,

    /// How to treat edges through commits dropped by the filter
    #[arg(long, value_name = "POLICY")]
    pub edges: Option<EdgePolicy>,

    /// Image format passed to the renderer
    #[arg(long, value_name = "FORMAT")]
    pub format: Option<String>,

    /// Launcher used to run the PlantUML jar
    #[arg(long, value_name = "PROGRAM")]
    pub java: Option<String>,

    /// Git binary used by the git-cli lister
    #[arg(long, value_name = "PROGRAM")]
    pub git: Option<String>,

    /// Print a JSON run summary on stdout
    #[arg(long)]
    pub json: bool,

    /// Enable debug logging
    #[arg(long)]
    pub debug: bool,

    /// Errors only
    #[arg(short, long)]
    pub quiet: bool,
}

impl Cli {
    /// Parse command-line arguments.
    pub fn parse_args() -> Self {
        Parser::parse()
    }
}
