//! engine
//!
//! Orchestrates a run: Refs -> Build -> [Filter] -> Serialize -> Render.
//!
//! # Architecture
//!
//! The engine owns the pipeline but none of the I/O primitives. It pulls
//! branches and commits through [`crate::git`], reshapes the graph with
//! [`builder`] and [`filter`], and hands text to [`crate::render`].
//!
//! ```text
//! list_branches -> build_graph -> filter_by_path -> serialize -> write_artifact -> render
//! ```
//!
//! # Invariants
//!
//! - Every reachable commit appears in the graph exactly once
//! - A missing or corrupt object drops only that commit and its ancestry
//! - An empty result is an error and writes nothing
//!
//! # Example
//!
//! ```no_run
//! use commitviz::engine::runner::{run, RunOptions};
//!
//! let options = RunOptions::new("path/to/repo", "history.png");
//! let report = run(&options)?;
//! println!("{} commits written to {}", report.nodes, report.artifact.display());
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod builder;
pub mod filter;
pub mod runner;

pub use builder::{build_graph, BuildOutcome, GraphBuilder, Unresolved, VisitedSet};
pub use filter::{filter_by_path, FilterOutcome, ListingFailure};
pub use runner::{run, run_with, RunOptions, RunReport};

use crate::git::{ListerError, ObjectError, RefError};
use crate::render::RenderError;

/// Execution context for a run.
///
/// Contains global settings derived from CLI flags that affect output.
#[derive(Debug, Clone, Default)]
pub struct Context {
    /// Debug logging enabled.
    pub debug: bool,
    /// Quiet mode (errors only).
    pub quiet: bool,
    /// Print a machine-readable summary instead of prose.
    pub json: bool,
}

/// Errors from engine operations.
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    /// Branch refs could not be enumerated.
    #[error(transparent)]
    Refs(#[from] RefError),

    /// The object store failed outside of a single missing object.
    #[error(transparent)]
    Object(#[from] ObjectError),

    /// The path lister could not be created.
    #[error(transparent)]
    Lister(#[from] ListerError),

    /// Writing the description or launching the renderer failed.
    #[error(transparent)]
    Render(#[from] RenderError),

    /// Nothing to draw.
    #[error("{}", empty_result_message(.target))]
    EmptyResult {
        /// The path filter in effect, if any.
        target: Option<String>,
    },

    /// A target path was given without a way to list touched paths.
    #[error("a target path requires a path lister")]
    MissingLister,
}

fn empty_result_message(target: &Option<String>) -> String {
    match target {
        Some(path) => format!("no commits touch '{}'", path),
        None => "no commits reachable from any branch".to_string(),
    }
}
