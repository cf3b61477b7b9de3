//! engine::runner
//!
//! The end-to-end pipeline:
//!
//! ```text
//! refs/heads -> build graph -> [filter by path] -> serialize -> write .uml -> [render]
//! ```
//!
//! Every step but the renderer is in-process. A repository without
//! `refs/heads`, or a run that ends with no commits, fails before anything
//! is written.

use std::path::{Path, PathBuf};

use serde::Serialize;
use tracing::{info, warn};

use super::builder::{build_graph, Unresolved};
use super::filter::{filter_by_path, ListingFailure};
use super::EngineError;
use crate::core::graph::EdgePolicy;
use crate::core::paths::RepoPaths;
use crate::git::commit::{CommitReader, MessageStrategy};
use crate::git::lister::{create_lister, ListerKind, PathLister};
use crate::git::objects::ObjectStore;
use crate::git::refs::list_branches;
use crate::render::invoker::{artifact_path, write_artifact, PlantUmlRenderer, Renderer};
use crate::render::plantuml::serialize;

/// Everything a run needs, already resolved from config and flags.
#[derive(Debug, Clone)]
pub struct RunOptions {
    /// Working tree or metadata directory to read.
    pub repo: PathBuf,
    /// Final image path; the `.uml` description is written beside it.
    pub output: PathBuf,
    /// Keep only commits touching this path. `None` keeps every commit.
    pub target: Option<String>,
    /// Message extraction strategy.
    pub decoder: MessageStrategy,
    /// Edge rewriting for the path filter.
    pub edges: EdgePolicy,
    /// Path lister backend.
    pub lister: ListerKind,
    /// Git binary for the CLI lister.
    pub git: String,
    /// PlantUML jar. `None` skips rendering.
    pub plantuml: Option<PathBuf>,
    /// Launcher for the jar.
    pub java: String,
    /// Image format.
    pub format: String,
}

impl RunOptions {
    /// Options with defaults for everything but the repository and output.
    pub fn new(repo: impl Into<PathBuf>, output: impl Into<PathBuf>) -> Self {
        Self {
            repo: repo.into(),
            output: output.into(),
            target: None,
            decoder: MessageStrategy::default(),
            edges: EdgePolicy::default(),
            lister: ListerKind::default(),
            git: "git".to_string(),
            plantuml: None,
            java: "java".to_string(),
            format: "png".to_string(),
        }
    }
}

/// What a run did, suitable for display or `--json`.
#[derive(Debug, Clone, Serialize)]
pub struct RunReport {
    /// Branches walked.
    pub branches: usize,
    /// Commits reached from all branches.
    pub commits: usize,
    /// Commits in the written graph (after filtering).
    pub nodes: usize,
    /// Edges in the written graph.
    pub edges: usize,
    /// Target path, if filtering was applied.
    pub target: Option<String>,
    /// Objects that could not be loaded.
    pub unresolved: Vec<Unresolved>,
    /// Commits the path lister failed on.
    pub listing_failures: Vec<ListingFailure>,
    /// Where the description was written.
    pub artifact: PathBuf,
    /// Where the renderer should have put the image, if it ran.
    pub image: Option<PathBuf>,
    /// Renderer exit code, if it ran and exited normally.
    pub render_exit_code: Option<i32>,
    /// Whether the renderer reported success.
    pub rendered: bool,
}

/// Run the pipeline with collaborators built from `options`.
pub fn run(options: &RunOptions) -> Result<RunReport, EngineError> {
    let lister = match &options.target {
        Some(_) => Some(create_lister(options.lister, &options.repo, &options.git)?),
        None => None,
    };
    let renderer = options
        .plantuml
        .as_ref()
        .map(|jar| PlantUmlRenderer::new(options.java.clone(), jar.clone(), options.format.clone()));

    run_with(
        options,
        lister.as_deref(),
        renderer.as_ref().map(|r| r as &dyn Renderer),
    )
}

/// Run the pipeline with explicit collaborators.
///
/// `lister` is required when `options.target` is set. `renderer` may be
/// `None` to stop after writing the description.
pub fn run_with(
    options: &RunOptions,
    lister: Option<&dyn PathLister>,
    renderer: Option<&dyn Renderer>,
) -> Result<RunReport, EngineError> {
    let paths = RepoPaths::discover(&options.repo);
    info!(git_dir = %paths.git_dir().display(), "reading repository");

    let branches = list_branches(&paths)?;
    let reader = CommitReader::new(ObjectStore::new(paths.objects_dir()), options.decoder);
    let outcome = build_graph(&reader, &branches)?;
    info!(
        branches = branches.len(),
        commits = outcome.graph.len(),
        unresolved = outcome.unresolved.len(),
        "built ancestry graph"
    );

    if outcome.graph.is_empty() {
        return Err(EngineError::EmptyResult { target: None });
    }
    if let Some(oid) = outcome.graph.find_cycle() {
        warn!(commit = %oid, "parent links form a cycle; history is malformed");
    }

    let commits = outcome.graph.len();
    let (graph, listing_failures) = match (&options.target, lister) {
        (Some(target), Some(lister)) => {
            let filtered = filter_by_path(&outcome.graph, target, lister, options.edges);
            info!(target = %target, kept = filtered.graph.len(), "filtered by path");
            if filtered.graph.is_empty() {
                return Err(EngineError::EmptyResult {
                    target: Some(target.clone()),
                });
            }
            (filtered.graph, filtered.failures)
        }
        (Some(_), None) => return Err(EngineError::MissingLister),
        (None, _) => (outcome.graph, Vec::new()),
    };

    let text = serialize(&graph);
    let artifact = artifact_path(&options.output);
    write_artifact(&artifact, &text)?;

    let mut report = RunReport {
        branches: branches.len(),
        commits,
        nodes: graph.len(),
        edges: graph.edges().count(),
        target: options.target.clone(),
        unresolved: outcome.unresolved,
        listing_failures,
        artifact: artifact.clone(),
        image: None,
        render_exit_code: None,
        rendered: false,
    };

    if let Some(renderer) = renderer {
        let out_dir = output_dir(&options.output);
        let status = renderer.render(&artifact, &out_dir)?;
        // PlantUML names the image after the source, with the format as extension.
        let image = artifact.with_extension(&options.format);
        report.image = Some(out_dir.join(image.file_name().unwrap_or_default()));
        report.render_exit_code = status.code();
        report.rendered = status.success();
    }

    Ok(report)
}

/// Directory the renderer should write into: the image's parent, or `.`.
///
/// Made absolute because PlantUML resolves a relative `-o` against the
/// source file's directory, not the working directory.
fn output_dir(image: &Path) -> PathBuf {
    let dir = match image.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    };
    std::path::absolute(&dir).unwrap_or(dir)
}
