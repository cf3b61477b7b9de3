//! cli
//!
//! Command-line interface layer for commitviz.
//!
//! # Responsibilities
//!
//! - Parse command-line arguments
//! - Merge flags over the layered configuration
//! - Hand a fully resolved [`RunOptions`] to the engine and report the result
//!
//! # Architecture
//!
//! The CLI layer is thin. It never reads repository internals itself; the
//! only repository knowledge it needs is where the git directory is, so
//! that a per-repository config file can be found.

pub mod args;

pub use args::Cli;

use anyhow::{bail, Context as _, Result};

use crate::core::config::schema::IMAGE_FORMATS;
use crate::core::config::Config;
use crate::core::paths::RepoPaths;
use crate::engine::{self, RunOptions};
use crate::telemetry;
use crate::ui::output::{self, Verbosity};

/// Run the CLI application.
///
/// This is the main entry point called from `main.rs`.
pub fn run() -> Result<()> {
    let cli = Cli::parse_args();

    let ctx = engine::Context {
        debug: cli.debug,
        quiet: cli.quiet,
        json: cli.json,
    };
    telemetry::init(telemetry::level_from_flags(ctx.quiet, ctx.debug), ctx.json);

    let paths = RepoPaths::discover(&cli.repo);
    let config = Config::load(Some(paths.git_dir())).context("failed to load configuration")?;
    if let Some(path) = config.global_config_loaded_from() {
        tracing::debug!(path = %path.display(), "loaded global config");
    }
    if let Some(path) = config.repo_config_loaded_from() {
        tracing::debug!(path = %path.display(), "loaded repo config");
    }

    let options = resolve_options(&cli, &config)?;
    execute(&options, &ctx)
}

/// Merge CLI flags over configuration values.
pub fn resolve_options(cli: &Cli, config: &Config) -> Result<RunOptions> {
    let format = cli.format.clone().unwrap_or_else(|| config.format());
    if !IMAGE_FORMATS.contains(&format.as_str()) {
        bail!(
            "invalid format '{}', must be one of: {}",
            format,
            IMAGE_FORMATS.join(", ")
        );
    }

    Ok(RunOptions {
        repo: cli.repo.clone(),
        output: cli.output.clone(),
        target: if cli.all_commits { None } else { cli.file.clone() },
        decoder: cli.decoder.unwrap_or_else(|| config.decoder()),
        edges: cli.edges.unwrap_or_else(|| config.edges()),
        lister: cli.lister.unwrap_or_else(|| config.lister()),
        git: cli.git.clone().unwrap_or_else(|| config.git()),
        plantuml: if cli.no_render {
            None
        } else {
            cli.plantuml.clone()
        },
        java: cli.java.clone().unwrap_or_else(|| config.java()),
        format,
    })
}

/// Run the pipeline and report what happened.
fn execute(options: &RunOptions, ctx: &engine::Context) -> Result<()> {
    let verbosity = Verbosity::from_flags(ctx.quiet, ctx.debug);
    let report = engine::run(options)
        .with_context(|| format!("failed to graph {}", options.repo.display()))?;
    output::report(&report, verbosity, ctx.json)
}
