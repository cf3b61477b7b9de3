//! commitviz - draw a repository's commit ancestry with PlantUML
//!
//! commitviz reads branch heads and commit objects straight from a
//! repository's loose object store, builds the ancestry graph reachable
//! from every branch, optionally keeps only the commits that touched one
//! file, and writes a PlantUML description beside the image it asks
//! PlantUML to render.
//!
//! # Architecture
//!
//! - [`cli`] - Command-line interface layer (parses args, merges config, delegates to engine)
//! - [`engine`] - Builds, filters and hands the graph to the renderer
//! - [`core`] - Domain types, the ordered commit graph, paths and configuration
//! - [`git`] - Single interface to repository internals
//! - [`render`] - PlantUML serialization and renderer invocation
//! - [`ui`] - User-facing output
//! - [`telemetry`] - Tracing subscriber setup
//!
//! # Correctness Invariants
//!
//! 1. Every commit reachable from a branch head appears exactly once
//! 2. Output order is first-discovery order, so output is reproducible
//! 3. Every edge joins two commits that are both in the output
//! 4. Malformed or cyclic history never hangs the traversal

pub mod cli;
pub mod core;
pub mod engine;
pub mod git;
pub mod render;
pub mod telemetry;
pub mod ui;
