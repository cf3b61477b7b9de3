//! engine::builder
//!
//! Reachability walk from branch heads over parent links.
//!
//! # Algorithm
//!
//! Depth-first, driven by an explicit stack rather than recursion, so the
//! length of a history never threatens the call stack. Before a commit is
//! loaded it is marked in the visited set; a commit already marked is
//! skipped. That one check gives:
//!
//! - ancestors shared by several branches are loaded once
//! - self-referencing or cyclic parent links terminate
//!
//! Parents are pushed in reverse so the first parent is explored first.
//! The resulting insertion order is the pre-order of a recursive walk that
//! visits parents left to right, which keeps output identical to earlier
//! recursive versions.
//!
//! # Failure handling
//!
//! A missing or undecodable object only ends the walk along that path: it
//! is logged, recorded in [`BuildOutcome::unresolved`], and everything else
//! carries on. Other I/O failures abort the build.

use std::collections::HashSet;

use serde::Serialize;
use tracing::{debug, warn};

use crate::core::graph::CommitGraph;
use crate::core::types::{BranchRef, Oid};
use crate::git::commit::CommitSource;
use crate::git::objects::ObjectError;

/// Record of commits already reached.
///
/// Split out so a walk can share its visited set with another walk, or use
/// a different structure, without changing the traversal.
pub trait VisitedSet {
    /// Mark `oid` as visited. Returns `true` if it was not visited before.
    fn mark(&mut self, oid: &Oid) -> bool;

    /// Whether `oid` has been visited.
    fn is_visited(&self, oid: &Oid) -> bool;
}

impl VisitedSet for HashSet<Oid> {
    fn mark(&mut self, oid: &Oid) -> bool {
        self.insert(oid.clone())
    }

    fn is_visited(&self, oid: &Oid) -> bool {
        self.contains(oid)
    }
}

/// A commit that was reachable but could not be loaded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Unresolved {
    pub oid: Oid,
    pub reason: String,
}

/// Everything a build produced.
#[derive(Debug, Clone, Default)]
pub struct BuildOutcome {
    /// Commits reached, in first-discovery order.
    pub graph: CommitGraph,
    /// Reachable ids whose objects were missing or corrupt.
    pub unresolved: Vec<Unresolved>,
}

/// Accumulates the ancestry of one or more heads.
///
/// # Example
///
/// ```no_run
/// use commitviz::engine::builder::GraphBuilder;
/// use commitviz::git::{CommitReader, MessageStrategy, ObjectStore};
/// use commitviz::core::types::Oid;
///
/// let reader = CommitReader::new(ObjectStore::new(".git/objects"), MessageStrategy::Legacy);
/// let mut builder = GraphBuilder::new(&reader);
/// builder.walk(&Oid::new("abc123def4567890abc123def4567890abc12345")?)?;
/// let outcome = builder.finish();
/// println!("{} commits", outcome.graph.len());
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
pub struct GraphBuilder<'a, S: ?Sized, V = HashSet<Oid>> {
    source: &'a S,
    visited: V,
    graph: CommitGraph,
    unresolved: Vec<Unresolved>,
}

impl<'a, S: CommitSource + ?Sized> GraphBuilder<'a, S> {
    /// Create a builder reading from `source` with a fresh visited set.
    pub fn new(source: &'a S) -> Self {
        Self::with_visited(source, HashSet::new())
    }
}

impl<'a, S: CommitSource + ?Sized, V: VisitedSet> GraphBuilder<'a, S, V> {
    /// Create a builder with a caller-supplied visited set.
    pub fn with_visited(source: &'a S, visited: V) -> Self {
        Self {
            source,
            visited,
            graph: CommitGraph::new(),
            unresolved: Vec::new(),
        }
    }

    /// Walk everything reachable from `head` that has not been seen yet.
    ///
    /// Returns the number of commits added to the graph by this walk.
    ///
    /// # Errors
    ///
    /// Returns the first non-localized [`ObjectError`] (an I/O failure other
    /// than a missing file). Commits added before the failure stay in the
    /// graph.
    pub fn walk(&mut self, head: &Oid) -> Result<usize, ObjectError> {
        let before = self.graph.len();
        let mut stack = vec![head.clone()];

        while let Some(oid) = stack.pop() {
            if !self.visited.mark(&oid) {
                continue;
            }

            match self.source.load_commit(&oid) {
                Ok(record) => {
                    debug!(commit = %oid, parents = record.parents.len(), "visited");
                    stack.extend(record.parents.iter().rev().cloned());
                    self.graph.insert(record);
                }
                Err(e) if e.is_localized() => {
                    warn!(commit = %oid, error = %e, "skipping unreadable commit and its ancestry");
                    self.unresolved.push(Unresolved {
                        oid,
                        reason: e.to_string(),
                    });
                }
                Err(e) => return Err(e),
            }
        }

        Ok(self.graph.len() - before)
    }

    /// Graph accumulated so far.
    pub fn graph(&self) -> &CommitGraph {
        &self.graph
    }

    /// Finish building and hand back the results.
    pub fn finish(self) -> BuildOutcome {
        BuildOutcome {
            graph: self.graph,
            unresolved: self.unresolved,
        }
    }

    /// Finish building and also return the visited set for reuse.
    pub fn into_parts(self) -> (BuildOutcome, V) {
        (
            BuildOutcome {
                graph: self.graph,
                unresolved: self.unresolved,
            },
            self.visited,
        )
    }
}

/// Build the combined ancestry of every branch in `branches`.
///
/// Branches are walked in the order given; commits are attributed to the
/// first branch that reaches them.
pub fn build_graph<S: CommitSource + ?Sized>(
    source: &S,
    branches: &[BranchRef],
) -> Result<BuildOutcome, ObjectError> {
    let mut builder = GraphBuilder::new(source);
    for branch in branches {
        let added = builder.walk(&branch.head)?;
        debug!(branch = %branch.name, added, "walked branch");
    }
    Ok(builder.finish())
}
