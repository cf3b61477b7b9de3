//! engine::filter
//!
//! Restrict an ancestry graph to commits that touched one path.
//!
//! A commit is kept iff the [`PathLister`] reports the target path among
//! the paths it changed. Edges are then rewritten by the chosen
//! [`EdgePolicy`]. With the default [`EdgePolicy::Prune`], a kept commit
//! whose parent was dropped loses that edge outright: in `A -> B -> C` with
//! only `A` and `C` touching the file, `A` and `C` both survive but are no
//! longer connected.
//!
//! A lister failure for one commit is logged and the commit is treated as
//! not touching the path; the rest of the graph is still filtered.

use std::collections::HashSet;

use serde::Serialize;
use tracing::{debug, warn};

use crate::core::graph::{CommitGraph, EdgePolicy};
use crate::core::types::Oid;
use crate::git::lister::PathLister;

/// A commit whose touched paths could not be listed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ListingFailure {
    pub oid: Oid,
    pub reason: String,
}

/// Result of filtering.
#[derive(Debug, Clone, Default)]
pub struct FilterOutcome {
    /// Commits that touched the target, in original order.
    pub graph: CommitGraph,
    /// Commits dropped because the lister failed on them.
    pub failures: Vec<ListingFailure>,
}

/// Normalize a user-supplied path to the form listers report.
///
/// Listers report `/`-separated paths relative to the repository root, so
/// a leading `./` is dropped and Windows separators are converted.
pub fn normalize_target(target: &str) -> String {
    let unified = target.replace('\\', "/");
    let mut trimmed = unified.as_str();
    while let Some(rest) = trimmed.strip_prefix("./") {
        trimmed = rest;
    }
    trimmed.to_string()
}

/// Keep only the commits of `graph` that touched `target`.
pub fn filter_by_path(
    graph: &CommitGraph,
    target: &str,
    lister: &dyn PathLister,
    policy: EdgePolicy,
) -> FilterOutcome {
    let target = normalize_target(target);
    let mut kept: HashSet<Oid> = HashSet::new();
    let mut failures = Vec::new();

    for record in graph {
        match lister.touched_paths(&record.oid) {
            Ok(paths) => {
                if paths.iter().any(|p| *p == target) {
                    debug!(commit = %record.oid, path = %target, "commit touches target");
                    kept.insert(record.oid.clone());
                }
            }
            Err(e) => {
                warn!(commit = %record.oid, error = %e, "could not list touched paths");
                failures.push(ListingFailure {
                    oid: record.oid.clone(),
                    reason: e.to_string(),
                });
            }
        }
    }

    FilterOutcome {
        graph: graph.restrict(&kept, policy),
        failures,
    }
}
