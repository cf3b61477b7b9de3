//! core::graph
//!
//! Commit ancestry graph representation and operations.
//!
//! # Architecture
//!
//! The ancestry graph is a DAG where:
//! - Nodes are commits, keyed by [`Oid`]
//! - Each node stores its parent list in commit order
//! - Rendered edges point from parent to child
//!
//! # Invariants
//!
//! - Each oid is inserted at most once; the first insertion wins
//! - Iteration follows first-discovery order, which is also output order
//! - A parent listed on a record may be absent from the graph (unresolved
//!   object, or pruned by a filter); consumers must check membership
//! - Well-formed input is acyclic, but nothing here assumes it

use std::collections::{HashMap, HashSet};

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use super::types::Oid;

/// A decoded commit: its parents and the message the decoder settled on.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CommitRecord {
    /// The commit's own id.
    pub oid: Oid,
    /// Parent ids in commit order (empty for roots, 2+ for merges).
    pub parents: Vec<Oid>,
    /// Single-line message.
    pub message: String,
}

impl CommitRecord {
    /// Create a commit record.
    pub fn new(oid: Oid, parents: Vec<Oid>, message: impl Into<String>) -> Self {
        Self {
            oid,
            parents,
            message: message.into(),
        }
    }
}

/// How edges are rewritten when a graph is restricted to a subset of commits.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EdgePolicy {
    /// Keep only parent links whose target is also kept. A kept commit whose
    /// parent was dropped loses that link entirely, even if a kept commit
    /// lies further up the chain.
    #[default]
    Prune,
    /// Follow dropped parents upward and link to the nearest kept ancestors.
    Reconnect,
}

impl std::str::FromStr for EdgePolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "prune" => Ok(EdgePolicy::Prune),
            "reconnect" => Ok(EdgePolicy::Reconnect),
            other => Err(format!(
                "invalid edge policy '{}', must be one of: prune, reconnect",
                other
            )),
        }
    }
}

/// Order-preserving map from commit id to decoded commit.
///
/// # Example
///
/// ```
/// use commitviz::core::graph::{CommitGraph, CommitRecord};
/// use commitviz::core::types::Oid;
///
/// let root = Oid::new("1111111111111111111111111111111111111111").unwrap();
/// let tip = Oid::new("2222222222222222222222222222222222222222").unwrap();
///
/// let mut graph = CommitGraph::new();
/// graph.insert(CommitRecord::new(tip.clone(), vec![root.clone()], "second"));
/// graph.insert(CommitRecord::new(root.clone(), vec![], "first"));
///
/// let edges: Vec<_> = graph.edges().collect();
/// assert_eq!(edges, vec![(&root, &tip)]);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommitGraph {
    records: IndexMap<Oid, CommitRecord>,
}

impl CommitGraph {
    /// Create an empty graph.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a record.
    ///
    /// Returns `false` and leaves the graph untouched if the oid is already
    /// present.
    pub fn insert(&mut self, record: CommitRecord) -> bool {
        if self.records.contains_key(&record.oid) {
            return false;
        }
        self.records.insert(record.oid.clone(), record);
        true
    }

    /// Check whether a commit is in the graph.
    pub fn contains(&self, oid: &Oid) -> bool {
        self.records.contains_key(oid)
    }

    /// Look up a commit.
    pub fn get(&self, oid: &Oid) -> Option<&CommitRecord> {
        self.records.get(oid)
    }

    /// Number of commits.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the graph has no commits.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Iterate commits in first-discovery order.
    pub fn iter(&self) -> impl Iterator<Item = &CommitRecord> {
        self.records.values()
    }

    /// Iterate commit ids in first-discovery order.
    pub fn oids(&self) -> impl Iterator<Item = &Oid> {
        self.records.keys()
    }

    /// Iterate `(parent, child)` pairs whose endpoints are both in the graph.
    ///
    /// Pairs are grouped by child in graph order, then by parent order.
    pub fn edges(&self) -> impl Iterator<Item = (&Oid, &Oid)> {
        self.records.values().flat_map(move |record| {
            record
                .parents
                .iter()
                .filter(move |parent| self.records.contains_key(*parent))
                .map(move |parent| (parent, &record.oid))
        })
    }

    /// Restrict the graph to the commits in `kept`.
    ///
    /// Order is preserved. Edges are rewritten according to `policy`.
    ///
    /// # Example
    ///
    /// ```
    /// use std::collections::HashSet;
    /// use commitviz::core::graph::{CommitGraph, CommitRecord, EdgePolicy};
    /// use commitviz::core::types::Oid;
    ///
    /// let a = Oid::new("a".repeat(40)).unwrap();
    /// let b = Oid::new("b".repeat(40)).unwrap();
    /// let c = Oid::new("c".repeat(40)).unwrap();
    ///
    /// let mut graph = CommitGraph::new();
    /// graph.insert(CommitRecord::new(a.clone(), vec![b.clone()], "a"));
    /// graph.insert(CommitRecord::new(b.clone(), vec![c.clone()], "b"));
    /// graph.insert(CommitRecord::new(c.clone(), vec![], "c"));
    ///
    /// let kept: HashSet<_> = [a.clone(), c.clone()].into_iter().collect();
    ///
    /// let pruned = graph.restrict(&kept, EdgePolicy::Prune);
    /// assert_eq!(pruned.edges().count(), 0);
    ///
    /// let linked = graph.restrict(&kept, EdgePolicy::Reconnect);
    /// assert_eq!(linked.edges().collect::<Vec<_>>(), vec![(&c, &a)]);
    /// ```
    pub fn restrict(&self, kept: &HashSet<Oid>, policy: EdgePolicy) -> CommitGraph {
        let mut restricted = CommitGraph::new();

        for record in self.iter().filter(|r| kept.contains(&r.oid)) {
            let parents = match policy {
                EdgePolicy::Prune => record
                    .parents
                    .iter()
                    .filter(|p| kept.contains(*p))
                    .cloned()
                    .collect(),
                EdgePolicy::Reconnect => self.nearest_kept(&record.parents, kept),
            };
            restricted.insert(CommitRecord::new(
                record.oid.clone(),
                parents,
                record.message.clone(),
            ));
        }

        restricted
    }

    /// Walk upward from `start` through commits not in `kept`, collecting the
    /// first kept commit on every path.
    fn nearest_kept(&self, start: &[Oid], kept: &HashSet<Oid>) -> Vec<Oid> {
        let mut found: Vec<Oid> = Vec::new();
        let mut seen: HashSet<&Oid> = HashSet::new();
        let mut stack: Vec<&Oid> = start.iter().rev().collect();

        while let Some(oid) = stack.pop() {
            if !seen.insert(oid) {
                continue;
            }
            if kept.contains(oid) {
                if !found.contains(oid) {
                    found.push(oid.clone());
                }
                continue;
            }
            if let Some(record) = self.records.get(oid) {
                stack.extend(record.parents.iter().rev());
            }
        }

        found
    }

    /// Check if the parent links contain a cycle.
    ///
    /// Returns `Some(oid)` for a commit on a cycle. Uses an explicit stack so
    /// arbitrarily long histories cannot overflow the call stack.
    pub fn find_cycle(&self) -> Option<Oid> {
        #[derive(Clone, Copy, PartialEq, Eq)]
        enum Mark {
            OnPath,
            Done,
        }

        let mut marks: HashMap<&Oid, Mark> = HashMap::new();

        for root in self.records.keys() {
            if marks.contains_key(root) {
                continue;
            }

            // (node, index of next parent to explore)
            let mut stack: Vec<(&Oid, usize)> = vec![(root, 0)];
            marks.insert(root, Mark::OnPath);

            while let Some(top) = stack.last_mut() {
                let oid: &Oid = top.0;
                let next = top.1;
                top.1 += 1;

                let parents = self
                    .records
                    .get(oid)
                    .map(|r| r.parents.as_slice())
                    .unwrap_or(&[]);

                match parents.get(next) {
                    Some(parent) => {
                        if !self.records.contains_key(parent) {
                            continue;
                        }
                        match marks.get(parent) {
                            Some(Mark::OnPath) => return Some(parent.clone()),
                            Some(Mark::Done) => {}
                            None => {
                                marks.insert(parent, Mark::OnPath);
                                stack.push((parent, 0));
                            }
                        }
                    }
                    None => {
                        marks.insert(oid, Mark::Done);
                        stack.pop();
                    }
                }
            }
        }

        None
    }
}

impl<'a> IntoIterator for &'a CommitGraph {
    type Item = &'a CommitRecord;
    type IntoIter = indexmap::map::Values<'a, Oid, CommitRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.values()
    }
}
