//! render::plantuml
//!
//! Graph description text in PlantUML's activity-style syntax.
//!
//! # Format
//!
//! ```text
//! @startuml
//! <oid> : <message>
//! <parent oid> --> <oid>
//! ...
//! @enduml
//! ```
//!
//! Commits appear in graph order, each node line followed by one edge line
//! per parent that is also in the graph. Lines are joined with `\n` and the
//! text has no trailing newline, so identical graphs always serialize to
//! identical bytes.

use crate::core::graph::CommitGraph;

/// First line of every description.
pub const START_MARKER: &str = "@startuml";

/// Last line of every description.
pub const END_MARKER: &str = "@enduml";

/// File extension of the description artifact.
pub const EXTENSION: &str = "uml";

/// Serialize `graph` as a PlantUML description.
///
/// # Example
///
/// ```
/// use commitviz::core::graph::{CommitGraph, CommitRecord};
/// use commitviz::core::types::Oid;
/// use commitviz::render::plantuml::serialize;
///
/// let root = Oid::new("1".repeat(40)).unwrap();
/// let tip = Oid::new("2".repeat(40)).unwrap();
///
/// let mut graph = CommitGraph::new();
/// graph.insert(CommitRecord::new(tip.clone(), vec![root.clone()], "second"));
/// graph.insert(CommitRecord::new(root.clone(), vec![], "first"));
///
/// let text = serialize(&graph);
/// assert_eq!(
///     text,
///     format!("@startuml\n{tip} : second\n{root} --> {tip}\n{root} : first\n@enduml")
/// );
/// ```
pub fn serialize(graph: &CommitGraph) -> String {
    let mut lines = vec![START_MARKER.to_string()];

    for record in graph {
        lines.push(format!("{} : {}", record.oid, record.message));
        for parent in &record.parents {
            if graph.contains(parent) {
                lines.push(format!("{} --> {}", parent, record.oid));
            }
        }
    }

    lines.push(END_MARKER.to_string());
    lines.join("\n")
}
