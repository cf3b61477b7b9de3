//! git
//!
//! Single interface to repository internals.
//!
//! # Architecture
//!
//! This module is the **ONLY doorway** to the repository on disk. Ancestry
//! is read straight from the loose object store rather than through a
//! version-control library's graph APIs; libgit2 is used for exactly one
//! thing, the optional tree-diff path lister.
//!
//! # Responsibilities
//!
//! - Branch enumeration from `refs/heads` ([`refs`])
//! - Loose object reading and inflation ([`objects`])
//! - Commit body decoding ([`commit`])
//! - Touched-path queries for the file filter ([`lister`])
//!
//! # Invariants
//!
//! - Nothing here writes to the repository
//! - All ids crossing this boundary are validated [`Oid`](crate::core::types::Oid)s
//!
//! # Example
//!
//! ```no_run
//! use commitviz::core::paths::RepoPaths;
//! use commitviz::git::commit::{CommitReader, CommitSource, MessageStrategy};
//! use commitviz::git::objects::ObjectStore;
//! use commitviz::git::refs::list_branches;
//! use std::path::Path;
//!
//! let paths = RepoPaths::discover(Path::new("."));
//! let reader = CommitReader::new(ObjectStore::new(paths.objects_dir()), MessageStrategy::Legacy);
//!
//! for branch in list_branches(&paths)? {
//!     let head = reader.load_commit(&branch.head)?;
//!     println!("{}: {}", branch.name, head.message);
//! }
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod commit;
pub mod lister;
pub mod objects;
pub mod refs;

pub use commit::{CommitReader, CommitSource, MessageStrategy};
pub use lister::{create_lister, ListerError, ListerKind, PathLister};
pub use objects::{ObjectError, ObjectStore};
pub use refs::{list_branches, RefError};
