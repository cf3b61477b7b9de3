//! core
//!
//! Core domain types and configuration for commitviz.
//!
//! # Modules
//!
//! - [`types`] - Strong types: Oid, BranchRef
//! - [`graph`] - The order-preserving commit graph
//! - [`paths`] - Routing from a repository root to its refs and objects
//! - [`config`] - Configuration schema and loading
//!
//! # Design Principles
//!
//! - Strong typing prevents invalid object ids from reaching the object store
//! - Graph iteration order is insertion order and nothing else

pub mod config;
pub mod graph;
pub mod paths;
pub mod types;
