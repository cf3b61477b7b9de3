//! ui
//!
//! User-facing output.
//!
//! # Modules
//!
//! - [`output`] - Verbosity handling and the run summary
//!
//! # Design
//!
//! Everything the user is meant to read goes through this module so that
//! `--quiet` and `--json` are honored in one place. Diagnostics for
//! developers go through `tracing` (see [`crate::telemetry`]).

pub mod output;
