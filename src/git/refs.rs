//! git::refs
//!
//! Branch ref enumeration from `refs/heads`.
//!
//! Each file under `refs/heads` (at any depth) is a branch whose content is
//! the hex id of its head commit. Namespaced branches such as
//! `feature/login` are nested directories. Enumeration is sorted by path so
//! repeated runs visit branches in the same order.

use std::fs;
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::{debug, warn};
use walkdir::WalkDir;

use crate::core::paths::RepoPaths;
use crate::core::types::{BranchRef, Oid};

/// Errors from enumerating refs.
#[derive(Debug, Error)]
pub enum RefError {
    /// No `refs/heads` directory: wrong path or not a repository.
    #[error("repository not found: no branch refs under {path}")]
    RepositoryNotFound {
        /// The directory that was expected to hold branch refs
        path: PathBuf,
    },

    /// Filesystem error while walking refs.
    #[error("failed to read refs under {path}: {message}")]
    Io { path: PathBuf, message: String },
}

/// List every branch under `refs/heads` with its head commit.
///
/// Files that do not contain a valid object id (symbolic refs, lock files
/// left behind by a crashed process) are skipped with a warning.
///
/// # Errors
///
/// - [`RefError::RepositoryNotFound`] if `refs/heads` does not exist
/// - [`RefError::Io`] if the directory cannot be walked
pub fn list_branches(paths: &RepoPaths) -> Result<Vec<BranchRef>, RefError> {
    let heads = paths.heads_dir();
    if !heads.is_dir() {
        return Err(RefError::RepositoryNotFound { path: heads });
    }

    let mut branches = Vec::new();

    for entry in WalkDir::new(&heads).sort_by_file_name() {
        let entry = entry.map_err(|e| RefError::Io {
            path: heads.clone(),
            message: e.to_string(),
        })?;
        if !entry.file_type().is_file() {
            continue;
        }

        let Some(name) = branch_name(&heads, entry.path()) else {
            continue;
        };

        let content = fs::read_to_string(entry.path()).map_err(|e| RefError::Io {
            path: entry.path().to_path_buf(),
            message: e.to_string(),
        })?;

        match Oid::new(content.trim()) {
            Ok(head) => {
                debug!(branch = %name, head = %head, "found branch");
                branches.push(BranchRef::new(name, head));
            }
            Err(e) => warn!(branch = %name, error = %e, "skipping unreadable ref"),
        }
    }

    Ok(branches)
}

/// Branch name relative to `heads`, always `/`-separated.
fn branch_name(heads: &Path, path: &Path) -> Option<String> {
    let relative = path.strip_prefix(heads).ok()?;
    let parts: Vec<_> = relative
        .components()
        .map(|c| c.as_os_str().to_string_lossy().into_owned())
        .collect();
    if parts.is_empty() {
        None
    } else {
        Some(parts.join("/"))
    }
}
