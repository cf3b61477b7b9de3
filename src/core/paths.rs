//! core::paths
//!
//! Centralized path routing for repository metadata locations.
//!
//! # Architecture
//!
//! Every on-disk location the tool reads is computed here:
//! - the metadata directory itself (`.git/`, a `gitdir:` redirect, or a bare root)
//! - the common directory named by `commondir`, for linked worktrees
//! - `refs/heads/` for the ref locator
//! - `objects/<2-char fan-out>/<rest>` for the loose object reader
//! - `commitviz.toml` for repository-scoped configuration
//!
//! No other module should join `"objects"` or `"refs"` onto a path.
//!
//! # Example
//!
//! ```
//! use commitviz::core::paths::RepoPaths;
//! use commitviz::core::types::Oid;
//! use std::path::PathBuf;
//!
//! let paths = RepoPaths::new(PathBuf::from("/repo/.git"));
//! let oid = Oid::new("abc123def4567890abc123def4567890abc12345").unwrap();
//!
//! assert_eq!(
//!     paths.loose_object_path(&oid),
//!     PathBuf::from("/repo/.git/objects/ab/c123def4567890abc123def4567890abc12345")
//! );
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use super::types::Oid;

/// Name of the metadata directory inside a working tree.
pub const GIT_DIR_NAME: &str = ".git";

/// Path routing for a single repository.
///
/// # Invariants
///
/// - `common_dir` is the directory that holds `refs/` and `objects/`
/// - `git_dir` equals `common_dir` except in a linked worktree, where it is
///   the worktree-private `<common>/worktrees/<name>`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepoPaths {
    /// Metadata directory (`<root>/.git` for normal repositories).
    pub git_dir: PathBuf,
    /// Directory shared by all worktrees of the repository.
    pub common_dir: PathBuf,
}

impl RepoPaths {
    /// Create path routing from a known metadata directory.
    pub fn new(git_dir: PathBuf) -> Self {
        Self {
            common_dir: git_dir.clone(),
            git_dir,
        }
    }

    /// Routing for `git_dir`, following its `commondir` file if present.
    ///
    /// A relative `commondir` resolves against `git_dir`.
    fn resolve(git_dir: PathBuf) -> Self {
        match read_commondir_file(&git_dir.join("commondir")) {
            Some(common) => {
                let common_dir = if common.is_absolute() {
                    common
                } else {
                    git_dir.join(common)
                };
                Self {
                    git_dir,
                    common_dir,
                }
            }
            None => Self::new(git_dir),
        }
    }

    /// Work out where the metadata directory is for `root`.
    ///
    /// In order:
    /// 1. `<root>/.git` is a directory: use it
    /// 2. `<root>/.git` is a file containing `gitdir: <path>`: follow it
    ///    (relative paths resolve against `root`)
    /// 3. otherwise `root` itself is treated as the metadata directory, which
    ///    covers bare repositories and callers that pass `.git` directly
    ///
    /// In every case a `commondir` file in the metadata directory (linked
    /// worktrees) redirects refs and objects to the shared directory.
    ///
    /// This never fails; whether the result is actually a repository is
    /// decided by the ref locator when it looks for `refs/heads`.
    pub fn discover(root: &Path) -> Self {
        let dot_git = root.join(GIT_DIR_NAME);

        if dot_git.is_dir() {
            return Self::resolve(dot_git);
        }

        if dot_git.is_file() {
            if let Some(target) = read_gitdir_file(&dot_git) {
                let target = if target.is_absolute() {
                    target
                } else {
                    root.join(target)
                };
                return Self::resolve(target);
            }
        }

        Self::resolve(root.to_path_buf())
    }

    /// Directory containing local branch refs.
    ///
    /// This is `<common_dir>/refs/heads`.
    pub fn heads_dir(&self) -> PathBuf {
        self.common_dir.join("refs").join("heads")
    }

    /// Root of the object store.
    ///
    /// This is `<common_dir>/objects`.
    pub fn objects_dir(&self) -> PathBuf {
        self.common_dir.join("objects")
    }

    /// Location of a loose object.
    ///
    /// This is `<common_dir>/objects/<first two hex chars>/<remaining hex chars>`.
    pub fn loose_object_path(&self, oid: &Oid) -> PathBuf {
        loose_object_path(&self.objects_dir(), oid)
    }

    /// Repository-scoped configuration file.
    ///
    /// This is `<git_dir>/commitviz.toml`.
    pub fn repo_config_path(&self) -> PathBuf {
        self.git_dir.join("commitviz.toml")
    }

    /// Get the git_dir as a Path reference.
    pub fn git_dir(&self) -> &Path {
        &self.git_dir
    }
}

/// Location of a loose object under an arbitrary object store root.
pub fn loose_object_path(objects_dir: &Path, oid: &Oid) -> PathBuf {
    let (fanout, rest) = oid.fanout();
    objects_dir.join(fanout).join(rest)
}

/// Read a `.git` file of the form `gitdir: <path>`.
fn read_gitdir_file(path: &Path) -> Option<PathBuf> {
    let content = fs::read_to_string(path).ok()?;
    content
        .lines()
        .find_map(|line| line.strip_prefix("gitdir:"))
        .map(|target| PathBuf::from(target.trim()))
}

/// Read a worktree's `commondir` file: a single path line.
fn read_commondir_file(path: &Path) -> Option<PathBuf> {
    let content = fs::read_to_string(path).ok()?;
    let line = content.lines().next()?.trim();
    if line.is_empty() {
        None
    } else {
        Some(PathBuf::from(line))
    }
}
