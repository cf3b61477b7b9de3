//! git::lister
//!
//! "Which paths did this commit touch?" as a narrow capability.
//!
//! # Design
//!
//! The file filter only depends on [`PathLister`]. Two implementations
//! exist:
//!
//! - [`GitCliLister`] shells out to `git show --name-only`. Whatever the
//!   installed git considers "changed" is what the filter sees, including
//!   its combined-diff handling of merges.
//! - [`Git2Lister`] diffs trees through libgit2. Root commits are diffed
//!   against the empty tree; merges report a path only if it differs from
//!   every parent, which is what `git show` prints for a merge by default.
//!
//! Use [`create_lister`] rather than naming an implementation directly.

use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::process::Command;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::core::types::Oid;

/// Errors from listing touched paths.
#[derive(Debug, Error)]
pub enum ListerError {
    /// The external tool could not be started.
    #[error("failed to run '{program}': {source}")]
    Spawn {
        program: String,
        source: std::io::Error,
    },

    /// The external tool ran but reported failure.
    #[error("'{program}' failed for {oid}: {stderr}")]
    Failed {
        program: String,
        oid: Oid,
        stderr: String,
    },

    /// libgit2 could not answer.
    #[error("libgit2 error for {context}: {message}")]
    Git { context: String, message: String },
}

impl ListerError {
    fn git(context: impl std::fmt::Display, err: git2::Error) -> Self {
        ListerError::Git {
            context: context.to_string(),
            message: err.message().to_string(),
        }
    }
}

/// Capability: list the paths a commit changed.
pub trait PathLister {
    /// Paths touched by `commit`, in the order the backend reports them.
    ///
    /// Paths are relative to the repository root and `/`-separated.
    fn touched_paths(&self, commit: &Oid) -> Result<Vec<String>, ListerError>;
}

/// Available lister backends.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ListerKind {
    /// Shell out to the git binary.
    #[default]
    GitCli,
    /// Diff trees in-process with libgit2.
    Libgit2,
}

impl ListerKind {
    /// Config/CLI spelling of this backend.
    pub fn as_str(&self) -> &'static str {
        match self {
            ListerKind::GitCli => "git-cli",
            ListerKind::Libgit2 => "libgit2",
        }
    }
}

impl std::str::FromStr for ListerKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "git-cli" => Ok(ListerKind::GitCli),
            "libgit2" => Ok(ListerKind::Libgit2),
            other => Err(format!(
                "invalid lister '{}', must be one of: git-cli, libgit2",
                other
            )),
        }
    }
}

impl std::fmt::Display for ListerKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Create the lister selected by `kind`.
///
/// `repo_root` is the directory the user pointed at (working tree or git
/// dir); `git_program` is only used by the CLI backend.
///
/// # Errors
///
/// Returns [`ListerError::Git`] if libgit2 cannot open the repository.
pub fn create_lister(
    kind: ListerKind,
    repo_root: &Path,
    git_program: &str,
) -> Result<Box<dyn PathLister>, ListerError> {
    match kind {
        ListerKind::GitCli => Ok(Box::new(GitCliLister::new(git_program, repo_root))),
        ListerKind::Libgit2 => Ok(Box::new(Git2Lister::open(repo_root)?)),
    }
}

/// Lister backed by `git show --pretty=format: --name-only`.
#[derive(Debug, Clone)]
pub struct GitCliLister {
    program: String,
    repo_root: PathBuf,
}

impl GitCliLister {
    /// Run `program` against the repository at `repo_root`.
    pub fn new(program: impl Into<String>, repo_root: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
            repo_root: repo_root.into(),
        }
    }

    fn command(&self, commit: &Oid) -> Command {
        let mut cmd = Command::new(&self.program);
        cmd.arg("-C")
            .arg(&self.repo_root)
            .args(["-c", "core.quotePath=false"])
            .args(["show", "--pretty=format:", "--name-only"])
            .arg(commit.as_str());
        cmd
    }
}

impl PathLister for GitCliLister {
    fn touched_paths(&self, commit: &Oid) -> Result<Vec<String>, ListerError> {
        let output = self
            .command(commit)
            .output()
            .map_err(|e| ListerError::Spawn {
                program: self.program.clone(),
                source: e,
            })?;

        if !output.status.success() {
            return Err(ListerError::Failed {
                program: self.program.clone(),
                oid: commit.clone(),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }

        Ok(parse_name_only(&String::from_utf8_lossy(&output.stdout)))
    }
}

/// Split `--name-only` output into paths, dropping blank lines.
fn parse_name_only(stdout: &str) -> Vec<String> {
    stdout
        .lines()
        .map(str::trim_end)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect()
}

/// Lister backed by libgit2 tree diffs.
pub struct Git2Lister {
    repo: git2::Repository,
}

impl Git2Lister {
    /// Open the repository at `path` (working tree or git dir).
    pub fn open(path: &Path) -> Result<Self, ListerError> {
        let repo = git2::Repository::open(path).map_err(|e| ListerError::git(path.display(), e))?;
        Ok(Self { repo })
    }

    fn diff_paths(
        &self,
        old: Option<&git2::Tree<'_>>,
        new: &git2::Tree<'_>,
        commit: &Oid,
    ) -> Result<Vec<String>, ListerError> {
        let mut diff = self
            .repo
            .diff_tree_to_tree(old, Some(new), None)
            .map_err(|e| ListerError::git(commit, e))?;
        diff.find_similar(None)
            .map_err(|e| ListerError::git(commit, e))?;

        let paths = diff
            .deltas()
            .filter_map(|delta| {
                delta
                    .new_file()
                    .path()
                    .or_else(|| delta.old_file().path())
                    .map(|p| p.to_string_lossy().replace('\\', "/"))
            })
            .collect();
        Ok(paths)
    }
}

impl PathLister for Git2Lister {
    fn touched_paths(&self, commit: &Oid) -> Result<Vec<String>, ListerError> {
        let id = git2::Oid::from_str(commit.as_str()).map_err(|e| ListerError::git(commit, e))?;
        let found = self
            .repo
            .find_commit(id)
            .map_err(|e| ListerError::git(commit, e))?;
        let tree = found.tree().map_err(|e| ListerError::git(commit, e))?;

        let mut per_parent = Vec::with_capacity(found.parent_count());
        for parent in found.parents() {
            let parent_tree = parent.tree().map_err(|e| ListerError::git(commit, e))?;
            per_parent.push(self.diff_paths(Some(&parent_tree), &tree, commit)?);
        }

        let Some((first, rest)) = per_parent.split_first() else {
            return self.diff_paths(None, &tree, commit);
        };

        let others: Vec<HashSet<&String>> = rest.iter().map(|paths| paths.iter().collect()).collect();
        Ok(first
            .iter()
            .filter(|path| others.iter().all(|set| set.contains(path)))
            .cloned()
            .collect())
    }
}
