//! Shared fixture: a repository built from hand-written loose objects.
//!
//! No git binary is involved. Commit ids are synthetic; the object store
//! only cares that they are valid hex.

#![allow(dead_code)]

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use flate2::write::ZlibEncoder;
use flate2::Compression;
use tempfile::TempDir;

use commitviz::core::types::Oid;

/// Deterministic synthetic id for commit number `n`.
pub fn oid(n: u32) -> Oid {
    Oid::new(format!("{:040x}", n + 1)).unwrap()
}

/// Test fixture holding a `.git` directory with loose objects.
pub struct TestRepo {
    dir: TempDir,
}

impl TestRepo {
    /// Create an empty repository with `refs/heads` and `objects`.
    pub fn new() -> Self {
        let dir = TempDir::new().expect("failed to create temp dir");
        fs::create_dir_all(dir.path().join(".git/refs/heads")).unwrap();
        fs::create_dir_all(dir.path().join(".git/objects")).unwrap();
        Self { dir }
    }

    /// Working tree root.
    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    /// The `.git` directory.
    pub fn git_dir(&self) -> PathBuf {
        self.dir.path().join(".git")
    }

    /// Write a commit object with the usual header layout.
    pub fn commit(&self, id: &Oid, parents: &[&Oid], message: &str) {
        let mut body = format!("tree {}\n", "4b825dc642cb6eb9a060e54bf8d69288fbee4904");
        for parent in parents {
            body.push_str(&format!("parent {}\n", parent));
        }
        body.push_str("author Test User <test@example.com> 1700000000 +0000\n");
        body.push_str("committer Test User <test@example.com> 1700000000 +0000\n");
        body.push('\n');
        body.push_str(message);
        body.push('\n');
        self.raw_object(id, "commit", &body);
    }

    /// Write an arbitrary object with a correct header.
    pub fn raw_object(&self, id: &Oid, kind: &str, body: &str) {
        let mut data = format!("{} {}\0", kind, body.len()).into_bytes();
        data.extend_from_slice(body.as_bytes());
        self.raw_bytes(id, &data);
    }

    /// Write pre-header bytes, compressed, at the object's path.
    pub fn raw_bytes(&self, id: &Oid, data: &[u8]) {
        let mut encoder = ZlibEncoder::new(Vec::new(), Compression::default());
        encoder.write_all(data).unwrap();
        let compressed = encoder.finish().unwrap();

        let (dir, file) = id.fanout();
        let dir = self.git_dir().join("objects").join(dir);
        fs::create_dir_all(&dir).unwrap();
        fs::write(dir.join(file), compressed).unwrap();
    }

    /// Point a branch at `head`. Nested names create directories.
    pub fn branch(&self, name: &str, head: &Oid) {
        let path = self.git_dir().join("refs/heads").join(name);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, format!("{}\n", head)).unwrap();
    }

    /// Delete an object file, simulating a pruned or packed object.
    pub fn remove_object(&self, id: &Oid) {
        let (dir, file) = id.fanout();
        fs::remove_file(self.git_dir().join("objects").join(dir).join(file)).unwrap();
    }

    /// Register a linked worktree named `name` and return its root.
    ///
    /// The worktree's `.git` file points at `<git_dir>/worktrees/<name>`,
    /// whose `commondir` leads back to the shared metadata directory.
    pub fn linked_worktree(&self, name: &str) -> PathBuf {
        let private = self.git_dir().join("worktrees").join(name);
        fs::create_dir_all(&private).unwrap();
        fs::write(private.join("commondir"), "../..\n").unwrap();
        fs::write(private.join("HEAD"), "ref: refs/heads/main\n").unwrap();

        let root = self.dir.path().join("worktrees").join(name);
        fs::create_dir_all(&root).unwrap();
        fs::write(root.join(".git"), format!("gitdir: {}\n", private.display())).unwrap();
        root
    }

    /// Write a linear chain `0 <- 1 <- ... <- len-1` and return the ids,
    /// newest last.
    pub fn chain(&self, start: u32, len: u32) -> Vec<Oid> {
        let mut ids = Vec::new();
        for n in start..start + len {
            let id = oid(n);
            let parents: Vec<&Oid> = ids.last().into_iter().collect();
            self.commit(&id, &parents, &format!("commit {}", n));
            ids.push(id);
        }
        ids
    }
}
