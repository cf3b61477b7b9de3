//! End-to-end tests for the graphing pipeline.
//!
//! Repositories are built from hand-written loose objects; the path lister
//! and renderer are replaced by in-process fakes.

mod support;

use std::cell::RefCell;
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::ExitStatus;

use commitviz::core::graph::EdgePolicy;
use commitviz::core::types::Oid;
use commitviz::engine::{run_with, EngineError, RunOptions};
use commitviz::git::commit::MessageStrategy;
use commitviz::git::lister::{ListerError, PathLister};
use commitviz::git::refs::RefError;
use commitviz::render::invoker::{RenderError, Renderer};

use support::{oid, TestRepo};

struct FakeLister {
    touched: HashMap<Oid, Vec<String>>,
}

impl FakeLister {
    fn new(entries: &[(&Oid, &[&str])]) -> Self {
        Self {
            touched: entries
                .iter()
                .map(|(id, paths)| ((*id).clone(), paths.iter().map(|p| p.to_string()).collect()))
                .collect(),
        }
    }
}

impl PathLister for FakeLister {
    fn touched_paths(&self, commit: &Oid) -> Result<Vec<String>, ListerError> {
        Ok(self.touched.get(commit).cloned().unwrap_or_default())
    }
}

#[derive(Default)]
struct RecordingRenderer {
    calls: RefCell<Vec<(PathBuf, PathBuf)>>,
}

impl Renderer for RecordingRenderer {
    fn render(&self, source: &Path, out_dir: &Path) -> Result<ExitStatus, RenderError> {
        self.calls
            .borrow_mut()
            .push((source.to_path_buf(), out_dir.to_path_buf()));
        Ok(success())
    }
}

#[cfg(unix)]
fn success() -> ExitStatus {
    use std::os::unix::process::ExitStatusExt;
    ExitStatus::from_raw(0)
}

#[cfg(windows)]
fn success() -> ExitStatus {
    use std::os::windows::process::ExitStatusExt;
    ExitStatus::from_raw(0)
}

fn options(repo: &TestRepo, out: &Path) -> RunOptions {
    RunOptions::new(repo.path(), out.join("graph.png"))
}

fn read_artifact(out: &Path) -> String {
    fs::read_to_string(out.join("graph.uml")).unwrap()
}

#[test]
fn linear_history_serializes_in_discovery_order() {
    let repo = TestRepo::new();
    let ids = repo.chain(0, 3);
    repo.branch("main", &ids[2]);
    let out = tempfile::TempDir::new().unwrap();

    let report = run_with(&options(&repo, out.path()), None, None).unwrap();

    let expected = format!(
        "@startuml\n{c} : commit 2\n{b} --> {c}\n{b} : commit 1\n{a} --> {b}\n{a} : commit 0\n@enduml",
        a = ids[0],
        b = ids[1],
        c = ids[2]
    );
    assert_eq!(read_artifact(out.path()), expected);
    assert_eq!(report.nodes, 3);
    assert_eq!(report.edges, 2);
    assert!(report.unresolved.is_empty());
    assert!(report.image.is_none());
}

#[test]
fn shared_ancestry_appears_once() {
    let repo = TestRepo::new();
    let base = repo.chain(0, 2);
    let (left, right) = (oid(10), oid(11));
    repo.commit(&left, &[&base[1]], "left");
    repo.commit(&right, &[&base[1]], "right");
    repo.branch("main", &left);
    repo.branch("topic", &right);
    let out = tempfile::TempDir::new().unwrap();

    let report = run_with(&options(&repo, out.path()), None, None).unwrap();
    let text = read_artifact(out.path());

    assert_eq!(report.branches, 2);
    assert_eq!(report.nodes, 4);
    for id in [&base[0], &base[1], &left, &right] {
        let prefix = format!("{} : ", id);
        let node_lines = text.lines().filter(|l| l.starts_with(&prefix)).count();
        assert_eq!(node_lines, 1, "{} should appear exactly once", id);
    }
    assert!(text.contains(&format!("{} --> {}", base[1], left)));
    assert!(text.contains(&format!("{} --> {}", base[1], right)));
}

#[test]
fn merge_commit_has_one_edge_per_parent() {
    let repo = TestRepo::new();
    let (root, a, b, merge) = (oid(0), oid(1), oid(2), oid(3));
    repo.commit(&root, &[], "root");
    repo.commit(&a, &[&root], "a");
    repo.commit(&b, &[&root], "b");
    repo.commit(&merge, &[&a, &b], "merge");
    repo.branch("main", &merge);
    let out = tempfile::TempDir::new().unwrap();

    let report = run_with(&options(&repo, out.path()), None, None).unwrap();
    let text = read_artifact(out.path());

    assert_eq!(report.nodes, 4);
    assert_eq!(report.edges, 4);
    let order: Vec<_> = text
        .lines()
        .filter(|l| l.contains(" : "))
        .map(|l| l.split(" : ").nth(1).unwrap().to_string())
        .collect();
    // Depth-first, parents left to right.
    assert_eq!(order, vec!["merge", "a", "root", "b"]);
}

#[test]
fn output_is_byte_identical_across_runs() {
    let repo = TestRepo::new();
    let ids = repo.chain(0, 5);
    let side = oid(20);
    repo.commit(&side, &[&ids[2]], "side");
    repo.branch("main", &ids[4]);
    repo.branch("feature/side", &side);
    let out = tempfile::TempDir::new().unwrap();

    run_with(&options(&repo, out.path()), None, None).unwrap();
    let first = fs::read(out.path().join("graph.uml")).unwrap();
    run_with(&options(&repo, out.path()), None, None).unwrap();
    let second = fs::read(out.path().join("graph.uml")).unwrap();

    assert_eq!(first, second);
    assert!(!first.ends_with(b"\n"));
}

#[test]
fn missing_ancestor_drops_only_its_line() {
    let repo = TestRepo::new();
    let main = repo.chain(0, 3);
    let other = repo.chain(100, 2);
    repo.branch("main", &main[2]);
    repo.branch("other", &other[1]);
    repo.remove_object(&main[1]);
    let out = tempfile::TempDir::new().unwrap();

    let report = run_with(&options(&repo, out.path()), None, None).unwrap();
    let text = read_artifact(out.path());

    assert_eq!(report.nodes, 3);
    assert_eq!(report.unresolved.len(), 1);
    assert_eq!(report.unresolved[0].oid, main[1]);
    assert!(text.contains(&format!("{} : commit 2", main[2])));
    assert!(!text.contains(&main[0].to_string()));
    assert!(text.contains(&format!("{} --> {}", other[0], other[1])));
    // The edge to the unreadable parent is not drawn.
    assert!(!text.contains(&format!("{} --> {}", main[1], main[2])));
}

#[test]
fn legacy_decoder_takes_last_message_line() {
    let repo = TestRepo::new();
    let id = oid(0);
    repo.commit(&id, &[], "Summary line\n\nBody paragraph\nSigned-off-by: Someone");
    repo.branch("main", &id);
    let out = tempfile::TempDir::new().unwrap();

    run_with(&options(&repo, out.path()), None, None).unwrap();

    assert!(read_artifact(out.path()).contains(&format!("{} : Signed-off-by: Someone", id)));
}

#[test]
fn legacy_decoder_splits_on_form_feed_and_carriage_return() {
    let repo = TestRepo::new();
    let id = oid(0);
    repo.commit(&id, &[], "Summary\x0cpage two\rlast piece");
    repo.branch("main", &id);
    let out = tempfile::TempDir::new().unwrap();

    run_with(&options(&repo, out.path()), None, None).unwrap();

    assert!(read_artifact(out.path()).contains(&format!("{} : last piece", id)));
}

#[test]
fn subject_decoder_takes_first_message_line() {
    let repo = TestRepo::new();
    let id = oid(0);
    repo.commit(&id, &[], "Summary line\n\nBody paragraph");
    repo.branch("main", &id);
    let out = tempfile::TempDir::new().unwrap();
    let mut opts = options(&repo, out.path());
    opts.decoder = MessageStrategy::Subject;

    run_with(&opts, None, None).unwrap();

    assert!(read_artifact(out.path()).contains(&format!("{} : Summary line", id)));
}

#[test]
fn self_referential_commit_terminates() {
    let repo = TestRepo::new();
    let id = oid(0);
    repo.commit(&id, &[&id], "loop");
    repo.branch("main", &id);
    let out = tempfile::TempDir::new().unwrap();

    let report = run_with(&options(&repo, out.path()), None, None).unwrap();

    assert_eq!(report.nodes, 1);
    assert!(read_artifact(out.path()).contains(&format!("{id} --> {id}")));
}

#[test]
fn file_filter_is_lossy_by_default() {
    let repo = TestRepo::new();
    let ids = repo.chain(0, 3);
    let (c, b, a) = (&ids[0], &ids[1], &ids[2]);
    repo.branch("main", a);
    let lister = FakeLister::new(&[(a, &["f.txt"]), (b, &["g.txt"]), (c, &["f.txt"])]);
    let out = tempfile::TempDir::new().unwrap();
    let mut opts = options(&repo, out.path());
    opts.target = Some("f.txt".into());

    let report = run_with(&opts, Some(&lister), None).unwrap();
    let text = read_artifact(out.path());

    assert_eq!(report.commits, 3);
    assert_eq!(report.nodes, 2);
    assert_eq!(report.edges, 0);
    assert!(!text.contains("-->"));
    assert!(!text.contains(&b.to_string()));
}

#[test]
fn reconnect_policy_links_through_dropped_commits() {
    let repo = TestRepo::new();
    let ids = repo.chain(0, 3);
    let (c, b, a) = (&ids[0], &ids[1], &ids[2]);
    repo.branch("main", a);
    let lister = FakeLister::new(&[(a, &["f.txt"]), (b, &["g.txt"]), (c, &["f.txt"])]);
    let out = tempfile::TempDir::new().unwrap();
    let mut opts = options(&repo, out.path());
    opts.target = Some("f.txt".into());
    opts.edges = EdgePolicy::Reconnect;

    run_with(&opts, Some(&lister), None).unwrap();

    assert!(read_artifact(out.path()).contains(&format!("{} --> {}", c, a)));
}

#[test]
fn filter_matching_nothing_is_empty_result() {
    let repo = TestRepo::new();
    let ids = repo.chain(0, 2);
    repo.branch("main", &ids[1]);
    let lister = FakeLister::new(&[]);
    let out = tempfile::TempDir::new().unwrap();
    let mut opts = options(&repo, out.path());
    opts.target = Some("absent.txt".into());

    let result = run_with(&opts, Some(&lister), None);

    assert!(matches!(
        result,
        Err(EngineError::EmptyResult { target: Some(ref t) }) if t == "absent.txt"
    ));
    assert!(!out.path().join("graph.uml").exists());
}

#[test]
fn no_branches_is_empty_result() {
    let repo = TestRepo::new();
    let out = tempfile::TempDir::new().unwrap();

    let result = run_with(&options(&repo, out.path()), None, None);

    assert!(matches!(result, Err(EngineError::EmptyResult { target: None })));
    assert!(!out.path().join("graph.uml").exists());
}

#[test]
fn not_a_repository_is_reported() {
    let dir = tempfile::TempDir::new().unwrap();
    let out = tempfile::TempDir::new().unwrap();
    let opts = RunOptions::new(dir.path(), out.path().join("graph.png"));

    let result = run_with(&opts, None, None);

    assert!(matches!(
        result,
        Err(EngineError::Refs(RefError::RepositoryNotFound { .. }))
    ));
}

#[test]
fn gitdir_file_is_followed() {
    let repo = TestRepo::new();
    let ids = repo.chain(0, 1);
    repo.branch("main", &ids[0]);
    let worktree = tempfile::TempDir::new().unwrap();
    fs::write(
        worktree.path().join(".git"),
        format!("gitdir: {}\n", repo.git_dir().display()),
    )
    .unwrap();
    let out = tempfile::TempDir::new().unwrap();
    let opts = RunOptions::new(worktree.path(), out.path().join("graph.png"));

    let report = run_with(&opts, None, None).unwrap();

    assert_eq!(report.nodes, 1);
}

#[test]
fn linked_worktree_reads_shared_refs_and_objects() {
    let repo = TestRepo::new();
    let ids = repo.chain(0, 2);
    repo.branch("main", &ids[1]);
    let worktree = repo.linked_worktree("wt");
    let out = tempfile::TempDir::new().unwrap();
    let opts = RunOptions::new(&worktree, out.path().join("graph.png"));

    let report = run_with(&opts, None, None).unwrap();

    assert_eq!(report.nodes, 2);
    assert_eq!(report.edges, 1);
}

#[test]
fn parent_that_is_a_blob_is_unresolved() {
    let repo = TestRepo::new();
    let (tip, blob) = (oid(1), oid(2));
    repo.raw_object(&blob, "blob", "just some file contents\n");
    repo.commit(&tip, &[&blob], "tip");
    let other = repo.chain(100, 2);
    repo.branch("main", &tip);
    repo.branch("other", &other[1]);
    let out = tempfile::TempDir::new().unwrap();

    let report = run_with(&options(&repo, out.path()), None, None).unwrap();
    let text = read_artifact(out.path());

    assert_eq!(report.nodes, 3);
    assert_eq!(report.unresolved.len(), 1);
    assert_eq!(report.unresolved[0].oid, blob);
    assert!(report.unresolved[0].reason.contains("expected a commit, found a blob"));
    assert!(text.contains(&format!("{} : tip", tip)));
    assert!(text.contains(&format!("{} --> {}", other[0], other[1])));
    assert!(!text.contains(&format!("{} :", blob)));
}

#[test]
fn parent_with_corrupt_zlib_is_unresolved() {
    let repo = TestRepo::new();
    let ids = repo.chain(0, 3);
    repo.branch("main", &ids[2]);
    let (dir, file) = ids[1].fanout();
    fs::write(
        repo.git_dir().join("objects").join(dir).join(file),
        b"not a zlib stream",
    )
    .unwrap();
    let out = tempfile::TempDir::new().unwrap();

    let report = run_with(&options(&repo, out.path()), None, None).unwrap();
    let text = read_artifact(out.path());

    assert_eq!(report.nodes, 1);
    assert_eq!(report.unresolved.len(), 1);
    assert_eq!(report.unresolved[0].oid, ids[1]);
    assert!(text.contains(&format!("{} : commit 2", ids[2])));
    assert!(!text.contains(&ids[0].to_string()));
}

#[test]
fn parent_with_wrong_declared_size_is_unresolved() {
    let repo = TestRepo::new();
    let (tip, broken) = (oid(1), oid(2));
    repo.raw_bytes(&broken, b"commit 999\0tree x\n\nshort");
    repo.commit(&tip, &[&broken], "tip");
    repo.branch("main", &tip);
    let out = tempfile::TempDir::new().unwrap();

    let report = run_with(&options(&repo, out.path()), None, None).unwrap();

    assert_eq!(report.nodes, 1);
    assert_eq!(report.unresolved[0].oid, broken);
    assert!(report.unresolved[0].reason.contains("declares 999 bytes"));
}

#[test]
fn renderer_receives_artifact_and_output_dir() {
    let repo = TestRepo::new();
    let ids = repo.chain(0, 2);
    repo.branch("main", &ids[1]);
    let out = tempfile::TempDir::new().unwrap();
    let renderer = RecordingRenderer::default();

    let report = run_with(&options(&repo, out.path()), None, Some(&renderer)).unwrap();

    let calls = renderer.calls.borrow();
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].0, out.path().join("graph.uml"));
    assert_eq!(calls[0].1, out.path());
    assert!(report.rendered);
    assert_eq!(report.image, Some(out.path().join("graph.png")));
}
