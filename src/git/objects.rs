//! git::objects
//!
//! Loose object reader.
//!
//! Loose objects live at `objects/<2 hex>/<remaining hex>`, each file a zlib
//! stream whose inflated form is `<kind> <size>\0<body>`. Packed objects are
//! not read; an object that only exists in a pack is reported as
//! [`ObjectError::ObjectNotFound`], the same as a truly missing one.

use std::fs;
use std::io::Read;
use std::path::{Path, PathBuf};

use flate2::read::ZlibDecoder;
use thiserror::Error;

use crate::core::paths::loose_object_path;
use crate::core::types::Oid;

/// Errors from reading a loose object.
#[derive(Debug, Error)]
pub enum ObjectError {
    /// No loose object file for this id. Either the repository is damaged
    /// or the object only exists in a pack.
    #[error("object not found: {oid} (looked in {path})")]
    ObjectNotFound {
        /// The missing object
        oid: Oid,
        /// Where it was expected
        path: PathBuf,
    },

    /// The file exists but is not a readable object.
    #[error("failed to decode object {oid}: {message}")]
    DecodeError {
        /// The object that failed to decode
        oid: Oid,
        /// What was wrong with it
        message: String,
    },

    /// Filesystem error other than a missing file.
    #[error("failed to read object {oid}: {source}")]
    Io {
        /// The object being read
        oid: Oid,
        source: std::io::Error,
    },
}

impl ObjectError {
    /// Whether this failure only affects the one object and the walk can
    /// carry on elsewhere.
    pub fn is_localized(&self) -> bool {
        matches!(
            self,
            ObjectError::ObjectNotFound { .. } | ObjectError::DecodeError { .. }
        )
    }

    fn decode(oid: &Oid, message: impl Into<String>) -> Self {
        ObjectError::DecodeError {
            oid: oid.clone(),
            message: message.into(),
        }
    }
}

/// Object type recorded in the loose object header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ObjectKind {
    Commit,
    Tree,
    Blob,
    Tag,
}

impl ObjectKind {
    fn parse(name: &str) -> Option<Self> {
        match name {
            "commit" => Some(ObjectKind::Commit),
            "tree" => Some(ObjectKind::Tree),
            "blob" => Some(ObjectKind::Blob),
            "tag" => Some(ObjectKind::Tag),
            _ => None,
        }
    }

    /// Header name of this kind.
    pub fn as_str(&self) -> &'static str {
        match self {
            ObjectKind::Commit => "commit",
            ObjectKind::Tree => "tree",
            ObjectKind::Blob => "blob",
            ObjectKind::Tag => "tag",
        }
    }
}

impl std::fmt::Display for ObjectKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An inflated loose object whose body is text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LooseObject {
    pub oid: Oid,
    pub kind: ObjectKind,
    pub body: String,
}

impl LooseObject {
    /// Body split into lines.
    ///
    /// Besides `\n` and `\r\n`, a lone `\r`, vertical tab, form feed, the
    /// file/group/record separators, NEL and the Unicode line and paragraph
    /// separators all end a line. A trailing break does not produce an empty
    /// last line.
    pub fn lines(&self) -> impl Iterator<Item = &str> {
        split_lines(&self.body).into_iter()
    }
}

fn is_line_break(c: char) -> bool {
    matches!(
        c,
        '\n' | '\r' | '\x0b' | '\x0c' | '\x1c' | '\x1d' | '\x1e' | '\u{85}' | '\u{2028}' | '\u{2029}'
    )
}

fn split_lines(text: &str) -> Vec<&str> {
    let mut lines = Vec::new();
    let mut start = 0;
    let mut chars = text.char_indices().peekable();

    while let Some((i, c)) = chars.next() {
        if !is_line_break(c) {
            continue;
        }
        lines.push(&text[start..i]);
        start = i + c.len_utf8();
        if c == '\r' {
            if let Some(&(next, '\n')) = chars.peek() {
                chars.next();
                start = next + 1;
            }
        }
    }
    if start < text.len() {
        lines.push(&text[start..]);
    }

    lines
}

/// Read-only view of a loose object store.
#[derive(Debug, Clone)]
pub struct ObjectStore {
    objects_dir: PathBuf,
}

impl ObjectStore {
    /// Open the object store rooted at `objects_dir` (usually `<git_dir>/objects`).
    pub fn new(objects_dir: impl Into<PathBuf>) -> Self {
        Self {
            objects_dir: objects_dir.into(),
        }
    }

    /// Root directory of the store.
    pub fn objects_dir(&self) -> &Path {
        &self.objects_dir
    }

    /// Location of a loose object in this store.
    pub fn object_path(&self, oid: &Oid) -> PathBuf {
        loose_object_path(&self.objects_dir, oid)
    }

    /// Whether a loose object file exists for `oid`.
    pub fn contains(&self, oid: &Oid) -> bool {
        self.object_path(oid).is_file()
    }

    /// Read, inflate, and decode a loose object as text.
    ///
    /// # Errors
    ///
    /// - [`ObjectError::ObjectNotFound`] if there is no loose file
    /// - [`ObjectError::DecodeError`] if the file is not a valid zlib
    ///   stream, the header is malformed, the size does not match, or the
    ///   body is not UTF-8
    /// - [`ObjectError::Io`] for any other filesystem failure
    pub fn read(&self, oid: &Oid) -> Result<LooseObject, ObjectError> {
        let path = self.object_path(oid);
        let raw = fs::read(&path).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                ObjectError::ObjectNotFound {
                    oid: oid.clone(),
                    path: path.clone(),
                }
            } else {
                ObjectError::Io {
                    oid: oid.clone(),
                    source: e,
                }
            }
        })?;

        let mut inflated = Vec::new();
        ZlibDecoder::new(raw.as_slice())
            .read_to_end(&mut inflated)
            .map_err(|e| ObjectError::decode(oid, format!("corrupt zlib stream: {}", e)))?;

        let (kind, body) = split_header(oid, &inflated)?;
        let body = String::from_utf8(body.to_vec())
            .map_err(|_| ObjectError::decode(oid, format!("{} body is not valid UTF-8", kind)))?;

        Ok(LooseObject {
            oid: oid.clone(),
            kind,
            body,
        })
    }
}

/// Split `<kind> <size>\0<body>` and check the declared size.
fn split_header<'a>(oid: &Oid, inflated: &'a [u8]) -> Result<(ObjectKind, &'a [u8]), ObjectError> {
    let nul = inflated
        .iter()
        .position(|b| *b == 0)
        .ok_or_else(|| ObjectError::decode(oid, "missing object header"))?;

    let header = std::str::from_utf8(&inflated[..nul])
        .map_err(|_| ObjectError::decode(oid, "object header is not ASCII"))?;
    let (kind_name, size) = header
        .split_once(' ')
        .ok_or_else(|| ObjectError::decode(oid, format!("malformed header '{}'", header)))?;

    let kind = ObjectKind::parse(kind_name)
        .ok_or_else(|| ObjectError::decode(oid, format!("unknown object type '{}'", kind_name)))?;
    let size: usize = size
        .parse()
        .map_err(|_| ObjectError::decode(oid, format!("malformed size '{}'", size)))?;

    let body = &inflated[nul + 1..];
    if body.len() != size {
        return Err(ObjectError::decode(
            oid,
            format!("header declares {} bytes, found {}", size, body.len()),
        ));
    }

    Ok((kind, body))
}

#[cfg(test)]
mod tests {
    use super::*;
    use flate2::write::ZlibEncoder;
    use flate2::Compression;
    use std::io::Write;
    use tempfile::TempDir;

    fn oid(c: char) -> Oid {
        Oid::new(c.to_string().repeat(40)).unwrap()
    }

    fn write_raw(store: &ObjectStore, oid: &Oid, bytes: &[u8]) {
        let path = store.object_path(oid);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, bytes).unwrap();
    }

    fn deflate(bytes: &[u8]) -> Vec<u8> {
        let mut encoder = ZlibEncoder::new(Vec::new(), Compression::default());
        encoder.write_all(bytes).unwrap();
        encoder.finish().unwrap()
    }

    fn make_store() -> (TempDir, ObjectStore) {
        let dir = TempDir::new().unwrap();
        let store = ObjectStore::new(dir.path().join("objects"));
        (dir, store)
    }

    #[test]
    fn reads_commit_object() {
        let (_dir, store) = make_store();
        let body = "tree 0000\n\nhello\n";
        let raw = format!("commit {}\0{}", body.len(), body);
        write_raw(&store, &oid('a'), &deflate(raw.as_bytes()));

        let object = store.read(&oid('a')).unwrap();
        assert_eq!(object.kind, ObjectKind::Commit);
        assert_eq!(object.lines().collect::<Vec<_>>(), vec!["tree 0000", "", "hello"]);
    }

    #[test]
    fn line_splitting_matches_every_break_kind() {
        assert_eq!(split_lines("a\nb\r\nc\rd"), vec!["a", "b", "c", "d"]);
        assert_eq!(split_lines("a\x0bb\x0cc\x1cd\x1de\x1ef"), vec!["a", "b", "c", "d", "e", "f"]);
        assert_eq!(split_lines("a\u{85}b\u{2028}c\u{2029}d"), vec!["a", "b", "c", "d"]);
    }

    #[test]
    fn line_splitting_edges() {
        assert!(split_lines("").is_empty());
        assert_eq!(split_lines("a\n"), vec!["a"]);
        assert_eq!(split_lines("a\n\nb"), vec!["a", "", "b"]);
        assert_eq!(split_lines("\r\n"), vec![""]);
        assert_eq!(split_lines("a\r\r\nb"), vec!["a", "", "b"]);
    }

    #[test]
    fn object_path_uses_fanout() {
        let store = ObjectStore::new("/repo/.git/objects");
        assert_eq!(
            store.object_path(&oid('e')),
            PathBuf::from(format!("/repo/.git/objects/ee/{}", "e".repeat(38)))
        );
    }

    #[test]
    fn missing_object_is_not_found() {
        let (_dir, store) = make_store();
        match store.read(&oid('b')) {
            Err(ObjectError::ObjectNotFound { oid: missing, .. }) => assert_eq!(missing, oid('b')),
            other => panic!("expected ObjectNotFound, got {other:?}"),
        }
        assert!(!store.contains(&oid('b')));
    }

    #[test]
    fn garbage_is_decode_error() {
        let (_dir, store) = make_store();
        write_raw(&store, &oid('c'), b"definitely not zlib");

        let err = store.read(&oid('c')).unwrap_err();
        assert!(matches!(err, ObjectError::DecodeError { .. }));
        assert!(err.is_localized());
    }

    #[test]
    fn size_mismatch_is_decode_error() {
        let (_dir, store) = make_store();
        write_raw(&store, &oid('d'), &deflate(b"commit 99\0short"));

        let err = store.read(&oid('d')).unwrap_err();
        assert!(err.to_string().contains("declares 99 bytes"));
    }

    #[test]
    fn unknown_kind_is_decode_error() {
        let (_dir, store) = make_store();
        write_raw(&store, &oid('e'), &deflate(b"widget 2\0hi"));

        assert!(matches!(
            store.read(&oid('e')),
            Err(ObjectError::DecodeError { .. })
        ));
    }

    #[test]
    fn non_utf8_body_is_decode_error() {
        let (_dir, store) = make_store();
        write_raw(&store, &oid('f'), &deflate(b"blob 2\0\xff\xfe"));

        let err = store.read(&oid('f')).unwrap_err();
        assert!(err.to_string().contains("not valid UTF-8"));
    }
}
