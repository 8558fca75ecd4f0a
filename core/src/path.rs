//! Repository-relative paths.

use std::borrow::Borrow;
use std::fmt;
use std::path::{Component, Path, PathBuf};
use std::str::FromStr;

use thiserror::Error;
use unicode_normalization::UnicodeNormalization;

/// Name of the metadata directory at the top of every work tree.
///
/// No path segment may use this name.
pub const META_DIR: &str = ".strand";

/// A path to a file inside a work tree, relative to its top-level directory.
///
/// Segments are separated by `/` regardless of platform and the whole path
/// is stored in Unicode normalization form C, so two spellings of the same
/// name compare (and hash) equal.
#[derive(Clone, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct RepoPath {
    path: String,
}

/// Reasons why a string can not be accepted as a repo path.
#[derive(Clone, Copy, Debug, Eq, Error, PartialEq)]
pub enum PathError {
    #[error("path is empty")]
    EmptyPath,

    #[error("path is absolute")]
    AbsolutePath,

    #[error("path ends with a slash")]
    TrailingSlash,

    #[error("path contains an empty segment")]
    DuplicateSlash,

    #[error("path contains a NUL byte")]
    ContainsNull,

    #[error("path contains a tab or line break")]
    ContainsControl,

    #[error("path contains a `.` or `..` segment")]
    DotSegment,

    #[error("path names the metadata directory")]
    MetaDir,

    #[error("path is not valid UTF-8")]
    NotUtf8,
}

impl RepoPath {
    /// Convert the provided string to a `RepoPath` if it is acceptable as a
    /// repo path.
    pub fn new(path: &str) -> Result<RepoPath, PathError> {
        let path: String = path.nfc().collect();
        check_path(&path)?;
        Ok(RepoPath { path })
    }

    /// Convert a relative file system path (as produced by stripping the work
    /// dir prefix from a file's path) to a `RepoPath`.
    pub fn from_relative(path: &Path) -> Result<RepoPath, PathError> {
        let mut segments = Vec::new();

        for component in path.components() {
            match component {
                Component::Normal(segment) => {
                    segments.push(segment.to_str().ok_or(PathError::NotUtf8)?)
                }
                Component::CurDir | Component::ParentDir => return Err(PathError::DotSegment),
                Component::RootDir | Component::Prefix(_) => {
                    return Err(PathError::AbsolutePath)
                }
            }
        }

        RepoPath::new(&segments.join("/"))
    }

    /// Return the path as a string.
    pub fn as_str(&self) -> &str {
        &self.path
    }

    /// Return the location of this path beneath `root` on the local file system.
    pub fn to_fs_path(&self, root: &Path) -> PathBuf {
        let mut fs_path = root.to_path_buf();
        fs_path.extend(self.path.split('/'));
        fs_path
    }

    /// Returns true if this path is `dir` or lies beneath it.
    pub fn starts_with_dir(&self, dir: &str) -> bool {
        let dir = dir.trim_end_matches('/');
        dir.is_empty()
            || self.path == dir
            || (self.path.starts_with(dir) && self.path[dir.len()..].starts_with('/'))
    }
}

fn check_path(path: &str) -> Result<(), PathError> {
    if path.is_empty() {
        Err(PathError::EmptyPath)
    } else if path.starts_with('/') {
        Err(PathError::AbsolutePath)
    } else if path.ends_with('/') {
        Err(PathError::TrailingSlash)
    } else {
        for segment in path.split('/') {
            match check_segment(segment) {
                Err(PathError::EmptyPath) => Err(PathError::DuplicateSlash),
                x => x,
            }?;
        }
        Ok(())
    }
}

fn check_segment(segment: &str) -> Result<(), PathError> {
    if segment.is_empty() {
        Err(PathError::EmptyPath)
    } else if segment.contains('\0') {
        Err(PathError::ContainsNull)
    } else if segment.contains(&['\t', '\r', '\n'][..]) {
        Err(PathError::ContainsControl)
    } else if segment == "." || segment == ".." {
        Err(PathError::DotSegment)
    } else if segment == META_DIR {
        Err(PathError::MetaDir)
    } else {
        Ok(())
    }
}

impl Borrow<str> for RepoPath {
    fn borrow(&self) -> &str {
        &self.path
    }
}

impl AsRef<str> for RepoPath {
    fn as_ref(&self) -> &str {
        &self.path
    }
}

impl FromStr for RepoPath {
    type Err = PathError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        RepoPath::new(s)
    }
}

impl fmt::Display for RepoPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn legal_paths() {
        assert_eq!(RepoPath::new("a").unwrap().as_str(), "a");
        assert_eq!(RepoPath::new("a/b").unwrap().as_str(), "a/b");
        assert_eq!(RepoPath::new("a/b/.hidden").unwrap().as_str(), "a/b/.hidden");
        assert_eq!(RepoPath::new("...").unwrap().as_str(), "...");
        assert_eq!(RepoPath::new(".strandx").unwrap().as_str(), ".strandx");
        assert_eq!(RepoPath::new("with space").unwrap().as_str(), "with space");
    }

    #[test]
    fn normalizes_to_nfc() {
        let decomposed = RepoPath::new("cafe\u{301}").unwrap();
        let composed = RepoPath::new("caf\u{e9}").unwrap();
        assert_eq!(decomposed, composed);
        assert_eq!(decomposed.as_str(), "caf\u{e9}");
    }

    #[test]
    fn illegal_paths() {
        assert_eq!(RepoPath::new(""), Err(PathError::EmptyPath));
        assert_eq!(RepoPath::new("/a"), Err(PathError::AbsolutePath));
        assert_eq!(RepoPath::new("a/"), Err(PathError::TrailingSlash));
        assert_eq!(RepoPath::new("a//b"), Err(PathError::DuplicateSlash));
        assert_eq!(RepoPath::new("a\0b"), Err(PathError::ContainsNull));
        assert_eq!(RepoPath::new("a\tb"), Err(PathError::ContainsControl));
        assert_eq!(RepoPath::new("a\nb"), Err(PathError::ContainsControl));
        assert_eq!(RepoPath::new("a\r"), Err(PathError::ContainsControl));
        assert_eq!(RepoPath::new("./a"), Err(PathError::DotSegment));
        assert_eq!(RepoPath::new("a/../b"), Err(PathError::DotSegment));
        assert_eq!(RepoPath::new(".strand"), Err(PathError::MetaDir));
        assert_eq!(RepoPath::new("a/.strand/b"), Err(PathError::MetaDir));
    }

    #[test]
    fn from_relative() {
        let p = RepoPath::from_relative(Path::new("a").join("b").as_path()).unwrap();
        assert_eq!(p.as_str(), "a/b");

        assert_eq!(
            RepoPath::from_relative(Path::new("../a")),
            Err(PathError::DotSegment)
        );
        assert_eq!(
            RepoPath::from_relative(Path::new("/a")),
            Err(PathError::AbsolutePath)
        );
        assert_eq!(RepoPath::from_relative(Path::new("")), Err(PathError::EmptyPath));
    }

    #[test]
    fn to_fs_path() {
        let root = Path::new("root");
        let p = RepoPath::new("a/b.txt").unwrap();
        assert_eq!(p.to_fs_path(root), root.join("a").join("b.txt"));
    }

    #[test]
    fn starts_with_dir() {
        let p = RepoPath::new("src/lib.rs").unwrap();
        assert!(p.starts_with_dir("src"));
        assert!(p.starts_with_dir("src/"));
        assert!(p.starts_with_dir("src/lib.rs"));
        assert!(p.starts_with_dir(""));
        assert!(!p.starts_with_dir("sr"));
        assert!(!p.starts_with_dir("src/lib"));
    }

    #[test]
    fn ordering_and_display() {
        let mut paths = vec![
            RepoPath::new("b").unwrap(),
            RepoPath::new("a/z").unwrap(),
            RepoPath::new("a").unwrap(),
        ];
        paths.sort();
        let strs: Vec<String> = paths.iter().map(|p| p.to_string()).collect();
        assert_eq!(strs, vec!["a", "a/z", "b"]);

        let p: RepoPath = "x/y".parse().unwrap();
        assert_eq!(format!("{}", p), "x/y");
    }
}
