use std::collections::BTreeMap;
use std::str;

use thiserror::Error;

use super::parse_utils::{find, header, rfind, split_once};
use super::{hash_bytes, Attribution, Id, Kind, Object, ParseIdError};
use crate::path::RepoPath;

/// An immutable snapshot record.
///
/// A commit names its parents by ID and maps each repo path it records to
/// the ID of a blob. Its own ID is the SHA-256 digest of its canonical
/// serialization (see [`to_bytes()`](Commit::to_bytes)), so any change to
/// the message, parents, attribution, or file table yields a different ID.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Commit {
    id: Id,
    message: String,
    author: Attribution,
    parents: Vec<Id>,
    files: BTreeMap<RepoPath, Id>,
}

/// Reasons why a stored commit body can not be accepted.
#[derive(Clone, Debug, Eq, Error, PartialEq)]
pub enum CommitParseError {
    #[error("commit is missing the blank line after its headers")]
    MissingSeparator,

    #[error("unexpected commit header line {0:?}")]
    BadHeader(String),

    #[error("invalid parent ID: {0}")]
    BadParent(#[from] ParseIdError),

    #[error("invalid author or committer line")]
    BadAttribution,

    #[error("invalid file table entry {0:?}")]
    BadFileEntry(String),

    #[error("commit is not valid UTF-8")]
    NotUtf8,

    #[error("commit is not in canonical form")]
    NonCanonical,
}

impl Commit {
    /// Build a new commit record and compute its ID.
    ///
    /// Trailing carriage returns and line feeds are stripped from `message`.
    pub fn new(
        message: &str,
        author: Attribution,
        parents: Vec<Id>,
        files: BTreeMap<RepoPath, Id>,
    ) -> Commit {
        let message = message.trim_end_matches(&['\r', '\n'][..]);
        let mut commit = Commit {
            id: hash_bytes(b""),
            message: message.to_string(),
            author,
            parents,
            files,
        };
        commit.id = hash_bytes(&commit.to_bytes());
        commit
    }

    /// Parse a commit body as produced by [`to_bytes()`](Commit::to_bytes).
    ///
    /// The result is serialized again and must match `body` byte for byte.
    pub fn parse(body: &[u8]) -> Result<Commit, CommitParseError> {
        let sep = find(body, b"\n\n").ok_or(CommitParseError::MissingSeparator)?;
        let headers = &body[..sep + 1];
        let rest = &body[sep + 2..];

        let mut parents = Vec::new();
        let mut author: Option<Attribution> = None;
        let mut committer_seen = false;

        for line in headers[..headers.len() - 1].split(|b| *b == b'\n') {
            if let Some(value) = header(line, b"parent") {
                if author.is_some() {
                    return Err(bad_header(line));
                }
                let hex = str::from_utf8(value).map_err(|_| CommitParseError::NotUtf8)?;
                parents.push(hex.parse::<Id>()?);
            } else if let Some(value) = header(line, b"author") {
                if author.is_some() {
                    return Err(bad_header(line));
                }
                author = Some(Attribution::parse(value).ok_or(CommitParseError::BadAttribution)?);
            } else if let Some(value) = header(line, b"committer") {
                if author.is_none() || committer_seen {
                    return Err(bad_header(line));
                }
                Attribution::parse(value).ok_or(CommitParseError::BadAttribution)?;
                committer_seen = true;
            } else {
                return Err(bad_header(line));
            }
        }

        let author = match author {
            Some(author) if committer_seen => author,
            _ => return Err(CommitParseError::BadAttribution),
        };

        let table_sep = rfind(rest, b"\n\n").ok_or(CommitParseError::MissingSeparator)?;
        let message =
            str::from_utf8(&rest[..table_sep]).map_err(|_| CommitParseError::NotUtf8)?;

        let mut files = BTreeMap::new();
        let table = &rest[table_sep + 2..];
        if !table.is_empty() {
            if table.last() != Some(&b'\n') {
                return Err(bad_entry(table));
            }
            for line in table[..table.len() - 1].split(|b| *b == b'\n') {
                let (path, hex) = split_once(line, &b'\t');
                let path = str::from_utf8(path).map_err(|_| CommitParseError::NotUtf8)?;
                let path = RepoPath::new(path).map_err(|_| bad_entry(line))?;
                let id = str::from_utf8(hex)
                    .ok()
                    .and_then(|hex| hex.parse::<Id>().ok())
                    .ok_or_else(|| bad_entry(line))?;
                if files.insert(path, id).is_some() {
                    return Err(bad_entry(line));
                }
            }
        }

        let commit = Commit::new(message, author, parents, files);
        if commit.to_bytes() != body {
            return Err(CommitParseError::NonCanonical);
        }

        Ok(commit)
    }

    /// Return the canonical serialization of this commit.
    ///
    /// ```text
    /// parent <hex>              (one per parent, in order)
    /// author <attribution>
    /// committer <attribution>   (same as author)
    ///
    /// <message>
    ///
    /// <path>\t<hex>             (one per file, sorted by path)
    /// ```
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut out = String::new();

        for parent in &self.parents {
            out.push_str("parent ");
            out.push_str(&parent.to_string());
            out.push('\n');
        }

        let attribution = self.author.to_string();
        out.push_str("author ");
        out.push_str(&attribution);
        out.push_str("\ncommitter ");
        out.push_str(&attribution);
        out.push_str("\n\n");

        out.push_str(&self.message);
        out.push_str("\n\n");

        for (path, id) in &self.files {
            out.push_str(path.as_str());
            out.push('\t');
            out.push_str(&id.to_string());
            out.push('\n');
        }

        out.into_bytes()
    }

    /// Wrap this commit as an [`Object`] ready to be written to a store.
    pub fn to_object(&self) -> Object {
        Object::with_id(Kind::Commit, Box::new(self.to_bytes()), self.id)
    }

    /// Return the ID of this commit.
    pub fn id(&self) -> Id {
        self.id
    }

    /// Return the commit message.
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Return the author (and committer) attribution.
    pub fn author(&self) -> &Attribution {
        &self.author
    }

    /// Return the parent IDs in order.
    pub fn parents(&self) -> &[Id] {
        &self.parents
    }

    /// Return the first parent, if any.
    pub fn first_parent(&self) -> Option<Id> {
        self.parents.first().copied()
    }

    /// Returns true if this commit has no parents.
    pub fn is_root(&self) -> bool {
        self.parents.is_empty()
    }

    /// Returns true if this commit has more than one parent.
    pub fn is_merge(&self) -> bool {
        self.parents.len() > 1
    }

    /// Return the file table.
    pub fn files(&self) -> &BTreeMap<RepoPath, Id> {
        &self.files
    }

    /// Look up the blob ID recorded for a path.
    pub fn file(&self, path: &str) -> Option<Id> {
        self.files.get(path).copied()
    }
}

fn bad_header(line: &[u8]) -> CommitParseError {
    CommitParseError::BadHeader(String::from_utf8_lossy(line).into_owned())
}

fn bad_entry(line: &[u8]) -> CommitParseError {
    CommitParseError::BadFileEntry(String::from_utf8_lossy(line).into_owned())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn author() -> Attribution {
        Attribution::new("A U Thor", "author@example.com", 1_142_878_501)
    }

    fn files(entries: &[(&str, &[u8])]) -> BTreeMap<RepoPath, Id> {
        entries
            .iter()
            .map(|(path, content)| (RepoPath::new(path).unwrap(), hash_bytes(content)))
            .collect()
    }

    #[test]
    fn canonical_form() {
        let parent = hash_bytes(b"parent");
        let c = Commit::new(
            "Add things\r\n\n",
            author(),
            vec![parent],
            files(&[("z.txt", b"z"), ("a/b.txt", b"b")]),
        );

        let expected = format!(
            "parent {}\nauthor A U Thor <author@example.com> 1142878501 +0000\n\
             committer A U Thor <author@example.com> 1142878501 +0000\n\n\
             Add things\n\na/b.txt\t{}\nz.txt\t{}\n",
            parent,
            hash_bytes(b"b"),
            hash_bytes(b"z")
        );

        assert_eq!(c.message(), "Add things");
        assert_eq!(String::from_utf8(c.to_bytes()).unwrap(), expected);
        assert_eq!(c.id(), hash_bytes(expected.as_bytes()));
    }

    #[test]
    fn accessors() {
        let p1 = hash_bytes(b"p1");
        let p2 = hash_bytes(b"p2");
        let c = Commit::new("m", author(), vec![p1, p2], files(&[("f", b"f")]));

        assert_eq!(c.parents(), &[p1, p2]);
        assert_eq!(c.first_parent(), Some(p1));
        assert!(!c.is_root());
        assert!(c.is_merge());
        assert_eq!(c.file("f"), Some(hash_bytes(b"f")));
        assert_eq!(c.file("g"), None);
        assert_eq!(c.author(), &author());

        let root = Commit::new("m", author(), vec![], files(&[("f", b"f")]));
        assert!(root.is_root());
        assert!(!root.is_merge());
        assert_eq!(root.first_parent(), None);
    }

    #[test]
    fn any_change_changes_id() {
        let base = Commit::new("m", author(), vec![], files(&[("f", b"1")]));

        let other_message = Commit::new("n", author(), vec![], files(&[("f", b"1")]));
        let other_parent = Commit::new("m", author(), vec![base.id()], files(&[("f", b"1")]));
        let other_files = Commit::new("m", author(), vec![], files(&[("f", b"2")]));
        let other_path = Commit::new("m", author(), vec![], files(&[("g", b"1")]));
        let other_author = Commit::new(
            "m",
            Attribution::new("Someone Else", "author@example.com", 1_142_878_501),
            vec![],
            files(&[("f", b"1")]),
        );

        let ids = [
            base.id(),
            other_message.id(),
            other_parent.id(),
            other_files.id(),
            other_path.id(),
            other_author.id(),
        ];
        for (i, a) in ids.iter().enumerate() {
            for b in &ids[i + 1..] {
                assert_ne!(a, b);
            }
        }

        let same = Commit::new("m\n", author(), vec![], files(&[("f", b"1")]));
        assert_eq!(base.id(), same.id());
    }

    #[test]
    fn parse_round_trip() {
        let c = Commit::new(
            "Subject\n\nBody with\n\nblank lines",
            author(),
            vec![hash_bytes(b"a"), hash_bytes(b"b")],
            files(&[("dir/one", b"1"), ("two", b"2")]),
        );

        let parsed = Commit::parse(&c.to_bytes()).unwrap();
        assert_eq!(parsed, c);
        assert_eq!(parsed.message(), "Subject\n\nBody with\n\nblank lines");
    }

    #[test]
    fn parse_empty_message_and_table() {
        let c = Commit::new("", author(), vec![], BTreeMap::new());
        assert_eq!(Commit::parse(&c.to_bytes()).unwrap(), c);
    }

    #[test]
    fn parse_keeps_timezone() {
        let body = format!(
            "author Me <me@example.com> 1 -0700\ncommitter Me <me@example.com> 1 -0700\n\nm\n\nf\t{}\n",
            hash_bytes(b"f")
        );
        let c = Commit::parse(body.as_bytes()).unwrap();
        assert_eq!(c.author().tz_offset(), -420);
        assert_eq!(c.to_bytes(), body.as_bytes());
    }

    #[test]
    fn parse_rejects_non_canonical() {
        let c = Commit::new("m", author(), vec![], files(&[("f", b"f")]));
        let text = String::from_utf8(c.to_bytes()).unwrap();

        let reordered = text.replacen("author", "xauthor", 1);
        assert_eq!(
            Commit::parse(reordered.as_bytes()),
            Err(CommitParseError::BadHeader(
                "xauthor A U Thor <author@example.com> 1142878501 +0000".to_string()
            ))
        );

        let other_committer = text.replacen(
            "committer A U Thor",
            "committer Someone Else",
            1,
        );
        assert_eq!(
            Commit::parse(other_committer.as_bytes()),
            Err(CommitParseError::NonCanonical)
        );

        let trailing_message_newline = text.replacen("m\n\n", "m\n\n\n", 1);
        assert_eq!(
            Commit::parse(trailing_message_newline.as_bytes()),
            Err(CommitParseError::NonCanonical)
        );
    }

    #[test]
    fn parse_rejects_unsorted_table() {
        let body = format!(
            "author Me <me@example.com> 1 +0000\ncommitter Me <me@example.com> 1 +0000\n\nm\n\nb\t{}\na\t{}\n",
            hash_bytes(b"b"),
            hash_bytes(b"a")
        );
        assert_eq!(
            Commit::parse(body.as_bytes()),
            Err(CommitParseError::NonCanonical)
        );
    }

    #[test]
    fn parse_errors() {
        assert_eq!(
            Commit::parse(b"author Me <me@example.com> 1 +0000\n"),
            Err(CommitParseError::MissingSeparator)
        );

        assert_eq!(
            Commit::parse(b"parent xyz\nauthor Me <m> 1 +0000\ncommitter Me <m> 1 +0000\n\nm\n\n"),
            Err(CommitParseError::BadParent(ParseIdError::Underflow))
        );

        assert_eq!(
            Commit::parse(b"author Me 1 +0000\ncommitter Me <m> 1 +0000\n\nm\n\n"),
            Err(CommitParseError::BadAttribution)
        );

        assert_eq!(
            Commit::parse(b"author Me <m> 1 +0000\n\nm\n\n"),
            Err(CommitParseError::BadAttribution)
        );

        assert_eq!(
            Commit::parse(b"author Me <m> 1 +0000\ncommitter Me <m> 1 +0000\n\nm\n\n../x\tabc\n"),
            Err(CommitParseError::BadFileEntry("../x\tabc".to_string()))
        );

        assert_eq!(
            Commit::parse(b"author Me <m> 1 +0000\ncommitter Me <m> 1 +0000\n\n\xff\n\n"),
            Err(CommitParseError::NotUtf8)
        );
    }

    #[test]
    fn to_object() {
        let c = Commit::new("m", author(), vec![], files(&[("f", b"f")]));
        let mut o = c.to_object();
        assert_eq!(o.kind(), Kind::Commit);
        assert_eq!(o.id(), Some(c.id()));
        assert_eq!(o.content().unwrap(), c.to_bytes());

        // The trusted ID agrees with a fresh digest of the body.
        let mut fresh = Object::new(Kind::Commit, Box::new(c.to_bytes()));
        assert_eq!(fresh.assign_id().unwrap(), o.assign_id().unwrap());
    }
}
