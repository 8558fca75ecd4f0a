//! HEAD and branch references.
//!
//! `HEAD` holds either `ref: refs/heads/<name>` or a raw commit ID. Each
//! branch is a file under `refs/heads` holding its head commit's ID.

use std::fs;
use std::io;
use std::path::PathBuf;

use strand_core::object::Id;
use strand_core::repo::{Error, Missing, Result};

use super::OnDisk;
use crate::atomic_write::write_atomic;

const HEAD_REF_PREFIX: &str = "ref: refs/heads/";

/// What `HEAD` points at.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Head {
    /// A named branch. New commits advance this branch.
    Branch(String),

    /// A specific commit. Readable, but new commits require a branch.
    Detached(Id),
}

impl OnDisk {
    /// Read `HEAD`.
    pub fn head(&self) -> Result<Head> {
        let path = self.meta_dir.join("HEAD");
        let text = fs::read_to_string(&path)?;
        let text = text.trim_end();

        if let Some(name) = text.strip_prefix(HEAD_REF_PREFIX) {
            check_branch_name(name)?;
            return Ok(Head::Branch(name.to_string()));
        }

        text.parse::<Id>().map(Head::Detached).map_err(|err| {
            Error::Corruption(format!("HEAD is neither a branch nor an ID: {}", err))
        })
    }

    pub(crate) fn write_head(&self, head: &Head) -> Result<()> {
        let text = match head {
            Head::Branch(name) => format!("{}{}\n", HEAD_REF_PREFIX, name),
            Head::Detached(id) => format!("{}\n", id),
        };
        write_atomic(&self.meta_dir.join("HEAD"), text.as_bytes())?;
        Ok(())
    }

    /// Return the commit a branch points at, or `None` if the branch has no
    /// commits yet (or does not exist).
    pub fn branch_target(&self, name: &str) -> Result<Option<Id>> {
        check_branch_name(name)?;

        let text = match fs::read_to_string(self.branch_path(name)) {
            Ok(text) => text,
            Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(err) => return Err(err.into()),
        };

        text.trim_end().parse::<Id>().map(Some).map_err(|err| {
            Error::Corruption(format!("branch {} holds an invalid ID: {}", name, err))
        })
    }

    /// Returns true if a branch file exists for `name`.
    pub fn branch_exists(&self, name: &str) -> Result<bool> {
        check_branch_name(name)?;
        Ok(self.branch_path(name).is_file())
    }

    /// Point a branch at a commit, replacing the branch file atomically.
    pub(crate) fn set_branch_target(&self, name: &str, id: &Id) -> Result<()> {
        check_branch_name(name)?;

        let path = self.branch_path(name);
        if let Some(dir) = path.parent() {
            fs::create_dir_all(dir)?;
        }

        write_atomic(&path, format!("{}\n", id).as_bytes())?;
        Ok(())
    }

    /// Resolve `HEAD` to a commit ID. `None` means the current branch has no
    /// commits yet.
    pub fn head_id(&self) -> Result<Option<Id>> {
        match self.head()? {
            Head::Branch(name) => self.branch_target(&name),
            Head::Detached(id) => Ok(Some(id)),
        }
    }

    /// Resolve a revision name to a commit ID.
    ///
    /// Accepts `HEAD`, a branch name, a full ID, or an unambiguous prefix of
    /// at least four hex digits naming a stored object.
    pub fn resolve(&self, rev: &str) -> Result<Id> {
        if rev == "HEAD" {
            return self.head_id()?.ok_or(Error::NotFound(Missing::Head));
        }

        if check_branch_name(rev).is_ok() {
            if let Some(id) = self.branch_target(rev)? {
                return Ok(id);
            }
        }

        if let Ok(id) = rev.parse::<Id>() {
            return Ok(id);
        }

        self.resolve_prefix(rev)?
            .ok_or_else(|| Error::NotFound(Missing::Branch(rev.to_string())))
    }

    fn resolve_prefix(&self, prefix: &str) -> Result<Option<Id>> {
        let is_hex = prefix
            .bytes()
            .all(|b| b.is_ascii_digit() || (b'a'..=b'f').contains(&b));
        if prefix.len() < 4 || !is_hex {
            return Ok(None);
        }

        let shard = self.objects_dir().join(&prefix[..2]);
        let entries = match fs::read_dir(&shard) {
            Ok(entries) => entries,
            Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(err) => return Err(err.into()),
        };

        let mut found: Option<Id> = None;
        for entry in entries {
            let name = entry?.file_name();
            let name = match name.to_str() {
                Some(name) if name.starts_with(&prefix[2..]) => name,
                _ => continue,
            };

            let id = match format!("{}{}", &prefix[..2], name).parse::<Id>() {
                Ok(id) => id,
                Err(_) => continue,
            };

            if found.is_some() {
                return Err(Error::NotFound(Missing::Branch(format!(
                    "{} (ambiguous ID prefix)",
                    prefix
                ))));
            }
            found = Some(id);
        }

        Ok(found)
    }

    fn branch_path(&self, name: &str) -> PathBuf {
        let mut path = self.heads_dir();
        path.extend(name.split('/'));
        path
    }
}

/// Branch names are `/`-separated segments of ASCII letters, digits, `-`,
/// `_`, and `.`. No segment may be empty or start with `.`, and the name
/// may not start with `-`.
pub(crate) fn check_branch_name(name: &str) -> Result<()> {
    let valid = !name.is_empty()
        && !name.starts_with('-')
        && !name.ends_with(".lock")
        && name.split('/').all(|segment| {
            !segment.is_empty()
                && !segment.starts_with('.')
                && segment
                    .chars()
                    .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_' || c == '.')
        });

    if valid {
        Ok(())
    } else {
        Err(Error::InvalidBranchName(name.to_string()))
    }
}
