use std::collections::BTreeSet;
use std::fs;
use std::io;

use strand_core::diff::{diff_text, FileDiff};
use strand_core::object::{hash_bytes, Id};
use strand_core::path::RepoPath;
use strand_core::repo::{ObjectStore, Result};

use super::OnDisk;

const NO_FILE: &str = "/dev/null";

impl OnDisk {
    /// Compare the file tables of two commits.
    ///
    /// Returns one diff per path whose content differs, sorted by path. A
    /// path present on only one side is diffed against empty text labeled
    /// `/dev/null`.
    pub fn diff_commits(&self, old: &Id, new: &Id, context: usize) -> Result<Vec<FileDiff>> {
        let old = self.require_commit(old, "diff")?;
        let new = self.require_commit(new, "diff")?;

        let paths: BTreeSet<&RepoPath> = old.files().keys().chain(new.files().keys()).collect();

        let mut diffs = Vec::new();
        for path in paths {
            let old_id = old.files().get(path);
            let new_id = new.files().get(path);
            if old_id == new_id {
                continue;
            }

            let old_text = self.blob_text(old_id)?;
            let new_text = self.blob_text(new_id)?;
            let old_label = label("a", path, old_id.is_some());
            let new_label = label("b", path, new_id.is_some());
            diffs.push(diff_text(&old_text, &new_text, context).with_labels(&old_label, &new_label));
        }

        Ok(diffs)
    }

    /// Compare the head commit with the work dir.
    ///
    /// Only paths in the head commit's file table are considered; untracked
    /// files are not diffed. Returns an empty list on a branch with no
    /// commits yet.
    pub fn diff_work_tree(&self, context: usize) -> Result<Vec<FileDiff>> {
        let head = match self.head_id()? {
            Some(id) => self.require_commit(&id, "HEAD")?,
            None => return Ok(Vec::new()),
        };

        let mut diffs = Vec::new();
        for (path, id) in head.files() {
            let current = match fs::read(path.to_fs_path(&self.work_dir)) {
                Ok(content) => Some(content),
                Err(err) if err.kind() == io::ErrorKind::NotFound => None,
                Err(err) => return Err(err.into()),
            };

            if let Some(content) = &current {
                if hash_bytes(content) == *id {
                    continue;
                }
            }

            let old_text = self.blob_text(Some(id))?;
            let new_text = current
                .as_deref()
                .map(String::from_utf8_lossy)
                .unwrap_or_default();

            let new_label = label("b", path, current.is_some());
            diffs.push(
                diff_text(&old_text, &new_text, context)
                    .with_labels(&label("a", path, true), &new_label),
            );
        }

        Ok(diffs)
    }

    fn blob_text(&self, id: Option<&Id>) -> Result<String> {
        match id {
            Some(id) => {
                let content = self.get_blob(id)?;
                Ok(String::from_utf8_lossy(&content).into_owned())
            }
            None => Ok(String::new()),
        }
    }
}

fn label(side: &str, path: &RepoPath, present: bool) -> String {
    if present {
        format!("{}/{}", side, path)
    } else {
        NO_FILE.to_string()
    }
}
