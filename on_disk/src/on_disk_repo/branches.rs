use std::collections::BTreeMap;
use std::fs;
use std::io;

use tracing::{debug, info};
use walkdir::WalkDir;

use strand_core::object::Id;
use strand_core::path::RepoPath;
use strand_core::repo::{Error, History, Missing, ObjectStore, Result};

use super::refs::check_branch_name;
use super::{Head, OnDisk};
use crate::atomic_write::write_atomic;
use crate::work_tree::FileStatus;

impl OnDisk {
    /// Create a branch pointing at the current `HEAD` commit.
    ///
    /// Fails with `BranchExists` if the name is taken and `NotFound(Head)`
    /// if there is no commit to point at yet.
    pub fn create_branch(&mut self, name: &str) -> Result<Id> {
        check_branch_name(name)?;
        if self.branch_exists(name)? {
            return Err(Error::BranchExists(name.to_string()));
        }

        let target = self.head_commit()?.id();
        self.set_branch_target(name, &target)?;

        info!(branch = %name, commit = %target.short(), "Created branch");
        Ok(target)
    }

    /// List every branch and its head commit, sorted by name.
    pub fn branches(&self) -> Result<Vec<(String, Id)>> {
        let heads_dir = self.heads_dir();
        let mut branches = Vec::new();

        for entry in WalkDir::new(&heads_dir) {
            let entry = entry.map_err(io::Error::from)?;
            if !entry.file_type().is_file() {
                continue;
            }

            let name = entry
                .path()
                .strip_prefix(&heads_dir)
                .ok()
                .and_then(|rel| rel.to_str())
                .map(|rel| rel.replace(std::path::MAIN_SEPARATOR, "/"));

            let name = match name {
                Some(name) if check_branch_name(&name).is_ok() => name,
                _ => {
                    debug!(path = %entry.path().display(), "Ignoring stray file in refs/heads");
                    continue;
                }
            };

            if let Some(id) = self.branch_target(&name)? {
                branches.push((name, id));
            }
        }

        branches.sort();
        Ok(branches)
    }

    /// Return the name of the branch `HEAD` follows, or `None` if detached.
    pub fn current_branch(&self) -> Result<Option<String>> {
        match self.head()? {
            Head::Branch(name) => Ok(Some(name)),
            Head::Detached(_) => Ok(None),
        }
    }

    /// Return every file visible at `head`: the union of the file tables
    /// along its first-parent history, newest entry winning.
    ///
    /// A commit records only the paths staged for it, so a file committed
    /// earlier on the branch is still part of the branch's tree.
    pub fn snapshot(&self, head: &Id) -> Result<BTreeMap<RepoPath, Id>> {
        self.require_commit(head, "snapshot")?;

        let mut files = BTreeMap::new();
        for commit in History::new(self, Some(*head), 0) {
            for (path, id) in commit.files() {
                files.entry(path.clone()).or_insert(*id);
            }
        }
        Ok(files)
    }

    /// Switch the work dir and `HEAD` to another branch.
    ///
    /// Refuses with `DirtyWorkTree` if any file is staged or modified, since
    /// those changes would be lost. Otherwise files in the current branch's
    /// snapshot but absent from the target's are removed, and every file in
    /// the target's snapshot is written. Untracked files are left alone.
    pub fn checkout_branch(&mut self, name: &str) -> Result<Id> {
        check_branch_name(name)?;
        let target_id = self
            .branch_target(name)?
            .ok_or_else(|| Error::NotFound(Missing::Branch(name.to_string())))?;
        let target = self.snapshot(&target_id)?;

        let mut work_tree = self.work_tree()?;
        work_tree.update_status()?;

        let dirty: Vec<String> = work_tree
            .files()
            .into_iter()
            .filter(|e| e.status == FileStatus::Staged || e.status == FileStatus::Modified)
            .map(|e| e.path.to_string())
            .collect();
        if !dirty.is_empty() {
            return Err(Error::DirtyWorkTree(dirty));
        }

        let mut removed: Vec<RepoPath> = Vec::new();
        if let Some(current_id) = self.head_id()? {
            for path in self.snapshot(&current_id)?.keys() {
                if target.contains_key(path) {
                    continue;
                }

                match fs::remove_file(path.to_fs_path(&self.work_dir)) {
                    Ok(()) => {}
                    Err(err) if err.kind() == io::ErrorKind::NotFound => {}
                    Err(err) => return Err(err.into()),
                }
                removed.push(path.clone());
            }
        }

        for (path, id) in &target {
            let content = self.get_blob(id).map_err(|err| match err {
                Error::NotFound(_) => Error::Corruption(format!(
                    "branch {} references missing blob {}",
                    name, id
                )),
                err => err,
            })?;

            let fs_path = path.to_fs_path(&self.work_dir);
            if let Some(dir) = fs_path.parent() {
                fs::create_dir_all(dir)?;
            }
            write_atomic(&fs_path, &content)?;
        }

        work_tree.record_checkout(&target, &removed)?;
        self.write_head(&Head::Branch(name.to_string()))?;

        info!(
            branch = %name,
            commit = %target_id.short(),
            files = target.len(),
            removed = removed.len(),
            "Checked out branch"
        );
        Ok(target_id)
    }
}
