use std::collections::BTreeMap;
use std::sync::Arc;

use tracing::info;

use strand_core::object::{Attribution, Commit, FileContentSource, Id, Kind, Object};
use strand_core::path::RepoPath;
use strand_core::repo::{Error, History, Missing, ObjectStore, Result};

use super::{Head, OnDisk};

impl OnDisk {
    /// Create a commit on the current branch from the named work-tree files.
    ///
    /// Every path is validated and must name an existing file before
    /// anything is written. Blobs are stored first, then the commit, and
    /// only then is the branch moved, so a crash at any point leaves the
    /// branch on a complete commit. The new commit's first parent is the
    /// branch's previous head.
    ///
    /// Fails with `EmptyStage` if `staged_paths` is empty, `DetachedHead` if
    /// `HEAD` names no branch, and `Corruption` if the branch points at a
    /// commit that can not be read.
    pub fn create_commit<S: AsRef<str>>(
        &mut self,
        message: &str,
        staged_paths: &[S],
    ) -> Result<Id> {
        if staged_paths.is_empty() {
            return Err(Error::EmptyStage);
        }

        let branch = match self.head()? {
            Head::Branch(name) => name,
            Head::Detached(_) => return Err(Error::DetachedHead),
        };

        let parent = match self.branch_target(&branch)? {
            Some(id) => Some(self.require_commit(&id, &branch)?.id()),
            None => None,
        };

        let mut sources = Vec::with_capacity(staged_paths.len());
        for path in staged_paths {
            let path = path.as_ref();
            let repo_path =
                RepoPath::new(path).map_err(|err| Error::InvalidPath(path.to_string(), err))?;

            let fs_path = repo_path.to_fs_path(&self.work_dir);
            if !fs_path.is_file() {
                return Err(Error::NotFound(Missing::Path(repo_path.to_string())));
            }
            sources.push((repo_path, fs_path));
        }

        let mut files = BTreeMap::new();
        for (repo_path, fs_path) in sources {
            let content = FileContentSource::new(&fs_path)?;
            let id = self.put_object(&mut Object::new(Kind::Blob, Box::new(content)))?;
            files.insert(repo_path, id);
        }

        let (name, email) = self.config.author();
        let commit = Commit::new(
            message,
            Attribution::now(&name, &email),
            parent.into_iter().collect(),
            files,
        );

        for id in commit.parents().iter().chain(commit.files().values()) {
            if !self.contains_object(id) {
                return Err(Error::Corruption(format!(
                    "commit would reference missing object {}",
                    id
                )));
            }
        }

        let id = self.put_object(&mut commit.to_object())?;
        self.set_branch_target(&branch, &id)?;

        info!(
            commit = %id.short(),
            branch = %branch,
            files = commit.files().len(),
            "Created commit"
        );

        self.commits.write().insert(id, Arc::new(commit));
        Ok(id)
    }

    /// Commit everything staged in the work tree and mark it committed.
    pub fn commit_staged(&mut self, message: &str) -> Result<Id> {
        let mut work_tree = self.work_tree()?;

        let staged: Vec<String> = work_tree
            .staged_files()
            .iter()
            .map(|entry| entry.path.to_string())
            .collect();

        let id = self.create_commit(message, &staged)?;
        let commit = self.get_commit(&id)?;
        work_tree.record_commit(&commit)?;

        Ok(id)
    }

    /// Return the commit `HEAD` resolves to.
    ///
    /// `NotFound(Head)` means the current branch has no commits yet;
    /// `Corruption` means it points at a commit that can not be read.
    pub fn head_commit(&self) -> Result<Arc<Commit>> {
        let id = self.head_id()?.ok_or(Error::NotFound(Missing::Head))?;
        self.require_commit(&id, "HEAD")
    }

    /// Walk first-parent history from `HEAD`, newest first. `max_count` of
    /// zero means no limit. An empty branch yields an empty walk.
    pub fn history(&self, max_count: usize) -> Result<History<'_, OnDisk>> {
        Ok(History::new(self, self.head_id()?, max_count))
    }

    /// Load a commit that a reference claims exists. A missing commit here
    /// means the reference is corrupt.
    pub(super) fn require_commit(&self, id: &Id, reference: &str) -> Result<Arc<Commit>> {
        self.get_commit(id).map_err(|err| match err {
            Error::NotFound(_) => {
                Error::Corruption(format!("{} points at missing commit {}", reference, id))
            }
            err => err,
        })
    }
}
