//! A remote that is another strand repository on the local file system.

use std::collections::HashSet;
use std::path::Path;
use std::sync::Arc;

use tracing::{debug, info};

use strand_core::object::{Commit, Id};
use strand_core::remote::{PushOutcome, Remote};
use strand_core::repo::{Error, ObjectStore, Result};

use crate::OnDisk;

/// Pushes commits into the object store and branches of a repository in
/// another directory. The target's work dir and index are not touched.
#[derive(Debug)]
pub struct DirectoryRemote {
    name: String,
    repo: OnDisk,
}

impl DirectoryRemote {
    /// Open the repository whose work dir is `path` as a remote called
    /// `name`.
    pub fn open(name: &str, path: &Path) -> Result<DirectoryRemote> {
        Ok(DirectoryRemote {
            name: name.to_string(),
            repo: OnDisk::new(path)?,
        })
    }

    /// Return the target repository.
    pub fn repo(&self) -> &OnDisk {
        &self.repo
    }

    /// Return the commits reachable from `head` that the target lacks,
    /// parents before children.
    fn missing_commits(&self, head: &Id, source: &dyn ObjectStore) -> Result<Vec<Arc<Commit>>> {
        let mut order = Vec::new();
        let mut visited = HashSet::new();
        let mut stack = vec![(*head, None)];

        while let Some((id, loaded)) = stack.pop() {
            if let Some(commit) = loaded {
                order.push(commit);
                continue;
            }

            if !visited.insert(id) || self.repo.contains_object(&id) {
                continue;
            }

            let commit = source_commit(source, &id)?;
            let parents = commit.parents().to_vec();
            stack.push((id, Some(commit)));
            stack.extend(parents.into_iter().rev().map(|parent| (parent, None)));
        }

        Ok(order)
    }

    fn copy_object(&mut self, id: &Id, source: &dyn ObjectStore) -> Result<()> {
        if self.repo.contains_object(id) {
            return Ok(());
        }

        let mut object = source.get_object(id).map_err(|err| {
            if err.is_not_found() {
                Error::Corruption(format!("pushed history references missing object {}", id))
            } else {
                err
            }
        })?;
        self.repo.put_object(&mut object)?;
        Ok(())
    }
}

impl Remote for DirectoryRemote {
    fn name(&self) -> &str {
        &self.name
    }

    /// Objects are copied before the branch moves, so an interrupted push
    /// leaves the target branch on a complete commit.
    fn push(
        &mut self,
        branch: &str,
        head: &Commit,
        source: &dyn ObjectStore,
    ) -> Result<PushOutcome> {
        let head_id = head.id();
        let current = self.repo.branch_target(branch)?;

        if current == Some(head_id) {
            return Ok(PushOutcome::UpToDate);
        }

        if let Some(current) = current {
            if !is_ancestor(source, &current, head)? {
                return Err(Error::NonFastForward {
                    branch: branch.to_string(),
                });
            }
        }

        let commits = self.missing_commits(&head_id, source)?;
        for commit in &commits {
            for blob in commit.files().values() {
                self.copy_object(blob, source)?;
            }
            self.copy_object(&commit.id(), source)?;
        }
        debug!(remote = %self.name, commits = commits.len(), "Copied objects");

        self.repo.set_branch_target(branch, &head_id)?;

        let outcome = match current {
            Some(from) => PushOutcome::FastForward { from },
            None => PushOutcome::Created,
        };

        info!(
            remote = %self.name,
            branch = %branch,
            commit = %head_id.short(),
            outcome = %outcome,
            "Pushed branch"
        );
        Ok(outcome)
    }
}

/// Returns true if `ancestor` is `head` or is reachable from it through any
/// parent.
fn is_ancestor(source: &dyn ObjectStore, ancestor: &Id, head: &Commit) -> Result<bool> {
    if head.id() == *ancestor {
        return Ok(true);
    }

    let mut visited = HashSet::new();
    let mut stack = head.parents().to_vec();

    while let Some(id) = stack.pop() {
        if id == *ancestor {
            return Ok(true);
        }
        if !visited.insert(id) {
            continue;
        }
        stack.extend_from_slice(source_commit(source, &id)?.parents());
    }

    Ok(false)
}

fn source_commit(source: &dyn ObjectStore, id: &Id) -> Result<Arc<Commit>> {
    source.get_commit(id).map_err(|err| {
        if err.is_not_found() {
            Error::Corruption(format!("pushed history references missing commit {}", id))
        } else {
            err
        }
    })
}
