use std::path::{Path, PathBuf};

use tracing::info;

use strand_core::remote::{PushOutcome, Remote};
use strand_core::repo::{Error, Missing, Result};

use super::refs::check_branch_name;
use super::{Head, OnDisk};
use crate::DirectoryRemote;

impl OnDisk {
    /// Register another repository's work dir as a push target.
    ///
    /// Names follow the same rules as branch names. A relative path is
    /// resolved against this repository's work dir when pushing.
    pub fn add_remote(&mut self, name: &str, path: &Path) -> Result<()> {
        if check_branch_name(name).is_err() {
            return Err(Error::Config(format!("invalid remote name: {}", name)));
        }
        if self.config.remotes.contains_key(name) {
            return Err(Error::Config(format!("remote {} already exists", name)));
        }

        let location = path.to_str().ok_or_else(|| {
            Error::Config(format!("remote path is not UTF-8: {}", path.display()))
        })?;

        let mut config = self.config.clone();
        config.remotes.insert(name.to_string(), location.to_string());
        self.set_config(config)?;

        info!(remote = %name, path = %location, "Added remote");
        Ok(())
    }

    /// Forget a registered remote.
    pub fn remove_remote(&mut self, name: &str) -> Result<()> {
        let mut config = self.config.clone();
        if config.remotes.remove(name).is_none() {
            return Err(Error::NotFound(Missing::Remote(name.to_string())));
        }

        self.set_config(config)?;
        info!(remote = %name, "Removed remote");
        Ok(())
    }

    /// List registered remotes and their locations, sorted by name.
    pub fn remotes(&self) -> Vec<(String, PathBuf)> {
        self.config
            .remotes
            .iter()
            .map(|(name, location)| (name.clone(), PathBuf::from(location)))
            .collect()
    }

    /// Push a branch (the current branch if `None`) to a registered remote.
    ///
    /// The remote branch of the same name is created or fast-forwarded.
    pub fn push(&self, remote: &str, branch: Option<&str>) -> Result<PushOutcome> {
        let location = self
            .config
            .remotes
            .get(remote)
            .ok_or_else(|| Error::NotFound(Missing::Remote(remote.to_string())))?;

        let branch = match branch {
            Some(name) => name.to_string(),
            None => match self.head()? {
                Head::Branch(name) => name,
                Head::Detached(_) => return Err(Error::DetachedHead),
            },
        };

        let head_id = self
            .branch_target(&branch)?
            .ok_or_else(|| Error::NotFound(Missing::Branch(branch.clone())))?;
        let head = self.require_commit(&head_id, &branch)?;

        let mut target = DirectoryRemote::open(remote, &self.work_dir.join(location))?;
        target.push(&branch, &head, self)
    }
}
