//! A repository that stores content on the local file system.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use parking_lot::RwLock;

use strand_core::object::{Commit, Id};
use strand_core::path::META_DIR;
use strand_core::repo::{Error, Result};

use crate::config::Config;
use crate::work_tree::WorkTree;

mod branches;
mod commit;
mod diff;
mod init;
mod objects;
mod refs;
mod remotes;

pub use refs::Head;

/// Handle to a strand repository on the local file system.
///
/// Mutating operations take `&mut self`, so one handle serializes its own
/// writers. Reads take `&self` and share a cache of parsed commits.
/// Coordinating separate processes that open the same repository is up to
/// the caller.
#[derive(Debug)]
pub struct OnDisk {
    work_dir: PathBuf,
    meta_dir: PathBuf,
    config: Config,
    commits: RwLock<HashMap<Id, Arc<Commit>>>,
}

impl OnDisk {
    /// Open an existing on-disk repository.
    ///
    /// `work_dir` should be the top-level working directory. A `.strand`
    /// directory should exist at this path. Use [`init`](OnDisk::init) to
    /// create an empty repository if necessary.
    pub fn new(work_dir: &Path) -> Result<Self> {
        let work_dir = work_dir.to_path_buf();
        if !work_dir.exists() {
            return Err(Error::WorkDirDoesntExist(work_dir));
        }

        let meta_dir = work_dir.join(META_DIR);
        if !meta_dir.exists() {
            return Err(Error::MetaDirDoesntExist(meta_dir));
        }

        let config = Config::load(&meta_dir)?;
        Ok(OnDisk::from_parts(work_dir, meta_dir, config))
    }

    /// Open the repository containing `path`, looking in `path` and then in
    /// each of its ancestors for a `.strand` directory.
    pub fn discover(path: &Path) -> Result<Self> {
        let start = path
            .canonicalize()
            .map_err(|_| Error::WorkDirDoesntExist(path.to_path_buf()))?;

        for dir in start.ancestors() {
            if dir.join(META_DIR).is_dir() {
                return OnDisk::new(dir);
            }
        }

        Err(Error::MetaDirDoesntExist(start.join(META_DIR)))
    }

    fn from_parts(work_dir: PathBuf, meta_dir: PathBuf, config: Config) -> OnDisk {
        OnDisk {
            work_dir,
            meta_dir,
            config,
            commits: RwLock::new(HashMap::new()),
        }
    }

    /// Return the working directory for this repo.
    pub fn work_dir(&self) -> &Path {
        self.work_dir.as_path()
    }

    /// Return the path to the `.strand` directory.
    pub fn meta_dir(&self) -> &Path {
        self.meta_dir.as_path()
    }

    /// Return the configuration loaded when this handle was opened.
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Replace the configuration and write it to `.strand/config`.
    pub fn set_config(&mut self, config: Config) -> Result<()> {
        config.save(&self.meta_dir)?;
        self.config = config;
        Ok(())
    }

    /// Open the working-tree tracker for this repo.
    pub fn work_tree(&self) -> Result<WorkTree> {
        WorkTree::open(self)
    }

    fn objects_dir(&self) -> PathBuf {
        self.meta_dir.join("objects")
    }

    fn heads_dir(&self) -> PathBuf {
        self.meta_dir.join("refs").join("heads")
    }
}
