use std::fs;
use std::path::Path;

use tracing::info;

use strand_core::path::META_DIR;
use strand_core::repo::{Error, Result};

use super::{Head, OnDisk};
use crate::config::Config;

impl OnDisk {
    /// Creates a new, empty repository on the local file system.
    ///
    /// Creates `work_dir` if needed. HEAD names the configured default
    /// branch, which has no commits yet.
    pub fn init(work_dir: &Path) -> Result<Self> {
        let meta_dir = work_dir.join(META_DIR);
        if meta_dir.exists() {
            return Err(Error::MetaDirShouldntExist(meta_dir));
        }

        fs::create_dir_all(&meta_dir)?;

        let config = Config::default();
        config.save(&meta_dir)?;

        create_objects_dir(&meta_dir)?;
        create_refs_dir(&meta_dir)?;

        let repo = OnDisk::from_parts(work_dir.to_path_buf(), meta_dir, config);
        repo.write_head(&Head::Branch(repo.config.core.default_branch.clone()))?;

        info!(work_dir = %work_dir.display(), "Initialized empty repository");
        Ok(repo)
    }
}

fn create_objects_dir(meta_dir: &Path) -> Result<()> {
    let objects_dir = meta_dir.join("objects");
    fs::create_dir_all(&objects_dir).map_err(|e| e.into())
}

fn create_refs_dir(meta_dir: &Path) -> Result<()> {
    let heads_dir = meta_dir.join("refs/heads");
    fs::create_dir_all(&heads_dir).map_err(|e| e.into())
}
