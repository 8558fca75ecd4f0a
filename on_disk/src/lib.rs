//! This crate provides a strand repository that stores content on the local
//! file system.
//!
//! A repository is a work dir with a `.strand` directory at its top level.
//! [`OnDisk`] is the handle to one: it stores objects, moves branch
//! references, and creates commits from the files staged in its
//! [`WorkTree`].

mod atomic_write;

pub mod config;
pub use config::Config;

mod on_disk_repo;
pub use on_disk_repo::{Head, OnDisk};

mod remote;
pub use remote::DirectoryRemote;

mod temp_repo;
pub use temp_repo::TempRepo;

pub mod work_tree;
pub use work_tree::{FileEntry, FileStatus, StatusSummary, WorkTree};

#[cfg(test)]
mod tests;
