use std::fmt;
use std::path::PathBuf;

use thiserror::Error;

use crate::object::Id;
use crate::path::PathError;

/// Names the thing a [`Error::NotFound`] failed to find.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Missing {
    Object(Id),
    Path(String),
    Branch(String),
    Head,
    Remote(String),
}

impl fmt::Display for Missing {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Missing::Object(id) => write!(f, "object {}", id),
            Missing::Path(path) => write!(f, "path {}", path),
            Missing::Branch(name) => write!(f, "branch {}", name),
            Missing::Head => write!(f, "head commit"),
            Missing::Remote(name) => write!(f, "remote {}", name),
        }
    }
}

/// Describes the potential error conditions that might arise from strand
/// repository operations.
#[derive(Debug, Error)]
pub enum Error {
    #[error("not found: {0}")]
    NotFound(Missing),

    #[error("nothing staged to commit")]
    EmptyStage,

    #[error("path {0} is not staged")]
    NotStaged(String),

    #[error("repository is corrupt: {0}")]
    Corruption(String),

    #[error("invalid path {0:?}: {1}")]
    InvalidPath(String, PathError),

    #[error("invalid branch name {0:?}")]
    InvalidBranchName(String),

    #[error("branch {0} already exists")]
    BranchExists(String),

    #[error("HEAD is detached; check out a branch first")]
    DetachedHead,

    #[error("work tree has uncommitted changes: {}", .0.join(", "))]
    DirtyWorkTree(Vec<String>),

    #[error("push to branch {branch} is not a fast-forward")]
    NonFastForward { branch: String },

    #[error("work dir doesn't exist {0}")]
    WorkDirDoesntExist(PathBuf),

    #[error(".strand dir doesn't exist {0}")]
    MetaDirDoesntExist(PathBuf),

    #[error(".strand dir shouldn't exist {0}")]
    MetaDirShouldntExist(PathBuf),

    #[error("invalid configuration: {0}")]
    Config(String),

    #[error(transparent)]
    IoError(#[from] std::io::Error),

    #[error(transparent)]
    OtherError(#[from] Box<dyn std::error::Error>),
}

impl Error {
    /// Returns true if this is a `NotFound` error of any flavor.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Error::NotFound(_))
    }
}

/// A specialized `Result` type for strand repository operations.
pub type Result<T> = std::result::Result<T, Error>;
