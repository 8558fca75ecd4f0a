//! The capability to publish a branch somewhere else.
//!
//! A repository hands a remote its resolved head commit and an object store
//! to read from; how the remote transports and records those objects is its
//! own business.

use std::fmt;

use crate::object::{Commit, Id};
use crate::repo::{ObjectStore, Result};

/// What a successful push did to the remote branch.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum PushOutcome {
    /// The remote branch already pointed at the pushed commit.
    UpToDate,

    /// The remote branch moved forward from `from`.
    FastForward { from: Id },

    /// The remote branch did not exist and was created.
    Created,
}

impl fmt::Display for PushOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PushOutcome::UpToDate => write!(f, "up to date"),
            PushOutcome::FastForward { from } => write!(f, "fast-forward from {}", from.short()),
            PushOutcome::Created => write!(f, "new branch"),
        }
    }
}

/// A place a branch can be pushed to.
pub trait Remote {
    /// Return the name this remote is registered under.
    fn name(&self) -> &str;

    /// Make `branch` on the remote point at `head`.
    ///
    /// Every object reachable from `head` is read from `source`. The remote
    /// must refuse with `NonFastForward` if its branch has moved to a commit
    /// that is not an ancestor of `head`.
    fn push(&mut self, branch: &str, head: &Commit, source: &dyn ObjectStore)
        -> Result<PushOutcome>;
}
