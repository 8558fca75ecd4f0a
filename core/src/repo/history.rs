use std::sync::Arc;

use tracing::debug;

use super::ObjectStore;
use crate::object::{Commit, Id};

/// A lazy walk over a commit's first-parent ancestry, newest first.
///
/// The walk ends at a root commit, after `max_count` commits (`0` means no
/// limit), or at the first commit that can not be read. An unreadable commit
/// ends the walk quietly: partial history is more useful to a reader than an
/// error.
///
/// Cloning a `History` gives an independent walk from the same position, so
/// a fresh clone taken before iterating can be replayed.
pub struct History<'a, S: ObjectStore + ?Sized> {
    store: &'a S,
    next: Option<Id>,
    max_count: usize,
    yielded: usize,
}

impl<'a, S: ObjectStore + ?Sized> History<'a, S> {
    /// Start a walk at `start`. A `None` start yields nothing.
    pub fn new(store: &'a S, start: Option<Id>, max_count: usize) -> History<'a, S> {
        History {
            store,
            next: start,
            max_count,
            yielded: 0,
        }
    }
}

impl<'a, S: ObjectStore + ?Sized> Clone for History<'a, S> {
    fn clone(&self) -> Self {
        History {
            store: self.store,
            next: self.next,
            max_count: self.max_count,
            yielded: self.yielded,
        }
    }
}

impl<'a, S: ObjectStore + ?Sized> Iterator for History<'a, S> {
    type Item = Arc<Commit>;

    fn next(&mut self) -> Option<Arc<Commit>> {
        if self.max_count != 0 && self.yielded >= self.max_count {
            return None;
        }

        let id = self.next.take()?;
        match self.store.get_commit(&id) {
            Ok(commit) => {
                self.next = commit.first_parent();
                self.yielded += 1;
                Some(commit)
            }
            Err(err) => {
                debug!(commit = %id, error = %err, "History walk stopped");
                None
            }
        }
    }
}
