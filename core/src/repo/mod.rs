//! Represents an abstract strand repository.
//!
//! ## Design Goals
//!
//! Strand intends to allow repositories to be stored in multiple different
//! mechanisms. The `strand_on_disk` crate stores objects on the local file
//! system; [`MemoryStore`] keeps them in memory for tests and embedding.
//! Anything that can store and retrieve objects by ID implements
//! [`ObjectStore`] and gets blob and commit access for free.

use std::sync::Arc;

mod error;
pub use error::{Error, Missing, Result};

mod history;
pub use history::History;

mod memory;
pub use memory::MemoryStore;

use crate::object::{Commit, Id, Kind, Object};

/// A struct that implements the `ObjectStore` trait represents a particular
/// mechanism for storing and retrieving objects by ID.
///
/// The required methods on this trait represent the most primitive operations
/// which must be defined for a given storage architecture. The provided
/// methods build blob and commit access on top of them.
///
/// Objects are immutable: storing content that is already present is a no-op
/// that returns the same ID.
pub trait ObjectStore {
    /// Store an object if it is not already present and return its ID.
    fn put_object(&mut self, object: &mut Object) -> Result<Id>;

    /// Retrieve an object by ID.
    ///
    /// Returns `NotFound` if no usable object with this ID is stored.
    fn get_object(&self, id: &Id) -> Result<Object>;

    /// Returns true if an object with this ID is stored.
    fn contains_object(&self, id: &Id) -> bool;

    /// Store a blob held in memory and return its ID.
    fn put_blob(&mut self, content: &[u8]) -> Result<Id> {
        let mut object = Object::new(Kind::Blob, Box::new(content.to_vec()));
        self.put_object(&mut object)
    }

    /// Retrieve the content of a blob.
    ///
    /// Returns `NotFound` if the ID is absent or names a commit.
    fn get_blob(&self, id: &Id) -> Result<Vec<u8>> {
        let object = self.get_object(id)?;
        if object.kind() != Kind::Blob {
            return Err(Error::NotFound(Missing::Object(*id)));
        }
        Ok(object.content()?)
    }

    /// Retrieve and parse a commit.
    ///
    /// Returns `NotFound` if the ID is absent or names a blob, and
    /// `Corruption` if the stored record is not a canonical commit.
    fn get_commit(&self, id: &Id) -> Result<Arc<Commit>> {
        read_commit(self, id).map(Arc::new)
    }
}

/// Load and parse a commit straight from `store`, bypassing any cache the
/// store keeps.
pub fn read_commit<S: ObjectStore + ?Sized>(store: &S, id: &Id) -> Result<Commit> {
    let object = store.get_object(id)?;
    if object.kind() != Kind::Commit {
        return Err(Error::NotFound(Missing::Object(*id)));
    }

    let body = object.content()?;
    Commit::parse(&body).map_err(|err| Error::Corruption(format!("commit {}: {}", id, err)))
}

#[cfg(test)]
mod tests;
