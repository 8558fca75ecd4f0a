use std::collections::HashMap;

use super::{Error, Missing, ObjectStore, Result};
use crate::object::{Id, Kind, Object};

/// An [`ObjectStore`] that keeps every object in memory.
///
/// Useful for tests and for building commits before deciding where they
/// should be written.
#[derive(Debug, Default)]
pub struct MemoryStore {
    objects: HashMap<Id, (Kind, Vec<u8>)>,
}

impl MemoryStore {
    /// Create an empty store.
    pub fn new() -> MemoryStore {
        MemoryStore::default()
    }

    /// Return the number of objects stored.
    pub fn len(&self) -> usize {
        self.objects.len()
    }

    /// Returns true if nothing has been stored.
    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }
}

impl ObjectStore for MemoryStore {
    fn put_object(&mut self, object: &mut Object) -> Result<Id> {
        let id = object.assign_id()?;
        if !self.objects.contains_key(&id) {
            let content = object.content()?;
            self.objects.insert(id, (object.kind(), content));
        }
        Ok(id)
    }

    fn get_object(&self, id: &Id) -> Result<Object> {
        match self.objects.get(id) {
            Some((kind, content)) => Ok(Object::with_id(*kind, Box::new(content.clone()), *id)),
            None => Err(Error::NotFound(Missing::Object(*id))),
        }
    }

    fn contains_object(&self, id: &Id) -> bool {
        self.objects.contains_key(id)
    }
}
