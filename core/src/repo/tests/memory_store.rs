use std::collections::BTreeMap;

use proptest::prelude::*;

use super::super::*;

use crate::object::{hash_bytes, Attribution, Commit, Kind, Object};
use crate::path::RepoPath;

fn sample_commit(store: &mut MemoryStore) -> Commit {
    let blob = store.put_blob(b"hello\n").unwrap();
    let mut files = BTreeMap::new();
    files.insert(RepoPath::new("hello.txt").unwrap(), blob);

    let commit = Commit::new(
        "First",
        Attribution::new("A U Thor", "author@example.com", 1_142_878_501),
        vec![],
        files,
    );
    store.put_object(&mut commit.to_object()).unwrap();
    commit
}

#[test]
fn put_is_idempotent() {
    let mut store = MemoryStore::new();
    let a = store.put_blob(b"same").unwrap();
    let b = store.put_blob(b"same").unwrap();

    assert_eq!(a, b);
    assert_eq!(a, hash_bytes(b"same"));
    assert_eq!(store.len(), 1);
}

#[test]
fn missing_object() {
    let store = MemoryStore::new();
    let id = hash_bytes(b"nope");

    assert!(store.is_empty());
    assert!(!store.contains_object(&id));

    match store.get_blob(&id).unwrap_err() {
        Error::NotFound(Missing::Object(missing)) => assert_eq!(missing, id),
        err => panic!("wrong error: {:?}", err),
    }
}

#[test]
fn commit_round_trip() {
    let mut store = MemoryStore::new();
    let commit = sample_commit(&mut store);

    assert!(store.contains_object(&commit.id()));
    let loaded = store.get_commit(&commit.id()).unwrap();
    assert_eq!(*loaded, commit);
    assert_eq!(
        store.get_blob(&loaded.file("hello.txt").unwrap()).unwrap(),
        b"hello\n"
    );
}

#[test]
fn kinds_are_not_interchangeable() {
    let mut store = MemoryStore::new();
    let commit = sample_commit(&mut store);
    let blob = commit.file("hello.txt").unwrap();

    assert!(store.get_blob(&commit.id()).unwrap_err().is_not_found());
    assert!(store.get_commit(&blob).unwrap_err().is_not_found());
}

#[test]
fn garbage_commit_is_corruption() {
    let mut store = MemoryStore::new();
    let mut object = Object::new(Kind::Commit, Box::new(b"not a commit".to_vec()));
    let id = store.put_object(&mut object).unwrap();

    match store.get_commit(&id).unwrap_err() {
        Error::Corruption(msg) => assert!(msg.contains(&id.to_string())),
        err => panic!("wrong error: {:?}", err),
    }
}

#[test]
fn works_as_trait_object() {
    let mut store = MemoryStore::new();
    let id = {
        let dyn_store: &mut dyn ObjectStore = &mut store;
        dyn_store.put_blob(b"dyn").unwrap()
    };
    let dyn_store: &dyn ObjectStore = &store;
    assert_eq!(dyn_store.get_blob(&id).unwrap(), b"dyn");
}

proptest! {
    #[test]
    fn get_returns_what_was_put(content in proptest::collection::vec(any::<u8>(), 0..2048)) {
        let mut store = MemoryStore::new();
        let first = store.put_blob(&content).unwrap();
        let second = store.put_blob(&content).unwrap();

        prop_assert_eq!(first, second);
        prop_assert_eq!(first, hash_bytes(&content));
        prop_assert_eq!(store.get_blob(&first).unwrap(), content);
    }

    #[test]
    fn distinct_messages_give_distinct_ids(a in "[a-z ]{1,40}", b in "[a-z ]{1,40}") {
        let author = Attribution::new("A", "a@example.com", 0);
        let ca = Commit::new(a.trim_end(), author.clone(), vec![], BTreeMap::new());
        let cb = Commit::new(b.trim_end(), author, vec![], BTreeMap::new());

        prop_assert_eq!(ca.id() == cb.id(), ca.message() == cb.message());
    }
}
