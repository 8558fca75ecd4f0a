use std::fs;

use super::super::*;

use strand_core::repo::Error;

#[test]
fn happy_path() {
    let tr = TempRepo::new();
    let work_dir = tr.path();
    let meta_dir = work_dir.join(".strand");
    let r = OnDisk::new(&work_dir).unwrap();
    assert_eq!(r.work_dir(), work_dir);
    assert_eq!(r.meta_dir(), meta_dir.as_path());
    assert_eq!(r.config(), &Config::default());
}

#[test]
fn error_no_work_dir() {
    let tr = TempRepo::new();
    let work_dir = tr.path().join("bogus");
    let err = OnDisk::new(&work_dir).unwrap_err();
    if let Error::WorkDirDoesntExist(_) = err {
        // expected
    } else {
        panic!("wrong error: {:?}", err);
    }
}

#[test]
fn error_no_meta_dir() {
    let tempdir = tempfile::tempdir().unwrap();
    let work_dir = tempdir.path();
    let err = OnDisk::new(&work_dir).unwrap_err();
    if let Error::MetaDirDoesntExist(_) = err {
        // expected
    } else {
        panic!("wrong error: {:?}", err);
    }
}

#[test]
fn init_layout() {
    let r_path = tempfile::tempdir().unwrap();
    let r = OnDisk::init(r_path.path()).unwrap();

    let meta_dir = r_path.path().join(".strand");
    assert!(meta_dir.join("objects").is_dir());
    assert!(meta_dir.join("refs/heads").is_dir());
    assert!(meta_dir.join("config").is_file());
    assert_eq!(
        fs::read_to_string(meta_dir.join("HEAD")).unwrap(),
        "ref: refs/heads/master\n"
    );

    assert_eq!(r.head().unwrap(), Head::Branch("master".to_string()));
    assert_eq!(r.head_id().unwrap(), None);
    assert!(r.branches().unwrap().is_empty());
}

#[test]
fn init_matches_fresh_repo() {
    let tr = TempRepo::new();

    let r_path = tempfile::tempdir().unwrap();
    OnDisk::init(r_path.path()).unwrap();

    assert!(!dir_diff::is_different(tr.path(), r_path.path()).unwrap());
}

#[test]
fn err_if_meta_dir_exists() {
    let r_path = tempfile::tempdir().unwrap();
    let meta_dir = r_path.path().join(".strand");
    fs::create_dir_all(&meta_dir).unwrap();

    let err = OnDisk::init(r_path.path()).unwrap_err();
    if let Error::MetaDirShouldntExist(_) = err {
        // expected case
    } else {
        panic!("wrong error: {:?}", err);
    }
}

#[test]
fn err_unknown_format_version() {
    let tr = TempRepo::new();
    fs::write(
        tr.path().join(".strand/config"),
        "[core]\nformat_version = 7\n",
    )
    .unwrap();

    match OnDisk::new(tr.path()).unwrap_err() {
        Error::Config(msg) => assert!(msg.contains("format_version 7"), "{}", msg),
        err => panic!("wrong error: {:?}", err),
    }
}
