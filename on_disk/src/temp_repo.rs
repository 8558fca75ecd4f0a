use std::fs;
use std::path::{Path, PathBuf};

use crate::OnDisk;

/// A `TempRepo` creates a temporary, empty strand repository and keeps an
/// open handle to it. This is mostly used in tests, both here and in the
/// command-line crate.
///
/// Because this struct is intended for testing, its functions
/// panic instead of returning Result structs.
pub struct TempRepo {
    #[allow(dead_code)] // tempdir is only used for RAII
    tempdir: Option<tempfile::TempDir>,
    path: PathBuf,
    repo: OnDisk,
}

impl TempRepo {
    // Create a new, empty repo in a temporary directory.
    // This directory will be deleted when the struct is dropped.
    pub fn new() -> TempRepo {
        let tempdir = tempfile::tempdir().unwrap();
        let path: PathBuf = tempdir.path().to_path_buf();
        let repo = OnDisk::init(&path).unwrap();

        TempRepo {
            tempdir: Some(tempdir),
            path,
            repo,
        }
    }

    // Create a new, empty repo in the specified location.
    // WARNING: This will erase any content already at that path.
    // Use this only when you need to manually inspect the results
    // of the test run.
    pub fn new_at_path<P: Into<PathBuf>>(p: P) -> TempRepo {
        let path = p.into();
        fs::remove_dir_all(&path).unwrap_or(());
        fs::create_dir_all(&path).unwrap();
        let repo = OnDisk::init(&path).unwrap();

        TempRepo {
            tempdir: None,
            path,
            repo,
        }
    }

    // Return the path for this repo's root (working directory).
    pub fn path(&self) -> &Path {
        self.path.as_path()
    }

    pub fn repo(&self) -> &OnDisk {
        &self.repo
    }

    pub fn repo_mut(&mut self) -> &mut OnDisk {
        &mut self.repo
    }

    // Write a file in the work dir, creating parent directories as needed.
    // Returns self for method chaining.
    pub fn write_file(&mut self, path: &str, content: &str) -> &mut TempRepo {
        let path = self.path.join(path);
        if let Some(dir) = path.parent() {
            fs::create_dir_all(dir).unwrap();
        }
        fs::write(path, content).unwrap();
        self
    }

    pub fn remove_file(&mut self, path: &str) -> &mut TempRepo {
        fs::remove_file(self.path.join(path)).unwrap();
        self
    }

    pub fn read_file(&self, path: &str) -> String {
        fs::read_to_string(self.path.join(path)).unwrap()
    }

    // Stage the named files and commit them. Panics if anything fails.
    pub fn commit_files(&mut self, message: &str, paths: &[&str]) -> strand_core::object::Id {
        let mut work_tree = self.repo.work_tree().unwrap();
        for path in paths {
            work_tree.stage_file(path).unwrap();
        }
        self.repo.commit_staged(message).unwrap()
    }
}

impl Default for TempRepo {
    fn default() -> TempRepo {
        TempRepo::new()
    }
}

#[cfg(test)]
mod tests {
    use super::TempRepo;

    #[test]
    fn temp_path() {
        let path = {
            let r = TempRepo::new();
            let path = r.path().to_path_buf();

            let meta_dir = path.join(".strand");
            assert_eq!(meta_dir.is_dir(), true);

            path
        };

        assert_eq!(path.as_path().is_dir(), false);
    }

    #[test]
    fn at_specific_path() {
        let temp_dir = tempfile::tempdir().unwrap();
        let repo_dir = temp_dir.path().join("tr");

        assert_eq!(repo_dir.is_dir(), false);

        {
            let _r = TempRepo::new_at_path(&repo_dir);

            let meta_dir = repo_dir.join(".strand");
            assert_eq!(meta_dir.is_dir(), true);
        }

        // This should be left behind for post-test inspection.
        assert_eq!(repo_dir.is_dir(), true);
    }

    #[test]
    fn files_and_commits() {
        let mut r = TempRepo::new();
        r.write_file("dir/a.txt", "hello\n");
        assert_eq!(r.read_file("dir/a.txt"), "hello\n");

        let id = r.commit_files("first", &["dir/a.txt"]);
        assert_eq!(r.repo().head_id().unwrap(), Some(id));

        r.remove_file("dir/a.txt");
        assert!(!r.path().join("dir/a.txt").exists());
    }
}
