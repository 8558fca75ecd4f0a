//! Tracks the status of every file in a work dir relative to the last commit
//! and the set of staged files.
//!
//! Status is derived state. It is recomputed by scanning the work dir and
//! comparing each file's digest with the entry persisted in `.strand/index`
//! by the previous scan. The index is a cache: losing it only costs a
//! rescan, and malformed lines are skipped.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::fs::File;
use std::io::{self, BufReader};
use std::path::{Path, PathBuf};

use tracing::{debug, warn};
use walkdir::WalkDir;

use strand_core::object::{hash_reader, Commit, Id};
use strand_core::path::{RepoPath, META_DIR};
use strand_core::repo::{Error, Missing, Result};

use crate::OnDisk;

mod index;

/// Files with this name are never tracked.
pub const IGNORED_FILE_NAME: &str = ".DS_Store";

/// Status of a single file.
#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub enum FileStatus {
    /// Never committed and not staged.
    Untracked,

    /// Content differs from the last commit (or changed since staging).
    Modified,

    /// Marked for inclusion in the next commit.
    Staged,

    /// Content matches the last commit.
    Committed,

    /// Known to the index but no longer present on disk.
    Deleted,
}

impl FileStatus {
    /// Return the lowercase word used in the index and in status output.
    pub fn as_str(self) -> &'static str {
        match self {
            FileStatus::Untracked => "untracked",
            FileStatus::Modified => "modified",
            FileStatus::Staged => "staged",
            FileStatus::Committed => "committed",
            FileStatus::Deleted => "deleted",
        }
    }

    /// Parse the word written by [`as_str()`](FileStatus::as_str).
    pub fn from_word(word: &str) -> Option<FileStatus> {
        match word {
            "untracked" => Some(FileStatus::Untracked),
            "modified" => Some(FileStatus::Modified),
            "staged" => Some(FileStatus::Staged),
            "committed" => Some(FileStatus::Committed),
            "deleted" => Some(FileStatus::Deleted),
            _ => None,
        }
    }
}

impl fmt::Display for FileStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What the tracker knows about one path.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct FileEntry {
    pub path: RepoPath,

    /// Digest of the file as of the last scan or staging. `None` once the
    /// file is deleted.
    pub current_hash: Option<Id>,

    /// Digest recorded by the last commit that included this path.
    pub last_commit_hash: Option<Id>,

    pub status: FileStatus,
}

impl FileEntry {
    fn new(path: RepoPath) -> FileEntry {
        FileEntry {
            path,
            current_hash: None,
            last_commit_hash: None,
            status: FileStatus::Untracked,
        }
    }
}

/// Entry paths grouped by status, each group sorted by path.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct StatusSummary {
    pub staged: Vec<RepoPath>,
    pub modified: Vec<RepoPath>,
    pub deleted: Vec<RepoPath>,
    pub untracked: Vec<RepoPath>,
    pub committed: Vec<RepoPath>,
}

impl StatusSummary {
    /// Returns true if nothing is staged or modified.
    pub fn is_clean(&self) -> bool {
        self.staged.is_empty() && self.modified.is_empty()
    }
}

/// The working-tree tracker for one repository.
///
/// Reads file content from the work dir and persists its own index. It never
/// touches object storage.
#[derive(Debug)]
pub struct WorkTree {
    work_dir: PathBuf,
    index_path: PathBuf,
    entries: BTreeMap<RepoPath, FileEntry>,
}

impl WorkTree {
    /// Open the tracker for `repo`, loading its persisted index.
    pub fn open(repo: &OnDisk) -> Result<WorkTree> {
        let index_path = repo.meta_dir().join("index");
        let entries = index::load(&index_path)?;

        Ok(WorkTree {
            work_dir: repo.work_dir().to_path_buf(),
            index_path,
            entries,
        })
    }

    /// Rescan the whole work dir and update every entry's status.
    ///
    /// The metadata directory and files named [`IGNORED_FILE_NAME`] are
    /// skipped. Entries whose files are gone become `Deleted` and are kept.
    /// The index is persisted afterwards.
    pub fn update_status(&mut self) -> Result<()> {
        let mut seen = BTreeSet::new();

        let walker = WalkDir::new(&self.work_dir)
            .into_iter()
            .filter_entry(|e| e.depth() == 0 || e.file_name() != META_DIR);

        for dir_entry in walker {
            let dir_entry = dir_entry.map_err(io::Error::from)?;
            if !dir_entry.file_type().is_file() || dir_entry.file_name() == IGNORED_FILE_NAME {
                continue;
            }

            let relative = dir_entry
                .path()
                .strip_prefix(&self.work_dir)
                .map_err(|err| io::Error::new(io::ErrorKind::Other, err))?;

            let path = match RepoPath::from_relative(relative) {
                Ok(path) => path,
                Err(err) => {
                    warn!(path = %relative.display(), error = %err, "Skipping untrackable file");
                    continue;
                }
            };

            let current = hash_file(dir_entry.path())?;
            let entry = self
                .entries
                .entry(path.clone())
                .or_insert_with(|| FileEntry::new(path.clone()));

            entry.status = match entry.status {
                FileStatus::Staged if entry.current_hash == Some(current) => FileStatus::Staged,
                FileStatus::Staged => FileStatus::Modified,
                _ => derive_status(entry.last_commit_hash, current),
            };
            entry.current_hash = Some(current);

            seen.insert(path);
        }

        for (path, entry) in self.entries.iter_mut() {
            if !seen.contains(path) {
                entry.status = FileStatus::Deleted;
                entry.current_hash = None;
            }
        }

        debug!(files = seen.len(), "Scanned work tree");
        self.save()
    }

    /// Mark a file to be included in the next commit, whatever its previous
    /// status.
    pub fn stage_file(&mut self, path: &str) -> Result<()> {
        let path = RepoPath::new(path).map_err(|err| Error::InvalidPath(path.to_string(), err))?;

        let fs_path = path.to_fs_path(&self.work_dir);
        if !fs_path.is_file() {
            return Err(Error::NotFound(Missing::Path(path.to_string())));
        }

        let current = hash_file(&fs_path)?;
        let entry = self
            .entries
            .entry(path.clone())
            .or_insert_with(|| FileEntry::new(path));

        entry.current_hash = Some(current);
        entry.status = FileStatus::Staged;

        self.save()
    }

    /// Undo [`stage_file()`](WorkTree::stage_file).
    ///
    /// The entry returns to whatever status its content implies. Fails with
    /// `NotStaged` unless the entry is currently staged.
    pub fn unstage_file(&mut self, path: &str) -> Result<()> {
        let entry = match self.entries.get_mut(path) {
            Some(entry) if entry.status == FileStatus::Staged => entry,
            _ => return Err(Error::NotStaged(path.to_string())),
        };

        let fs_path = entry.path.to_fs_path(&self.work_dir);
        if fs_path.is_file() {
            let current = hash_file(&fs_path)?;
            entry.current_hash = Some(current);
            entry.status = derive_status(entry.last_commit_hash, current);
        } else {
            entry.current_hash = None;
            entry.status = FileStatus::Deleted;
        }

        self.save()
    }

    /// Return the staged entries, sorted by path.
    pub fn staged_files(&self) -> Vec<&FileEntry> {
        self.entries
            .values()
            .filter(|e| e.status == FileStatus::Staged)
            .collect()
    }

    /// Return every entry, sorted by path.
    pub fn files(&self) -> Vec<&FileEntry> {
        self.entries.values().collect()
    }

    /// Look up the entry for one path.
    pub fn entry(&self, path: &str) -> Option<&FileEntry> {
        self.entries.get(path)
    }

    /// Return entry paths grouped by status.
    pub fn summary(&self) -> StatusSummary {
        let mut summary = StatusSummary::default();

        for entry in self.entries.values() {
            let group = match entry.status {
                FileStatus::Staged => &mut summary.staged,
                FileStatus::Modified => &mut summary.modified,
                FileStatus::Deleted => &mut summary.deleted,
                FileStatus::Untracked => &mut summary.untracked,
                FileStatus::Committed => &mut summary.committed,
            };
            group.push(entry.path.clone());
        }

        summary
    }

    /// Record the files of a newly created commit as committed.
    pub fn record_commit(&mut self, commit: &Commit) -> Result<()> {
        self.mark_committed(commit.files());
        self.save()
    }

    /// Record the result of a checkout: `files` (the checked-out snapshot)
    /// are committed, and the `removed` paths no longer exist.
    pub fn record_checkout(
        &mut self,
        files: &BTreeMap<RepoPath, Id>,
        removed: &[RepoPath],
    ) -> Result<()> {
        for path in removed {
            self.entries.remove(path);
        }
        self.mark_committed(files);
        self.save()
    }

    fn mark_committed(&mut self, files: &BTreeMap<RepoPath, Id>) {
        for (path, id) in files {
            let entry = self
                .entries
                .entry(path.clone())
                .or_insert_with(|| FileEntry::new(path.clone()));

            entry.current_hash = Some(*id);
            entry.last_commit_hash = Some(*id);
            entry.status = FileStatus::Committed;
        }
    }

    fn save(&self) -> Result<()> {
        index::save(&self.index_path, &self.entries)
    }
}

fn derive_status(last_commit_hash: Option<Id>, current: Id) -> FileStatus {
    match last_commit_hash {
        None => FileStatus::Untracked,
        Some(last) if last == current => FileStatus::Committed,
        Some(_) => FileStatus::Modified,
    }
}

fn hash_file(path: &Path) -> Result<Id> {
    let file = File::open(path)?;
    Ok(hash_reader(BufReader::new(file))?)
}
