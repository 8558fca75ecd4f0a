//! The persisted tracker index: one line per entry,
//! `path TAB current TAB last-commit TAB status`, with an empty field for
//! an absent digest.

use std::collections::BTreeMap;
use std::fs;
use std::io;
use std::path::Path;

use tracing::warn;

use strand_core::object::Id;
use strand_core::path::RepoPath;
use strand_core::repo::Result;

use super::{FileEntry, FileStatus};
use crate::atomic_write::write_atomic;

const ABSENT: &str = "";

pub(super) fn load(path: &Path) -> Result<BTreeMap<RepoPath, FileEntry>> {
    let text = match fs::read_to_string(path) {
        Ok(text) => text,
        Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(BTreeMap::new()),
        Err(err) => return Err(err.into()),
    };

    let mut entries = BTreeMap::new();
    for (n, line) in text.lines().enumerate() {
        if line.is_empty() {
            continue;
        }

        match parse_line(line) {
            Some(entry) => {
                entries.insert(entry.path.clone(), entry);
            }
            None => warn!(line = n + 1, "Skipping malformed index line"),
        }
    }

    Ok(entries)
}

pub(super) fn save(path: &Path, entries: &BTreeMap<RepoPath, FileEntry>) -> Result<()> {
    let text: String = entries.values().map(format_line).collect();
    write_atomic(path, text.as_bytes())?;
    Ok(())
}

fn format_line(entry: &FileEntry) -> String {
    format!(
        "{}\t{}\t{}\t{}\n",
        entry.path,
        format_hash(entry.current_hash),
        format_hash(entry.last_commit_hash),
        entry.status
    )
}

fn parse_line(line: &str) -> Option<FileEntry> {
    let mut fields = line.split('\t');

    let path = RepoPath::new(fields.next()?).ok()?;
    let current_hash = parse_hash(fields.next()?)?;
    let last_commit_hash = parse_hash(fields.next()?)?;
    let status = FileStatus::from_word(fields.next()?)?;

    if fields.next().is_some() {
        return None;
    }

    Some(FileEntry {
        path,
        current_hash,
        last_commit_hash,
        status,
    })
}

fn parse_hash(field: &str) -> Option<Option<Id>> {
    if field == ABSENT {
        Some(None)
    } else {
        field.parse().ok().map(Some)
    }
}

fn format_hash(id: Option<Id>) -> String {
    match id {
        Some(id) => id.to_string(),
        None => ABSENT.to_string(),
    }
}
