//! Line-granularity diffs between two texts, and their application.
//!
//! A [`FileDiff`] is computed from an LCS alignment of the two line
//! sequences, grouped into [`Hunk`]s with a configurable number of context
//! lines, printed and parsed in unified form, and applied to a text only
//! if every hunk still matches the lines it expects to replace.

use std::fs;
use std::io;
use std::path::Path;

use thiserror::Error;

mod apply;

mod format;
pub use format::ParseDiffError;

mod lcs;
use lcs::{edit_script, Edit};

/// Number of unchanged lines shown on each side of a change unless the
/// caller asks otherwise.
pub const DEFAULT_CONTEXT_LINES: usize = 3;

/// Describes how a line of a hunk relates the two texts.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum LineTag {
    /// Present in both texts.
    Context,

    /// Present only in the new text.
    Added,

    /// Present only in the old text.
    Removed,
}

/// A single line of a hunk.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct DiffLine {
    pub tag: LineTag,
    pub text: String,
}

impl DiffLine {
    pub fn new(tag: LineTag, text: &str) -> DiffLine {
        DiffLine {
            tag,
            text: text.to_string(),
        }
    }
}

/// A contiguous region of change between two texts.
///
/// Starts are 1-based line numbers. A side with a count of zero names the
/// line *before* the region instead (0 for the start of the text).
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Hunk {
    pub old_start: usize,
    pub old_count: usize,
    pub new_start: usize,
    pub new_count: usize,
    pub lines: Vec<DiffLine>,
}

impl Hunk {
    /// Lines the hunk expects to find in the old text.
    pub fn old_lines(&self) -> impl Iterator<Item = &str> {
        self.lines
            .iter()
            .filter(|l| l.tag != LineTag::Added)
            .map(|l| l.text.as_str())
    }

    /// Lines the hunk leaves in the new text.
    pub fn new_lines(&self) -> impl Iterator<Item = &str> {
        self.lines
            .iter()
            .filter(|l| l.tag != LineTag::Removed)
            .map(|l| l.text.as_str())
    }
}

/// The complete set of changes between two versions of a file.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct FileDiff {
    pub old_label: String,
    pub new_label: String,
    pub hunks: Vec<Hunk>,
}

impl FileDiff {
    /// Replace the labels printed in the `---` and `+++` header lines.
    pub fn with_labels(mut self, old_label: &str, new_label: &str) -> FileDiff {
        self.old_label = old_label.to_string();
        self.new_label = new_label.to_string();
        self
    }

    /// Returns true if the two texts were identical.
    pub fn is_empty(&self) -> bool {
        self.hunks.is_empty()
    }

    /// Count the added and removed lines across all hunks.
    pub fn line_counts(&self) -> (usize, usize) {
        self.hunks
            .iter()
            .flat_map(|h| h.lines.iter())
            .fold((0, 0), |(added, removed), line| match line.tag {
                LineTag::Added => (added + 1, removed),
                LineTag::Removed => (added, removed + 1),
                LineTag::Context => (added, removed),
            })
    }
}

/// Describes why a diff could not be applied.
#[derive(Debug, Error)]
pub enum Error {
    /// Hunk `hunk` (0-based) does not match the target near line `line`.
    /// Nothing was written.
    #[error("hunk {} does not match the target at line {line}", .hunk + 1)]
    HunkMismatch { hunk: usize, line: usize },

    #[error(transparent)]
    Io(#[from] io::Error),
}

/// Compute the diff between two line sequences.
///
/// Hunks carry `context` unchanged lines on each side; changes separated by
/// no more than `2 * context` unchanged lines share a hunk. Labels default to
/// `a` and `b`.
pub fn diff_lines(old: &[&str], new: &[&str], context: usize) -> FileDiff {
    let edits = edit_script(old, new);

    FileDiff {
        old_label: "a".to_string(),
        new_label: "b".to_string(),
        hunks: build_hunks(&edits, old, new, context),
    }
}

/// Compute the diff between two texts, split into lines.
pub fn diff_text(old: &str, new: &str, context: usize) -> FileDiff {
    diff_lines(&split_lines(old), &split_lines(new), context)
}

/// Compute the diff between two files, labelled with their paths.
pub fn diff_files(old_path: &Path, new_path: &Path, context: usize) -> Result<FileDiff, Error> {
    let old = fs::read_to_string(old_path)?;
    let new = fs::read_to_string(new_path)?;

    Ok(diff_text(&old, &new, context).with_labels(
        &old_path.display().to_string(),
        &new_path.display().to_string(),
    ))
}

/// Split text into lines on `\n`. A single trailing newline does not start
/// another line; carriage returns are kept.
pub(crate) fn split_lines(text: &str) -> Vec<&str> {
    if text.is_empty() {
        return Vec::new();
    }

    text.strip_suffix('\n').unwrap_or(text).split('\n').collect()
}

fn build_hunks(edits: &[Edit], old: &[&str], new: &[&str], context: usize) -> Vec<Hunk> {
    let changes: Vec<usize> = edits
        .iter()
        .enumerate()
        .filter(|(_, e)| e.is_change())
        .map(|(n, _)| n)
        .collect();

    let (first, rest) = match changes.split_first() {
        Some(split) => split,
        None => return Vec::new(),
    };

    let mut groups = Vec::new();
    let (mut start, mut end) = (*first, *first);
    for &n in rest {
        if n - end - 1 <= 2 * context {
            end = n;
        } else {
            groups.push((start, end));
            start = n;
            end = n;
        }
    }
    groups.push((start, end));

    // Old and new line positions just before each edit.
    let mut positions = Vec::with_capacity(edits.len());
    let (mut o, mut n) = (0, 0);
    for edit in edits {
        positions.push((o, n));
        match edit {
            Edit::Keep(..) => {
                o += 1;
                n += 1;
            }
            Edit::Delete(_) => o += 1,
            Edit::Insert(_) => n += 1,
        }
    }

    groups
        .into_iter()
        .map(|(first, last)| {
            let from = first.saturating_sub(context);
            let to = (last + 1 + context).min(edits.len());

            let lines: Vec<DiffLine> = edits[from..to]
                .iter()
                .map(|edit| match *edit {
                    Edit::Keep(i, _) => DiffLine::new(LineTag::Context, old[i]),
                    Edit::Delete(i) => DiffLine::new(LineTag::Removed, old[i]),
                    Edit::Insert(j) => DiffLine::new(LineTag::Added, new[j]),
                })
                .collect();

            let old_count = lines.iter().filter(|l| l.tag != LineTag::Added).count();
            let new_count = lines.iter().filter(|l| l.tag != LineTag::Removed).count();
            let (old_pos, new_pos) = positions[from];

            Hunk {
                old_start: if old_count == 0 { old_pos } else { old_pos + 1 },
                old_count,
                new_start: if new_count == 0 { new_pos } else { new_pos + 1 },
                new_count,
                lines,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests;
