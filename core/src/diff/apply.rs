use std::fs;
use std::io::Write;
use std::path::Path;

use tempfile::NamedTempFile;

use super::{split_lines, Error, FileDiff, Hunk};

impl FileDiff {
    /// Apply this diff to `text` and return the result.
    ///
    /// Hunks are applied in ascending `old_start` order. Each hunk's old side
    /// (its context and removed lines) must match the target exactly at its
    /// position, its counts must agree with its lines, and it must not
    /// overlap an earlier hunk. Otherwise nothing is produced and the error
    /// names the first offending hunk.
    ///
    /// The result ends with a newline if the target did (an empty target
    /// counts as newline-terminated).
    pub fn apply_to_str(&self, text: &str) -> Result<String, Error> {
        let target = split_lines(text);

        let mut order: Vec<usize> = (0..self.hunks.len()).collect();
        order.sort_by_key(|&n| self.hunks[n].old_start);

        let mut out: Vec<&str> = Vec::with_capacity(target.len());
        let mut cursor = 0;

        for n in order {
            let hunk = &self.hunks[n];
            let offset = check_hunk(n, hunk, &target, cursor)?;

            out.extend_from_slice(&target[cursor..offset]);
            out.extend(hunk.new_lines());
            cursor = offset + hunk.old_count;
        }
        out.extend_from_slice(&target[cursor..]);

        let mut result = out.join("\n");
        if !out.is_empty() && (text.is_empty() || text.ends_with('\n')) {
            result.push('\n');
        }
        Ok(result)
    }

    /// Apply this diff to the file at `path`, replacing it atomically.
    ///
    /// On any mismatch the file is left byte-for-byte unchanged.
    pub fn apply_to_file(&self, path: &Path) -> Result<(), Error> {
        let text = fs::read_to_string(path)?;
        let patched = self.apply_to_str(&text)?;

        let dir = match path.parent() {
            Some(dir) if !dir.as_os_str().is_empty() => dir,
            _ => Path::new("."),
        };

        let mut temp = NamedTempFile::new_in(dir)?;
        temp.write_all(patched.as_bytes())?;
        temp.as_file().sync_all()?;

        let permissions = fs::metadata(path)?.permissions();
        fs::set_permissions(temp.path(), permissions)?;

        temp.persist(path).map_err(|err| err.error)?;
        Ok(())
    }
}

/// Check a hunk against the target and return the 0-based index of the
/// first target line it replaces.
fn check_hunk(n: usize, hunk: &Hunk, target: &[&str], cursor: usize) -> Result<usize, Error> {
    let mismatch = |line: usize| Error::HunkMismatch { hunk: n, line };

    if hunk.old_lines().count() != hunk.old_count || hunk.new_lines().count() != hunk.new_count {
        return Err(mismatch(hunk.old_start));
    }

    let offset = if hunk.old_count == 0 {
        hunk.old_start
    } else if hunk.old_start == 0 {
        return Err(mismatch(0));
    } else {
        hunk.old_start - 1
    };

    if offset < cursor || offset + hunk.old_count > target.len() {
        return Err(mismatch(hunk.old_start));
    }

    for (k, expected) in hunk.old_lines().enumerate() {
        if target[offset + k] != expected {
            return Err(mismatch(offset + k + 1));
        }
    }

    Ok(offset)
}
