use std::io::{self, Write};
use std::path::Path;

use tempfile::NamedTempFile;

/// Replace the file at `path` with `content`.
///
/// The content goes to a temporary file in the same directory, is synced to
/// disk, and is then renamed over `path`. Readers see either the old file or
/// the new one, never a partial write.
pub(crate) fn write_atomic(path: &Path, content: &[u8]) -> io::Result<()> {
    let dir = path
        .parent()
        .ok_or_else(|| io::Error::new(io::ErrorKind::InvalidInput, "path has no parent"))?;

    let mut temp = NamedTempFile::new_in(dir)?;
    temp.write_all(content)?;
    temp.as_file().sync_all()?;
    temp.persist(path).map_err(|err| err.error)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::fs;

    use super::write_atomic;

    #[test]
    fn replaces_content() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("file");

        write_atomic(&path, b"one").unwrap();
        assert_eq!(fs::read(&path).unwrap(), b"one");

        write_atomic(&path, b"two").unwrap();
        assert_eq!(fs::read(&path).unwrap(), b"two");

        assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 1);
    }

    #[test]
    fn missing_dir() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nope").join("file");
        assert!(write_atomic(&path, b"x").is_err());
    }
}
