use std::fs::{self, File};
use std::io::{self, BufReader};
use std::path::{Path, PathBuf};

use super::{ContentSource, ContentSourceOpenResult};

/// Streams content from a regular file in the work tree.
///
/// The length is taken when the source is created. Each `open()` reopens
/// the file, so a file edited in between is hashed as it is now.
pub struct FileContentSource {
    path: PathBuf,
    len: usize,
}

impl FileContentSource {
    /// Describe the regular file at `path`.
    ///
    /// Directories and other non-file entries are rejected with
    /// `InvalidInput`; a missing file surfaces as `NotFound`.
    pub fn new<P: AsRef<Path>>(path: P) -> io::Result<FileContentSource> {
        let path = path.as_ref();
        let metadata = fs::metadata(path)?;
        if !metadata.is_file() {
            return Err(io::Error::new(
                io::ErrorKind::InvalidInput,
                format!("{} is not a regular file", path.display()),
            ));
        }

        Ok(FileContentSource {
            path: path.to_path_buf(),
            len: metadata.len() as usize,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl ContentSource for FileContentSource {
    fn len(&self) -> usize {
        self.len
    }

    fn open(&self) -> ContentSourceOpenResult {
        Ok(Box::new(BufReader::new(File::open(&self.path)?)))
    }
}
