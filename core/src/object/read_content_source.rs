use std::io::{self, Cursor, Read};

use super::{ContentSource, ContentSourceOpenResult};

/// Default cap on buffered content: 64 MiB.
pub const DEFAULT_READ_LIMIT: usize = 64 * 1024 * 1024;

/// Buffers a one-shot reader (typically stdin) so it can be opened
/// repeatedly like any other [`ContentSource`].
///
/// Reading stops with `InvalidData` once the limit is exceeded rather than
/// growing without bound.
pub struct ReadContentSource {
    content: Vec<u8>,
}

impl ReadContentSource {
    pub fn new<R: Read>(r: R) -> io::Result<ReadContentSource> {
        ReadContentSource::with_limit(r, DEFAULT_READ_LIMIT)
    }

    /// Buffer at most `limit` bytes from `r`.
    pub fn with_limit<R: Read>(r: R, limit: usize) -> io::Result<ReadContentSource> {
        let mut content = Vec::new();
        r.take(limit as u64 + 1).read_to_end(&mut content)?;

        if content.len() > limit {
            return Err(io::Error::new(
                io::ErrorKind::InvalidData,
                format!("input exceeds {} bytes", limit),
            ));
        }

        Ok(ReadContentSource { content })
    }
}

impl ContentSource for ReadContentSource {
    fn len(&self) -> usize {
        self.content.len()
    }

    fn open(&self) -> ContentSourceOpenResult {
        Ok(Box::new(Cursor::new(&self.content)))
    }
}
