use std::io::{self, BufRead, Cursor, Read};

/// Result type for operations which depend on [`ContentSource::open()`].
pub type ContentSourceResult<T> = io::Result<T>;

/// Result type for [`ContentSource::open()`] call.
pub type ContentSourceOpenResult<'a> = ContentSourceResult<Box<dyn BufRead + 'a>>;

/// Trait used for reading object content from various sources.
///
/// A content source may be opened any number of times; each call to
/// [`open()`](ContentSource::open) starts again from the first byte. This
/// lets the store hash content in one pass and write it in another without
/// holding it in memory.
pub trait ContentSource {
    /// Returns the length (in bytes) of the content.
    fn len(&self) -> usize;

    /// Returns true if the content is empty.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns a [`BufRead`] struct which can be used for reading the content.
    fn open(&self) -> ContentSourceOpenResult;

    /// Reads the entire content into memory.
    fn read_to_vec(&self) -> ContentSourceResult<Vec<u8>> {
        let mut buf = Vec::with_capacity(self.len());
        self.open()?.read_to_end(&mut buf)?;
        Ok(buf)
    }
}

impl ContentSource for Vec<u8> {
    fn len(&self) -> usize {
        self.len()
    }

    fn open(&self) -> ContentSourceOpenResult {
        Ok(Box::new(Cursor::new(self)))
    }
}

impl ContentSource for String {
    fn len(&self) -> usize {
        self.len()
    }

    fn open(&self) -> ContentSourceOpenResult {
        Ok(Box::new(Cursor::new(self.as_bytes())))
    }
}
