//! Represents the concept of an "object": a tuple of object kind and
//! binary data, identified by the SHA-256 digest of the binary data.

use std::fmt;
use std::io::Read;

use sha2::{Digest, Sha256};

mod attribution;
pub use attribution::Attribution;

mod commit;
pub use commit::{Commit, CommitParseError};

mod content_source;
pub use content_source::{ContentSource, ContentSourceOpenResult, ContentSourceResult};

mod file_content_source;
pub use file_content_source::FileContentSource;

mod id;
pub use id::{Id, ParseIdError, HEX_LEN, ID_LEN};

mod kind;
pub use kind::Kind;

pub(crate) mod parse_utils;

mod read_content_source;
pub use read_content_source::{ReadContentSource, DEFAULT_READ_LIMIT};

const HASH_BUFFER_SIZE: usize = 8192;

/// Describes a single object stored (or about to be stored) in a repository.
///
/// This struct is constructed, modified, and shared as a working description of
/// how to find and describe an object before it gets written to a repository.
pub struct Object {
    id: Option<Id>,
    kind: Kind,
    content_source: Box<dyn ContentSource>,
}

impl Object {
    /// Create a new Object.
    pub fn new(kind: Kind, content_source: Box<dyn ContentSource>) -> Object {
        Object {
            id: None,
            kind,
            content_source,
        }
    }

    /// Create an Object whose ID is already known.
    ///
    /// The caller vouches that `id` is the digest of the content. Stores use
    /// this after verifying content they have just read back.
    pub fn with_id(kind: Kind, content_source: Box<dyn ContentSource>, id: Id) -> Object {
        Object {
            id: Some(id),
            kind,
            content_source,
        }
    }

    /// Return the ID of the object, if it is known.
    pub fn id(&self) -> Option<Id> {
        self.id
    }

    /// Return the kind of the object.
    pub fn kind(&self) -> Kind {
        self.kind
    }

    /// Return the size (in bytes) of the object.
    pub fn len(&self) -> usize {
        self.content_source.len()
    }

    /// Returns true if the object is empty.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns a `BufRead` struct which can be used for reading the content.
    pub fn open(&self) -> ContentSourceOpenResult {
        self.content_source.open()
    }

    /// Reads the entire content into memory.
    pub fn content(&self) -> ContentSourceResult<Vec<u8>> {
        self.content_source.read_to_vec()
    }

    /// Computes the object's ID from its content and returns it.
    ///
    /// No-op (other than returning the ID) if an ID has been assigned already.
    /// The kind is not part of the digest: a blob's ID is the SHA-256 of the
    /// file bytes, so the work-tree tracker can compare it directly with a
    /// digest of the file on disk.
    pub fn assign_id(&mut self) -> ContentSourceResult<Id> {
        if let Some(id) = self.id {
            return Ok(id);
        }

        let id = hash_reader(self.open()?)?;
        self.id = Some(id);
        Ok(id)
    }
}

// The content source is opaque, so only its length is shown.
impl fmt::Debug for Object {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Object")
            .field("id", &self.id)
            .field("kind", &self.kind)
            .field("len", &self.len())
            .finish()
    }
}

/// Computes the digest of an in-memory byte sequence.
pub fn hash_bytes(data: &[u8]) -> Id {
    let digest = Sha256::digest(data);
    id_from_digest(digest.as_slice())
}

/// Computes the digest of a stream, reading it in fixed-size chunks.
pub fn hash_reader<R: Read>(reader: R) -> ContentSourceResult<Id> {
    let mut reader = HashingReader::new(reader);
    let mut buf = [0; HASH_BUFFER_SIZE];
    while reader.read(&mut buf)? > 0 {}
    Ok(reader.finish())
}

/// A reader that computes the digest of everything read through it.
///
/// Lets a store hash content in the same pass that copies it elsewhere.
pub struct HashingReader<R> {
    inner: R,
    hasher: Sha256,
}

impl<R: Read> HashingReader<R> {
    pub fn new(inner: R) -> HashingReader<R> {
        HashingReader {
            inner,
            hasher: Sha256::new(),
        }
    }

    /// Return the digest of the bytes read so far.
    pub fn finish(self) -> Id {
        id_from_digest(self.hasher.finalize().as_slice())
    }
}

impl<R: Read> Read for HashingReader<R> {
    fn read(&mut self, buf: &mut [u8]) -> std::io::Result<usize> {
        let n = self.inner.read(buf)?;
        self.hasher.update(&buf[..n]);
        Ok(n)
    }
}

fn id_from_digest(digest: &[u8]) -> Id {
    // SHA-256 always yields 32 bytes, so this can only fail if the hasher
    // itself is broken.
    match Id::new(digest) {
        Ok(id) => id,
        Err(err) => unreachable!("SHA-256 produced an invalid digest: {}", err),
    }
}
