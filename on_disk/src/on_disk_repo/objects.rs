//! Loose objects: one zlib-compressed file per object under
//! `.strand/objects/<first 2 hex digits>/<remaining 62>`.

use std::fs::{self, File};
use std::io::{self, BufReader, Read, Write};
use std::path::PathBuf;
use std::sync::Arc;

use flate2::read::ZlibDecoder;
use flate2::write::ZlibEncoder;
use flate2::Compression;
use tempfile::NamedTempFile;
use tracing::{debug, warn};

use strand_core::object::{hash_bytes, Commit, HashingReader, Id, Kind, Object};
use strand_core::repo::{read_commit, Error, Missing, ObjectStore, Result};

use super::OnDisk;

impl OnDisk {
    fn object_path(&self, id: &Id) -> PathBuf {
        let (dir, file) = id.shard();
        self.objects_dir().join(dir).join(file)
    }

    /// Read and verify a loose object. `Ok(None)` means the file is absent
    /// or unusable; the latter is logged.
    fn read_loose_object(&self, id: &Id) -> Result<Option<(Kind, Vec<u8>)>> {
        let path = self.object_path(id);

        let file = match File::open(&path) {
            Ok(file) => file,
            Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(err) => return Err(err.into()),
        };

        let mut data = Vec::new();
        if let Err(err) = ZlibDecoder::new(BufReader::new(file)).read_to_end(&mut data) {
            warn!(object = %id, error = %err, "Object file can not be decompressed");
            return Ok(None);
        }

        let split = data.iter().position(|b| *b == b'\n');
        let kind = split.and_then(|n| Kind::from_discriminator(&data[..n]));
        let (kind, n) = match (kind, split) {
            (Some(kind), Some(n)) => (kind, n),
            _ => {
                warn!(object = %id, "Object file has no valid kind line");
                return Ok(None);
            }
        };

        let body = data.split_off(n + 1);
        if hash_bytes(&body) != *id {
            warn!(object = %id, "Object content does not match its ID");
            return Ok(None);
        }

        Ok(Some((kind, body)))
    }
}

impl ObjectStore for OnDisk {
    /// Content is hashed while it is compressed into a temporary file, so
    /// each object is read exactly once. The file is synced and then renamed
    /// into place, so a crash never leaves a partial object under a valid
    /// name. An existing file that fails verification is replaced.
    fn put_object(&mut self, object: &mut Object) -> Result<Id> {
        let objects_dir = self.objects_dir();
        let mut temp = NamedTempFile::new_in(&objects_dir)?;

        let id = {
            let mut encoder = ZlibEncoder::new(temp.as_file_mut(), Compression::default());
            writeln!(encoder, "{}", object.kind())?;

            let mut reader = HashingReader::new(object.open()?);
            io::copy(&mut reader, &mut encoder)?;
            encoder.finish()?;
            reader.finish()
        };

        if let Some(expected) = object.id() {
            if expected != id {
                return Err(Error::Corruption(format!(
                    "content of object {} changed while it was being stored",
                    expected
                )));
            }
        }

        if self.read_loose_object(&id)?.is_some() {
            debug!(object = %id, "Object already stored");
            return Ok(id);
        }

        let path = self.object_path(&id);
        if let Some(dir) = path.parent() {
            fs::create_dir_all(dir)?;
        }

        temp.as_file().sync_all()?;
        temp.persist(&path).map_err(|err| err.error)?;

        debug!(object = %id, kind = %object.kind(), "Stored object");
        Ok(id)
    }

    fn get_object(&self, id: &Id) -> Result<Object> {
        match self.read_loose_object(id)? {
            Some((kind, body)) => Ok(Object::with_id(kind, Box::new(body), *id)),
            None => Err(Error::NotFound(Missing::Object(*id))),
        }
    }

    fn contains_object(&self, id: &Id) -> bool {
        self.object_path(id).is_file()
    }

    /// Parsed commits are cached and shared for the life of this handle.
    fn get_commit(&self, id: &Id) -> Result<Arc<Commit>> {
        if let Some(commit) = self.commits.read().get(id) {
            return Ok(Arc::clone(commit));
        }

        let commit = Arc::new(read_commit(self, id)?);
        self.commits.write().insert(*id, Arc::clone(&commit));
        Ok(commit)
    }
}
