//! The engine-facing storage contract and its archive-backed implementation.

use std::io::{Read, Seek, SeekFrom, Write};
use std::sync::{Mutex, MutexGuard};

use crate::archive::{open_entry, Archive};
use crate::error::{Error, Result};

pub mod current;
mod desc;
pub mod name;

pub use self::desc::{FileDesc, FileType, FileTypes};

/// A held storage lock.
pub trait Locker {
    fn unlock(self);
}

/// What an LSM engine needs from the place its files live.
pub trait Storage {
    type Lock: Locker;
    type Reader: Read + Seek;
    type Writer: Write;

    /// Takes the storage-wide lock.
    fn lock(&self) -> Result<Self::Lock>;

    /// Receives the engine's informational log lines.
    fn log(&self, msg: &str);

    /// Records `fd` as the current manifest.
    fn set_meta(&self, fd: FileDesc) -> Result<()>;

    /// The current manifest.
    fn get_meta(&self) -> Result<FileDesc>;

    /// All files whose type is in `types`, in no particular order.
    fn list(&self, types: FileTypes) -> Result<Vec<FileDesc>>;

    fn open(&self, fd: FileDesc) -> Result<Self::Reader>;

    fn create(&self, fd: FileDesc) -> Result<Self::Writer>;

    fn remove(&self, fd: FileDesc) -> Result<()>;

    fn rename(&self, old: FileDesc, new: FileDesc) -> Result<()>;

    fn close(&self) -> Result<()>;
}

/// Lock handed out by [`ArchiveStorage`]. An immutable archive needs no
/// exclusion, so holding it guards nothing.
#[derive(Debug)]
pub struct StorageLock(());

impl Locker for StorageLock {
    fn unlock(self) {}
}

/// Writer type of a storage that never creates files.
#[derive(Debug)]
pub enum Unwritable {}

impl Write for Unwritable {
    fn write(&mut self, _buf: &[u8]) -> std::io::Result<usize> {
        match *self {}
    }

    fn flush(&mut self) -> std::io::Result<()> {
        match *self {}
    }
}

/// A database file opened out of the archive.
#[derive(Debug)]
pub struct FileReader<R> {
    fd: FileDesc,
    name: String,
    inner: R,
}

impl<R> FileReader<R> {
    pub fn fd(&self) -> FileDesc {
        self.fd
    }

    /// The entry name the file was found under.
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn into_inner(self) -> R {
        self.inner
    }
}

impl<R: Read> Read for FileReader<R> {
    fn read(&mut self, buf: &mut [u8]) -> std::io::Result<usize> {
        self.inner.read(buf)
    }
}

impl<R: Seek> Seek for FileReader<R> {
    fn seek(&mut self, pos: SeekFrom) -> std::io::Result<u64> {
        self.inner.seek(pos)
    }
}

/// Read-only [`Storage`] over an [`Archive`].
///
/// Listing and opening go through one mutex, since archive readers are not
/// assumed to support concurrent structural access. Readers returned by
/// [`Storage::open`] do not hold it.
#[derive(Debug)]
pub struct ArchiveStorage<A> {
    archive: Mutex<Option<A>>,
}

impl<A: Archive> ArchiveStorage<A> {
    pub fn new(archive: A) -> ArchiveStorage<A> {
        ArchiveStorage {
            archive: Mutex::new(Some(archive)),
        }
    }

    fn session(&self) -> MutexGuard<'_, Option<A>> {
        // Nothing is left half-updated under the guard, so poisoning is harmless.
        self.archive.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn with_archive<T>(&self, f: impl FnOnce(&A) -> Result<T>) -> Result<T> {
        match self.session().as_ref() {
            Some(archive) => f(archive),
            None => Err(Error::Closed),
        }
    }

    pub fn is_closed(&self) -> bool {
        self.session().is_none()
    }
}

impl<A: Archive> Storage for ArchiveStorage<A> {
    type Lock = StorageLock;
    type Reader = FileReader<A::Entry>;
    type Writer = Unwritable;

    fn lock(&self) -> Result<StorageLock> {
        Ok(StorageLock(()))
    }

    fn log(&self, _msg: &str) {}

    fn set_meta(&self, _fd: FileDesc) -> Result<()> {
        Err(Error::ReadOnly)
    }

    fn get_meta(&self) -> Result<FileDesc> {
        self.with_archive(|archive| {
            let entries = archive.list()?;
            let result = current::resolve_current(archive, &entries);
            if let Err(err) = &result {
                tracing::debug!(%err, "no usable current manifest");
            }
            result
        })
    }

    fn list(&self, types: FileTypes) -> Result<Vec<FileDesc>> {
        self.with_archive(|archive| {
            Ok(archive
                .list()?
                .iter()
                .filter_map(|entry| name::parse_file_name(&entry.path))
                .filter(|fd| types.contains(fd.ty))
                .collect())
        })
    }

    fn open(&self, fd: FileDesc) -> Result<FileReader<A::Entry>> {
        self.with_archive(|archive| {
            let primary = name::file_name(fd);
            let err = match open_entry(archive, &primary) {
                Ok(inner) => return Ok(FileReader { fd, name: primary, inner }),
                Err(err) => err,
            };

            if !(err.is_not_exist() && name::has_legacy_name(fd)) {
                return Err(err);
            }

            let legacy = name::legacy_file_name(fd);
            let inner = open_entry(archive, &legacy)?;
            tracing::debug!(%fd, name = %legacy, "opened file under legacy name");
            Ok(FileReader { fd, name: legacy, inner })
        })
    }

    fn create(&self, _fd: FileDesc) -> Result<Unwritable> {
        Err(Error::ReadOnly)
    }

    fn remove(&self, _fd: FileDesc) -> Result<()> {
        Err(Error::ReadOnly)
    }

    fn rename(&self, _old: FileDesc, _new: FileDesc) -> Result<()> {
        Err(Error::ReadOnly)
    }

    fn close(&self) -> Result<()> {
        let archive = self.session().take().ok_or(Error::Closed)?;
        archive.close()?;
        Ok(())
    }
}
