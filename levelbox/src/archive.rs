//! The archive contract the storage backend reads through.

use std::collections::BTreeMap;
use std::io::{Cursor, Read, Seek};
use std::sync::Arc;

use levelbox_format::{EntryReader, PackReader};

use crate::error::{Error, Result};

/// One named entry of an archive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArchiveEntry {
    pub path: String,
    pub len: u64,
}

/// A read-only, immutable container of named byte streams.
///
/// Implementations are not required to be safe for concurrent `list`/`open`
/// calls; the storage adapter serializes them. Streams returned by `open` must
/// be independent of the archive handle once returned.
pub trait Archive {
    type Entry: Read + Seek;

    fn list(&self) -> std::io::Result<Vec<ArchiveEntry>>;

    /// Fails with [`std::io::ErrorKind::NotFound`] if there is no such entry.
    fn open(&self, path: &str) -> std::io::Result<Self::Entry>;

    fn close(self) -> std::io::Result<()>
    where
        Self: Sized;
}

impl Archive for PackReader {
    type Entry = EntryReader;

    fn list(&self) -> std::io::Result<Vec<ArchiveEntry>> {
        Ok(self
            .entries()
            .iter()
            .map(|record| ArchiveEntry {
                path: record.path().to_string(),
                len: record.len(),
            })
            .collect())
    }

    fn open(&self, path: &str) -> std::io::Result<EntryReader> {
        self.open_entry(path)
    }

    fn close(self) -> std::io::Result<()> {
        PackReader::close(self)
    }
}

/// Opens `name`, mapping absence to [`Error::NotExist`].
pub(crate) fn open_entry<A: Archive>(archive: &A, name: &str) -> Result<A::Entry> {
    archive
        .open(name)
        .map_err(|err| Error::from_archive(err, name))
}

/// An archive held entirely in memory. Handy for tests and for databases
/// that were loaded from somewhere other than a file.
#[derive(Debug, Clone, Default)]
pub struct MemoryArchive {
    entries: BTreeMap<String, Arc<[u8]>>,
}

impl MemoryArchive {
    pub fn new() -> MemoryArchive {
        MemoryArchive::default()
    }

    pub fn insert<S: Into<String>, B: Into<Vec<u8>>>(&mut self, path: S, data: B) -> &mut Self {
        let data: Vec<u8> = data.into();
        self.entries.insert(path.into(), Arc::from(data));
        self
    }

    pub fn with<S: Into<String>, B: Into<Vec<u8>>>(mut self, path: S, data: B) -> Self {
        self.insert(path, data);
        self
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<S: Into<String>, B: Into<Vec<u8>>> FromIterator<(S, B)> for MemoryArchive {
    fn from_iter<I: IntoIterator<Item = (S, B)>>(iter: I) -> Self {
        let mut archive = MemoryArchive::new();
        for (path, data) in iter {
            archive.insert(path, data);
        }
        archive
    }
}

impl Archive for MemoryArchive {
    type Entry = Cursor<Arc<[u8]>>;

    fn list(&self) -> std::io::Result<Vec<ArchiveEntry>> {
        Ok(self
            .entries
            .iter()
            .map(|(path, data)| ArchiveEntry {
                path: path.clone(),
                len: data.len() as u64,
            })
            .collect())
    }

    fn open(&self, path: &str) -> std::io::Result<Self::Entry> {
        match self.entries.get(path) {
            Some(data) => Ok(Cursor::new(Arc::clone(data))),
            None => Err(std::io::Error::new(
                std::io::ErrorKind::NotFound,
                format!("no entry '{}' in archive", path),
            )),
        }
    }

    fn close(self) -> std::io::Result<()> {
        Ok(())
    }
}
