use std::collections::HashMap;
use std::fs::File;
use std::io::{BufReader, Cursor, Read, Seek, SeekFrom};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use memmap2::Mmap;

use super::{read_header, read_trailer, PackMetadata};
use crate::{header::PackHeader, record::EntryRecord};

#[derive(Debug, thiserror::Error)]
pub enum OpenError {
    #[error("Could not find trailer (the end of the file is missing).")]
    MissingTrailer,

    #[error("Invalid trailer data (the data that describes where all the files are is invalid).")]
    InvalidTrailer(#[source] std::io::Error),

    #[error("Could not read header. Is this a valid pack archive?")]
    MissingHeader(#[source] std::io::Error),

    #[error("Invalid path to pack file. Path: '{}'", .1.display())]
    InvalidPath(#[source] std::io::Error, PathBuf),

    #[error("Failed to read pack file. Path: '{}'", .1.display())]
    ReadFailed(#[source] std::io::Error, PathBuf),
}

/// Read-only view of a finished pack file.
///
/// The whole file is memory-mapped once; every [`EntryReader`] handed out keeps
/// its own reference to the mapping, so readers stay valid after the
/// `PackReader` itself is closed.
pub struct PackReader {
    pub(crate) map: Arc<Mmap>,
    pub(crate) path: PathBuf,
    pub(crate) header: PackHeader,
    pub(crate) meta: PackMetadata,
    pub(crate) index: HashMap<String, usize>,
}

impl std::fmt::Debug for PackReader {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PackReader")
            .field("path", &self.path)
            .field("header", &self.header)
            .field("meta", &self.meta)
            .finish_non_exhaustive()
    }
}

impl PackReader {
    /// This will open an existing pack file for reading and error if the file is not valid.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<PackReader, OpenError> {
        let path = path.as_ref().to_path_buf();
        let path = path
            .canonicalize()
            .map_err(|e| OpenError::InvalidPath(e, path.clone()))?;

        let file = File::open(&path).map_err(|e| OpenError::ReadFailed(e, path.clone()))?;

        let header = {
            let mut reader = BufReader::new(&file);
            read_header(&mut reader).map_err(OpenError::MissingHeader)?
        };

        let trailer_ptr = header.trailer.ok_or(OpenError::MissingTrailer)?;

        // Safety: pack files are immutable once finished; the mapping is only read.
        let map = unsafe { Mmap::map(&file) }.map_err(|e| OpenError::ReadFailed(e, path.clone()))?;

        if trailer_ptr.get() > map.len() as u64 {
            return Err(OpenError::MissingTrailer);
        }

        let meta = read_trailer(&mut Cursor::new(&map[..]), trailer_ptr)
            .map_err(OpenError::InvalidTrailer)?;

        let mut index = HashMap::with_capacity(meta.entries.len());
        for (i, record) in meta.entries.iter().enumerate() {
            match record.end() {
                Some(end) if end <= trailer_ptr.get() => {}
                _ => {
                    return Err(OpenError::InvalidTrailer(std::io::Error::new(
                        std::io::ErrorKind::InvalidData,
                        format!("entry '{}' lies outside the data region", record.path),
                    )))
                }
            }
            if index.insert(record.path.to_string(), i).is_some() {
                return Err(OpenError::InvalidTrailer(std::io::Error::new(
                    std::io::ErrorKind::InvalidData,
                    format!("duplicate entry '{}'", record.path),
                )));
            }
        }

        tracing::debug!(path = %path.display(), entries = meta.entries.len(), "opened pack");

        Ok(PackReader {
            map: Arc::new(map),
            path,
            header,
            meta,
            index,
        })
    }

    #[inline(always)]
    pub fn path(&self) -> &Path {
        &self.path
    }

    #[inline(always)]
    pub fn alignment(&self) -> u32 {
        self.header.alignment
    }

    #[inline(always)]
    pub fn version(&self) -> u8 {
        self.header.version
    }

    #[inline(always)]
    pub fn metadata(&self) -> &PackMetadata {
        &self.meta
    }

    #[inline(always)]
    pub fn entries(&self) -> &[EntryRecord] {
        self.meta.entries()
    }

    pub fn get(&self, path: &str) -> Option<&EntryRecord> {
        self.index.get(path).map(|&i| &self.meta.entries[i])
    }

    /// Opens the named entry, failing with [`std::io::ErrorKind::NotFound`] if
    /// the pack has no such entry.
    pub fn open_entry(&self, path: &str) -> std::io::Result<EntryReader> {
        match self.get(path) {
            Some(record) => Ok(self.read_entry(record)),
            None => Err(std::io::Error::new(
                std::io::ErrorKind::NotFound,
                format!("no entry '{}' in pack", path),
            )),
        }
    }

    pub fn read_entry(&self, record: &EntryRecord) -> EntryReader {
        EntryReader {
            map: Arc::clone(&self.map),
            start: record.data as usize,
            len: record.length as usize,
            pos: 0,
        }
    }

    /// Checks the stored CRC-32 of an entry against its bytes.
    pub fn verify(&self, record: &EntryRecord) -> bool {
        let reader = self.read_entry(record);
        crc32fast::hash(reader.as_slice()) == record.checksum
    }

    /// Releases this handle on the mapping. Outstanding [`EntryReader`]s keep it alive.
    pub fn close(self) -> std::io::Result<()> {
        tracing::debug!(path = %self.path.display(), "closed pack");
        Ok(())
    }
}

/// Byte stream over one entry of a pack.
#[derive(Clone)]
pub struct EntryReader {
    map: Arc<Mmap>,
    start: usize,
    len: usize,
    pos: u64,
}

impl std::fmt::Debug for EntryReader {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EntryReader")
            .field("start", &self.start)
            .field("len", &self.len)
            .field("pos", &self.pos)
            .finish()
    }
}

impl EntryReader {
    #[inline(always)]
    pub fn len(&self) -> u64 {
        self.len as u64
    }

    #[inline(always)]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    #[inline(always)]
    pub fn as_slice(&self) -> &[u8] {
        &self.map[self.start..self.start + self.len]
    }

    /// Reads at an absolute offset without moving the stream position.
    pub fn read_at(&self, buf: &mut [u8], offset: u64) -> std::io::Result<usize> {
        let data = self.as_slice();
        if offset >= data.len() as u64 {
            return Ok(0);
        }
        let data = &data[offset as usize..];
        let n = buf.len().min(data.len());
        buf[..n].copy_from_slice(&data[..n]);
        Ok(n)
    }
}

impl Read for EntryReader {
    fn read(&mut self, buf: &mut [u8]) -> std::io::Result<usize> {
        let n = self.read_at(buf, self.pos)?;
        self.pos += n as u64;
        Ok(n)
    }
}

impl Seek for EntryReader {
    fn seek(&mut self, pos: SeekFrom) -> std::io::Result<u64> {
        let (base, offset) = match pos {
            SeekFrom::Start(n) => {
                self.pos = n;
                return Ok(n);
            }
            SeekFrom::End(n) => (self.len as u64, n),
            SeekFrom::Current(n) => (self.pos, n),
        };
        match base.checked_add_signed(offset) {
            Some(n) => {
                self.pos = n;
                Ok(n)
            }
            None => Err(std::io::Error::new(
                std::io::ErrorKind::InvalidInput,
                "invalid seek to a negative or overflowing position",
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{EntryPath, PackWriter};

    fn single_entry(content: &[u8]) -> (tempfile::TempDir, PackReader) {
        let dir = tempfile::tempdir().unwrap();
        let filename = dir.path().join("single.pack");
        let mut writer = PackWriter::create(&filename).unwrap();
        writer
            .insert(EntryPath::new("000007.ldb").unwrap(), &mut &content[..])
            .unwrap();
        writer.finish().unwrap();
        let pack = PackReader::open(&filename).unwrap();
        (dir, pack)
    }

    #[test]
    fn seek_and_read() {
        let (_dir, pack) = single_entry(b"0123456789");
        let mut entry = pack.open_entry("000007.ldb").unwrap();

        entry.seek(SeekFrom::End(-3)).unwrap();
        let mut buf = [0u8; 8];
        let n = entry.read(&mut buf).unwrap();
        assert_eq!(&buf[..n], b"789");
        assert_eq!(entry.read(&mut buf).unwrap(), 0);

        entry.seek(SeekFrom::Start(2)).unwrap();
        entry.seek(SeekFrom::Current(1)).unwrap();
        let n = entry.read(&mut buf[..2]).unwrap();
        assert_eq!(&buf[..n], b"34");

        assert!(entry.seek(SeekFrom::Current(-100)).is_err());
    }

    #[test]
    fn read_at_does_not_move_position() {
        let (_dir, pack) = single_entry(b"abcdef");
        let mut entry = pack.open_entry("000007.ldb").unwrap();

        let mut buf = [0u8; 2];
        assert_eq!(entry.read_at(&mut buf, 4).unwrap(), 2);
        assert_eq!(&buf, b"ef");
        assert_eq!(entry.read_at(&mut buf, 10).unwrap(), 0);

        let mut rest = Vec::new();
        entry.read_to_end(&mut rest).unwrap();
        assert_eq!(rest, b"abcdef");
    }

    #[test]
    fn entries_outlive_close() {
        let (_dir, pack) = single_entry(b"still here");
        let entry = pack.open_entry("000007.ldb").unwrap();
        pack.close().unwrap();
        assert_eq!(entry.as_slice(), b"still here");
    }
}
