use std::fs::{File, OpenOptions};
use std::io::{prelude::*, BufWriter, SeekFrom};
use std::num::{NonZeroU32, NonZeroU64};
use std::path::{Path, PathBuf};

use super::PackMetadata;
use crate::{
    counting::CountingWriter,
    header::{PackHeader, HEADER_SIZE},
    path::EntryPath,
    record::EntryRecord,
    ser::Serialize,
};

/// Builds a pack file. Entries are appended in insertion order and the
/// trailer is written by [`PackWriter::finish`] (or on drop).
#[derive(Debug)]
pub struct PackWriter {
    pub(crate) file: BufWriter<File>,
    pub(crate) path: PathBuf,
    pub(crate) header: PackHeader,
    pub(crate) meta: PackMetadata,
    finished: bool,
}

impl Drop for PackWriter {
    fn drop(&mut self) {
        if !self.finished {
            let _ = self.finish_inner();
        }
    }
}

impl PackWriter {
    /// This will create a new pack file for writing, and error if the file already exists.
    pub fn create<P: AsRef<Path>>(path: P) -> std::io::Result<PackWriter> {
        Self::create_inner(path.as_ref(), PackHeader::default())
    }

    /// Like [`PackWriter::create`], but starts every entry on a multiple of
    /// `alignment` bytes. For best results, consider a power of 2.
    pub fn create_with_alignment<P: AsRef<Path>>(
        path: P,
        alignment: NonZeroU32,
    ) -> std::io::Result<PackWriter> {
        Self::create_inner(path.as_ref(), PackHeader::with_alignment(alignment.get()))
    }

    fn create_inner(path: &Path, header: PackHeader) -> std::io::Result<PackWriter> {
        let file = OpenOptions::new()
            .write(true)
            .read(true)
            .create_new(true)
            .open(path)?;

        let mut pack = PackWriter {
            file: BufWriter::new(file),
            path: path.canonicalize()?,
            header,
            meta: PackMetadata::default(),
            finished: false,
        };

        pack.write_header()?;

        Ok(pack)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn alignment(&self) -> u32 {
        self.header.alignment
    }

    pub fn metadata(&self) -> &PackMetadata {
        &self.meta
    }

    /// Copies `value` into the pack under `path`. Fails with
    /// [`std::io::ErrorKind::AlreadyExists`] if the path was already inserted.
    pub fn insert<R: Read>(
        &mut self,
        path: EntryPath,
        value: &mut R,
    ) -> std::io::Result<&EntryRecord> {
        if self.meta.entries.iter().any(|x| x.path == path) {
            return Err(std::io::Error::new(
                std::io::ErrorKind::AlreadyExists,
                format!("path already found: {}", path),
            ));
        }

        let data = self.next_write_addr();
        self.file.seek(SeekFrom::Start(data))?;

        let mut writer = CountingWriter::new(&mut self.file);
        std::io::copy(value, &mut writer)?;
        let length = writer.bytes_written();
        let checksum = writer.checksum();

        tracing::debug!(%path, data, length, "inserted entry");

        self.meta.entries.push(EntryRecord {
            path,
            data,
            length,
            checksum,
        });

        Ok(&self.meta.entries[self.meta.entries.len() - 1])
    }

    /// Writes the trailer and returns the final size of the pack.
    pub fn finish(mut self) -> std::io::Result<u64> {
        self.finish_inner()
    }

    #[inline(always)]
    fn write_header(&mut self) -> std::io::Result<()> {
        self.file.seek(SeekFrom::Start(0))?;
        self.header.write(&mut self.file)
    }

    fn finish_inner(&mut self) -> std::io::Result<u64> {
        self.finished = true;

        let pos = self.next_write_addr();
        self.header.trailer = NonZeroU64::new(pos);
        self.write_header()?;
        self.file.seek(SeekFrom::Start(pos))?;
        self.meta.write(&mut self.file)?;

        let new_pos = self.file.stream_position()?;
        self.file.flush()?;
        let file = self.file.get_mut();
        file.set_len(new_pos)?;
        file.sync_all()?;
        Ok(new_pos)
    }

    #[inline(always)]
    fn next_write_addr(&self) -> u64 {
        let offset = self
            .meta
            .entries
            .last()
            .map(|r| r.data + r.length)
            .unwrap_or(HEADER_SIZE);

        match self.header.alignment {
            0 => offset,
            alignment => {
                let alignment = alignment as u64;
                let diff = offset % alignment;
                if diff == 0 {
                    offset
                } else {
                    offset + (alignment - diff)
                }
            }
        }
    }
}
