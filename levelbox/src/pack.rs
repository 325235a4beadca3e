//! Opening and creating pack files holding a whole database directory.

use std::fs::File;
use std::num::NonZeroU32;
use std::path::Path;

use levelbox_format::{EntryPath, PackReader, PackWriter};

use crate::error::Result;
use crate::storage::ArchiveStorage;

/// The engine's process lock file; meaningless inside an archive.
const LOCK_FILE: &str = "LOCK";

/// Opens a pack file as read-only storage.
pub fn open_archive<P: AsRef<Path>>(path: P) -> Result<ArchiveStorage<PackReader>> {
    let pack = PackReader::open(path)?;
    Ok(ArchiveStorage::new(pack))
}

/// Packs the database directory `db_dir` into a new pack file at `archive`,
/// returning the size of the written archive. The destination must not exist,
/// and is not left behind if packing fails.
pub fn create_archive<P: AsRef<Path>, Q: AsRef<Path>>(db_dir: P, archive: Q) -> Result<u64> {
    create_archive_with_alignment(db_dir, archive, None)
}

/// Like [`create_archive`], aligning every stored file to `alignment` bytes.
pub fn create_archive_with_alignment<P: AsRef<Path>, Q: AsRef<Path>>(
    db_dir: P,
    archive: Q,
    alignment: Option<NonZeroU32>,
) -> Result<u64> {
    let db_dir = db_dir.as_ref();

    let mut names = Vec::new();
    for entry in std::fs::read_dir(db_dir)? {
        let entry = entry?;
        if !entry.file_type()?.is_file() {
            continue;
        }
        let name = match entry.file_name().into_string() {
            Ok(name) => name,
            Err(name) => {
                tracing::warn!(?name, "skipping file with a non UTF-8 name");
                continue;
            }
        };
        if name == LOCK_FILE {
            continue;
        }
        names.push(name);
    }
    names.sort();

    // Every name must be storable before anything touches the destination.
    let paths = names
        .iter()
        .map(|name| EntryPath::new(name).map_err(|e| e.as_io_error()))
        .collect::<std::io::Result<Vec<_>>>()?;

    write_archive(archive.as_ref(), alignment, db_dir, paths)
}

/// Creates `archive` and stores `paths` from `db_dir` in it. A partly written
/// archive is removed again on failure.
fn write_archive(
    archive: &Path,
    alignment: Option<NonZeroU32>,
    db_dir: &Path,
    paths: Vec<EntryPath>,
) -> Result<u64> {
    let writer = match alignment {
        Some(alignment) => PackWriter::create_with_alignment(archive, alignment)?,
        None => PackWriter::create(archive)?,
    };

    match pack_files(writer, db_dir, paths) {
        Ok(size) => Ok(size),
        Err(err) => {
            if let Err(e) = std::fs::remove_file(archive) {
                tracing::warn!(path = %archive.display(), error = %e, "could not remove partial archive");
            }
            Err(err)
        }
    }
}

fn pack_files(mut writer: PackWriter, db_dir: &Path, paths: Vec<EntryPath>) -> Result<u64> {
    for path in paths {
        let mut file = File::open(db_dir.join(path.as_str()))?;
        let record = writer.insert(path, &mut file)?;
        tracing::debug!(name = %record.path, length = record.length, "packed file");
    }

    Ok(writer.finish()?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn failed_write_leaves_no_archive() {
        let db = tempfile::tempdir().unwrap();
        std::fs::write(db.path().join("CURRENT"), "MANIFEST-000001\n").unwrap();

        let out = tempfile::tempdir().unwrap();
        let archive = out.path().join("db.pack");
        let paths = vec![
            EntryPath::new("CURRENT").unwrap(),
            EntryPath::new("MANIFEST-000001").unwrap(),
        ];

        let err = write_archive(&archive, None, db.path(), paths).unwrap_err();
        assert!(matches!(err, crate::Error::Io(_)));
        assert!(!archive.exists());
    }

    #[test]
    fn existing_destination_is_kept() {
        let db = tempfile::tempdir().unwrap();
        let out = tempfile::tempdir().unwrap();
        let archive = out.path().join("db.pack");
        std::fs::write(&archive, b"someone else's file").unwrap();

        assert!(write_archive(&archive, None, db.path(), Vec::new()).is_err());
        assert_eq!(std::fs::read(&archive).unwrap(), b"someone else's file");
    }
}
