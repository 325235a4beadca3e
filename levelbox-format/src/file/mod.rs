use std::io::{Read, Seek, SeekFrom};
use std::num::NonZeroU64;

use crate::{de::DeserializeOwned, header::PackHeader, record::EntryRecord};

pub mod reader;
pub mod writer;

#[derive(Debug, Default, Clone)]
pub struct PackMetadata {
    /// Entries in insertion order.
    pub(crate) entries: Vec<EntryRecord>,
}

impl PackMetadata {
    #[inline(always)]
    pub fn entries(&self) -> &[EntryRecord] {
        &self.entries
    }
}

#[inline(always)]
pub(crate) fn read_header<R: Read + Seek>(file: &mut R) -> std::io::Result<PackHeader> {
    file.seek(SeekFrom::Start(0))?;
    PackHeader::deserialize_owned(file)
}

#[inline(always)]
pub(crate) fn read_trailer<R: Read + Seek>(
    file: &mut R,
    ptr: NonZeroU64,
) -> std::io::Result<PackMetadata> {
    file.seek(SeekFrom::Start(ptr.get()))?;
    PackMetadata::deserialize_owned(file)
}

#[cfg(test)]
mod tests {
    use crate::*;
    use std::io::prelude::*;
    use std::num::NonZeroU32;
    use std::path::Path;

    fn create_test_pack(filename: &Path) {
        let mut writer = PackWriter::create(filename).unwrap();
        writer
            .insert(
                EntryPath::new("CURRENT").unwrap(),
                &mut &b"MANIFEST-000002\n"[..],
            )
            .unwrap();
        writer
            .insert(
                EntryPath::new("MANIFEST-000002").unwrap(),
                &mut &b"manifest bytes"[..],
            )
            .unwrap();
        writer
            .insert(EntryPath::new("000003.log").unwrap(), &mut &b""[..])
            .unwrap();
        writer.finish().unwrap();
    }

    #[test]
    fn read_back_entries() {
        let dir = tempfile::tempdir().unwrap();
        let filename = dir.path().join("db.pack");
        create_test_pack(&filename);

        let pack = PackReader::open(&filename).unwrap();
        let names = pack
            .entries()
            .iter()
            .map(|x| x.path().as_str())
            .collect::<Vec<_>>();
        assert_eq!(names, ["CURRENT", "MANIFEST-000002", "000003.log"]);

        let mut buf = String::new();
        pack.open_entry("CURRENT")
            .unwrap()
            .read_to_string(&mut buf)
            .unwrap();
        assert_eq!(buf, "MANIFEST-000002\n");

        let empty = pack.open_entry("000003.log").unwrap();
        assert!(empty.is_empty());

        for record in pack.entries() {
            assert!(pack.verify(record), "checksum mismatch for {}", record.path);
        }
    }

    #[test]
    fn missing_entry_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let filename = dir.path().join("db.pack");
        create_test_pack(&filename);

        let pack = PackReader::open(&filename).unwrap();
        let err = pack.open_entry("CURRENT.bak").unwrap_err();
        assert_eq!(err.kind(), std::io::ErrorKind::NotFound);
    }

    #[test]
    fn duplicate_insert_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let filename = dir.path().join("dup.pack");

        let mut writer = PackWriter::create(&filename).unwrap();
        writer
            .insert(EntryPath::new("LOG").unwrap(), &mut &b"a"[..])
            .unwrap();
        let err = writer
            .insert(EntryPath::new("LOG").unwrap(), &mut &b"b"[..])
            .unwrap_err();
        assert_eq!(err.kind(), std::io::ErrorKind::AlreadyExists);
        writer.finish().unwrap();

        let pack = PackReader::open(&filename).unwrap();
        assert_eq!(pack.entries().len(), 1);
        assert_eq!(pack.open_entry("LOG").unwrap().as_slice(), b"a");
    }

    #[test]
    fn aligned_entries() {
        let dir = tempfile::tempdir().unwrap();
        let filename = dir.path().join("aligned.pack");

        let mut writer =
            PackWriter::create_with_alignment(&filename, NonZeroU32::new(512).unwrap()).unwrap();
        writer
            .insert(EntryPath::new("000001.ldb").unwrap(), &mut &b"one"[..])
            .unwrap();
        writer
            .insert(EntryPath::new("000002.ldb").unwrap(), &mut &b"two"[..])
            .unwrap();
        writer.finish().unwrap();

        let pack = PackReader::open(&filename).unwrap();
        assert_eq!(pack.alignment(), 512);
        for record in pack.entries() {
            assert_eq!(record.data % 512, 0);
        }
        assert_eq!(pack.open_entry("000002.ldb").unwrap().as_slice(), b"two");
    }

    #[test]
    fn dropped_writer_is_finished() {
        let dir = tempfile::tempdir().unwrap();
        let filename = dir.path().join("dropped.pack");

        {
            let mut writer = PackWriter::create(&filename).unwrap();
            writer
                .insert(EntryPath::new("CURRENT").unwrap(), &mut &b"x"[..])
                .unwrap();
        }

        let pack = PackReader::open(&filename).unwrap();
        assert!(pack.get("CURRENT").is_some());
    }

    #[test]
    fn create_refuses_existing_file() {
        let dir = tempfile::tempdir().unwrap();
        let filename = dir.path().join("exists.pack");
        std::fs::write(&filename, b"").unwrap();

        let err = PackWriter::create(&filename).unwrap_err();
        assert_eq!(err.kind(), std::io::ErrorKind::AlreadyExists);
    }

    #[test]
    fn open_garbage() {
        let dir = tempfile::tempdir().unwrap();
        let filename = dir.path().join("garbage.pack");
        std::fs::write(&filename, b"not a pack").unwrap();

        match PackReader::open(&filename) {
            Err(OpenError::MissingHeader(_)) => {}
            other => panic!("unexpected result: {:?}", other.map(|_| ())),
        }
    }

    #[test]
    fn open_unfinished() {
        let dir = tempfile::tempdir().unwrap();
        let filename = dir.path().join("unfinished.pack");

        let mut bytes = b"\xffLVB".to_vec();
        bytes.resize(crate::HEADER_SIZE as usize, 0);
        std::fs::write(&filename, &bytes).unwrap();

        match PackReader::open(&filename) {
            Err(OpenError::MissingTrailer) => {}
            other => panic!("unexpected result: {:?}", other.map(|_| ())),
        }
    }

    #[test]
    fn corrupted_data_fails_verification() {
        let dir = tempfile::tempdir().unwrap();
        let filename = dir.path().join("flipped.pack");
        create_test_pack(&filename);

        let offset = {
            let pack = PackReader::open(&filename).unwrap();
            pack.get("MANIFEST-000002").unwrap().data as usize
        };
        let mut bytes = std::fs::read(&filename).unwrap();
        bytes[offset] ^= 0xff;
        std::fs::write(&filename, &bytes).unwrap();

        let pack = PackReader::open(&filename).unwrap();
        assert!(!pack.verify(pack.get("MANIFEST-000002").unwrap()));
        assert!(pack.verify(pack.get("CURRENT").unwrap()));
    }
}
