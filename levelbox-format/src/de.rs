use std::io::{Error, ErrorKind, Read, Seek};
use std::num::NonZeroU64;

use byteorder::{LittleEndian, ReadBytesExt};

use crate::{
    header::{PackHeader, MAGIC_BYTES, VERSION},
    path::EntryPath,
    record::EntryRecord,
    PackMetadata,
};

// Upper bound on speculative allocation when a length prefix comes from disk.
const MAX_PREALLOC: u64 = 1024;

pub(crate) trait DeserializeOwned {
    fn deserialize_owned<R: Read + Seek>(reader: &mut R) -> std::io::Result<Self>
    where
        Self: Sized;
}

impl<T: DeserializeOwned> DeserializeOwned for Vec<T> {
    fn deserialize_owned<R: Read + Seek>(reader: &mut R) -> std::io::Result<Self> {
        let start = reader.stream_position()?;
        let len = reader.read_u64::<LittleEndian>()?;
        let mut buf = Vec::with_capacity(len.min(MAX_PREALLOC) as usize);
        for _ in 0..len {
            buf.push(T::deserialize_owned(reader)?);
        }
        let end = reader.stream_position()?;
        tracing::debug!(
            start = format_args!("{:#x}", start),
            end = format_args!("{:#x}", end),
            bytes = end - start,
            count = len,
            "deserialized Vec"
        );
        Ok(buf)
    }
}

impl DeserializeOwned for String {
    fn deserialize_owned<R: Read + Seek>(reader: &mut R) -> std::io::Result<Self> {
        let len = reader.read_u64::<LittleEndian>()?;
        let mut buf = Vec::with_capacity(len.min(MAX_PREALLOC) as usize);
        reader.by_ref().take(len).read_to_end(&mut buf)?;
        if buf.len() as u64 != len {
            return Err(Error::new(
                ErrorKind::UnexpectedEof,
                "string extends past end of trailer",
            ));
        }
        String::from_utf8(buf).map_err(|e| Error::new(ErrorKind::InvalidData, e))
    }
}

impl DeserializeOwned for EntryPath {
    fn deserialize_owned<R: Read + Seek>(reader: &mut R) -> std::io::Result<Self> {
        let path = String::deserialize_owned(reader)?;
        EntryPath::new(&path).map_err(|e| Error::new(ErrorKind::InvalidData, e))
    }
}

impl DeserializeOwned for EntryRecord {
    fn deserialize_owned<R: Read + Seek>(reader: &mut R) -> std::io::Result<Self> {
        let start = reader.stream_position()?;
        let path = EntryPath::deserialize_owned(reader)?;
        let data = reader.read_u64::<LittleEndian>()?;
        let length = reader.read_u64::<LittleEndian>()?;
        let checksum = reader.read_u32::<LittleEndian>()?;

        let end = reader.stream_position()?;
        tracing::debug!(start = format_args!("{:#x}", start), end = format_args!("{:#x}", end), bytes = end - start, %path, "deserialized EntryRecord");

        Ok(EntryRecord {
            path,
            data,
            length,
            checksum,
        })
    }
}

impl DeserializeOwned for PackHeader {
    fn deserialize_owned<R: Read + Seek>(reader: &mut R) -> std::io::Result<Self> {
        let mut magic_bytes = [0u8; 4];
        reader.read_exact(&mut magic_bytes)?;

        if &magic_bytes != MAGIC_BYTES {
            return Err(Error::new(ErrorKind::InvalidData, "magic bytes invalid"));
        }

        let version = reader.read_u8()?;
        if version != VERSION {
            return Err(Error::new(
                ErrorKind::InvalidData,
                format!("unsupported pack version {}", version),
            ));
        }

        let mut reserved = [0u8; 8];
        reader.read_exact(&mut reserved[..3])?;
        let alignment = reader.read_u32::<LittleEndian>()?;
        reader.read_exact(&mut reserved[..4])?;
        let trailer = reader.read_u64::<LittleEndian>()?;
        reader.read_exact(&mut reserved)?;

        Ok(PackHeader {
            magic_bytes,
            version,
            alignment,
            trailer: NonZeroU64::new(trailer),
        })
    }
}

impl DeserializeOwned for PackMetadata {
    fn deserialize_owned<R: Read + Seek>(reader: &mut R) -> std::io::Result<Self> {
        let entries = <Vec<EntryRecord>>::deserialize_owned(reader)?;
        Ok(PackMetadata { entries })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ser::Serialize;
    use std::io::Cursor;

    #[test]
    fn header_is_fixed_size() {
        let mut cursor = Cursor::new(Vec::new());
        PackHeader::new(NonZeroU64::new(0x40)).write(&mut cursor).unwrap();
        assert_eq!(cursor.get_ref().len() as u64, crate::HEADER_SIZE);

        cursor.set_position(0);
        let header = PackHeader::deserialize_owned(&mut cursor).unwrap();
        assert_eq!(header.trailer, NonZeroU64::new(0x40));
        assert_eq!(header.alignment, 0);
    }

    #[test]
    fn rejects_foreign_magic() {
        let mut cursor = Cursor::new(b"PK\x03\x04 this is not a pack file at all".to_vec());
        let err = PackHeader::deserialize_owned(&mut cursor).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidData);
    }

    #[test]
    fn truncated_string_is_an_error() {
        let mut bytes = 100u64.to_le_bytes().to_vec();
        bytes.extend_from_slice(b"short");
        let err = String::deserialize_owned(&mut Cursor::new(bytes)).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::UnexpectedEof);
    }
}
