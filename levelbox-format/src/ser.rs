use std::io::{Seek, Write};

use byteorder::{LittleEndian, WriteBytesExt};

use crate::{header::PackHeader, path::EntryPath, record::EntryRecord, PackMetadata};

pub(crate) trait Serialize {
    fn write<W: Write + Seek>(&self, writer: &mut W) -> std::io::Result<()>;
}

impl<T: Serialize> Serialize for Vec<T> {
    fn write<W: Write + Seek>(&self, writer: &mut W) -> std::io::Result<()> {
        writer.write_u64::<LittleEndian>(self.len() as u64)?;

        for item in self.iter() {
            item.write(writer)?;
        }
        Ok(())
    }
}

impl Serialize for String {
    fn write<W: Write + Seek>(&self, writer: &mut W) -> std::io::Result<()> {
        writer.write_u64::<LittleEndian>(self.len() as u64)?;
        writer.write_all(self.as_bytes())
    }
}

impl Serialize for EntryPath {
    fn write<W: Write + Seek>(&self, writer: &mut W) -> std::io::Result<()> {
        self.0.write(writer)
    }
}

impl Serialize for EntryRecord {
    fn write<W: Write + Seek>(&self, writer: &mut W) -> std::io::Result<()> {
        self.path.write(writer)?;
        writer.write_u64::<LittleEndian>(self.data)?;
        writer.write_u64::<LittleEndian>(self.length)?;
        writer.write_u32::<LittleEndian>(self.checksum)
    }
}

impl Serialize for PackHeader {
    fn write<W: Write + Seek>(&self, writer: &mut W) -> std::io::Result<()> {
        writer.write_all(&self.magic_bytes)?;
        writer.write_u8(self.version)?;
        writer.write_all(&[0u8; 3])?; // reserved1
        writer.write_u32::<LittleEndian>(self.alignment)?;
        writer.write_all(&[0u8; 4])?; // reserved2
        writer.write_u64::<LittleEndian>(self.trailer.map(|x| x.get()).unwrap_or(0))?;
        writer.write_all(&[0u8; 8]) // reserved3
    }
}

impl Serialize for PackMetadata {
    fn write<W: Write + Seek>(&self, writer: &mut W) -> std::io::Result<()> {
        self.entries.write(writer)
    }
}
