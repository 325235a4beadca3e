use std::fmt;
use std::ops::BitOr;

/// Kind of database file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum FileType {
    Manifest,
    Journal,
    Table,
    Temp,
}

impl FileType {
    #[inline]
    pub const fn bit(self) -> u8 {
        match self {
            FileType::Manifest => 1 << 0,
            FileType::Journal => 1 << 1,
            FileType::Table => 1 << 2,
            FileType::Temp => 1 << 3,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            FileType::Manifest => "manifest",
            FileType::Journal => "journal",
            FileType::Table => "table",
            FileType::Temp => "temp",
        }
    }
}

impl fmt::Display for FileType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for FileType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "manifest" => Ok(FileType::Manifest),
            "journal" | "log" => Ok(FileType::Journal),
            "table" => Ok(FileType::Table),
            "temp" | "tmp" => Ok(FileType::Temp),
            _ => Err(format!("Unknown file type: {}", s)),
        }
    }
}

/// A set of [`FileType`]s, used to filter listings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct FileTypes(u8);

impl FileTypes {
    pub const NONE: FileTypes = FileTypes(0);
    pub const ALL: FileTypes = FileTypes(
        FileType::Manifest.bit()
            | FileType::Journal.bit()
            | FileType::Table.bit()
            | FileType::Temp.bit(),
    );

    #[inline]
    pub const fn contains(self, ty: FileType) -> bool {
        self.0 & ty.bit() != 0
    }

    #[inline]
    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }
}

impl From<FileType> for FileTypes {
    fn from(ty: FileType) -> Self {
        FileTypes(ty.bit())
    }
}

impl FromIterator<FileType> for FileTypes {
    fn from_iter<I: IntoIterator<Item = FileType>>(iter: I) -> Self {
        iter.into_iter().fold(FileTypes::NONE, |set, ty| set | ty)
    }
}

impl BitOr for FileTypes {
    type Output = FileTypes;

    fn bitor(self, rhs: FileTypes) -> FileTypes {
        FileTypes(self.0 | rhs.0)
    }
}

impl BitOr<FileType> for FileTypes {
    type Output = FileTypes;

    fn bitor(self, rhs: FileType) -> FileTypes {
        FileTypes(self.0 | rhs.bit())
    }
}

impl BitOr for FileType {
    type Output = FileTypes;

    fn bitor(self, rhs: FileType) -> FileTypes {
        FileTypes(self.bit() | rhs.bit())
    }
}

/// Identity of one logical database file, independent of its on-disk name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FileDesc {
    pub ty: FileType,
    pub num: u64,
}

impl FileDesc {
    #[inline]
    pub const fn new(ty: FileType, num: u64) -> FileDesc {
        FileDesc { ty, num }
    }
}

impl fmt::Display for FileDesc {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{:06}", self.ty, self.num)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn type_sets() {
        let set = FileType::Table | FileType::Journal;
        assert!(set.contains(FileType::Table));
        assert!(set.contains(FileType::Journal));
        assert!(!set.contains(FileType::Manifest));

        for ty in [
            FileType::Manifest,
            FileType::Journal,
            FileType::Table,
            FileType::Temp,
        ] {
            assert!(FileTypes::ALL.contains(ty));
            assert!(!FileTypes::NONE.contains(ty));
        }

        let collected: FileTypes = vec![FileType::Temp, FileType::Manifest].into_iter().collect();
        assert_eq!(collected, FileType::Manifest | FileType::Temp);
    }

    #[test]
    fn display() {
        assert_eq!(FileDesc::new(FileType::Table, 12).to_string(), "table-000012");
        assert_eq!("log".parse::<FileType>(), Ok(FileType::Journal));
        assert!("sst".parse::<FileType>().is_err());
    }
}
