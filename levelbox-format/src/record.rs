use crate::path::EntryPath;

/// Location and checksum of one stored entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntryRecord {
    /// Name of the stored file. A database pack holds a flat directory, so this
    /// is a bare file name such as `CURRENT` or `000005.ldb`.
    pub path: EntryPath,

    /// The position of the data in the file.
    pub data: u64,

    /// The exact length of the data as written, ignoring any padding.
    pub length: u64,

    /// CRC-32 (IEEE) of the stored bytes.
    pub checksum: u32,
}

impl EntryRecord {
    #[inline(always)]
    pub fn path(&self) -> &EntryPath {
        &self.path
    }

    #[inline(always)]
    pub fn len(&self) -> u64 {
        self.length
    }

    #[inline(always)]
    pub fn is_empty(&self) -> bool {
        self.length == 0
    }

    /// End of the data range, or `None` if it overflows.
    #[inline(always)]
    pub(crate) fn end(&self) -> Option<u64> {
        self.data.checked_add(self.length)
    }
}
