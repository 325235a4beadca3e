//! Mapping between [`FileDesc`]s and the engine's file names.
//!
//! | Type     | Name               |
//! |----------|--------------------|
//! | Manifest | `MANIFEST-NNNNNN`  |
//! | Journal  | `NNNNNN.log`       |
//! | Table    | `NNNNNN.ldb` (older engines: `NNNNNN.sst`) |
//! | Temp     | `NNNNNN.tmp`       |
//!
//! Names are written with at least six digits; any width is accepted when
//! parsing.

use super::{FileDesc, FileType};

const MANIFEST_PREFIX: &str = "MANIFEST-";

pub fn file_name(fd: FileDesc) -> String {
    match fd.ty {
        FileType::Manifest => format!("{}{:06}", MANIFEST_PREFIX, fd.num),
        FileType::Journal => format!("{:06}.log", fd.num),
        FileType::Table => format!("{:06}.ldb", fd.num),
        FileType::Temp => format!("{:06}.tmp", fd.num),
    }
}

/// Whether files of this descriptor's type may also be stored under a
/// legacy name.
#[inline]
pub fn has_legacy_name(fd: FileDesc) -> bool {
    fd.ty == FileType::Table
}

/// The legacy name for `fd`; same as [`file_name`] for types without one.
pub fn legacy_file_name(fd: FileDesc) -> String {
    match fd.ty {
        FileType::Table => format!("{:06}.sst", fd.num),
        _ => file_name(fd),
    }
}

/// Parses an engine file name. Anything that is not one (`CURRENT`, `LOCK`,
/// `LOG`, `README.txt`, ...) yields `None`.
pub fn parse_file_name(name: &str) -> Option<FileDesc> {
    if let Some((num, ext)) = name.split_once('.') {
        if let Some(num) = parse_num(num) {
            let ty = match ext {
                "log" => FileType::Journal,
                "ldb" | "sst" => FileType::Table,
                "tmp" => FileType::Temp,
                _ => return None,
            };
            return Some(FileDesc::new(ty, num));
        }
    }

    name.strip_prefix(MANIFEST_PREFIX)
        .and_then(parse_num)
        .map(|num| FileDesc::new(FileType::Manifest, num))
}

/// One or more ASCII digits that fit in a `u64`.
pub(crate) fn parse_num(s: &str) -> Option<u64> {
    if s.is_empty() || !s.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    s.parse().ok()
}
