use std::num::NonZeroU64;

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct PackHeader {
    pub(crate) magic_bytes: [u8; 4],
    pub(crate) version: u8,
    pub(crate) alignment: u32,
    pub(crate) trailer: Option<NonZeroU64>,
}

/// Size of the fixed header at the start of every pack file.
pub const HEADER_SIZE: u64 = 32;

// Make some attempt to not accidentally load plain text files,
// and also make it break almost immediately in any UTF-8 compliant text parser.
pub(crate) const MAGIC_BYTES: &[u8; 4] = b"\xffLVB";
pub const VERSION: u8 = 0;

impl PackHeader {
    pub(crate) fn new(trailer: Option<NonZeroU64>) -> PackHeader {
        PackHeader {
            magic_bytes: *MAGIC_BYTES,
            version: VERSION,
            alignment: 0,
            trailer,
        }
    }

    pub(crate) fn with_alignment(alignment: u32) -> PackHeader {
        PackHeader {
            alignment,
            ..Default::default()
        }
    }
}

impl Default for PackHeader {
    fn default() -> Self {
        PackHeader::new(None)
    }
}
