//! The pack container that `levelbox` reads databases out of.
//!
//! Use [PackReader][PackReader] to read archives, and [PackWriter][PackWriter] to write them.

mod counting;
mod de;
mod file;
mod header;
pub mod path;
mod record;
mod ser;

pub use file::reader::{EntryReader, OpenError, PackReader};
pub use file::writer::PackWriter;
pub use file::PackMetadata;
pub use header::{HEADER_SIZE, VERSION};
pub use path::EntryPath;
pub use record::EntryRecord;
