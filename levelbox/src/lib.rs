//! Read-only storage for LevelDB-family databases packed into a single
//! archive.
//!
//! [`open_archive`] gives an [`ArchiveStorage`] implementing the engine-facing
//! [`Storage`] contract: it lists and opens database files straight out of the
//! archive, and works out the current manifest from the `CURRENT` pointer files
//! the way the engine's own writer left them. Every mutating call fails with
//! [`Error::ReadOnly`].
//!
//! ```no_run
//! use levelbox::{FileTypes, Storage};
//!
//! # fn main() -> levelbox::Result<()> {
//! levelbox::create_archive("./db", "./db.pack")?;
//!
//! let storage = levelbox::open_archive("./db.pack")?;
//! let manifest = storage.get_meta()?;
//! let tables = storage.list(FileTypes::ALL)?;
//! # let _ = (manifest, tables);
//! # Ok(())
//! # }
//! ```

pub mod archive;
mod error;
mod pack;
pub mod storage;

pub use archive::{Archive, ArchiveEntry, MemoryArchive};
pub use error::{Error, Result};
pub use pack::{create_archive, create_archive_with_alignment, open_archive};
pub use storage::{
    ArchiveStorage, FileDesc, FileReader, FileType, FileTypes, Locker, Storage, StorageLock,
};
