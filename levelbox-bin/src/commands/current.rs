use std::path::PathBuf;

use anyhow::{Context, Result};
use levelbox::storage::name::file_name;
use levelbox::Storage;

pub fn run(path: PathBuf) -> Result<()> {
    let storage = levelbox::open_archive(&path)
        .with_context(|| format!("Could not open archive `{}`", path.display()))?;

    let fd = storage
        .get_meta()
        .with_context(|| format!("No usable database in `{}`", path.display()))?;
    println!("{}", file_name(fd));

    storage.close()?;
    Ok(())
}
