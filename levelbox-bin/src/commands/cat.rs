use std::path::PathBuf;

use anyhow::{Context, Result};
use levelbox::storage::name::parse_file_name;
use levelbox::Storage;

pub fn run(path: PathBuf, file: &str) -> Result<()> {
    let fd = match parse_file_name(file) {
        Some(fd) => fd,
        None => anyhow::bail!("`{}` is not a database file name; aborting.", file),
    };

    let storage = levelbox::open_archive(&path)
        .with_context(|| format!("Could not open archive `{}`", path.display()))?;

    let mut reader = storage
        .open(fd)
        .with_context(|| format!("Could not open `{}`", file))?;
    let stdout = std::io::stdout();
    let written = std::io::copy(&mut reader, &mut stdout.lock())?;
    tracing::debug!(name = reader.name(), written, "wrote file to stdout");

    storage.close()?;
    Ok(())
}
