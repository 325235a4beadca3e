use std::num::NonZeroU32;
use std::path::PathBuf;

use anyhow::{Context, Result};

pub fn run(
    path: PathBuf,
    db_dir: PathBuf,
    alignment: Option<NonZeroU32>,
    verbose: bool,
) -> Result<()> {
    use humansize::{file_size_opts as options, FileSize};

    if !db_dir.is_dir() {
        anyhow::bail!("`{}` is not a directory; aborting.", db_dir.display());
    }

    let size = levelbox::create_archive_with_alignment(&db_dir, &path, alignment)
        .with_context(|| format!("Could not pack `{}`", db_dir.display()))?;
    tracing::debug!(archive = %path.display(), size, "created archive");

    if verbose {
        println!(
            "{} ({})",
            path.display(),
            size.file_size(options::BINARY)
                .unwrap_or_else(|_| size.to_string())
        );
    }

    Ok(())
}
