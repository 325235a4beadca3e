use std::path::PathBuf;

use anyhow::{Context, Result};
use levelbox_format::PackReader;

pub fn run(path: PathBuf, verbose: bool) -> Result<()> {
    let pack = PackReader::open(&path)
        .with_context(|| format!("Could not open archive `{}`", path.display()))?;

    let mut failed = 0usize;
    for record in pack.entries() {
        let ok = pack.verify(record);
        tracing::debug!(path = %record.path, length = record.length, ok, "verified entry");
        if ok {
            if verbose {
                println!("ok      {}", record.path);
            }
        } else {
            failed += 1;
            println!("FAILED  {}", record.path);
        }
    }

    if failed > 0 {
        anyhow::bail!(
            "{} of {} stored files failed checksum validation.",
            failed,
            pack.entries().len()
        );
    }

    if verbose {
        println!("{} stored files valid.", pack.entries().len());
    }
    Ok(())
}
