use std::io::{Seek, SeekFrom};
use std::path::PathBuf;

use anyhow::{Context, Result};
use levelbox::{FileType, FileTypes, Storage};

pub fn run(path: PathBuf, types: Vec<FileType>) -> Result<()> {
    use humansize::{file_size_opts as options, FileSize};

    let storage = levelbox::open_archive(&path)
        .with_context(|| format!("Could not open archive `{}`", path.display()))?;

    let types = if types.is_empty() {
        FileTypes::ALL
    } else {
        types.into_iter().collect()
    };

    let mut fds = storage.list(types)?;
    fds.sort();

    println!("Type        Number     Length         Name");
    println!("----------  ---------  -------------  --------");
    for fd in fds {
        let mut reader = storage.open(fd)?;
        let length = reader.seek(SeekFrom::End(0))?;
        let length = length
            .file_size(options::BINARY)
            .unwrap_or_else(|_| length.to_string());

        println!(
            "{:10}  {:>9}  {:>13}  {}",
            fd.ty.as_str(),
            fd.num,
            length,
            reader.name()
        );
    }

    storage.close()?;
    Ok(())
}
