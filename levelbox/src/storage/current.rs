//! Working out which manifest is authoritative from a frozen archive.
//!
//! The engine never rewrites `CURRENT` in place. It writes the new pointer to
//! `CURRENT.<n>` and renames that over `CURRENT`, keeping `CURRENT.bak` around.
//! An archive may have been packed at any point of that dance, so the
//! candidates are tried in this order:
//!
//! 1. `CURRENT.<n>` pending-rename files, highest `n` first;
//! 2. `CURRENT`, then `CURRENT.bak`.
//!
//! A candidate whose content is malformed or whose target manifest is missing
//! is skipped. A pending candidate only beats the stable one when it points at
//! a strictly newer manifest; otherwise it is a leftover from an older write.

use std::io::Read;

use super::name::{file_name, parse_file_name, parse_num};
use super::FileDesc;
use crate::archive::{open_entry, Archive, ArchiveEntry};
use crate::error::{Error, Result};

const CURRENT: &str = "CURRENT";
const CURRENT_BACKUP: &str = "CURRENT.bak";
const PENDING_PREFIX: &str = "CURRENT.";

#[derive(Debug)]
struct Candidate {
    name: String,
    fd: FileDesc,
}

/// Outcome of trying a list of candidates in order.
#[derive(Debug)]
enum Probe {
    Found(Candidate),
    Missing,
    /// Nothing usable, and at least one candidate was malformed. Holds the last
    /// corruption seen.
    Corrupted(Error),
}

/// Resolves the current manifest from the archive's entry listing.
///
/// Fails with [`Error::NotExist`] if no pointer file exists at all and with
/// [`Error::Corrupted`] if pointers exist but none is usable. Any other
/// failure aborts immediately.
pub fn resolve_current<A: Archive>(archive: &A, entries: &[ArchiveEntry]) -> Result<FileDesc> {
    let pending = pending_names(entries);
    let pending = try_candidates(archive, pending.iter().map(String::as_str))?;
    let stable = try_candidates(archive, [CURRENT, CURRENT_BACKUP])?;

    let current = match (pending, stable) {
        (Probe::Found(pending), Probe::Found(stable)) if pending.fd.num > stable.fd.num => pending,
        (_, Probe::Found(stable)) => stable,
        (Probe::Found(pending), _) => pending,
        (Probe::Corrupted(err), _) | (_, Probe::Corrupted(err)) => return Err(err),
        (Probe::Missing, Probe::Missing) => {
            return Err(Error::NotExist {
                name: CURRENT.to_string(),
            })
        }
    };

    tracing::debug!(from = %current.name, fd = %current.fd, "resolved current manifest");
    Ok(current.fd)
}

/// Names of `CURRENT.<n>` entries, highest `n` first.
fn pending_names(entries: &[ArchiveEntry]) -> Vec<String> {
    let mut pending = entries
        .iter()
        .filter_map(|entry| {
            let num = entry
                .path
                .strip_prefix(PENDING_PREFIX)
                .and_then(parse_num)?;
            Some((num, entry.path.as_str()))
        })
        .collect::<Vec<_>>();

    pending.sort_unstable_by(|a, b| b.cmp(a));
    pending.into_iter().map(|(_, name)| name.to_string()).collect()
}

fn try_candidates<'a, A, I>(archive: &A, names: I) -> Result<Probe>
where
    A: Archive,
    I: IntoIterator<Item = &'a str>,
{
    let mut corruption = None;

    for name in names {
        match try_candidate(archive, name) {
            Ok(candidate) => return Ok(Probe::Found(candidate)),
            Err(Error::NotExist { .. }) => {}
            Err(err @ Error::Corrupted { .. }) => corruption = Some(err),
            Err(err) => return Err(err),
        }
    }

    Ok(match corruption {
        Some(err) => Probe::Corrupted(err),
        None => Probe::Missing,
    })
}

fn try_candidate<A: Archive>(archive: &A, name: &str) -> Result<Candidate> {
    let mut content = Vec::new();
    open_entry(archive, name)?.read_to_end(&mut content)?;

    let fd = match parse_pointer(&content) {
        Some(fd) => fd,
        None => {
            tracing::warn!(name, content = %content.escape_ascii(), "corrupted pointer file");
            return Err(Error::Corrupted {
                name: name.to_string(),
                content,
            });
        }
    };

    let target = file_name(fd);
    if let Err(err) = open_entry(archive, &target) {
        if err.is_not_exist() {
            tracing::warn!(name, %target, "pointer file names a missing target");
        }
        return Err(err);
    }

    Ok(Candidate {
        name: name.to_string(),
        fd,
    })
}

/// A pointer file holds a file name followed by exactly one newline.
fn parse_pointer(content: &[u8]) -> Option<FileDesc> {
    let name = content.strip_suffix(b"\n")?;
    let name = std::str::from_utf8(name).ok()?;
    parse_file_name(name)
}
