use std::fmt;

mod error;

pub use self::error::EntryPathError;

/// The separator used between the chunks of an [`EntryPath`].
pub const PATH_PACK_SEP: &str = "/";

/// A validated entry name inside a pack.
#[derive(Debug, Clone, PartialOrd, Ord, PartialEq, Eq, Hash)]
#[repr(transparent)]
pub struct EntryPath(pub(crate) String);

impl EntryPath {
    pub fn new<S: AsRef<str>>(path: S) -> Result<EntryPath, EntryPathError> {
        let path = path.as_ref();

        if path.is_empty() {
            return Err(EntryPathError::EmptyPath);
        }

        if path.chars().any(char::is_control) {
            return Err(EntryPathError::ControlCharacter);
        }

        if path
            .split(PATH_PACK_SEP)
            .any(|chunk| chunk.is_empty() || chunk == "." || chunk == "..")
        {
            return Err(EntryPathError::NonCanonical);
        }

        Ok(EntryPath(path.to_string()))
    }

    #[inline(always)]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn filename(&self) -> &str {
        self.iter().last().unwrap_or_default()
    }

    pub fn depth(&self) -> usize {
        self.0.matches(PATH_PACK_SEP).count()
    }

    pub fn iter(&self) -> std::str::Split<'_, &str> {
        self.0.split(PATH_PACK_SEP)
    }
}

impl fmt::Display for EntryPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for EntryPath {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_plain_names() {
        let path = EntryPath::new("000005.ldb").unwrap();
        assert_eq!(path.as_str(), "000005.ldb");
        assert_eq!(path.depth(), 0);

        let nested = EntryPath::new("db/MANIFEST-000002").unwrap();
        assert_eq!(nested.filename(), "MANIFEST-000002");
        assert_eq!(nested.depth(), 1);
    }

    #[test]
    fn rejects_non_canonical() {
        assert_eq!(EntryPath::new(""), Err(EntryPathError::EmptyPath));
        assert_eq!(EntryPath::new("/CURRENT"), Err(EntryPathError::NonCanonical));
        assert_eq!(EntryPath::new("a//b"), Err(EntryPathError::NonCanonical));
        assert_eq!(EntryPath::new("../LOCK"), Err(EntryPathError::NonCanonical));
        assert_eq!(EntryPath::new("./LOG"), Err(EntryPathError::NonCanonical));
        assert_eq!(EntryPath::new("db/"), Err(EntryPathError::NonCanonical));
    }

    #[test]
    fn rejects_control_characters() {
        assert_eq!(
            EntryPath::new("CURRENT\n"),
            Err(EntryPathError::ControlCharacter)
        );
    }
}
