pub type Result<T> = std::result::Result<T, Error>;

/// Everything the storage backend can fail with.
///
/// `NotExist` means there is no database here; `Corrupted` means there is one
/// but its pointer files are damaged.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("file does not exist: {name}")]
    NotExist { name: String },

    #[error("{name}: corrupted or incomplete CURRENT file: \"{}\"", .content.escape_ascii())]
    Corrupted { name: String, content: Vec<u8> },

    #[error("storage is read-only")]
    ReadOnly,

    #[error("storage is closed")]
    Closed,

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("Cannot open archive")]
    Open(#[from] levelbox_format::OpenError),
}

impl Error {
    /// Maps an archive-level failure for entry `name`, turning absence into
    /// [`Error::NotExist`].
    pub(crate) fn from_archive(err: std::io::Error, name: &str) -> Error {
        match err.kind() {
            std::io::ErrorKind::NotFound => Error::NotExist {
                name: name.to_string(),
            },
            _ => Error::Io(err),
        }
    }

    #[inline]
    pub fn is_not_exist(&self) -> bool {
        matches!(self, Error::NotExist { .. })
    }

    #[inline]
    pub fn is_corrupted(&self) -> bool {
        matches!(self, Error::Corrupted { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn absence_maps_to_not_exist() {
        let err = Error::from_archive(
            std::io::Error::new(std::io::ErrorKind::NotFound, "gone"),
            "CURRENT",
        );
        assert!(err.is_not_exist());
        assert_eq!(err.to_string(), "file does not exist: CURRENT");

        let err = Error::from_archive(
            std::io::Error::new(std::io::ErrorKind::PermissionDenied, "nope"),
            "CURRENT",
        );
        assert!(matches!(err, Error::Io(_)));
    }

    #[test]
    fn corrupted_shows_escaped_content() {
        let err = Error::Corrupted {
            name: "CURRENT".into(),
            content: b"MANIFEST-\x00".to_vec(),
        };
        assert!(err.is_corrupted());
        assert_eq!(
            err.to_string(),
            "CURRENT: corrupted or incomplete CURRENT file: \"MANIFEST-\\x00\""
        );
    }
}
