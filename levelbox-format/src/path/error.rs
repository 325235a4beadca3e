use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EntryPathError {
    NonCanonical,
    ControlCharacter,
    EmptyPath,
}

impl std::error::Error for EntryPathError {}

impl fmt::Display for EntryPathError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl EntryPathError {
    pub fn as_str(&self) -> &str {
        match self {
            EntryPathError::NonCanonical => "non-canonical path received as input",
            EntryPathError::ControlCharacter => "control character found in path",
            EntryPathError::EmptyPath => "no path provided",
        }
    }

    pub fn as_io_error(&self) -> std::io::Error {
        use std::io::{Error, ErrorKind};
        Error::new(ErrorKind::InvalidInput, self.as_str())
    }
}
