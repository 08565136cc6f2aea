//! Error types for doctext.

use std::fmt;
use std::io;

/// Result type alias for doctext operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error type for doctext operations.
///
/// Out-of-range indices handed to [`Line`](crate::Line) or
/// [`TextBuffer`](crate::TextBuffer) mutators are caller bugs and panic
/// instead of producing one of these.
#[derive(Debug)]
pub enum Error {
    /// I/O error while loading or saving a file.
    Io(io::Error),
    /// Bytes handed to the decoder were not valid UTF-8.
    InvalidUtf8 { valid_up_to: usize },
    /// The line-ending convention cannot be used for encoding.
    Encoding(String),
    /// A mutation was requested on a read-only document.
    ReadOnly,
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io(e) => write!(f, "I/O error: {e}"),
            Self::InvalidUtf8 { valid_up_to } => {
                write!(f, "invalid UTF-8 after byte {valid_up_to}")
            }
            Self::Encoding(s) => write!(f, "encoding error: {s}"),
            Self::ReadOnly => write!(f, "read-only document can't be edited"),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<io::Error> for Error {
    fn from(e: io::Error) -> Self {
        Self::Io(e)
    }
}

impl From<std::str::Utf8Error> for Error {
    fn from(e: std::str::Utf8Error) -> Self {
        Self::InvalidUtf8 {
            valid_up_to: e.valid_up_to(),
        }
    }
}
