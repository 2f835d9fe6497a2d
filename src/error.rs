//! Error types for bulk directory listing.

use std::ffi::CStr;
use std::fmt;
use std::io;
use std::path::PathBuf;

/// Error type for directory listing.
#[derive(Debug)]
pub enum Error {
    /// Failed to open the directory.
    Open { path: PathBuf, source: io::Error },
    /// `getattrlistbulk` returned a negative count.
    Syscall(io::Error),
    /// A returned record could not be parsed.
    Parse(String),
    /// Platform not supported (not macOS).
    NotSupported,
}

impl Error {
    /// Prefix used on standard error, in the style of `perror(3)`.
    pub fn context(&self) -> &'static str {
        match self {
            Error::Open { .. } => "Failed to open directory",
            Error::Syscall(_) => "getattrlistbulk failed",
            Error::Parse(_) => "getattrlistbulk returned a malformed record",
            Error::NotSupported => "getattrlistbulk unavailable",
        }
    }

    /// Single diagnostic line, `<context>: <message>`.
    pub fn diagnostic(&self) -> String {
        let message = match self {
            Error::Open { source, .. } | Error::Syscall(source) => os_message(source),
            Error::Parse(msg) => msg.clone(),
            Error::NotSupported => "only supported on macOS".to_owned(),
        };
        format!("{}: {}", self.context(), message)
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Open { path, source } => {
                write!(f, "failed to open directory {}: {}", path.display(), source)
            }
            Error::Syscall(e) => write!(f, "getattrlistbulk failed: {}", e),
            Error::Parse(msg) => write!(f, "buffer parse error: {}", msg),
            Error::NotSupported => write!(f, "getattrlistbulk is only supported on macOS"),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Open { source, .. } | Error::Syscall(source) => Some(source),
            _ => None,
        }
    }
}

/// The C library's text for an OS error, as `perror(3)` would print it.
///
/// Errors without an errno fall back to their `Display` output.
pub fn os_message(err: &io::Error) -> String {
    match err.raw_os_error() {
        Some(errno) => {
            let ptr = unsafe { libc::strerror(errno) };
            if ptr.is_null() {
                return err.to_string();
            }
            unsafe { CStr::from_ptr(ptr) }.to_string_lossy().into_owned()
        }
        None => err.to_string(),
    }
}

/// Internal parse error type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ParseError {
    /// Record extends past the bytes the kernel filled.
    BufferTooSmall,
    /// Name reference points outside its record.
    InvalidOffset,
    /// Fixed-size field runs past the end of its record.
    UnexpectedEnd,
    /// Record length is zero or shorter than the fixed header.
    InvalidEntryLength,
    /// Name bytes contain no NUL terminator.
    UnterminatedName,
    /// Logical size decoded as a negative `off_t`.
    NegativeSize(i64),
    /// The kernel omitted the name attribute.
    MissingName,
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParseError::BufferTooSmall => write!(f, "buffer too small"),
            ParseError::InvalidOffset => write!(f, "invalid offset in attribute reference"),
            ParseError::UnexpectedEnd => write!(f, "unexpected end of record"),
            ParseError::InvalidEntryLength => write!(f, "invalid entry length"),
            ParseError::UnterminatedName => write!(f, "name is not NUL-terminated"),
            ParseError::NegativeSize(size) => write!(f, "negative logical size {}", size),
            ParseError::MissingName => write!(f, "entry has no name"),
        }
    }
}

impl From<ParseError> for Error {
    fn from(e: ParseError) -> Self {
        Error::Parse(e.to_string())
    }
}
