//! Error types for the save backup tool
//!
//! Domain failures are raised through `anyhow` as `anyhow::Error::new(Error::…)`
//! so callers can `downcast_ref::<Error>()` to tell them apart.

use std::fmt;
use std::io;
use std::path::PathBuf;

/// Custom error types for the backup core
#[derive(Debug)]
pub enum Error {
    /// The save identity could not be resolved from flags or the current directory
    InvalidPath(String),

    /// The backups directory holds no archives
    NoBackupsAvailable(PathBuf),

    /// An explicitly named archive does not exist
    ArchiveNotFound(String),

    /// More than one operation was selected
    Dispatch(String),

    /// Invalid configuration
    Config(String),

    /// A zip archive could not be read or written
    Archive(String),

    /// An IO error
    Io(io::Error),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidPath(msg) => write!(f, "Invalid path: {}", msg),
            Self::NoBackupsAvailable(dir) => {
                write!(f, "No backups available in {}", dir.display())
            }
            Self::ArchiveNotFound(name) => write!(f, "Backup not found: {}", name),
            Self::Dispatch(msg) => write!(f, "Dispatch error: {}", msg),
            Self::Config(msg) => write!(f, "Configuration error: {}", msg),
            Self::Archive(msg) => write!(f, "Archive error: {}", msg),
            Self::Io(err) => write!(f, "IO error: {}", err),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(err) => Some(err),
            _ => None,
        }
    }
}

impl From<io::Error> for Error {
    fn from(err: io::Error) -> Self {
        Self::Io(err)
    }
}

impl From<zip::result::ZipError> for Error {
    fn from(err: zip::result::ZipError) -> Self {
        Self::Archive(err.to_string())
    }
}

/// Shorthand for the error kind carried by an `anyhow::Error`, if any.
pub fn kind(err: &anyhow::Error) -> Option<&Error> {
    err.downcast_ref::<Error>()
}
