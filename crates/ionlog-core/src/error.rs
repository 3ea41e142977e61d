//! Error types for the core crate

use std::io;
use std::path::PathBuf;

/// Errors raised by the call-site record history
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum HistoryError {
    /// A record with this id is already registered
    #[error("record id {id:#018x} is already registered")]
    Collision {
        /// The colliding call-site id
        id: u64,
    },
}

/// Errors returned by a sink write
#[derive(Debug, thiserror::Error)]
pub enum SinkError {
    /// The underlying writer failed
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// The rotation engine has no log file open
    #[error("no active log file")]
    NoActiveFile,

    /// The record could not be encoded
    #[error("failed to serialize log record: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Result type for sink writes
pub type SinkResult<T> = std::result::Result<T, SinkError>;

/// Errors raised while maintaining the log folder
#[derive(Debug, thiserror::Error)]
pub enum RotationError {
    /// The folder status could not be determined
    #[error("could not check folder status of {path}: {source}")]
    CheckFolder { path: PathBuf, source: io::Error },

    /// The folder could not be created
    #[error("could not create log folder {path}: {source}")]
    CreateFolder { path: PathBuf, source: io::Error },

    /// The folder could not be listed
    #[error("failed to read log folder {path}: {source}")]
    ReadFolder { path: PathBuf, source: io::Error },

    /// A new log file could not be created
    #[error("failed to create log file {path}: {source}")]
    CreateFile { path: PathBuf, source: io::Error },

    /// An existing log file could not be reopened
    #[error("failed to open log file {path}: {source}")]
    OpenFile { path: PathBuf, source: io::Error },

    /// A log file could not be evicted
    #[error("failed to remove log file {path}: {source}")]
    RemoveFile { path: PathBuf, source: io::Error },

    /// The folder holds no valid dated log file
    #[error("no log file found")]
    NoLogFileFound,

    /// The name does not follow `logfile-YYYY-MM-DD.log`
    #[error("invalid log file name: {0}")]
    InvalidFileName(String),
}

/// Result type for rotation operations
pub type RotationResult<T> = std::result::Result<T, RotationError>;
