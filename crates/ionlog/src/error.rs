//! Logger lifecycle errors

use std::io;

use ionlog_core::RotationError;

/// Errors returned by [`IonLogger`](crate::IonLogger) lifecycle and
/// configuration calls. Logging calls themselves never fail.
#[derive(Debug, thiserror::Error)]
pub enum LoggerError {
    /// Configuration can only change while the logger is stopped
    #[error("logger is already running")]
    AlreadyRunning,

    #[error("logger is not running")]
    NotRunning,

    /// `start` was called outside of a tokio runtime
    #[error("no tokio runtime available to run the logger services")]
    NoRuntime,

    /// The report consumer thread could not be started
    #[error("failed to spawn the report consumer thread: {0}")]
    SpawnConsumer(#[source] io::Error),

    /// A rotation was requested but no rotation folder is configured
    #[error("log file rotation is not configured")]
    RotationNotConfigured,

    #[error("rotation failed: {0}")]
    Rotation(#[from] RotationError),
}

/// Result type for logger operations
pub type LoggerResult<T> = std::result::Result<T, LoggerError>;
