//! Ionlog - asynchronous structured logging
//!
//! Log calls turn into JSON lines written to any number of sinks. Records
//! go through a bounded queue drained by a background tokio task, call sites
//! can be deduplicated ("log once", "log on change"), and an optional
//! rotation engine keeps one dated log file per day, week or month inside a
//! size-bounded folder.
//!
//! ```ignore
//! let logger = ionlog::IonLogger::new(
//!     ionlog::LoggerConfig::default()
//!         .with_static_field("service", "billing")
//!         .with_rotation(ionlog::RotationConfig::new("logs", ionlog::RotationPeriod::Daily)),
//! );
//! logger.start()?;
//! ionlog::info!(logger, "ready on port {}", 8080);
//! logger.stop().await?;
//! ```

mod config;
mod error;
mod logger;
mod macros;
pub mod pipeline;
pub mod service;

pub use config::{
    LoggerConfig, RotationConfig, DEFAULT_BACKPRESSURE_TIMEOUT, DEFAULT_QUEUE_CAPACITY,
    DEFAULT_SIZE_CHECK_INTERVAL,
};
pub use error::{LoggerError, LoggerResult};
pub use logger::IonLogger;
pub use service::ServiceStatus;

pub use ionlog_core::caller;
pub use ionlog_core::{
    CallerInfo, IoSink, Level, LogLine, MemoryFilesystem, MemorySink, RotationPeriod, SharedSink,
    Sink, StaticFields, StdoutSink, GB, KB, MB,
};
