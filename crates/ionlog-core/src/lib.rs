//! Ionlog Core - building blocks of the ionlog structured logger
//!
//! This crate contains:
//! - Domain types: levels, call-site info and log records
//! - The record history behind "log once" and "log on change"
//! - Sinks and the multi-target writer
//! - The filesystem capability and the dated log file rotation engine
//! - JSON line encoding
//!
//! Everything here is synchronous; the async pipeline lives in `ionlog`.

pub mod domain;
pub mod encoding;
pub mod error;
pub mod filesystem;
pub mod history;
pub mod rotation;
pub mod writer;

pub use domain::*;
pub use encoding::{encode_record, LogLine, StaticFields};
pub use error::{HistoryError, RotationError, RotationResult, SinkError, SinkResult};
pub use filesystem::{Filesystem, MemoryFilesystem, OsFilesystem};
pub use history::{log_on_change, log_once, RecordHistory, RecordMode};
pub use rotation::{RotationEngine, RotationPeriod, GB, KB, MB};
pub use writer::{IoSink, MemorySink, MultiWriter, SharedSink, Sink, StdoutSink};
