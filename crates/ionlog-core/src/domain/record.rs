//! Log record - the unit carried by the report queue

use chrono::{DateTime, Utc};

use super::{CallerInfo, Level};

/// A single log statement, immutable once built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogRecord {
    /// When the statement was issued
    pub timestamp: DateTime<Utc>,
    /// Severity
    pub level: Level,
    /// Fully formatted message
    pub message: String,
    /// Where the statement was issued
    pub caller: CallerInfo,
}

impl LogRecord {
    /// Create a record stamped with the current time
    pub fn new(level: Level, message: impl Into<String>, caller: CallerInfo) -> Self {
        Self {
            timestamp: Utc::now(),
            level,
            message: message.into(),
            caller,
        }
    }

    /// Override the timestamp
    pub fn at(mut self, timestamp: DateTime<Utc>) -> Self {
        self.timestamp = timestamp;
        self
    }
}
