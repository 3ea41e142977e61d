//! Logger configuration

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use ionlog_core::{RotationPeriod, SharedSink, StaticFields, StdoutSink};
use serde::{Deserialize, Serialize};

/// Default number of records the report queue holds
pub const DEFAULT_QUEUE_CAPACITY: usize = 1000;

/// Default time a producer waits on a full queue before dropping its record
pub const DEFAULT_BACKPRESSURE_TIMEOUT: Duration = Duration::from_millis(10);

/// Default interval between folder size checks
pub const DEFAULT_SIZE_CHECK_INTERVAL: Duration = Duration::from_secs(30 * 60);

/// Logger configuration.
///
/// Applied through [`IonLogger::new`](crate::IonLogger::new) or
/// [`IonLogger::configure`](crate::IonLogger::configure) while the logger is
/// stopped.
#[derive(Clone)]
pub struct LoggerConfig {
    /// Sinks every line is written to
    pub targets: Vec<SharedSink>,

    /// Fields added to every line
    pub static_fields: StaticFields,

    /// Dated log file rotation, disabled when `None`
    pub rotation: Option<RotationConfig>,

    /// Capacity of the report queue
    pub queue_capacity: usize,

    /// How long a producer waits on a full queue
    pub backpressure_timeout: Duration,

    /// Whether trace records are written
    pub trace_mode: bool,
}

impl Default for LoggerConfig {
    fn default() -> Self {
        Self {
            targets: vec![Arc::new(StdoutSink) as SharedSink],
            static_fields: StaticFields::new(),
            rotation: None,
            queue_capacity: DEFAULT_QUEUE_CAPACITY,
            backpressure_timeout: DEFAULT_BACKPRESSURE_TIMEOUT,
            trace_mode: false,
        }
    }
}

impl LoggerConfig {
    /// Replace the write targets
    pub fn with_targets(mut self, targets: impl IntoIterator<Item = SharedSink>) -> Self {
        self.targets = targets.into_iter().collect();
        self
    }

    /// Add one static field
    pub fn with_static_field(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.static_fields.insert(key.into(), value.into());
        self
    }

    /// Enable log file rotation
    pub fn with_rotation(mut self, rotation: RotationConfig) -> Self {
        self.rotation = Some(rotation);
        self
    }

    pub fn with_queue_capacity(mut self, capacity: usize) -> Self {
        self.queue_capacity = capacity;
        self
    }

    pub fn with_backpressure_timeout(mut self, timeout: Duration) -> Self {
        self.backpressure_timeout = timeout;
        self
    }

    pub fn with_trace_mode(mut self, enabled: bool) -> Self {
        self.trace_mode = enabled;
        self
    }
}

impl std::fmt::Debug for LoggerConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LoggerConfig")
            .field("targets", &self.targets.len())
            .field("static_fields", &self.static_fields)
            .field("rotation", &self.rotation)
            .field("queue_capacity", &self.queue_capacity)
            .field("backpressure_timeout", &self.backpressure_timeout)
            .field("trace_mode", &self.trace_mode)
            .finish()
    }
}

/// Where and how log files rotate
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RotationConfig {
    /// Folder holding the `logfile-YYYY-MM-DD.log` files
    pub folder: PathBuf,

    pub period: RotationPeriod,

    /// Folder size budget in bytes, 0 for unlimited
    pub max_folder_size: u64,

    /// Overrides the period's default rotation check interval
    pub check_interval: Option<Duration>,

    pub size_check_interval: Duration,
}

impl Default for RotationConfig {
    fn default() -> Self {
        Self {
            folder: PathBuf::from("logs"),
            period: RotationPeriod::Daily,
            max_folder_size: 0,
            check_interval: None,
            size_check_interval: DEFAULT_SIZE_CHECK_INTERVAL,
        }
    }
}

impl RotationConfig {
    pub fn new(folder: impl Into<PathBuf>, period: RotationPeriod) -> Self {
        Self {
            folder: folder.into(),
            period,
            ..Default::default()
        }
    }

    pub fn with_max_folder_size(mut self, bytes: u64) -> Self {
        self.max_folder_size = bytes;
        self
    }

    pub fn with_check_interval(mut self, interval: Duration) -> Self {
        self.check_interval = Some(interval);
        self
    }

    pub fn with_size_check_interval(mut self, interval: Duration) -> Self {
        self.size_check_interval = interval;
        self
    }

    /// Interval of the rotation worker; `None` when nothing ever rotates
    pub fn effective_check_interval(&self) -> Option<Duration> {
        self.check_interval.or_else(|| self.period.check_interval())
    }
}
