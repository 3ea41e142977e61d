//! Log file rotation
//!
//! Keeps exactly one dated file open in a folder, switches to a new file
//! when the calendar crosses the configured period, and evicts the oldest
//! file when the folder outgrows its size budget.

mod engine;
pub mod naming;

pub use engine::{RotationEngine, WriteGuard};

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// 1 KiB
pub const KB: u64 = 1024;
/// 1 MiB
pub const MB: u64 = 1024 * KB;
/// 1 GiB
pub const GB: u64 = 1024 * MB;

/// Folder size budget meaning "no limit"
pub const NO_MAX_FOLDER_SIZE: u64 = 0;

/// How often a new log file is started
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RotationPeriod {
    /// Keep appending to the most recent file
    #[default]
    None,
    Daily,
    Weekly,
    Monthly,
}

impl RotationPeriod {
    /// Default interval between rotation checks; `None` when the period
    /// never rotates
    pub fn check_interval(&self) -> Option<Duration> {
        match self {
            RotationPeriod::None => None,
            RotationPeriod::Daily => Some(Duration::from_secs(60)),
            RotationPeriod::Weekly => Some(Duration::from_secs(10 * 60)),
            RotationPeriod::Monthly => Some(Duration::from_secs(30 * 60)),
        }
    }
}

impl std::fmt::Display for RotationPeriod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            RotationPeriod::None => "none",
            RotationPeriod::Daily => "daily",
            RotationPeriod::Weekly => "weekly",
            RotationPeriod::Monthly => "monthly",
        };
        f.write_str(s)
    }
}
