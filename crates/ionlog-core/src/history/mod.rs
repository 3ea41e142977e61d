//! Record History - call-site keyed memory behind "log once" and "log on change"
//!
//! Each call site is hashed into a 64-bit id. The history remembers, per id,
//! the hash of the last message that was allowed through and the mode the
//! call site was registered with. Entries live for the lifetime of the
//! history; there is no expiry.

mod dedup;

pub use dedup::{log_on_change, log_once};

use std::collections::HashMap;

use parking_lot::Mutex;
use tracing::debug;
use twox_hash::XxHash64;

use crate::error::HistoryError;

/// How a call site deduplicates its output
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordMode {
    /// Emit only the first time the call site runs
    LogOnce,
    /// Emit whenever the message differs from the previous one
    LogOnChange,
}

/// What the history remembers about one call site
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HistoryRecord {
    /// Hash of the last message let through
    pub msg_hash: u64,
    /// Registration mode
    pub mode: RecordMode,
}

/// Fast non-cryptographic 64-bit hash used for ids and message bodies
pub fn gen_hash(s: &str) -> u64 {
    XxHash64::oneshot(0, s.as_bytes())
}

/// Mutex-guarded map from call-site id to [`HistoryRecord`]
#[derive(Debug, Default)]
pub struct RecordHistory {
    records: Mutex<HashMap<u64, HistoryRecord>>,
}

impl RecordHistory {
    /// Create an empty history
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a call site.
    ///
    /// Fails with [`HistoryError::Collision`] when the id is already present,
    /// leaving the existing record untouched.
    pub fn add_record(&self, id: u64, msg: &str, mode: RecordMode) -> Result<(), HistoryError> {
        let mut records = self.records.lock();
        if records.contains_key(&id) {
            return Err(HistoryError::Collision { id });
        }
        records.insert(
            id,
            HistoryRecord {
                msg_hash: gen_hash(msg),
                mode,
            },
        );
        Ok(())
    }

    /// Look up a call site
    pub fn get_record(&self, id: u64) -> Option<HistoryRecord> {
        self.records.lock().get(&id).copied()
    }

    /// Forget a call site. Removing an unknown id is not an error.
    pub fn remove_record(&self, id: u64) {
        if self.records.lock().remove(&id).is_none() {
            debug!(id, "[RecordHistory] Trying to remove non-existing record");
        }
    }

    /// Number of registered call sites
    pub fn len(&self) -> usize {
        self.records.lock().len()
    }

    /// Whether no call site is registered
    pub fn is_empty(&self) -> bool {
        self.records.lock().is_empty()
    }

    /// Run `f` against the whole record map while holding the lock.
    ///
    /// Lets the dedup functions check-and-update atomically.
    pub(crate) fn with_records<R>(
        &self,
        f: impl FnOnce(&mut HashMap<u64, HistoryRecord>) -> R,
    ) -> R {
        f(&mut self.records.lock())
    }
}
