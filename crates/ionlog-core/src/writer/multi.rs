//! Multi-target writer - fans one buffer out to every registered sink

use parking_lot::Mutex;
use tracing::{error, warn};

use super::{same_sink, SharedSink};
use crate::error::{SinkError, SinkResult};

/// Ordered set of sinks written under a single lock.
///
/// The writer does not own the lifecycle of its sinks. A failing sink is
/// reported with its 1-based position and never stops the remaining sinks
/// from receiving the buffer.
#[derive(Default)]
pub struct MultiWriter {
    sinks: Mutex<Vec<SharedSink>>,
}

impl MultiWriter {
    /// Create a writer with no sinks
    pub fn new() -> Self {
        Self::default()
    }

    /// Write `buf` to every sink.
    ///
    /// Returns `Ok(buf.len())` when every sink accepted the buffer, otherwise
    /// the error of the last sink that failed.
    pub fn write(&self, buf: &[u8]) -> SinkResult<usize> {
        let sinks = self.sinks.lock();
        let mut last_error: Option<SinkError> = None;

        for (index, sink) in sinks.iter().enumerate() {
            if let Err(e) = sink.write(buf) {
                error!(
                    sink_index = index + 1,
                    error = %e,
                    "[MultiWriter] Failed to write to target {}",
                    index + 1
                );
                last_error = Some(e);
            }
        }

        match last_error {
            Some(e) => Err(e),
            None => Ok(buf.len()),
        }
    }

    /// Flush every sink, reporting the last failure
    pub fn flush(&self) -> SinkResult<()> {
        let sinks = self.sinks.lock();
        let mut result = Ok(());
        for (index, sink) in sinks.iter().enumerate() {
            if let Err(e) = sink.flush() {
                warn!(sink_index = index + 1, error = %e, "[MultiWriter] Failed to flush target");
                result = Err(e);
            }
        }
        result
    }

    /// Register sinks. A sink that is already registered is skipped.
    pub fn add_writer(&self, sinks: impl IntoIterator<Item = SharedSink>) {
        let mut current = self.sinks.lock();
        for sink in sinks {
            if current.iter().any(|s| same_sink(s, &sink)) {
                warn!("[MultiWriter] Writer already exists in the list of writers");
                continue;
            }
            current.push(sink);
        }
    }

    /// Unregister sinks. Unknown sinks are reported and ignored.
    pub fn delete_writer<'a>(&self, sinks: impl IntoIterator<Item = &'a SharedSink>) {
        let mut current = self.sinks.lock();
        for sink in sinks {
            match current.iter().position(|s| same_sink(s, sink)) {
                Some(index) => {
                    current.remove(index);
                }
                None => warn!("[MultiWriter] Writer to delete was not found"),
            }
        }
    }

    /// Replace every sink
    pub fn set_writers(&self, sinks: impl IntoIterator<Item = SharedSink>) {
        self.sinks.lock().clear();
        self.add_writer(sinks);
    }

    /// Snapshot of the registered sinks
    pub fn writers(&self) -> Vec<SharedSink> {
        self.sinks.lock().clone()
    }

    /// Number of registered sinks
    pub fn len(&self) -> usize {
        self.sinks.lock().len()
    }

    /// Whether no sink is registered
    pub fn is_empty(&self) -> bool {
        self.sinks.lock().is_empty()
    }
}

impl std::fmt::Debug for MultiWriter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MultiWriter")
            .field("sinks", &self.len())
            .finish()
    }
}
