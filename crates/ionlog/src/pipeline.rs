//! Report Pipeline - bounded queue between log callers and the sinks
//!
//! Producers never block for longer than the back-pressure timeout: a record
//! that cannot be queued in time is dropped and counted. A single consumer
//! thread drains the queue in order; draining always happens under one lock
//! so a manual flush and the consumer never reorder records.

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use flume::{Receiver, RecvTimeoutError, SendTimeoutError, Sender, TrySendError};
use ionlog_core::{encode_record, LogRecord, MultiWriter, StaticFields};
use parking_lot::{Mutex, MutexGuard, RwLock};
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, warn};

use crate::config::{DEFAULT_BACKPRESSURE_TIMEOUT, DEFAULT_QUEUE_CAPACITY};

/// Wait used by [`ReportPipeline::flush_reports`] to decide the queue is empty
const FLUSH_POLL: Duration = Duration::from_millis(1);

/// How long the consumer waits for a record before checking for cancellation
const CONSUMER_POLL: Duration = Duration::from_millis(10);

struct Queue {
    tx: Sender<LogRecord>,
    rx: Receiver<LogRecord>,
    capacity: usize,
}

impl Queue {
    fn bounded(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        let (tx, rx) = flume::bounded(capacity);
        Self { tx, rx, capacity }
    }
}

/// Bounded report queue plus the serialization and write path
pub struct ReportPipeline {
    queue: RwLock<Queue>,
    backpressure_timeout: RwLock<Duration>,
    writer: Arc<MultiWriter>,
    static_fields: RwLock<StaticFields>,
    closed: AtomicBool,
    trace_mode: AtomicBool,
    dropped: AtomicU64,
    drain_lock: Mutex<()>,
}

impl ReportPipeline {
    /// Pipeline writing to `writer` with the default queue settings
    pub fn new(writer: Arc<MultiWriter>) -> Self {
        Self {
            queue: RwLock::new(Queue::bounded(DEFAULT_QUEUE_CAPACITY)),
            backpressure_timeout: RwLock::new(DEFAULT_BACKPRESSURE_TIMEOUT),
            writer,
            static_fields: RwLock::new(StaticFields::new()),
            closed: AtomicBool::new(false),
            trace_mode: AtomicBool::new(false),
            dropped: AtomicU64::new(0),
            drain_lock: Mutex::new(()),
        }
    }

    /// Queue a record for the consumer.
    ///
    /// Tries a non-blocking send first, then waits up to the back-pressure
    /// timeout. A record that still does not fit is dropped with a
    /// diagnostic. No-op once the pipeline is closed.
    pub fn async_report(&self, record: LogRecord) {
        if self.is_closed() {
            return;
        }

        let tx = self.queue.read().tx.clone();
        let record = match tx.try_send(record) {
            Ok(()) => return,
            Err(TrySendError::Full(record)) => record,
            Err(TrySendError::Disconnected(_)) => return,
        };

        let timeout = *self.backpressure_timeout.read();
        match tx.send_timeout(record, timeout) {
            Ok(()) => {}
            Err(SendTimeoutError::Timeout(record)) => {
                self.dropped.fetch_add(1, Ordering::Relaxed);
                warn!(
                    timeout_ms = timeout.as_millis() as u64,
                    level = %record.level,
                    "[Pipeline] Report queue full, dropping record"
                );
            }
            Err(SendTimeoutError::Disconnected(_)) => {}
        }
    }

    /// Serialize and write a record on the calling thread.
    ///
    /// Failures are reported on the diagnostic stream and never returned.
    pub fn report(&self, record: &LogRecord) {
        let line = {
            let fields = self.static_fields.read();
            encode_record(record, &fields)
        };

        let line = match line {
            Ok(line) => line,
            Err(e) => {
                error!(error = %e, "[Pipeline] Failed to serialize record");
                return;
            }
        };

        if let Err(e) = self.writer.write(&line) {
            error!(error = %e, "[Pipeline] Failed to write record");
        }
    }

    /// Synchronously write every queued record, polling briefly to decide
    /// the queue is empty
    pub fn flush_reports(&self) {
        let _drain = self.drain_lock.lock();
        let rx = self.queue.read().rx.clone();
        while let Ok(record) = rx.recv_timeout(FLUSH_POLL) {
            self.report(&record);
        }
    }

    /// The consumer loop. Blocks the calling thread.
    ///
    /// Writes records as they arrive until `cancel` fires, then closes the
    /// pipeline to new async reports and drains what is left before
    /// returning.
    pub fn handle_reports(&self, cancel: &CancellationToken) {
        debug!("[Pipeline] Report consumer started");
        while !cancel.is_cancelled() {
            let drain = self.drain_lock.lock();
            let rx = self.queue.read().rx.clone();
            match rx.recv_timeout(CONSUMER_POLL) {
                Ok(record) => {
                    self.report(&record);
                    while let Ok(record) = rx.try_recv() {
                        self.report(&record);
                    }
                }
                Err(RecvTimeoutError::Timeout) | Err(RecvTimeoutError::Disconnected) => {}
            }
            // let a waiting flush in before the next wait
            MutexGuard::unlock_fair(drain);
        }

        self.close();
        self.flush_reports();
        debug!("[Pipeline] Report consumer stopped");
    }

    /// Reject further async reports
    pub fn close(&self) {
        self.closed.store(true, Ordering::SeqCst);
    }

    /// Accept async reports again
    pub fn open(&self) {
        self.closed.store(false, Ordering::SeqCst);
    }

    pub fn is_closed(&self) -> bool {
        self.closed.load(Ordering::SeqCst)
    }

    /// Records currently waiting in the queue
    pub fn queued(&self) -> usize {
        self.queue.read().rx.len()
    }

    pub fn queue_capacity(&self) -> usize {
        self.queue.read().capacity
    }

    /// Replace the queue with one of `capacity` slots (at least 1).
    ///
    /// Records already queued move to the new queue; those that no longer
    /// fit are dropped and counted.
    pub fn set_queue_capacity(&self, capacity: usize) {
        let mut queue = self.queue.write();
        if queue.capacity == capacity.max(1) {
            return;
        }

        let fresh = Queue::bounded(capacity);
        let mut moved = 0usize;
        while let Ok(record) = queue.rx.try_recv() {
            if fresh.tx.try_send(record).is_ok() {
                moved += 1;
            } else {
                self.dropped.fetch_add(1, Ordering::Relaxed);
            }
        }
        *queue = fresh;

        debug!(capacity = queue.capacity, moved, "[Pipeline] Report queue resized");
    }

    pub fn backpressure_timeout(&self) -> Duration {
        *self.backpressure_timeout.read()
    }

    pub fn set_backpressure_timeout(&self, timeout: Duration) {
        *self.backpressure_timeout.write() = timeout;
    }

    pub fn static_fields(&self) -> StaticFields {
        self.static_fields.read().clone()
    }

    pub fn set_static_fields(&self, fields: StaticFields) {
        *self.static_fields.write() = fields;
    }

    pub fn trace_mode(&self) -> bool {
        self.trace_mode.load(Ordering::Relaxed)
    }

    pub fn set_trace_mode(&self, enabled: bool) {
        self.trace_mode.store(enabled, Ordering::Relaxed);
    }

    /// Records lost to back-pressure since creation
    pub fn dropped_reports(&self) -> u64 {
        self.dropped.load(Ordering::Relaxed)
    }

    pub fn writer(&self) -> &Arc<MultiWriter> {
        &self.writer
    }
}

impl std::fmt::Debug for ReportPipeline {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ReportPipeline")
            .field("queued", &self.queued())
            .field("capacity", &self.queue_capacity())
            .field("closed", &self.is_closed())
            .field("dropped", &self.dropped_reports())
            .finish()
    }
}
