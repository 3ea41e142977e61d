//! Core service - hosts the report consumer thread

use std::io;
use std::sync::Arc;
use std::thread;

use tokio::sync::oneshot;
use tokio_util::sync::{CancellationToken, DropGuard};
use tracing::{debug, warn};

use super::{run_guarded_blocking, ServiceStatus, StatusCell};
use crate::pipeline::ReportPipeline;

const CONSUMER_THREAD_NAME: &str = "ionlog-consumer";

/// Owns the consumer thread of a [`ReportPipeline`].
///
/// The consumer runs on its own OS thread so blocking sink writes never
/// stall the caller's runtime. Dropping the service without calling
/// [`stop`](Self::stop) cancels the consumer.
pub struct CoreService {
    pipeline: Arc<ReportPipeline>,
    cancel: CancellationToken,
    done: oneshot::Receiver<bool>,
    status: StatusCell,
    _shutdown: DropGuard,
}

impl CoreService {
    /// Spawn the consumer thread
    pub fn spawn(pipeline: Arc<ReportPipeline>) -> io::Result<Self> {
        let cancel = CancellationToken::new();
        let status = StatusCell::default();
        let (done_tx, done) = oneshot::channel();

        {
            let pipeline = Arc::clone(&pipeline);
            let cancel = cancel.clone();
            let thread_status = status.clone();
            status.set(ServiceStatus::Running);
            let spawned = thread::Builder::new()
                .name(CONSUMER_THREAD_NAME.to_string())
                .spawn(move || {
                    let clean =
                        run_guarded_blocking("report consumer", ionlog_core::caller!(), || {
                            pipeline.handle_reports(&cancel)
                        });
                    if !clean {
                        pipeline.close();
                    }
                    thread_status.set(ServiceStatus::Stopped);
                    let _ = done_tx.send(clean);
                });
            if let Err(e) = spawned {
                status.set(ServiceStatus::Stopped);
                return Err(e);
            }
        }

        debug!(thread = CONSUMER_THREAD_NAME, "[IonLogger] Core service started");
        Ok(Self {
            pipeline,
            _shutdown: cancel.clone().drop_guard(),
            cancel,
            done,
            status,
        })
    }

    pub fn status(&self) -> ServiceStatus {
        self.status.get()
    }

    /// Cancel the consumer, wait for it to finish draining, then flush
    /// anything that raced in. Nothing is flushed after a consumer panic.
    pub async fn stop(self) {
        self.cancel.cancel();
        match self.done.await {
            Ok(true) => self.pipeline.flush_reports(),
            Ok(false) => warn!(
                queued = self.pipeline.queued(),
                "[IonLogger] Report consumer panicked earlier, leaving queued records unflushed"
            ),
            Err(_) => warn!("[IonLogger] Report consumer exited without reporting"),
        }
        self.status.set(ServiceStatus::Stopped);
        debug!("[IonLogger] Core service stopped");
    }
}
