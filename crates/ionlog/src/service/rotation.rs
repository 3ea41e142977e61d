//! Rotation service - periodic maintenance of the log folder

use std::sync::Arc;
use std::time::Duration;

use ionlog_core::RotationEngine;
use tokio::runtime::Handle;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, warn};

use super::{run_guarded, ServiceStatus, StatusCell};

/// Runs the rotation worker and the folder size worker of one engine
pub struct RotationService {
    engine: Arc<RotationEngine>,
    cancel: CancellationToken,
    tasks: Vec<JoinHandle<()>>,
    status: StatusCell,
}

impl RotationService {
    /// Spawn the workers.
    ///
    /// `rotation_interval` of `None` means the period never rotates and no
    /// rotation worker is started. The size worker only runs when the engine
    /// has a folder size budget.
    pub fn spawn(
        runtime: &Handle,
        engine: Arc<RotationEngine>,
        rotation_interval: Option<Duration>,
        size_check_interval: Duration,
    ) -> Self {
        let cancel = CancellationToken::new();
        let status = StatusCell::default();
        status.set(ServiceStatus::Running);
        let mut tasks = Vec::new();

        if let Some(interval) = rotation_interval {
            let engine = Arc::clone(&engine);
            let cancel = cancel.clone();
            tasks.push(runtime.spawn(async move {
                run_guarded(
                    "rotation",
                    ionlog_core::caller!(),
                    every(interval, cancel, || {
                        if let Err(e) = engine.rotate() {
                            error!(error = %e, "[RotationEngine] Rotation check failed");
                        }
                    }),
                )
                .await;
            }));
        }

        if engine.max_folder_size() > 0 {
            let engine = Arc::clone(&engine);
            let cancel = cancel.clone();
            tasks.push(runtime.spawn(async move {
                run_guarded(
                    "folder size",
                    ionlog_core::caller!(),
                    every(size_check_interval, cancel, || {
                        if let Err(e) = engine.enforce_folder_size() {
                            error!(error = %e, "[RotationEngine] Folder size check failed");
                        }
                    }),
                )
                .await;
            }));
        }

        debug!(
            folder = %engine.folder().display(),
            workers = tasks.len(),
            "[IonLogger] Rotation service started"
        );
        Self {
            engine,
            cancel,
            tasks,
            status,
        }
    }

    pub fn engine(&self) -> &Arc<RotationEngine> {
        &self.engine
    }

    pub fn status(&self) -> ServiceStatus {
        self.status.get()
    }

    /// Stop the workers, wait for them, then close the log file
    pub async fn stop(self) {
        self.cancel.cancel();
        for task in self.tasks {
            if let Err(e) = task.await {
                warn!(error = %e, "[IonLogger] Rotation worker failed");
            }
        }
        self.engine.close_log_file();
        self.status.set(ServiceStatus::Stopped);
        debug!("[IonLogger] Rotation service stopped");
    }
}

/// Call `tick` every `period` until cancelled. The first call happens one
/// period after start.
async fn every(period: Duration, cancel: CancellationToken, mut tick: impl FnMut()) {
    let mut interval = tokio::time::interval_at(tokio::time::Instant::now() + period, period);
    interval.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        tokio::select! {
            biased;
            _ = cancel.cancelled() => return,
            _ = interval.tick() => tick(),
        }
    }
}
