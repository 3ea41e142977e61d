//! Background services
//!
//! - [`CoreService`]: runs the report consumer on a dedicated thread
//! - [`RotationService`]: periodic rotation and folder size checks
//!
//! The consumer owns an OS thread because sink writes block; the rotation
//! workers are tokio tasks. Every worker is stopped through a
//! `CancellationToken`. A panicking worker is caught at its boundary,
//! logged, and ends without taking the process down.

mod consumer;
mod rotation;

pub use consumer::CoreService;
pub use rotation::RotationService;

use std::any::Any;
use std::future::Future;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;

use futures::FutureExt;
use ionlog_core::CallerInfo;
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use tracing::error;

/// Lifecycle state of a service or of the logger
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ServiceStatus {
    #[default]
    Stopped,
    Running,
}

/// Status shared between a service handle and its tasks
#[derive(Debug, Clone, Default)]
pub(crate) struct StatusCell(Arc<Mutex<ServiceStatus>>);

impl StatusCell {
    pub(crate) fn get(&self) -> ServiceStatus {
        *self.0.lock()
    }

    pub(crate) fn set(&self, status: ServiceStatus) {
        *self.0.lock() = status;
    }
}

fn panic_message(panic: &Box<dyn Any + Send>) -> String {
    panic
        .downcast_ref::<String>()
        .map(|s| s.as_str())
        .or_else(|| panic.downcast_ref::<&str>().copied())
        .unwrap_or("unknown panic")
        .to_string()
}

fn report_panic(worker: &'static str, site: &CallerInfo, panic: &Box<dyn Any + Send>) {
    error!(
        worker,
        panic = %panic_message(panic),
        package = %site.package,
        function = %site.function,
        file = %site.file,
        line = site.line,
        "[IonLogger] Service worker panicked"
    );
}

/// Run a worker future, catching and logging a panic.
///
/// Returns `false` when the worker panicked.
pub(crate) async fn run_guarded<F>(worker: &'static str, site: CallerInfo, fut: F) -> bool
where
    F: Future<Output = ()>,
{
    match AssertUnwindSafe(fut).catch_unwind().await {
        Ok(()) => true,
        Err(panic) => {
            report_panic(worker, &site, &panic);
            false
        }
    }
}

/// Blocking counterpart of [`run_guarded`] for thread-based workers
pub(crate) fn run_guarded_blocking(
    worker: &'static str,
    site: CallerInfo,
    f: impl FnOnce(),
) -> bool {
    match std::panic::catch_unwind(AssertUnwindSafe(f)) {
        Ok(()) => true,
        Err(panic) => {
            report_panic(worker, &site, &panic);
            false
        }
    }
}
