//! IonLogger - the public logging facade
//!
//! An `IonLogger` is an explicit, cloneable handle; there is no global
//! instance. Log calls never fail and never block longer than the queue's
//! back-pressure timeout. Lifecycle and configuration calls return
//! [`LoggerResult`].

use std::sync::Arc;

use ionlog_core::{
    log_on_change, log_once, CallerInfo, Filesystem, Level, LogRecord, MultiWriter, OsFilesystem,
    RecordHistory, RotationEngine, SharedSink, StaticFields,
};
use parking_lot::Mutex;
use tokio::runtime::Handle;
use tracing::{debug, info};

use crate::config::LoggerConfig;
use crate::error::{LoggerError, LoggerResult};
use crate::pipeline::ReportPipeline;
use crate::service::{CoreService, RotationService, ServiceStatus};

struct Services {
    core: CoreService,
    rotation: Option<RotationService>,
}

struct Inner {
    config: Mutex<LoggerConfig>,
    writer: Arc<MultiWriter>,
    pipeline: Arc<ReportPipeline>,
    history: RecordHistory,
    filesystem: Arc<dyn Filesystem>,
    engine: Mutex<Option<Arc<RotationEngine>>>,
    services: Mutex<Option<Services>>,
}

/// Structured, asynchronous logger handle; clones share the same logger
#[derive(Clone)]
pub struct IonLogger {
    inner: Arc<Inner>,
}

impl Default for IonLogger {
    fn default() -> Self {
        Self::new(LoggerConfig::default())
    }
}

impl IonLogger {
    /// Create a stopped logger
    pub fn new(config: LoggerConfig) -> Self {
        Self::with_filesystem(config, Arc::new(OsFilesystem))
    }

    /// Create a stopped logger whose rotation engine uses `filesystem`
    pub fn with_filesystem(config: LoggerConfig, filesystem: Arc<dyn Filesystem>) -> Self {
        let writer = Arc::new(MultiWriter::new());
        let pipeline = Arc::new(ReportPipeline::new(Arc::clone(&writer)));
        let logger = Self {
            inner: Arc::new(Inner {
                config: Mutex::new(LoggerConfig::default()),
                writer,
                pipeline,
                history: RecordHistory::new(),
                filesystem,
                engine: Mutex::new(None),
                services: Mutex::new(None),
            }),
        };
        logger.apply(config);
        logger
    }

    // ========================================================================
    // Lifecycle
    // ========================================================================

    /// Start the background services.
    ///
    /// The report consumer gets its own thread; the rotation workers run on
    /// the current tokio runtime. The rotation engine (if configured) opens
    /// its file before the consumer starts, so the first records already
    /// land on disk.
    pub fn start(&self) -> LoggerResult<()> {
        let runtime = Handle::try_current().map_err(|_| LoggerError::NoRuntime)?;

        let mut services = self.inner.services.lock();
        if services.is_some() {
            return Err(LoggerError::AlreadyRunning);
        }

        let rotation = {
            let engine = self.inner.engine.lock().clone();
            let config = self.inner.config.lock().rotation.clone();
            engine.zip(config)
        };
        if let Some((engine, _)) = &rotation {
            engine.auto_checks();
        }

        let core = CoreService::spawn(Arc::clone(&self.inner.pipeline))
            .map_err(LoggerError::SpawnConsumer)?;
        self.inner.pipeline.open();

        let rotation = rotation.map(|(engine, config)| {
            RotationService::spawn(
                &runtime,
                engine,
                config.effective_check_interval(),
                config.size_check_interval,
            )
        });
        *services = Some(Services { core, rotation });

        info!("[IonLogger] Logger started");
        Ok(())
    }

    /// Stop the services.
    ///
    /// Async ingestion closes first, queued records are written, then the
    /// rotation workers stop and the log file is closed.
    pub async fn stop(&self) -> LoggerResult<()> {
        let services = self
            .inner
            .services
            .lock()
            .take()
            .ok_or(LoggerError::NotRunning)?;

        services.core.stop().await;
        if let Some(rotation) = services.rotation {
            rotation.stop().await;
        }

        info!("[IonLogger] Logger stopped");
        Ok(())
    }

    /// `Running` while the consumer is alive
    pub fn status(&self) -> ServiceStatus {
        self.inner
            .services
            .lock()
            .as_ref()
            .map(|s| s.core.status())
            .unwrap_or_default()
    }

    /// Status of the rotation service, `None` when rotation is not running
    pub fn rotation_status(&self) -> Option<ServiceStatus> {
        self.inner
            .services
            .lock()
            .as_ref()
            .and_then(|s| s.rotation.as_ref().map(RotationService::status))
    }

    /// Write every queued record now
    pub fn flush(&self) {
        self.inner.pipeline.flush_reports();
    }

    // ========================================================================
    // Configuration
    // ========================================================================

    /// Change the configuration. Only allowed while stopped.
    pub fn configure(&self, f: impl FnOnce(&mut LoggerConfig)) -> LoggerResult<()> {
        let services = self.inner.services.lock();
        if services.is_some() {
            return Err(LoggerError::AlreadyRunning);
        }

        let mut config = self.inner.config.lock().clone();
        f(&mut config);
        self.apply(config);
        Ok(())
    }

    /// Snapshot of the active configuration
    pub fn config(&self) -> LoggerConfig {
        self.inner.config.lock().clone()
    }

    /// Merge static fields into the existing ones
    pub fn add_static_fields(
        &self,
        fields: impl IntoIterator<Item = (String, String)>,
    ) -> LoggerResult<()> {
        self.configure(|cfg| cfg.static_fields.extend(fields))
    }

    /// Remove static fields by key
    pub fn delete_static_fields<'a>(
        &self,
        keys: impl IntoIterator<Item = &'a str>,
    ) -> LoggerResult<()> {
        self.configure(|cfg| {
            for key in keys {
                cfg.static_fields.remove(key);
            }
        })
    }

    pub fn static_fields(&self) -> StaticFields {
        self.inner.pipeline.static_fields()
    }

    /// Resize the report queue. Only allowed while stopped.
    pub fn set_queue_capacity(&self, capacity: usize) -> LoggerResult<()> {
        self.configure(|cfg| cfg.queue_capacity = capacity)
    }

    /// Turn trace records on or off; takes effect immediately
    pub fn set_trace_mode(&self, enabled: bool) {
        self.inner.config.lock().trace_mode = enabled;
        self.inner.pipeline.set_trace_mode(enabled);
    }

    pub fn trace_mode(&self) -> bool {
        self.inner.pipeline.trace_mode()
    }

    fn apply(&self, config: LoggerConfig) {
        let pipeline = &self.inner.pipeline;
        pipeline.set_static_fields(config.static_fields.clone());
        pipeline.set_trace_mode(config.trace_mode);
        pipeline.set_queue_capacity(config.queue_capacity);
        pipeline.set_backpressure_timeout(config.backpressure_timeout);

        let previous_rotation = self.inner.config.lock().rotation.clone();
        let mut engine = self.inner.engine.lock();
        if engine.is_none() || previous_rotation != config.rotation {
            if let Some(old) = engine.take() {
                old.close_log_file();
                debug!(folder = %old.folder().display(), "[IonLogger] Rotation engine replaced");
            }
            *engine = config.rotation.as_ref().map(|rotation| {
                Arc::new(RotationEngine::with_filesystem(
                    rotation.folder.clone(),
                    rotation.period,
                    rotation.max_folder_size,
                    Arc::clone(&self.inner.filesystem),
                ))
            });
        }

        let mut sinks = config.targets.clone();
        if let Some(engine) = engine.as_ref() {
            sinks.push(Arc::clone(engine) as SharedSink);
        }
        self.inner.writer.set_writers(sinks);

        *self.inner.config.lock() = config;
    }

    // ========================================================================
    // Accessors
    // ========================================================================

    /// The call-site history behind the once/on-change calls
    pub fn history(&self) -> &RecordHistory {
        &self.inner.history
    }

    /// The multi-target writer every line goes through
    pub fn writer(&self) -> &Arc<MultiWriter> {
        &self.inner.writer
    }

    /// The active rotation engine
    pub fn rotation_engine(&self) -> Option<Arc<RotationEngine>> {
        self.inner.engine.lock().clone()
    }

    /// Records lost to back-pressure
    pub fn dropped_reports(&self) -> u64 {
        self.inner.pipeline.dropped_reports()
    }

    /// Run the rotation and folder size checks now
    pub fn rotate_now(&self) -> LoggerResult<()> {
        let engine = self
            .rotation_engine()
            .ok_or(LoggerError::RotationNotConfigured)?;
        engine.rotate()?;
        engine.enforce_folder_size()?;
        Ok(())
    }

    // ========================================================================
    // Logging
    // ========================================================================

    /// Log at any level. Trace goes through [`trace`](Self::trace); every
    /// other level is queued.
    pub fn log(&self, level: Level, caller: CallerInfo, msg: impl Into<String>) {
        if level == Level::Trace {
            self.trace(caller, msg);
            return;
        }
        self.inner
            .pipeline
            .async_report(LogRecord::new(level, msg, caller));
    }

    /// Written synchronously, and only while trace mode is on
    pub fn trace(&self, caller: CallerInfo, msg: impl Into<String>) {
        if !self.trace_mode() {
            return;
        }
        self.inner
            .pipeline
            .report(&LogRecord::new(Level::Trace, msg, caller));
    }

    pub fn debug(&self, caller: CallerInfo, msg: impl Into<String>) {
        self.log(Level::Debug, caller, msg);
    }

    pub fn info(&self, caller: CallerInfo, msg: impl Into<String>) {
        self.log(Level::Info, caller, msg);
    }

    pub fn warn(&self, caller: CallerInfo, msg: impl Into<String>) {
        self.log(Level::Warn, caller, msg);
    }

    pub fn error(&self, caller: CallerInfo, msg: impl Into<String>) {
        self.log(Level::Error, caller, msg);
    }

    /// Flush the queue, write the record synchronously, then panic with
    /// `msg`
    pub fn panic(&self, caller: CallerInfo, msg: impl Into<String>) -> ! {
        let msg = msg.into();
        self.flush();
        self.inner
            .pipeline
            .report(&LogRecord::new(Level::Panic, msg.clone(), caller));
        panic!("{msg}");
    }

    /// Log only the first time `caller` runs. Returns whether it was logged.
    pub fn log_once(&self, level: Level, caller: CallerInfo, msg: impl Into<String>) -> bool {
        let msg = msg.into();
        if !log_once(&self.inner.history, &caller, &msg) {
            return false;
        }
        self.log(level, caller, msg);
        true
    }

    /// Log when the message differs from the last one logged at `caller`.
    /// Returns whether it was logged.
    pub fn log_on_change(&self, level: Level, caller: CallerInfo, msg: impl Into<String>) -> bool {
        let msg = msg.into();
        if !log_on_change(&self.inner.history, &caller, &msg) {
            return false;
        }
        self.log(level, caller, msg);
        true
    }
}

impl std::fmt::Debug for IonLogger {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("IonLogger")
            .field("status", &self.status())
            .field("pipeline", &self.inner.pipeline)
            .field("writer", &self.inner.writer)
            .finish()
    }
}
