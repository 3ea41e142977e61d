//! Rotation engine - owns the active log file of a folder

use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use chrono::{Local, NaiveDate};
use parking_lot::{Mutex, MutexGuard};
use tracing::{debug, error, info, warn};

use super::naming::{dated_files, file_name_for, most_recent, needs_rotation, oldest};
use super::{RotationPeriod, NO_MAX_FOLDER_SIZE};
use crate::error::{RotationError, RotationResult, SinkError, SinkResult};
use crate::filesystem::{Filesystem, LogFile, OpenMode, OsFilesystem};
use crate::writer::Sink;

#[derive(Default)]
struct ActiveFile {
    name: Option<String>,
    handle: Option<Box<dyn LogFile>>,
}

impl ActiveFile {
    fn close(&mut self) {
        self.name = None;
        if let Some(mut handle) = self.handle.take() {
            if let Err(e) = handle.close() {
                warn!(error = %e, "[RotationEngine] Failed to close log file");
            }
        }
    }

    /// Install a freshly opened handle, closing the previous one
    fn replace(&mut self, name: String, handle: Box<dyn LogFile>) {
        self.close();
        self.name = Some(name);
        self.handle = Some(handle);
    }
}

/// Holds the write lock of a [`RotationEngine`]; writes resume on drop.
pub struct WriteGuard<'a> {
    active: MutexGuard<'a, ActiveFile>,
}

impl WriteGuard<'_> {
    /// Name of the file open while the guard is held
    pub fn active_file_name(&self) -> Option<&str> {
        self.active.name.as_deref()
    }
}

/// Manages the dated log files of a single folder.
///
/// Every write and every change of the open handle happens under one lock,
/// so a rotation never interleaves with a partially written line. The engine
/// is itself a [`Sink`] and is registered with the multi-target writer like
/// any other destination.
pub struct RotationEngine {
    folder: PathBuf,
    period: RotationPeriod,
    max_folder_size: u64,
    fs: Arc<dyn Filesystem>,
    active: Mutex<ActiveFile>,
}

impl RotationEngine {
    /// Engine over the real filesystem. No file is opened until the first
    /// check runs.
    pub fn new(folder: impl Into<PathBuf>, period: RotationPeriod, max_folder_size: u64) -> Self {
        Self::with_filesystem(folder, period, max_folder_size, Arc::new(OsFilesystem))
    }

    /// Engine over an injected filesystem
    pub fn with_filesystem(
        folder: impl Into<PathBuf>,
        period: RotationPeriod,
        max_folder_size: u64,
        fs: Arc<dyn Filesystem>,
    ) -> Self {
        Self {
            folder: folder.into(),
            period,
            max_folder_size,
            fs,
            active: Mutex::new(ActiveFile::default()),
        }
    }

    pub fn folder(&self) -> &Path {
        &self.folder
    }

    pub fn period(&self) -> RotationPeriod {
        self.period
    }

    pub fn max_folder_size(&self) -> u64 {
        self.max_folder_size
    }

    /// Name of the file currently receiving writes
    pub fn active_file_name(&self) -> Option<String> {
        self.active.lock().name.clone()
    }

    /// Whether a log file is open
    pub fn is_open(&self) -> bool {
        self.active.lock().handle.is_some()
    }

    /// Suspend writes until the returned guard is dropped.
    ///
    /// Maintenance calls on the same engine block while the guard is held;
    /// do not call them from the holding thread.
    pub fn block_write(&self) -> WriteGuard<'_> {
        WriteGuard {
            active: self.active.lock(),
        }
    }

    /// Run the rotation and folder size checks against the local date.
    pub fn auto_checks(&self) {
        self.auto_checks_at(Local::now().date_naive());
    }

    /// Run both checks as if the date were `today`. Failures are reported
    /// and leave the current file in place.
    pub fn auto_checks_at(&self, today: NaiveDate) {
        if let Err(e) = self.rotate_at(today) {
            error!(
                folder = %self.folder.display(),
                error = %e,
                "[RotationEngine] Rotation check failed"
            );
        }
        if let Err(e) = self.enforce_folder_size_at(today) {
            error!(
                folder = %self.folder.display(),
                error = %e,
                "[RotationEngine] Folder size check failed"
            );
        }
    }

    /// Make sure the right file is open for the current period
    pub fn rotate(&self) -> RotationResult<()> {
        self.rotate_at(Local::now().date_naive())
    }

    /// Make sure the right file is open as if the date were `today`.
    ///
    /// Creates the folder when missing, starts a new file when the folder
    /// holds none or the newest one belongs to an earlier period, and
    /// otherwise reopens the newest file if nothing is open.
    pub fn rotate_at(&self, today: NaiveDate) -> RotationResult<()> {
        let mut active = self.active.lock();

        self.assert_folder()?;
        let files = self.list_log_files()?;
        let newest = most_recent(&as_refs(&files)).map(|(name, date)| (name.to_string(), date));

        match newest {
            None => self.create_file(&mut active, today),
            Some((_, date)) if needs_rotation(self.period, date, today) => {
                let todays = file_name_for(today);
                if active.handle.is_some() && active.name.as_deref() == Some(todays.as_str()) {
                    // newest file is dated in the future; today's is already open
                    return Ok(());
                }
                info!(
                    folder = %self.folder.display(),
                    period = %self.period,
                    "[RotationEngine] Period boundary crossed, starting a new log file"
                );
                self.create_file(&mut active, today)
            }
            Some((name, _)) => {
                if active.handle.is_none() {
                    self.reopen(&mut active, name)?;
                }
                Ok(())
            }
        }
    }

    /// Evict the oldest log file when the folder exceeds its budget
    pub fn enforce_folder_size(&self) -> RotationResult<()> {
        self.enforce_folder_size_at(Local::now().date_naive())
    }

    /// Evict the oldest log file when the folder exceeds its budget; a new
    /// file dated `today` is started if the eviction leaves none.
    ///
    /// At most one file is removed per call.
    pub fn enforce_folder_size_at(&self, today: NaiveDate) -> RotationResult<()> {
        if self.max_folder_size == NO_MAX_FOLDER_SIZE {
            return Ok(());
        }

        let mut active = self.active.lock();

        let size = self.folder_size()?;
        if size <= self.max_folder_size {
            return Ok(());
        }

        let files = self.list_log_files()?;
        let (victim, _) = oldest(&as_refs(&files)).ok_or(RotationError::NoLogFileFound)?;
        let victim = victim.to_string();
        let path = self.folder.join(&victim);

        self.fs
            .remove(&path)
            .map_err(|source| RotationError::RemoveFile {
                path: path.clone(),
                source,
            })?;
        warn!(
            file = %victim,
            folder_size = size,
            max_folder_size = self.max_folder_size,
            "[RotationEngine] Log folder over budget, removed oldest log file"
        );

        if active.name.as_deref() == Some(victim.as_str()) {
            active.close();
        }

        let remaining = self.list_log_files()?;
        match most_recent(&as_refs(&remaining)).map(|(name, _)| name.to_string()) {
            None => self.create_file(&mut active, today),
            Some(name) if active.handle.is_none() => self.reopen(&mut active, name),
            Some(_) => Ok(()),
        }
    }

    /// Close the active file. Writes fail with [`SinkError::NoActiveFile`]
    /// until the next check opens one.
    pub fn close_log_file(&self) {
        let mut active = self.active.lock();
        if let Some(name) = active.name.clone() {
            debug!(file = %name, "[RotationEngine] Closing log file");
        }
        active.close();
    }

    fn assert_folder(&self) -> RotationResult<()> {
        match self.fs.stat(&self.folder) {
            Ok(stat) if stat.is_dir => Ok(()),
            Ok(_) => Err(RotationError::CheckFolder {
                path: self.folder.clone(),
                source: std::io::Error::new(std::io::ErrorKind::Other, "not a directory"),
            }),
            Err(e) if self.fs.is_not_exist(&e) => {
                info!(folder = %self.folder.display(), "[RotationEngine] Creating log folder");
                self.fs
                    .mkdir(&self.folder)
                    .map_err(|source| RotationError::CreateFolder {
                        path: self.folder.clone(),
                        source,
                    })
            }
            Err(source) => Err(RotationError::CheckFolder {
                path: self.folder.clone(),
                source,
            }),
        }
    }

    fn list_log_files(&self) -> RotationResult<Vec<(String, NaiveDate)>> {
        let entries = self
            .fs
            .read_dir(&self.folder)
            .map_err(|source| RotationError::ReadFolder {
                path: self.folder.clone(),
                source,
            })?;

        let names = entries.iter().filter(|e| !e.is_dir).map(|e| e.name.as_str());
        Ok(dated_files(names)
            .into_iter()
            .map(|(name, date)| (name.to_string(), date))
            .collect())
    }

    fn folder_size(&self) -> RotationResult<u64> {
        let entries = self
            .fs
            .read_dir(&self.folder)
            .map_err(|source| RotationError::ReadFolder {
                path: self.folder.clone(),
                source,
            })?;
        Ok(entries.iter().filter(|e| !e.is_dir).map(|e| e.size).sum())
    }

    /// Open (or create) today's file and switch to it. The previous handle
    /// is only closed once the new one is open.
    fn create_file(&self, active: &mut ActiveFile, today: NaiveDate) -> RotationResult<()> {
        let name = file_name_for(today);
        let path = self.folder.join(&name);
        let handle = self
            .fs
            .open_file(&path, OpenMode::CreateAppend)
            .map_err(|source| RotationError::CreateFile {
                path: path.clone(),
                source,
            })?;

        info!(file = %path.display(), "[RotationEngine] Log file opened");
        active.replace(name, handle);
        Ok(())
    }

    fn reopen(&self, active: &mut ActiveFile, name: String) -> RotationResult<()> {
        let path = self.folder.join(&name);
        let handle = self
            .fs
            .open_file(&path, OpenMode::Append)
            .map_err(|source| RotationError::OpenFile {
                path: path.clone(),
                source,
            })?;

        debug!(file = %path.display(), "[RotationEngine] Reopened existing log file");
        active.replace(name, handle);
        Ok(())
    }
}

fn as_refs(files: &[(String, NaiveDate)]) -> Vec<(&str, NaiveDate)> {
    files.iter().map(|(name, date)| (name.as_str(), *date)).collect()
}

impl Sink for RotationEngine {
    fn write(&self, buf: &[u8]) -> SinkResult<usize> {
        let mut active = self.active.lock();
        let handle = active.handle.as_mut().ok_or(SinkError::NoActiveFile)?;
        handle.write_all(buf)?;
        Ok(buf.len())
    }

    fn flush(&self) -> SinkResult<()> {
        if let Some(handle) = self.active.lock().handle.as_mut() {
            handle.flush()?;
        }
        Ok(())
    }
}

impl std::fmt::Debug for RotationEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RotationEngine")
            .field("folder", &self.folder)
            .field("period", &self.period)
            .field("max_folder_size", &self.max_folder_size)
            .field("active_file", &self.active_file_name())
            .finish()
    }
}
