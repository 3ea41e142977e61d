//! Filesystem capability used by the rotation engine
//!
//! The engine never touches `std::fs` directly. It is handed an
//! `Arc<dyn Filesystem>`: [`OsFilesystem`] in production and
//! [`MemoryFilesystem`] in tests or anywhere a disk is not wanted.

mod memory;
mod os;

pub use memory::MemoryFilesystem;
pub use os::OsFilesystem;

use std::io::{self, Write};
use std::path::Path;

/// Metadata the engine needs about a path
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FileStat {
    pub is_dir: bool,
    pub size: u64,
}

/// One directory entry
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirEntryInfo {
    /// File name without the folder
    pub name: String,
    pub is_dir: bool,
    /// Size in bytes, 0 for directories
    pub size: u64,
}

/// How a log file is opened; both modes append
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OpenMode {
    /// Open an existing file, failing if it is missing
    Append,
    /// Open the file, creating it if it is missing
    CreateAppend,
}

/// An open log file handle
pub trait LogFile: Write + Send {
    /// Flush and release the handle
    fn close(&mut self) -> io::Result<()> {
        self.flush()
    }
}

/// The filesystem operations the rotation engine depends on
pub trait Filesystem: Send + Sync {
    fn stat(&self, path: &Path) -> io::Result<FileStat>;

    /// Create a directory and any missing parents
    fn mkdir(&self, path: &Path) -> io::Result<()>;

    fn read_dir(&self, path: &Path) -> io::Result<Vec<DirEntryInfo>>;

    /// Whether `err` means the path does not exist
    fn is_not_exist(&self, err: &io::Error) -> bool {
        err.kind() == io::ErrorKind::NotFound
    }

    fn open_file(&self, path: &Path, mode: OpenMode) -> io::Result<Box<dyn LogFile>>;

    fn remove(&self, path: &Path) -> io::Result<()>;
}
