//! Real filesystem backed by `std::fs`

use std::fs::{self, File, OpenOptions};
use std::io;
use std::path::Path;

use super::{DirEntryInfo, FileStat, Filesystem, LogFile, OpenMode};

/// [`Filesystem`] over the host operating system
#[derive(Debug, Default, Clone, Copy)]
pub struct OsFilesystem;

impl LogFile for File {
    fn close(&mut self) -> io::Result<()> {
        self.sync_all()
    }
}

impl Filesystem for OsFilesystem {
    fn stat(&self, path: &Path) -> io::Result<FileStat> {
        let metadata = fs::metadata(path)?;
        Ok(FileStat {
            is_dir: metadata.is_dir(),
            size: metadata.len(),
        })
    }

    fn mkdir(&self, path: &Path) -> io::Result<()> {
        fs::create_dir_all(path)
    }

    fn read_dir(&self, path: &Path) -> io::Result<Vec<DirEntryInfo>> {
        let mut entries = Vec::new();
        for entry in fs::read_dir(path)? {
            let entry = entry?;
            let metadata = entry.metadata()?;
            entries.push(DirEntryInfo {
                name: entry.file_name().to_string_lossy().into_owned(),
                is_dir: metadata.is_dir(),
                size: if metadata.is_file() { metadata.len() } else { 0 },
            });
        }
        entries.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(entries)
    }

    fn open_file(&self, path: &Path, mode: OpenMode) -> io::Result<Box<dyn LogFile>> {
        let file = OpenOptions::new()
            .append(true)
            .create(mode == OpenMode::CreateAppend)
            .open(path)?;
        Ok(Box::new(file))
    }

    fn remove(&self, path: &Path) -> io::Result<()> {
        fs::remove_file(path)
    }
}
