//! In-memory filesystem

use std::collections::{BTreeMap, BTreeSet};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use parking_lot::Mutex;

use super::{DirEntryInfo, FileStat, Filesystem, LogFile, OpenMode};

#[derive(Debug, Default)]
struct Tree {
    dirs: BTreeSet<PathBuf>,
    files: BTreeMap<PathBuf, Vec<u8>>,
}

fn not_found(path: &Path) -> io::Error {
    io::Error::new(
        io::ErrorKind::NotFound,
        format!("{} does not exist", path.display()),
    )
}

/// A [`Filesystem`] kept entirely in memory.
///
/// Clones share the same tree, so a test can hand one clone to an engine and
/// inspect the other.
#[derive(Debug, Default, Clone)]
pub struct MemoryFilesystem {
    tree: Arc<Mutex<Tree>>,
}

impl MemoryFilesystem {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a file (and its parent folders) holding `contents`
    pub fn with_file(self, path: impl AsRef<Path>, contents: impl Into<Vec<u8>>) -> Self {
        self.write_file(path, contents);
        self
    }

    /// Create or overwrite a file, creating its parent folders
    pub fn write_file(&self, path: impl AsRef<Path>, contents: impl Into<Vec<u8>>) {
        let path = path.as_ref();
        let mut tree = self.tree.lock();
        if let Some(parent) = path.parent() {
            insert_dirs(&mut tree, parent);
        }
        tree.files.insert(path.to_path_buf(), contents.into());
    }

    /// Contents of a file
    pub fn read(&self, path: impl AsRef<Path>) -> Option<Vec<u8>> {
        self.tree.lock().files.get(path.as_ref()).cloned()
    }

    /// Contents of a file, lossily decoded
    pub fn read_to_string(&self, path: impl AsRef<Path>) -> Option<String> {
        self.read(path)
            .map(|bytes| String::from_utf8_lossy(&bytes).into_owned())
    }

    /// Whether a file or folder exists at `path`
    pub fn exists(&self, path: impl AsRef<Path>) -> bool {
        let tree = self.tree.lock();
        let path = path.as_ref();
        tree.dirs.contains(path) || tree.files.contains_key(path)
    }

    /// Names of the files directly inside `folder`, sorted
    pub fn file_names(&self, folder: impl AsRef<Path>) -> Vec<String> {
        let folder = folder.as_ref();
        self.tree
            .lock()
            .files
            .keys()
            .filter(|p| p.parent() == Some(folder))
            .filter_map(|p| p.file_name())
            .map(|n| n.to_string_lossy().into_owned())
            .collect()
    }
}

fn insert_dirs(tree: &mut Tree, path: &Path) {
    for ancestor in path.ancestors() {
        if ancestor.as_os_str().is_empty() {
            continue;
        }
        tree.dirs.insert(ancestor.to_path_buf());
    }
}

impl Filesystem for MemoryFilesystem {
    fn stat(&self, path: &Path) -> io::Result<FileStat> {
        let tree = self.tree.lock();
        if tree.dirs.contains(path) {
            return Ok(FileStat {
                is_dir: true,
                size: 0,
            });
        }
        tree.files
            .get(path)
            .map(|contents| FileStat {
                is_dir: false,
                size: contents.len() as u64,
            })
            .ok_or_else(|| not_found(path))
    }

    fn mkdir(&self, path: &Path) -> io::Result<()> {
        let mut tree = self.tree.lock();
        if tree.files.contains_key(path) {
            return Err(io::Error::new(
                io::ErrorKind::AlreadyExists,
                format!("{} is a file", path.display()),
            ));
        }
        insert_dirs(&mut tree, path);
        Ok(())
    }

    fn read_dir(&self, path: &Path) -> io::Result<Vec<DirEntryInfo>> {
        let tree = self.tree.lock();
        if !tree.dirs.contains(path) {
            return Err(not_found(path));
        }

        let name_of = |p: &Path| p.file_name().map(|n| n.to_string_lossy().into_owned());

        let dirs = tree
            .dirs
            .iter()
            .filter(|d| d.parent() == Some(path))
            .filter_map(|d| {
                name_of(d).map(|name| DirEntryInfo {
                    name,
                    is_dir: true,
                    size: 0,
                })
            });
        let files = tree
            .files
            .iter()
            .filter(|(p, _)| p.parent() == Some(path))
            .filter_map(|(p, contents)| {
                name_of(p).map(|name| DirEntryInfo {
                    name,
                    is_dir: false,
                    size: contents.len() as u64,
                })
            });

        let mut entries: Vec<DirEntryInfo> = dirs.chain(files).collect();
        entries.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(entries)
    }

    fn open_file(&self, path: &Path, mode: OpenMode) -> io::Result<Box<dyn LogFile>> {
        let mut tree = self.tree.lock();
        if !tree.files.contains_key(path) {
            let parent_exists = path
                .parent()
                .map_or(true, |p| p.as_os_str().is_empty() || tree.dirs.contains(p));
            if mode == OpenMode::Append || !parent_exists {
                return Err(not_found(path));
            }
            tree.files.insert(path.to_path_buf(), Vec::new());
        }

        Ok(Box::new(MemoryFile {
            tree: Arc::clone(&self.tree),
            path: path.to_path_buf(),
        }))
    }

    fn remove(&self, path: &Path) -> io::Result<()> {
        self.tree
            .lock()
            .files
            .remove(path)
            .map(|_| ())
            .ok_or_else(|| not_found(path))
    }
}

/// Handle into a [`MemoryFilesystem`] file. Writes to a removed file are
/// accepted and discarded, like an unlinked file on unix.
struct MemoryFile {
    tree: Arc<Mutex<Tree>>,
    path: PathBuf,
}

impl Write for MemoryFile {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        if let Some(contents) = self.tree.lock().files.get_mut(&self.path) {
            contents.extend_from_slice(buf);
        }
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl LogFile for MemoryFile {}
