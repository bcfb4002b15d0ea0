//! Filesystem access seam
//!
//! Resolution only needs to list a folder and open a file. Both calls are
//! blocking; the pipeline runs them on the blocking pool.

use std::fs;
use std::io::{self, Read};
use std::path::Path;
use tracing::debug;

/// One directory entry
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirEntry {
    pub name: String,
    pub is_dir: bool,
}

impl DirEntry {
    pub fn file(name: impl Into<String>) -> Self {
        Self { name: name.into(), is_dir: false }
    }

    pub fn dir(name: impl Into<String>) -> Self {
        Self { name: name.into(), is_dir: true }
    }
}

/// Directory listing and file reading
pub trait FileSystem: Send + Sync {
    /// Entries of `path`. Fails when the folder is absent or unreadable.
    fn list_dir(&self, path: &Path) -> io::Result<Vec<DirEntry>>;

    /// Open a file for reading
    fn open(&self, path: &Path) -> io::Result<Box<dyn Read + Send>>;
}

/// The local disk
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalFileSystem;

impl FileSystem for LocalFileSystem {
    fn list_dir(&self, path: &Path) -> io::Result<Vec<DirEntry>> {
        let mut entries = Vec::new();
        for entry in fs::read_dir(path)? {
            let entry = entry?;
            let Ok(name) = entry.file_name().into_string() else {
                debug!("Skipping non UTF-8 entry in {:?}", path);
                continue;
            };
            // Follows symlinks
            let is_dir = entry.path().is_dir();
            entries.push(DirEntry { name, is_dir });
        }
        Ok(entries)
    }

    fn open(&self, path: &Path) -> io::Result<Box<dyn Read + Send>> {
        Ok(Box::new(fs::File::open(path)?))
    }
}
