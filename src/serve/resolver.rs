//! Path resolution
//!
//! Maps an extensionless request path onto the base directory. The last
//! segment is the leaf; everything before it names the folder to list.

use super::fs::{DirEntry, FileSystem};
use percent_encoding::percent_decode_str;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::debug;

/// Where a request path points
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Location {
    /// A file whose extensionless name equals the leaf
    File(PathBuf),
    /// A directory to list, with its entries
    Container { dir: PathBuf, entries: Vec<DirEntry> },
    /// Nothing matches
    Missing,
}

/// Resolves request paths against a base directory
#[derive(Clone)]
pub struct PathResolver {
    base_dir: PathBuf,
    containment: bool,
    fs: Arc<dyn FileSystem>,
}

impl PathResolver {
    pub fn new(base_dir: impl Into<PathBuf>, containment: bool, fs: Arc<dyn FileSystem>) -> Self {
        Self {
            base_dir: base_dir.into(),
            containment,
            fs,
        }
    }

    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    /// Whether paths ending in `/` resolve to containers
    pub fn containment(&self) -> bool {
        self.containment
    }

    /// The filesystem used for listing and opening
    pub fn file_system(&self) -> &Arc<dyn FileSystem> {
        &self.fs
    }

    /// Resolve `url_path` (still percent-encoded)
    pub fn locate(&self, url_path: &str) -> Location {
        let Some((folders, leaf)) = split_path(url_path) else {
            debug!("Rejected request path {}", url_path);
            return Location::Missing;
        };

        let folder = folders
            .iter()
            .filter(|s| !s.is_empty())
            .fold(self.base_dir.clone(), |path, segment| path.join(segment));

        let entries = match self.fs.list_dir(&folder) {
            Ok(entries) => entries,
            Err(e) => {
                debug!("Cannot list {:?}: {}", folder, e);
                return Location::Missing;
            }
        };

        if self.containment && url_path.ends_with('/') {
            return Location::Container { dir: folder, entries };
        }

        // Several files may share a stem (jesse.ttl, jesse.nt); the first name wins
        entries
            .iter()
            .filter(|e| !e.is_dir && strip_extension(&e.name) == leaf)
            .min_by(|a, b| a.name.cmp(&b.name))
            .map(|e| Location::File(folder.join(&e.name)))
            .unwrap_or(Location::Missing)
    }
}

/// Split a request path into decoded folder segments and the leaf segment.
///
/// Returns `None` for paths that could escape the base directory.
pub fn split_path(url_path: &str) -> Option<(Vec<String>, String)> {
    let trimmed = url_path.strip_prefix('/').unwrap_or(url_path);
    let mut segments = trimmed
        .split('/')
        .map(decode_segment)
        .collect::<Option<Vec<_>>>()?;
    let leaf = segments.pop().unwrap_or_default();
    Some((segments, leaf))
}

fn decode_segment(raw: &str) -> Option<String> {
    let segment = percent_decode_str(raw).decode_utf8().ok()?;
    if segment == "." || segment == ".." || segment.contains(['/', '\\', '\0']) {
        return None;
    }
    Some(segment.into_owned())
}

/// File name without its final extension. Names without a dot, or whose only
/// dot is the leading one, are returned unchanged.
pub fn strip_extension(name: &str) -> &str {
    match name.rfind('.') {
        None | Some(0) => name,
        Some(i) => &name[..i],
    }
}
