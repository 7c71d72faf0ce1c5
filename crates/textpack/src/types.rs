//! Shared value types for the textpack crate
//!
//! These types describe what a run discovers (files) and what it produces
//! (bundles), independent of how traversal and writing are carried out.

use std::path::{Path, PathBuf};

/// A file discovered during traversal
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileEntry {
    /// Absolute path on disk
    pub path: PathBuf,
    /// Path relative to the traversal root, used in block headers
    pub relative_path: PathBuf,
    /// Extension without the leading dot, if the file name has one
    pub extension: Option<String>,
}

impl FileEntry {
    /// Build an entry for `path`, which must lie under `root`.
    pub fn new(root: &Path, path: PathBuf) -> Self {
        let relative_path = path
            .strip_prefix(root)
            .map_or_else(|_| path.clone(), Path::to_path_buf);
        let extension = path
            .extension()
            .map(|ext| ext.to_string_lossy().into_owned());
        Self {
            path,
            relative_path,
            extension,
        }
    }

    /// File name as text, lossily converted when not valid UTF-8
    pub fn file_name(&self) -> String {
        self.path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default()
    }
}

/// A closed output bundle
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BundleInfo {
    /// 1-based sequence number
    pub index: usize,
    /// Where the bundle was written
    pub path: PathBuf,
    /// Accounted lines, including per-file framing and error lines
    pub line_count: usize,
    /// Relative paths of the files whose content landed in this bundle
    pub files: Vec<PathBuf>,
    /// Relative paths of the files recorded as read errors in this bundle
    pub failed: Vec<PathBuf>,
}

/// Outcome of a completed run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunSummary {
    /// Bundles in creation order
    pub bundles: Vec<BundleInfo>,
}

impl RunSummary {
    /// Number of bundles created
    pub fn bundle_count(&self) -> usize {
        self.bundles.len()
    }

    /// Number of files written in full across all bundles
    pub fn files_written(&self) -> usize {
        self.bundles.iter().map(|bundle| bundle.files.len()).sum()
    }

    /// Number of files that could not be read
    pub fn files_failed(&self) -> usize {
        self.bundles.iter().map(|bundle| bundle.failed.len()).sum()
    }
}
