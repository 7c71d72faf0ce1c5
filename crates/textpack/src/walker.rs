//! Directory traversal
//!
//! Walks the tree depth-first with parents before children and siblings
//! sorted by name. Excluded directory names are pruned before they are
//! entered, so nothing beneath them is ever read.

use std::path::PathBuf;

use log::{debug, warn};
use walkdir::{DirEntry, WalkDir};

use crate::{bundle_writer::OwnBundles, config::Config, types::FileEntry};

/// Yields the files of one run in traversal order
#[derive(Debug)]
pub struct Walker<'a> {
    root: PathBuf,
    config: &'a Config,
    own_bundles: Option<OwnBundles>,
}

impl<'a> Walker<'a> {
    /// `root` should already be absolute; relative paths in the yielded
    /// entries are computed against it.
    pub fn new(root: impl Into<PathBuf>, config: &'a Config) -> Self {
        Self {
            root: root.into(),
            config,
            own_bundles: None,
        }
    }

    /// Skip files that are bundles of the current run
    #[must_use]
    pub fn skip_bundles(mut self, own_bundles: OwnBundles) -> Self {
        self.own_bundles = Some(own_bundles);
        self
    }

    /// Included files, in traversal order
    pub fn files(&self) -> impl Iterator<Item = FileEntry> + '_ {
        WalkDir::new(&self.root)
            .follow_links(false)
            .sort_by_file_name()
            .into_iter()
            .filter_entry(|entry| !self.is_pruned(entry))
            .filter_map(|entry| match entry {
                Ok(entry) => Some(entry),
                Err(err) => {
                    warn!("Skipping unreadable entry: {err}");
                    None
                }
            })
            .filter(|entry| !is_directory(entry))
            .filter(|entry| self.is_included(entry))
            .map(|entry| FileEntry::new(&self.root, entry.into_path()))
    }

    fn is_pruned(&self, entry: &DirEntry) -> bool {
        if entry.depth() == 0 || !entry.file_type().is_dir() {
            return false;
        }
        let name = entry.file_name().to_string_lossy();
        let pruned = self.config.is_excluded_dir(&name);
        if pruned {
            debug!("Pruning excluded directory {}", entry.path().display());
        }
        pruned
    }

    fn is_included(&self, entry: &DirEntry) -> bool {
        let name = entry.file_name().to_string_lossy();
        if !self.config.matches_extension(&name) {
            return false;
        }
        if let Some(own) = &self.own_bundles
            && own.contains(entry.path())
        {
            debug!("Skipping own bundle {}", entry.path().display());
            return false;
        }
        true
    }
}

/// Directories, and symlinks that resolve to one. Everything else, dangling
/// links included, is handed to the reader so failures surface as error lines.
fn is_directory(entry: &DirEntry) -> bool {
    let file_type = entry.file_type();
    file_type.is_dir() || (file_type.is_symlink() && entry.path().is_dir())
}
