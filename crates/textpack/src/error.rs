//! Errors that abort a run

use std::{io, path::PathBuf};

/// Failures that abort a run
#[derive(Debug, thiserror::Error)]
pub enum BundleError {
    /// The traversal root does not exist or is not a directory.
    /// Raised before any bundle is created.
    #[error("{} is not a valid directory.", .path.display())]
    InvalidInput { path: PathBuf },

    /// A bundle could not be created, written or flushed
    #[error("failed to write bundle {}", .path.display())]
    Output {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl BundleError {
    pub(crate) fn output(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::Output {
            path: path.into(),
            source,
        }
    }
}
