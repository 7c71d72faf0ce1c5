//! Bundle output and rollover
//!
//! [`BundleWriter`] owns the only open bundle together with its line counter.
//! Files are appended whole; when the next file would push a non-empty bundle
//! past the line limit, the bundle is closed and the next one in sequence is
//! opened first.

use std::{
    fmt::Display,
    fs::{self, File},
    io::{self, BufWriter, Write},
    path::{Path, PathBuf},
};

use log::{debug, info, warn};

use crate::{
    error::BundleError,
    line_count::count_lines,
    types::{BundleInfo, RunSummary},
};

/// Lines of framing around each file block: the leading blank line, the
/// header and the blank line after it
pub const FRAMING_LINES: usize = 3;

/// Path of bundle number `index` for the given base name
pub fn bundle_file_name(base: &str, index: usize) -> PathBuf {
    PathBuf::from(format!("{base}_{index}.txt"))
}

/// Matches the bundle files a run with a given base name produces
#[derive(Debug, Clone)]
pub struct OwnBundles {
    dir: PathBuf,
    stem: String,
}

impl OwnBundles {
    /// The directory part of `base` must exist.
    pub fn new(base: &Path) -> io::Result<Self> {
        let parent = base
            .parent()
            .filter(|parent| !parent.as_os_str().is_empty())
            .unwrap_or_else(|| Path::new("."));
        let stem = base
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .ok_or_else(|| {
                io::Error::new(
                    io::ErrorKind::InvalidInput,
                    format!("bundle base name {} has no file name", base.display()),
                )
            })?;
        Ok(Self {
            dir: fs::canonicalize(parent)?,
            stem,
        })
    }

    /// Whether `path` names one of this run's bundles, `<stem>_<digits>.txt`
    pub fn contains(&self, path: &Path) -> bool {
        if path.parent() != Some(self.dir.as_path()) {
            return false;
        }
        let Some(name) = path.file_name().and_then(|name| name.to_str()) else {
            return false;
        };
        name.strip_prefix(self.stem.as_str())
            .and_then(|rest| rest.strip_prefix('_'))
            .and_then(|rest| rest.strip_suffix(".txt"))
            .is_some_and(|digits| !digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit()))
    }
}

/// Writes file blocks into a sequence of line-capped bundles
#[derive(Debug)]
pub struct BundleWriter {
    base: String,
    line_limit: usize,
    line_count: usize,
    out: BufWriter<File>,
    current: BundleInfo,
    closed: Vec<BundleInfo>,
}

impl BundleWriter {
    /// Create bundle #1, truncating any existing file of that name
    pub fn create(base: impl Into<String>, line_limit: usize) -> Result<Self, BundleError> {
        let base = base.into();
        let (out, current) = open_bundle(&base, 1)?;
        Ok(Self {
            base,
            line_limit,
            line_count: 0,
            out,
            current,
            closed: Vec::new(),
        })
    }

    /// Sequence number of the open bundle
    pub fn index(&self) -> usize {
        self.current.index
    }

    /// Lines accounted to the open bundle so far
    pub fn line_count(&self) -> usize {
        self.line_count
    }

    /// Append one file block, rolling over first if it would not fit.
    ///
    /// A bundle that holds no lines yet always takes the file, however large.
    pub fn write_file(&mut self, relative_path: &Path, content: &str) -> Result<(), BundleError> {
        let added = count_lines(content) + FRAMING_LINES;
        if self.line_count > 0 && self.line_count + added > self.line_limit {
            self.roll_over()?;
        }

        write!(
            self.out,
            "\n\n--- File: {} ---\n\n{content}\n",
            relative_path.display()
        )
        .map_err(|err| BundleError::output(&self.current.path, err))?;

        self.line_count += added;
        self.current.line_count = self.line_count;
        self.current.files.push(relative_path.to_path_buf());
        debug!(
            "Wrote {} ({added} lines) to bundle {}",
            relative_path.display(),
            self.current.index
        );
        Ok(())
    }

    /// Record an unreadable file as a single error line in the open bundle
    pub fn write_error(
        &mut self,
        relative_path: &Path,
        reason: &dyn Display,
    ) -> Result<(), BundleError> {
        writeln!(
            self.out,
            "Error reading file {}: {reason}",
            relative_path.display()
        )
        .map_err(|err| BundleError::output(&self.current.path, err))?;

        self.line_count += 1;
        self.current.line_count = self.line_count;
        self.current.failed.push(relative_path.to_path_buf());
        warn!("Error reading file {}: {reason}", relative_path.display());
        Ok(())
    }

    /// Close the open bundle and report every bundle created
    pub fn finish(mut self) -> Result<RunSummary, BundleError> {
        self.out
            .flush()
            .map_err(|err| BundleError::output(&self.current.path, err))?;
        self.closed.push(self.current);
        Ok(RunSummary {
            bundles: self.closed,
        })
    }

    fn roll_over(&mut self) -> Result<(), BundleError> {
        self.out
            .flush()
            .map_err(|err| BundleError::output(&self.current.path, err))?;
        let next = self.current.index + 1;
        info!(
            "Bundle {} full at {} lines, rolling over to bundle {next}",
            self.current.index, self.line_count
        );
        let (out, current) = open_bundle(&self.base, next)?;
        // Assigning drops, and so closes, the previous handle.
        self.out = out;
        self.closed.push(std::mem::replace(&mut self.current, current));
        self.line_count = 0;
        Ok(())
    }
}

fn open_bundle(base: &str, index: usize) -> Result<(BufWriter<File>, BundleInfo), BundleError> {
    let path = bundle_file_name(base, index);
    let file = File::create(&path).map_err(|err| BundleError::output(&path, err))?;
    debug!("Opened bundle {}", path.display());
    let info = BundleInfo {
        index,
        path,
        line_count: 0,
        files: Vec::new(),
        failed: Vec::new(),
    };
    Ok((BufWriter::new(file), info))
}
