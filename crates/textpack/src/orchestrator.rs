//! Run orchestration
//!
//! Validates the root, then streams every included file through a single
//! [`BundleWriter`]. Per-file read failures become error lines in the open
//! bundle; only an invalid root or a failing bundle write aborts the run.

use std::{
    fs, io,
    path::{Path, PathBuf},
};

use log::{debug, info};

use crate::{
    bundle_writer::{BundleWriter, OwnBundles},
    config::Config,
    error::BundleError,
    types::{FileEntry, RunSummary},
    walker::Walker,
};

/// Bundle the tree under `config.directory` into `<config.output>_<n>.txt` files.
pub fn run(config: &Config) -> Result<RunSummary, BundleError> {
    let root = validate_root(&config.directory)?;
    info!(
        "Collecting files under {} into {}_*.txt (line limit {})",
        root.display(),
        config.output,
        config.line_limit
    );

    let mut writer = BundleWriter::create(config.output.as_str(), config.line_limit)?;

    let mut walker = Walker::new(&root, config);
    match OwnBundles::new(Path::new(&config.output)) {
        Ok(own) => walker = walker.skip_bundles(own),
        Err(err) => debug!("Not filtering own bundles: {err}"),
    }

    for entry in walker.files() {
        match read_entry(&entry) {
            Ok(content) => writer.write_file(&entry.relative_path, &content)?,
            Err(err) => writer.write_error(&entry.relative_path, &err)?,
        }
    }

    let summary = writer.finish()?;
    info!(
        "Wrote {} files ({} unreadable) into {} bundles",
        summary.files_written(),
        summary.files_failed(),
        summary.bundle_count()
    );
    Ok(summary)
}

/// Four-argument form of [`run`]; `node_modules` is the only excluded directory.
pub fn collect_files(
    directory: impl Into<PathBuf>,
    output: impl Into<String>,
    extensions: Option<Vec<String>>,
    line_limit: usize,
) -> Result<RunSummary, BundleError> {
    run(&Config {
        directory: directory.into(),
        output: output.into(),
        extensions,
        line_limit,
        exclude: Vec::new(),
    })
}

/// Read a file as strict UTF-8 text
pub fn read_entry(entry: &FileEntry) -> io::Result<String> {
    let bytes = fs::read(&entry.path)?;
    String::from_utf8(bytes).map_err(|err| io::Error::new(io::ErrorKind::InvalidData, err))
}

/// Resolve the root to an absolute, canonical directory path
fn validate_root(directory: &Path) -> Result<PathBuf, BundleError> {
    let invalid = || BundleError::InvalidInput {
        path: std::path::absolute(directory).unwrap_or_else(|_| directory.to_path_buf()),
    };
    if !directory.is_dir() {
        return Err(invalid());
    }
    fs::canonicalize(directory).map_err(|_| invalid())
}
