//! Concatenate a directory tree into line-capped plain-text bundles.
//!
//! The entry point is [`orchestrator::run`], driven by a resolved
//! [`config::Config`].

pub mod bundle_writer;
pub mod config;
pub mod dirs;
pub mod error;
pub mod line_count;
pub mod orchestrator;
pub mod types;
pub mod walker;

pub use config::Config;
pub use error::BundleError;
pub use orchestrator::{collect_files, run};
pub use types::{BundleInfo, FileEntry, RunSummary};
