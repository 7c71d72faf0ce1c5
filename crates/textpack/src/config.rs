//! Run configuration
//!
//! A [`Config`] is resolved from layers: built-in defaults, the user config
//! file, the project config file and finally command-line overrides. Each file
//! layer is a partial [`ConfigFile`]; only the keys it sets take effect.

use std::{
    fs,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result, bail};
use log::debug;
use serde::Deserialize;

use crate::dirs;

/// Base name for bundles when none is configured
pub const DEFAULT_OUTPUT: &str = "collected_files";

/// Lines per bundle when no limit is configured
pub const DEFAULT_LINE_LIMIT: usize = 7000;

/// Directory name that is never descended into, regardless of configuration
pub const ALWAYS_EXCLUDED: &str = "node_modules";

/// Fully resolved settings for one run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Traversal root
    pub directory: PathBuf,
    /// Bundle base name; bundles are written to `<output>_<n>.txt`
    pub output: String,
    /// File name suffixes to include; `None` includes every file
    pub extensions: Option<Vec<String>>,
    /// Line budget per bundle
    pub line_limit: usize,
    /// Directory names pruned in addition to [`ALWAYS_EXCLUDED`]
    pub exclude: Vec<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            directory: PathBuf::from("."),
            output: DEFAULT_OUTPUT.to_owned(),
            extensions: None,
            line_limit: DEFAULT_LINE_LIMIT,
            exclude: Vec::new(),
        }
    }
}

impl Config {
    /// Resolve defaults, the user config file and the project config file.
    ///
    /// `explicit` is a `--config` path and must exist; without it
    /// `./textpack.toml` is used when present.
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        let user = dirs::user_config_file();
        let project = match explicit {
            Some(path) => {
                if !path.is_file() {
                    bail!("Config file not found: {}", path.display());
                }
                Some(path.to_path_buf())
            }
            None => Some(PathBuf::from(dirs::CONFIG_FILE_NAME)),
        };
        Self::load_layers(&[user, project].into_iter().flatten().collect::<Vec<_>>())
    }

    /// Apply each existing file in `files` over the defaults, in order.
    pub fn load_layers(files: &[PathBuf]) -> Result<Self> {
        let mut config = Self::default();
        for path in files {
            if !path.is_file() {
                debug!("Skipping absent config file {}", path.display());
                continue;
            }
            debug!("Loading config file {}", path.display());
            config.apply(ConfigFile::from_path(path)?);
        }
        Ok(config)
    }

    /// Override every setting that `layer` specifies
    pub fn apply(&mut self, layer: ConfigFile) {
        if let Some(directory) = layer.directory {
            self.directory = directory;
        }
        if let Some(output) = layer.output {
            self.output = output;
        }
        if let Some(extensions) = layer.extensions {
            self.extensions = Some(extensions);
        }
        if let Some(line_limit) = layer.line_limit {
            self.line_limit = line_limit;
        }
        if let Some(exclude) = layer.exclude {
            self.exclude = exclude;
        }
    }

    /// Whether a directory with this exact name is pruned from traversal
    pub fn is_excluded_dir(&self, name: &str) -> bool {
        name == ALWAYS_EXCLUDED || self.exclude.iter().any(|excluded| excluded == name)
    }

    /// Whether a file with this name passes the extension filter.
    ///
    /// Matching is a plain suffix test, so `"py"` also matches `happy`.
    pub fn matches_extension(&self, file_name: &str) -> bool {
        self.extensions.as_ref().is_none_or(|extensions| {
            extensions
                .iter()
                .any(|suffix| file_name.ends_with(suffix.as_str()))
        })
    }
}

/// One partial configuration layer as read from TOML
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields, rename_all = "kebab-case")]
pub struct ConfigFile {
    pub directory: Option<PathBuf>,
    pub output: Option<String>,
    pub extensions: Option<Vec<String>>,
    pub line_limit: Option<usize>,
    pub exclude: Option<Vec<String>>,
}

impl ConfigFile {
    /// Parse a layer from TOML text
    pub fn parse(text: &str) -> Result<Self> {
        toml::from_str(text).context("Invalid textpack configuration")
    }

    /// Read a layer from disk.
    ///
    /// A relative `directory` is resolved against the file's own directory.
    pub fn from_path(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        let mut layer = Self::parse(&text)
            .with_context(|| format!("Failed to parse config file {}", path.display()))?;
        if let Some(directory) = layer.directory.take() {
            let base = path.parent().unwrap_or_else(|| Path::new(""));
            layer.directory = Some(if directory.is_relative() {
                base.join(directory)
            } else {
                directory
            });
        }
        Ok(layer)
    }
}
