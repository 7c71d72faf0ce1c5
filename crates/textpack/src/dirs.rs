//! Platform directory discovery

use std::path::PathBuf;

use etcetera::{BaseStrategy, choose_base_strategy};
use log::debug;

/// Application directory name under the platform config directory
pub const APP_DIR: &str = "textpack";

/// Name of both the user-level and the project-level config file
pub const CONFIG_FILE_NAME: &str = "textpack.toml";

/// The user-level config directory, e.g. `~/.config/textpack` with XDG.
///
/// Returns `None` when no home directory can be determined.
pub fn user_config_dir() -> Option<PathBuf> {
    match choose_base_strategy() {
        Ok(strategy) => Some(strategy.config_dir().join(APP_DIR)),
        Err(err) => {
            debug!("No user config directory available: {err}");
            None
        }
    }
}

/// Path of the user-level config file, whether or not it exists
pub fn user_config_file() -> Option<PathBuf> {
    user_config_dir().map(|dir| dir.join(CONFIG_FILE_NAME))
}
