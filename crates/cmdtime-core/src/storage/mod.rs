mod config;

pub use config::{Config, ENV_BYPASS, ENV_LOOPS, ENV_PRECISION, ENV_THRESHOLD};

use std::path::PathBuf;

/// Overrides the configuration directory (used by tests and sandboxes).
pub const ENV_CONFIG_DIR: &str = "CMDTIME_CONFIG_DIR";

/// Returns `$CMDTIME_CONFIG_DIR` if set, otherwise `~/.config/cmdtime/`.
///
/// The directory is not created here; [`Config::save`] does that.
pub fn config_dir() -> PathBuf {
    if let Some(dir) = std::env::var_os(ENV_CONFIG_DIR).filter(|d| !d.is_empty()) {
        return PathBuf::from(dir);
    }
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".config")
        .join("cmdtime")
}
