//! TOML-based application configuration.
//!
//! Stores:
//! - Report threshold (seconds, `always` or `never`)
//! - Decimal precision of the elapsed-time display
//! - Calibration loop count
//! - The "show last" command name
//! - Session-mode options (prompt command, shell program)
//!
//! Configuration is stored at `~/.config/cmdtime/config.toml`. A handful of
//! environment variables override the file so shell users can tune the
//! hooks without editing it.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use tracing::warn;

use super::config_dir;
use crate::error::ConfigError;
use crate::timer::{Threshold, TimerSettings, DEFAULT_BYPASS_COMMAND};

pub const ENV_THRESHOLD: &str = "CMDTIME_THRESHOLD";
pub const ENV_PRECISION: &str = "CMDTIME_PRECISION";
pub const ENV_LOOPS: &str = "CMDTIME_LOOPS";
pub const ENV_BYPASS: &str = "CMDTIME_BYPASS";

/// Application configuration.
///
/// Serialized to/from TOML at `~/.config/cmdtime/config.toml`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub threshold: Threshold,
    #[serde(default = "default_precision")]
    pub precision: u8,
    #[serde(default = "default_calibration_loops")]
    pub calibration_loops: u32,
    #[serde(default = "default_bypass_command")]
    pub bypass_command: String,
    /// Evaluated before every prompt in session mode, untimed.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prompt_command: Option<String>,
    /// Program used to run lines in session mode. Falls back to `$SHELL`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub shell: Option<String>,
}

// Default functions
fn default_precision() -> u8 {
    3
}
fn default_calibration_loops() -> u32 {
    5
}
fn default_bypass_command() -> String {
    DEFAULT_BYPASS_COMMAND.into()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            threshold: Threshold::default(),
            precision: default_precision(),
            calibration_loops: default_calibration_loops(),
            bypass_command: default_bypass_command(),
            prompt_command: None,
            shell: None,
        }
    }
}

impl Config {
    fn get_json_value_by_path<'a>(
        root: &'a serde_json::Value,
        key: &str,
    ) -> Option<&'a serde_json::Value> {
        if key.is_empty() {
            return None;
        }

        let mut current = root;
        for part in key.split('.') {
            current = current.get(part)?;
        }
        Some(current)
    }

    fn set_json_value_by_path(
        root: &mut serde_json::Value,
        key: &str,
        value: &str,
    ) -> Result<(), ConfigError> {
        let unknown = || ConfigError::UnknownKey(key.to_string());
        let invalid = |message: String| ConfigError::InvalidValue {
            key: key.to_string(),
            message,
        };

        let obj = root.as_object_mut().ok_or_else(unknown)?;
        if key.is_empty() || key.contains('.') {
            return Err(unknown());
        }
        if !Self::known_keys().contains(&key) {
            return Err(unknown());
        }

        let new_value = match obj.get(key) {
            Some(serde_json::Value::Number(_)) if key != "threshold" => {
                let n = value
                    .parse::<u64>()
                    .map_err(|_| invalid(format!("cannot parse '{value}' as number")))?;
                serde_json::Value::Number(n.into())
            }
            _ if key == "threshold" => {
                // Validate now so a bad value never reaches the file.
                let t: Threshold = value.parse()?;
                serde_json::to_value(t).map_err(|e| invalid(e.to_string()))?
            }
            _ => serde_json::Value::String(value.into()),
        };

        obj.insert(key.to_string(), new_value);
        Ok(())
    }

    /// Keys accepted by [`get`](Self::get) and [`set`](Self::set).
    pub fn known_keys() -> &'static [&'static str] {
        &[
            "threshold",
            "precision",
            "calibration_loops",
            "bypass_command",
            "prompt_command",
            "shell",
        ]
    }

    /// Path of the config file.
    pub fn path() -> PathBuf {
        config_dir().join("config.toml")
    }

    /// Load from disk, or defaults when the file does not exist.
    /// Environment overrides are not applied; see [`load_with_env`](Self::load_with_env).
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read or parsed.
    pub fn load() -> Result<Self, ConfigError> {
        let path = Self::path();
        match std::fs::read_to_string(&path) {
            Ok(content) => toml::from_str(&content).map_err(|e| ConfigError::LoadFailed {
                path,
                message: e.to_string(),
            }),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(Self::default()),
            Err(e) => Err(ConfigError::LoadFailed {
                path,
                message: e.to_string(),
            }),
        }
    }

    /// Load from disk, then apply `CMDTIME_*` environment overrides.
    pub fn load_with_env() -> Result<Self, ConfigError> {
        let mut cfg = Self::load()?;
        cfg.apply_env(|name| std::env::var(name).ok());
        Ok(cfg)
    }

    /// Load from disk, returning default on error.
    /// This is a convenience method that never fails.
    pub fn load_or_default() -> Self {
        match Self::load_with_env() {
            Ok(cfg) => cfg,
            Err(e) => {
                warn!(error = %e, "using default configuration");
                let mut cfg = Self::default();
                cfg.apply_env(|name| std::env::var(name).ok());
                cfg
            }
        }
    }

    /// Apply overrides from a variable lookup. Invalid values are logged
    /// and ignored.
    pub fn apply_env<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(v) = lookup(ENV_THRESHOLD) {
            match v.parse::<Threshold>() {
                Ok(t) => self.threshold = t,
                Err(e) => warn!(var = ENV_THRESHOLD, error = %e, "ignoring override"),
            }
        }
        if let Some(v) = lookup(ENV_PRECISION) {
            match v.trim().parse::<u8>() {
                Ok(p) => self.precision = p,
                Err(e) => warn!(var = ENV_PRECISION, error = %e, "ignoring override"),
            }
        }
        if let Some(v) = lookup(ENV_LOOPS) {
            match v.trim().parse::<u32>() {
                Ok(n) => self.calibration_loops = n,
                Err(e) => warn!(var = ENV_LOOPS, error = %e, "ignoring override"),
            }
        }
        if let Some(v) = lookup(ENV_BYPASS) {
            if v.trim().is_empty() {
                warn!(var = ENV_BYPASS, "ignoring empty override");
            } else {
                self.bypass_command = v.trim().to_string();
            }
        }
    }

    /// Persist to disk.
    ///
    /// # Errors
    ///
    /// Returns an error if the config cannot be serialized or written to disk.
    pub fn save(&self) -> Result<(), ConfigError> {
        let path = Self::path();
        let content = toml::to_string_pretty(self)?;
        let save_failed = |e: std::io::Error| ConfigError::SaveFailed {
            path: path.clone(),
            message: e.to_string(),
        };
        if let Some(dir) = path.parent() {
            std::fs::create_dir_all(dir).map_err(save_failed)?;
        }
        std::fs::write(&path, content).map_err(save_failed)
    }

    /// Get a config value as string by key.
    pub fn get(&self, key: &str) -> Option<String> {
        let json = serde_json::to_value(self).ok()?;
        let val = Self::get_json_value_by_path(&json, key)?;
        match val {
            serde_json::Value::String(s) => Some(s.clone()),
            other => Some(other.to_string()),
        }
    }

    /// Set a config value by key without saving.
    ///
    /// # Errors
    ///
    /// Returns an error if the key is unknown or the value cannot be parsed.
    pub fn set(&mut self, key: &str, value: &str) -> Result<(), ConfigError> {
        let mut json =
            serde_json::to_value(&*self).map_err(|e| ConfigError::ParseFailed(e.to_string()))?;
        Self::set_json_value_by_path(&mut json, key, value)?;
        *self = serde_json::from_value(json).map_err(|e| ConfigError::InvalidValue {
            key: key.to_string(),
            message: e.to_string(),
        })?;
        Ok(())
    }

    /// Normalised settings for the command timer.
    pub fn settings(&self) -> TimerSettings {
        TimerSettings {
            threshold: self.threshold,
            precision: self.precision,
            calibration_loops: self.calibration_loops,
            bypass_command: self.bypass_command.clone(),
        }
        .normalized()
    }
}
