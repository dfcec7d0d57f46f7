//! Configuration resolution and path discovery.
//!
//! Resolution order: CLI arguments → environment variables → XDG paths →
//! system config → defaults.

use std::path::{Path, PathBuf};

use crate::settings::DEFAULT_DATASET_FILENAME;

/// Discovered configuration file paths.
#[derive(Debug, Clone, Default)]
pub struct ConfigPaths {
    /// Path to settings.json (or None if not found).
    pub settings: Option<PathBuf>,

    /// Source of the settings config (for diagnostics).
    pub settings_source: ConfigSource,
}

/// Where a configuration file was found.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ConfigSource {
    /// Explicitly provided via CLI argument.
    CliArgument,

    /// Set via environment variable.
    Environment,

    /// Found in XDG config directory.
    XdgConfig,

    /// Found in /etc/qso-predict/.
    SystemConfig,

    /// Taken from the settings file.
    SettingsFile,

    /// Using built-in defaults.
    #[default]
    BuiltinDefault,
}

impl std::fmt::Display for ConfigSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigSource::CliArgument => write!(f, "CLI argument"),
            ConfigSource::Environment => write!(f, "environment variable"),
            ConfigSource::XdgConfig => write!(f, "XDG config"),
            ConfigSource::SystemConfig => write!(f, "system config"),
            ConfigSource::SettingsFile => write!(f, "settings file"),
            ConfigSource::BuiltinDefault => write!(f, "builtin default"),
        }
    }
}

/// Environment variable names.
const ENV_SETTINGS_PATH: &str = "QP_SETTINGS";
const ENV_CONFIG_DIR: &str = "QP_CONFIG_DIR";
const ENV_DATASET_PATH: &str = "QP_DATASET";

/// Standard config file name.
const SETTINGS_FILENAME: &str = "settings.json";

/// Application name for XDG directories.
const APP_NAME: &str = "qso-predict";

/// Resolve the settings file path using the standard resolution order.
///
/// Resolution order:
/// 1. Explicit CLI path (if provided)
/// 2. QP_SETTINGS environment variable
/// 3. QP_CONFIG_DIR environment variable + filename
/// 4. XDG config directory (~/.config/qso-predict/)
/// 5. System config (/etc/qso-predict/)
/// 6. Built-in defaults (None)
pub fn resolve_config(cli_settings: Option<&Path>) -> ConfigPaths {
    let mut paths = ConfigPaths::default();

    // 1. CLI argument
    if let Some(path) = cli_settings {
        if path.exists() {
            paths.settings = Some(path.to_path_buf());
            paths.settings_source = ConfigSource::CliArgument;
            return paths;
        }
    }

    // 2. Environment variable (direct path)
    if let Ok(env_path) = std::env::var(ENV_SETTINGS_PATH) {
        let path = PathBuf::from(env_path);
        if path.exists() {
            paths.settings = Some(path);
            paths.settings_source = ConfigSource::Environment;
            return paths;
        }
    }

    // 3. Environment variable (config dir)
    if let Ok(config_dir) = std::env::var(ENV_CONFIG_DIR) {
        let path = PathBuf::from(config_dir).join(SETTINGS_FILENAME);
        if path.exists() {
            paths.settings = Some(path);
            paths.settings_source = ConfigSource::Environment;
            return paths;
        }
    }

    // 4. XDG config directory
    if let Some(xdg_config) = dirs::config_dir() {
        let path = xdg_config.join(APP_NAME).join(SETTINGS_FILENAME);
        if path.exists() {
            paths.settings = Some(path);
            paths.settings_source = ConfigSource::XdgConfig;
            return paths;
        }
    }

    // 5. System config
    let system_path = PathBuf::from("/etc").join(APP_NAME).join(SETTINGS_FILENAME);
    if system_path.exists() {
        paths.settings = Some(system_path);
        paths.settings_source = ConfigSource::SystemConfig;
        return paths;
    }

    // 6. Built-in default (None)
    paths
}

/// Resolve the dataset path.
///
/// Resolution order: CLI argument → QP_DATASET → settings.json value →
/// `qso_data_dump.json` in the working directory (the scraper's default
/// output name). The returned path may not exist; the loader reports that
/// as a dataset-not-found error.
pub fn resolve_dataset(
    cli_dataset: Option<&Path>,
    settings_dataset: Option<&Path>,
) -> (PathBuf, ConfigSource) {
    if let Some(path) = cli_dataset {
        return (path.to_path_buf(), ConfigSource::CliArgument);
    }

    if let Ok(env_path) = std::env::var(ENV_DATASET_PATH) {
        return (PathBuf::from(env_path), ConfigSource::Environment);
    }

    if let Some(path) = settings_dataset {
        return (path.to_path_buf(), ConfigSource::SettingsFile);
    }

    (
        PathBuf::from(DEFAULT_DATASET_FILENAME),
        ConfigSource::BuiltinDefault,
    )
}

/// Get the XDG config directory for qso-predict.
pub fn xdg_config_dir() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join(APP_NAME))
}

/// Get the system config directory.
pub fn system_config_dir() -> PathBuf {
    PathBuf::from("/etc").join(APP_NAME)
}
