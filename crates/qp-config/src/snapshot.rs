//! Configuration snapshots for reports and reproducibility.
//!
//! A snapshot captures the exact configuration state a query ran with,
//! allowing a recommendation to be audited and reproduced later.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::path::Path;

use crate::resolve::{ConfigPaths, ConfigSource};
use crate::settings::Settings;

/// A frozen snapshot of configuration state.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConfigSnapshot {
    /// When this snapshot was taken.
    pub timestamp: DateTime<Utc>,

    /// Schema version of the configuration.
    pub schema_version: String,

    /// Path where settings were loaded from.
    #[serde(default)]
    pub settings_path: Option<String>,

    /// Source of the settings configuration.
    pub settings_source: String,

    /// SHA-256 hash of the settings JSON content.
    #[serde(default)]
    pub settings_hash: Option<String>,

    /// Path the dataset was loaded from.
    pub dataset_path: String,

    /// Source of the dataset path.
    pub dataset_source: String,

    /// Key configuration values for quick reference.
    pub summary: SettingsSummary,
}

/// Summary of key configuration values.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SettingsSummary {
    pub sfi_interval: u16,
    pub default_tolerance: u8,
    pub default_top: usize,
    pub smoothing: bool,
    pub drop_overlap_bucket: bool,
    pub sfi_source_url: String,
}

impl ConfigSnapshot {
    /// Create a new snapshot from loaded configuration.
    pub fn new(
        settings: &Settings,
        settings_json: Option<&str>,
        paths: &ConfigPaths,
        dataset_path: &Path,
        dataset_source: ConfigSource,
    ) -> Self {
        ConfigSnapshot {
            timestamp: Utc::now(),
            schema_version: crate::CONFIG_SCHEMA_VERSION.to_string(),
            settings_path: paths
                .settings
                .as_ref()
                .map(|p| p.display().to_string()),
            settings_source: paths.settings_source.to_string(),
            settings_hash: settings_json.map(hash_content),
            dataset_path: dataset_path.display().to_string(),
            dataset_source: dataset_source.to_string(),
            summary: SettingsSummary {
                sfi_interval: settings.sfi_interval,
                default_tolerance: settings.default_tolerance,
                default_top: settings.default_top,
                smoothing: settings.smoothing,
                drop_overlap_bucket: settings.drop_overlap_bucket,
                sfi_source_url: settings.sfi_source_url.clone(),
            },
        }
    }
}

/// SHA-256 hash of file content, hex-encoded.
fn hash_content(content: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(content.as_bytes());
    let digest = hasher.finalize();
    digest.iter().map(|b| format!("{b:02x}")).collect()
}
