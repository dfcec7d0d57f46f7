//! Typed settings for QSO Predict.

use qp_common::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Default dataset filename, matching what the scraper produces.
pub const DEFAULT_DATASET_FILENAME: &str = "qso_data_dump.json";

/// Default URL for the live solar-conditions page.
pub const DEFAULT_SFI_SOURCE_URL: &str = "https://www.wm7d.net/hamradio/solar/";

/// Index (in ascending range order) of the low-end SFI bucket dropped before
/// fitting trends.
///
/// The two lowest buckets overlap in effect: the scraper's first bucket is
/// requested with no lower limit, so it already absorbs the flux values the
/// second bucket nominally covers. The trend fit therefore drops the second
/// label and keeps the rest. The exact bucket to exclude should be
/// re-confirmed against a live snapshot before changing this.
pub const OVERLAPPING_LOW_BUCKET_INDEX: usize = 1;

/// Settings for the recommendation engine, loaded from settings.json.
///
/// Every field has a default, so a missing settings file is equivalent to an
/// empty object.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Settings {
    /// Dataset path override. CLI and QP_DATASET take precedence.
    pub dataset: Option<PathBuf>,

    /// SFI bucket width the dataset was scraped with.
    pub sfi_interval: u16,

    /// Default ± hour tolerance for the time-window filter.
    pub default_tolerance: u8,

    /// Default number of destination recommendations to return.
    pub default_top: usize,

    /// Whether recommendations average adjacent SFI buckets by default.
    pub smoothing: bool,

    /// Whether trend fits drop the overlapping low-end bucket.
    pub drop_overlap_bucket: bool,

    /// Live solar-conditions page to scrape the current SFI from.
    pub sfi_source_url: String,
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            dataset: None,
            sfi_interval: 20,
            default_tolerance: 1,
            default_top: 10,
            smoothing: true,
            drop_overlap_bucket: true,
            sfi_source_url: DEFAULT_SFI_SOURCE_URL.to_string(),
        }
    }
}

impl Settings {
    /// Load settings from a JSON file.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            Error::Config(format!("cannot read settings {}: {e}", path.display()))
        })?;
        Self::from_json(&content)
    }

    /// Parse settings from a JSON string.
    pub fn from_json(content: &str) -> Result<Self> {
        serde_json::from_str(content).map_err(|e| Error::InvalidSettings(e.to_string()))
    }

    /// Serialize settings to pretty JSON.
    pub fn to_json_pretty(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}
