//! Error types for QSO Predict.
//!
//! This module provides structured error handling with:
//! - Stable error codes for machine parsing
//! - Category classification for error grouping
//! - Recoverability hints for automation
//! - Remediation suggestions for humans
//!
//! # Human-Facing Output
//!
//! Errors can be formatted for human consumption with headline, reason, and fix:
//! ```text
//! ✗ Dataset Not Found
//!   Reason: dataset not found: qso_data_dump.json
//!   Fix: Point --dataset (or QP_DATASET) at a scraped snapshot ...
//! ```
//!
//! # Machine-Facing Output
//!
//! Errors serialize to structured JSON:
//! ```json
//! {
//!   "code": 30,
//!   "category": "analysis",
//!   "message": "SFI value 412 is outside every dataset bucket",
//!   "recoverable": true,
//!   "context": { "sfi": 412 }
//! }
//! ```

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use thiserror::Error;

/// Result type alias for QSO Predict operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error categories for grouping related errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCategory {
    /// Settings file and resolution errors.
    Config,
    /// Dataset loading and schema errors.
    Dataset,
    /// Aggregation, significance, and trend computation errors.
    Analysis,
    /// Live solar-conditions fetch errors.
    Conditions,
    /// File I/O and serialization errors.
    Io,
}

impl std::fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ErrorCategory::Config => write!(f, "config"),
            ErrorCategory::Dataset => write!(f, "dataset"),
            ErrorCategory::Analysis => write!(f, "analysis"),
            ErrorCategory::Conditions => write!(f, "conditions"),
            ErrorCategory::Io => write!(f, "io"),
        }
    }
}

/// Unified error type for QSO Predict.
#[derive(Error, Debug)]
pub enum Error {
    // Configuration errors (10-19)
    #[error("configuration error: {0}")]
    Config(String),

    #[error("invalid settings file: {0}")]
    InvalidSettings(String),

    // Dataset errors (20-29)
    #[error("dataset not found: {path}")]
    DatasetNotFound { path: String },

    #[error("invalid dataset: {0}")]
    DatasetInvalid(String),

    #[error("dataset key not found at {level} level: {key:?}")]
    KeyNotFound { level: &'static str, key: String },

    // Analysis errors (30-39)
    #[error("SFI value {sfi} is outside every dataset bucket")]
    SfiOutOfRange { sfi: i64 },

    #[error("not enough SFI ranges for a trend fit: {points} usable point(s)")]
    InsufficientSeries { points: usize },

    // Conditions errors (40-49)
    #[error("live SFI fetch failed: {0}")]
    SfiFetch(String),

    #[error("could not locate the solar flux index on the conditions page: {0}")]
    SfiParse(String),

    #[error("no SFI value available (fetch failed and no manual value supplied)")]
    SfiUnavailable,

    // I/O errors (60-69)
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

impl Error {
    /// Returns the error code for this error type.
    ///
    /// Error codes are stable and grouped by category:
    /// - 10-19: Configuration errors
    /// - 20-29: Dataset errors
    /// - 30-39: Analysis errors
    /// - 40-49: Conditions errors
    /// - 60-69: I/O errors
    pub fn code(&self) -> u32 {
        match self {
            Error::Config(_) => 10,
            Error::InvalidSettings(_) => 11,
            Error::DatasetNotFound { .. } => 20,
            Error::DatasetInvalid(_) => 21,
            Error::KeyNotFound { .. } => 22,
            Error::SfiOutOfRange { .. } => 30,
            Error::InsufficientSeries { .. } => 31,
            Error::SfiFetch(_) => 40,
            Error::SfiParse(_) => 41,
            Error::SfiUnavailable => 42,
            Error::Io(_) => 60,
            Error::Json(_) => 61,
        }
    }

    /// Returns the error category for grouping and filtering.
    pub fn category(&self) -> ErrorCategory {
        match self {
            Error::Config(_) | Error::InvalidSettings(_) => ErrorCategory::Config,

            Error::DatasetNotFound { .. } | Error::DatasetInvalid(_) | Error::KeyNotFound { .. } => {
                ErrorCategory::Dataset
            }

            Error::SfiOutOfRange { .. } | Error::InsufficientSeries { .. } => {
                ErrorCategory::Analysis
            }

            Error::SfiFetch(_) | Error::SfiParse(_) | Error::SfiUnavailable => {
                ErrorCategory::Conditions
            }

            Error::Io(_) | Error::Json(_) => ErrorCategory::Io,
        }
    }

    /// Returns whether this error is potentially recoverable by user action.
    pub fn is_recoverable(&self) -> bool {
        match self {
            // Config errors: recoverable by fixing/resetting settings
            Error::Config(_) => true,
            Error::InvalidSettings(_) => true,

            // Dataset: pointing at the right file recovers; a corrupt tree
            // needs a re-scrape
            Error::DatasetNotFound { .. } => true,
            Error::DatasetInvalid(_) => false,
            Error::KeyNotFound { .. } => false,

            // Analysis: a different query may succeed
            Error::SfiOutOfRange { .. } => true,
            Error::InsufficientSeries { .. } => false,

            // Conditions: transient, or recoverable via manual entry
            Error::SfiFetch(_) => true,
            Error::SfiParse(_) => true,
            Error::SfiUnavailable => true,

            // I/O: often transient
            Error::Io(_) => true,
            Error::Json(_) => true,
        }
    }

    /// Returns a human-readable remediation hint.
    pub fn remediation(&self) -> &'static str {
        match self {
            Error::Config(_) => {
                "Run 'qp-core check' to validate configuration, or check syntax in settings.json."
            }
            Error::InvalidSettings(_) => {
                "Fix settings.json (see 'qp-core check'), or delete it to fall back to defaults."
            }

            Error::DatasetNotFound { .. } => {
                "Point --dataset (or QP_DATASET) at a scraped snapshot, or run the scraper to produce qso_data_dump.json."
            }
            Error::DatasetInvalid(_) => {
                "The snapshot does not match the expected schema. Re-run the scraper to produce a fresh dump."
            }
            Error::KeyNotFound { .. } => {
                "The dataset is missing a key the query expects. Verify --band/--month against 'qp-core check', or re-scrape."
            }

            Error::SfiOutOfRange { .. } => {
                "SFI must lie within the dataset's bucket bounds (0 to the top bucket). Check the value passed via --sfi."
            }
            Error::InsufficientSeries { .. } => {
                "The dataset has too few SFI ranges for a regression. Scrape with a smaller interval size."
            }

            Error::SfiFetch(_) => {
                "The solar-conditions site may be updating. Retry, or pass the value manually with --sfi."
            }
            Error::SfiParse(_) => {
                "The conditions page layout may have changed. Pass the value manually with --sfi."
            }
            Error::SfiUnavailable => {
                "Pass the current solar flux index explicitly with --sfi <value>."
            }

            Error::Io(_) => {
                "Check disk space, permissions, and that config directories exist. Retry the operation."
            }
            Error::Json(_) => {
                "Invalid JSON in file. Check syntax with 'cat <file> | jq .' or restore from backup."
            }
        }
    }

    /// Returns a short headline for human-readable output.
    pub fn headline(&self) -> &'static str {
        match self {
            Error::Config(_) => "Configuration Error",
            Error::InvalidSettings(_) => "Invalid Settings",

            Error::DatasetNotFound { .. } => "Dataset Not Found",
            Error::DatasetInvalid(_) => "Invalid Dataset",
            Error::KeyNotFound { .. } => "Dataset Key Not Found",

            Error::SfiOutOfRange { .. } => "SFI Out of Range",
            Error::InsufficientSeries { .. } => "Insufficient Data for Trend",

            Error::SfiFetch(_) => "Live SFI Fetch Failed",
            Error::SfiParse(_) => "Conditions Page Not Understood",
            Error::SfiUnavailable => "No SFI Value Available",

            Error::Io(_) => "I/O Error",
            Error::Json(_) => "JSON Parse Error",
        }
    }
}

/// Structured error response for JSON output.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StructuredError {
    /// Stable error code.
    pub code: u32,

    /// Error category for grouping.
    pub category: ErrorCategory,

    /// Human-readable error message.
    pub message: String,

    /// Whether the error is potentially recoverable.
    pub recoverable: bool,

    /// Additional structured context (e.g., path, key, sfi).
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub context: HashMap<String, serde_json::Value>,
}

impl From<&Error> for StructuredError {
    fn from(err: &Error) -> Self {
        let mut context = HashMap::new();

        match err {
            Error::DatasetNotFound { path } => {
                context.insert("path".to_string(), serde_json::json!(path));
            }
            Error::KeyNotFound { level, key } => {
                context.insert("level".to_string(), serde_json::json!(level));
                context.insert("key".to_string(), serde_json::json!(key));
            }
            Error::SfiOutOfRange { sfi } => {
                context.insert("sfi".to_string(), serde_json::json!(sfi));
            }
            Error::InsufficientSeries { points } => {
                context.insert("points".to_string(), serde_json::json!(points));
            }
            _ => {}
        }

        StructuredError {
            code: err.code(),
            category: err.category(),
            message: err.to_string(),
            recoverable: err.is_recoverable(),
            context,
        }
    }
}

impl StructuredError {
    /// Serialize to JSON string.
    pub fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_else(|_| {
            format!(r#"{{"code":{},"error":"serialization_failed"}}"#, self.code)
        })
    }

    /// Serialize to pretty JSON string.
    pub fn to_json_pretty(&self) -> String {
        serde_json::to_string_pretty(self).unwrap_or_else(|_| self.to_json())
    }
}

/// Format an error for human-readable stderr output.
///
/// Output format:
/// ```text
/// ✗ [Headline]
///   Reason: [Error message]
///   Fix: [Remediation hint]
/// ```
pub fn format_error_human(err: &Error, use_color: bool) -> String {
    let (red, cyan, reset) = if use_color {
        ("\x1b[31m", "\x1b[36m", "\x1b[0m")
    } else {
        ("", "", "")
    };

    format!(
        "{red}✗{reset} {headline}\n  Reason: {message}\n  {cyan}Fix:{reset} {remediation}",
        red = red,
        cyan = cyan,
        reset = reset,
        headline = err.headline(),
        message = err,
        remediation = err.remediation()
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_code() {
        assert_eq!(Error::Config("test".into()).code(), 10);
        assert_eq!(
            Error::DatasetNotFound {
                path: "x.json".into()
            }
            .code(),
            20
        );
        assert_eq!(Error::SfiOutOfRange { sfi: 400 }.code(), 30);
        assert_eq!(Error::SfiUnavailable.code(), 42);
    }

    #[test]
    fn test_error_category() {
        assert_eq!(
            Error::InvalidSettings("test".into()).category(),
            ErrorCategory::Config
        );
        assert_eq!(
            Error::KeyNotFound {
                level: "band",
                key: "11".into()
            }
            .category(),
            ErrorCategory::Dataset
        );
        assert_eq!(
            Error::SfiFetch("timeout".into()).category(),
            ErrorCategory::Conditions
        );
    }

    #[test]
    fn test_error_recoverable() {
        assert!(Error::Config("test".into()).is_recoverable());
        assert!(Error::SfiFetch("timeout".into()).is_recoverable());
        assert!(!Error::DatasetInvalid("bad".into()).is_recoverable());
        assert!(!Error::KeyNotFound {
            level: "destination",
            key: "Atlantis".into()
        }
        .is_recoverable());
    }

    #[test]
    fn test_structured_error_from_error() {
        let err = Error::SfiOutOfRange { sfi: 412 };
        let structured = StructuredError::from(&err);

        assert_eq!(structured.code, 30);
        assert_eq!(structured.category, ErrorCategory::Analysis);
        assert!(structured.recoverable);
        assert_eq!(structured.context.get("sfi"), Some(&serde_json::json!(412)));
    }

    #[test]
    fn test_structured_error_json() {
        let err = Error::KeyNotFound {
            level: "band",
            key: "11".into(),
        };
        let json = StructuredError::from(&err).to_json();

        assert!(json.contains(r#""code":22"#));
        assert!(json.contains(r#""category":"dataset""#));
        assert!(json.contains(r#""recoverable":false"#));
    }

    #[test]
    fn test_format_error_human() {
        let err = Error::DatasetNotFound {
            path: "qso_data_dump.json".into(),
        };
        let formatted = format_error_human(&err, false);

        assert!(formatted.contains("Dataset Not Found"));
        assert!(formatted.contains("qso_data_dump.json"));
        assert!(formatted.contains("--dataset"));
    }

    #[test]
    fn test_error_category_display() {
        assert_eq!(ErrorCategory::Dataset.to_string(), "dataset");
        assert_eq!(ErrorCategory::Conditions.to_string(), "conditions");
    }
}
