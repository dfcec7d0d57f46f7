//! QSO Predict configuration loading and validation.
//!
//! This crate provides:
//! - Typed Rust structs for settings.json
//! - Config resolution (CLI → env → XDG → system → defaults)
//! - Semantic validation
//! - Config snapshots embedded in reports for reproducibility

pub mod resolve;
pub mod settings;
pub mod snapshot;
pub mod validate;

pub use resolve::{resolve_config, resolve_dataset, ConfigPaths, ConfigSource};
pub use settings::{Settings, DEFAULT_DATASET_FILENAME, OVERLAPPING_LOW_BUCKET_INDEX};
pub use snapshot::ConfigSnapshot;
pub use validate::{validate_settings, Severity, ValidationIssue, ValidationResult};

/// Schema version for configuration files.
pub const CONFIG_SCHEMA_VERSION: &str = "1.0.0";
