//! QSO Predict common types, domain keys, and errors.
//!
//! This crate provides foundational types shared across qp-core modules:
//! - Strongly typed dataset keys (bands, months, SFI ranges)
//! - Common error types with stable codes
//! - Output format specifications
//! - Dataset schema versioning

pub mod error;
pub mod keys;
pub mod output;
pub mod schema;

pub use error::{Error, Result};
pub use keys::{Band, MonthKey, SfiRange};
pub use output::OutputFormat;
pub use schema::{ALLOWED_INTERVAL_SIZES, SCHEMA_VERSION, SFI_CEILING};
