//! The QSO frequency table: model, loading, and validation.
//!
//! The dataset is a fixed-depth nested table produced by the propagation
//! scraper: destination → month → SFI range → band → hour-of-day → count.
//! It is loaded once, validated eagerly, and treated as immutable for the
//! lifetime of the process.

pub mod load;
pub mod model;

#[cfg(test)]
pub(crate) mod testdata;

pub use load::{load_dataset, parse_dataset};
pub use model::{HourCounts, QsoDataset};
