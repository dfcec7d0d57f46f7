//! QSO Predict core — aggregation and recommendation engine.
//!
//! Turns a scraped QSO frequency table (destination → month → SFI range →
//! band → hour-of-day counts) into actionable answers: which destinations
//! are worth calling on a band right now, and which bands carry the most
//! traffic, given the current solar flux index and time of day.
//!
//! Pipeline: dataset → masked tree summation → significance ratios →
//! {trend fits for display, range-smoothed rankings for recommendations},
//! with the time-window filter supplying the hour mask.

pub mod aggregate;
pub mod conditions;
pub mod dataset;
pub mod exit_codes;
pub mod logging;
pub mod output;
pub mod recommend;
pub mod significance;
pub mod trend;
pub mod window;

pub use aggregate::{KeyFilter, Mask};
pub use conditions::{fetch_current_sfi, resolve_sfi, SfiSource};
pub use dataset::{load_dataset, parse_dataset, QsoDataset};
pub use exit_codes::ExitCode;
pub use recommend::{best_bands, best_destinations, Conditions, Recommendation};
pub use significance::{band_significance, destination_significance, SignificanceTable};
pub use trend::{compute_trends, TrendTable};
pub use window::hours_near;
