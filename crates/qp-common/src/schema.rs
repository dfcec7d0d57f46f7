//! Dataset schema constants.

/// Schema version for the QSO dataset snapshot and report envelopes.
pub const SCHEMA_VERSION: &str = "1.0.0";

/// Upper bound of the SFI axis covered by the dataset buckets.
pub const SFI_CEILING: u16 = 300;

/// Interval sizes the propagation report source accepts.
///
/// The scraper can only request these widths, so a valid dataset's range
/// list is (0,s),(s,2s),...,(300-s,300) for one of these values of s.
pub const ALLOWED_INTERVAL_SIZES: [u16; 6] = [20, 25, 30, 50, 60, 100];
