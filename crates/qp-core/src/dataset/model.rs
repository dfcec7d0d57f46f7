//! Typed in-memory model of the frequency table.

use qp_common::{Band, MonthKey, SfiRange};
use std::collections::HashMap;

/// QSO counts for one (destination, month, range, band) quadruple, indexed by
/// hour-of-day. Hours absent from the source charts are recorded as zero, so
/// all 24 slots are always meaningful.
pub type HourCounts = [u64; 24];

/// An immutable snapshot of scraped QSO statistics.
///
/// Key orders are canonical: destinations and bands follow the order of the
/// JSON document (which is why order-preserving JSON maps are enabled),
/// ranges ascend by lower bound. Every destination carries the same months,
/// every month the same ranges, every range the same bands; the loader
/// rejects anything else.
#[derive(Debug, Clone)]
pub struct QsoDataset {
    pub(crate) destinations: Vec<String>,
    pub(crate) months: Vec<MonthKey>,
    pub(crate) ranges: Vec<SfiRange>,
    pub(crate) bands: Vec<Band>,
    #[allow(clippy::type_complexity)]
    pub(crate) counts:
        HashMap<String, HashMap<MonthKey, HashMap<SfiRange, HashMap<Band, HourCounts>>>>,
}

impl QsoDataset {
    /// Destination labels in canonical (document) order.
    pub fn destinations(&self) -> &[String] {
        &self.destinations
    }

    /// Month keys in canonical (document) order.
    pub fn months(&self) -> &[MonthKey] {
        &self.months
    }

    /// SFI ranges in ascending order.
    pub fn ranges(&self) -> &[SfiRange] {
        &self.ranges
    }

    /// Band labels in canonical (document) order.
    pub fn bands(&self) -> &[Band] {
        &self.bands
    }

    /// Width of the SFI buckets.
    pub fn interval_size(&self) -> u16 {
        self.ranges.first().map(SfiRange::width).unwrap_or(0)
    }

    /// Upper bound of the highest bucket.
    pub fn covered_to(&self) -> u16 {
        self.ranges.last().map(|r| r.high).unwrap_or(0)
    }

    /// Total QSO count across every leaf of the table.
    pub fn grand_total(&self) -> u64 {
        self.counts
            .values()
            .flat_map(|months| months.values())
            .flat_map(|ranges| ranges.values())
            .flat_map(|bands| bands.values())
            .flat_map(|hours| hours.iter())
            .sum()
    }
}
