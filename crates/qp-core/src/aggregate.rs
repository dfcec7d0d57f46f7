//! Masked summation over the frequency table.
//!
//! A [`Mask`] carries one filter per level of the table. An empty filter
//! (`KeyFilter::All`) admits every child at that level; a non-empty filter
//! restricts the walk to the named keys. Filtering by a key the table does
//! not hold is a hard error: a silent zero would be indistinguishable from a
//! legitimately empty bucket, and it usually means the query and the dataset
//! disagree about the schema.
//!
//! Every numerator and denominator in the significance calculations comes
//! from this one routine.

use qp_common::{Band, Error, MonthKey, Result, SfiRange};
use std::collections::BTreeSet;

use crate::dataset::model::HourCounts;
use crate::dataset::QsoDataset;

/// Per-level key filter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeyFilter<T: Ord> {
    /// Include every child at this level.
    All,
    /// Restrict to exactly these keys; each must exist.
    Only(BTreeSet<T>),
}

impl<T: Ord> KeyFilter<T> {
    /// Build a single-key filter.
    pub fn one(key: T) -> Self {
        KeyFilter::Only(BTreeSet::from_iter([key]))
    }

    /// Build a filter from any key collection.
    pub fn only(keys: impl IntoIterator<Item = T>) -> Self {
        KeyFilter::Only(keys.into_iter().collect())
    }

    pub fn is_all(&self) -> bool {
        matches!(self, KeyFilter::All)
    }
}

/// One filter per level of the frequency table.
#[derive(Debug, Clone)]
pub struct Mask {
    pub destinations: KeyFilter<String>,
    pub months: KeyFilter<MonthKey>,
    pub ranges: KeyFilter<SfiRange>,
    pub bands: KeyFilter<Band>,
    pub hours: KeyFilter<u8>,
}

impl Mask {
    /// The unrestricted mask: sums every leaf in the table.
    pub fn all() -> Self {
        Mask {
            destinations: KeyFilter::All,
            months: KeyFilter::All,
            ranges: KeyFilter::All,
            bands: KeyFilter::All,
            hours: KeyFilter::All,
        }
    }

    pub fn destination(mut self, dest: impl Into<String>) -> Self {
        self.destinations = KeyFilter::one(dest.into());
        self
    }

    pub fn month(mut self, month: MonthKey) -> Self {
        self.months = KeyFilter::one(month);
        self
    }

    pub fn range(mut self, range: SfiRange) -> Self {
        self.ranges = KeyFilter::one(range);
        self
    }

    pub fn band(mut self, band: Band) -> Self {
        self.bands = KeyFilter::one(band);
        self
    }

    pub fn hours(mut self, hours: KeyFilter<u8>) -> Self {
        self.hours = hours;
        self
    }
}

impl QsoDataset {
    /// Sum the leaf counts admitted by `mask`.
    ///
    /// The result is independent of traversal order (plain u64 addition).
    pub fn sum(&self, mask: &Mask) -> Result<u64> {
        let mut total = 0u64;
        match &mask.destinations {
            KeyFilter::All => {
                for months in self.counts.values() {
                    total += sum_months(months, mask)?;
                }
            }
            KeyFilter::Only(keys) => {
                for key in keys {
                    let months = self.counts.get(key).ok_or_else(|| Error::KeyNotFound {
                        level: "destination",
                        key: key.clone(),
                    })?;
                    total += sum_months(months, mask)?;
                }
            }
        }
        Ok(total)
    }
}

fn sum_months(
    months: &std::collections::HashMap<
        MonthKey,
        std::collections::HashMap<SfiRange, std::collections::HashMap<Band, HourCounts>>,
    >,
    mask: &Mask,
) -> Result<u64> {
    let mut total = 0u64;
    match &mask.months {
        KeyFilter::All => {
            for ranges in months.values() {
                total += sum_ranges(ranges, mask)?;
            }
        }
        KeyFilter::Only(keys) => {
            for key in keys {
                let ranges = months.get(key).ok_or_else(|| Error::KeyNotFound {
                    level: "month",
                    key: key.label().to_string(),
                })?;
                total += sum_ranges(ranges, mask)?;
            }
        }
    }
    Ok(total)
}

fn sum_ranges(
    ranges: &std::collections::HashMap<SfiRange, std::collections::HashMap<Band, HourCounts>>,
    mask: &Mask,
) -> Result<u64> {
    let mut total = 0u64;
    match &mask.ranges {
        KeyFilter::All => {
            for bands in ranges.values() {
                total += sum_bands(bands, mask)?;
            }
        }
        KeyFilter::Only(keys) => {
            for key in keys {
                let bands = ranges.get(key).ok_or_else(|| Error::KeyNotFound {
                    level: "sfi-range",
                    key: key.label(),
                })?;
                total += sum_bands(bands, mask)?;
            }
        }
    }
    Ok(total)
}

fn sum_bands(
    bands: &std::collections::HashMap<Band, HourCounts>,
    mask: &Mask,
) -> Result<u64> {
    let mut total = 0u64;
    match &mask.bands {
        KeyFilter::All => {
            for hours in bands.values() {
                total += sum_hours(hours, mask)?;
            }
        }
        KeyFilter::Only(keys) => {
            for key in keys {
                let hours = bands.get(key).ok_or_else(|| Error::KeyNotFound {
                    level: "band",
                    key: key.key(),
                })?;
                total += sum_hours(hours, mask)?;
            }
        }
    }
    Ok(total)
}

fn sum_hours(hours: &HourCounts, mask: &Mask) -> Result<u64> {
    match &mask.hours {
        KeyFilter::All => Ok(hours.iter().sum()),
        KeyFilter::Only(keys) => {
            let mut total = 0u64;
            for &hour in keys {
                if usize::from(hour) >= hours.len() {
                    return Err(Error::KeyNotFound {
                        level: "hour",
                        key: hour.to_string(),
                    });
                }
                total += hours[usize::from(hour)];
            }
            Ok(total)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::{parse_dataset, testdata};

    #[test]
    fn unrestricted_mask_is_grand_total() {
        let ds = parse_dataset(&testdata::three_range_json()).unwrap();
        assert_eq!(ds.sum(&Mask::all()).unwrap(), ds.grand_total());
        assert_eq!(ds.grand_total(), 220);
    }

    #[test]
    fn single_destination_sum() {
        let ds = parse_dataset(&testdata::minimal_json()).unwrap();
        let mask = Mask::all().destination("Japan");
        assert_eq!(ds.sum(&mask).unwrap(), 10);
    }

    #[test]
    fn range_and_band_filters_compose() {
        let ds = parse_dataset(&testdata::three_range_json()).unwrap();
        let mask = Mask::all()
            .month(MonthKey::All)
            .range(SfiRange { low: 20, high: 40 })
            .band(Band(10));
        assert_eq!(ds.sum(&mask).unwrap(), 80);
    }

    #[test]
    fn hour_filter_restricts_leaves() {
        let ds = parse_dataset(&testdata::monthly_json()).unwrap();
        let mask = Mask::all()
            .month(MonthKey::Month(1))
            .hours(KeyFilter::only([3u8]));
        assert_eq!(ds.sum(&mask).unwrap(), 8);

        let everything_in_january = Mask::all().month(MonthKey::Month(1));
        assert_eq!(ds.sum(&everything_in_january).unwrap(), 32);
    }

    #[test]
    fn multi_key_filters_add_up() {
        let ds = parse_dataset(&testdata::minimal_json()).unwrap();
        let mask = Mask {
            destinations: KeyFilter::only(["Japan".to_string(), "Brazil".to_string()]),
            ..Mask::all()
        };
        assert_eq!(ds.sum(&mask).unwrap(), 40);
    }

    #[test]
    fn sums_are_invariant_under_sibling_reordering() {
        // The same table with destinations and ranges stored in a different
        // document order must produce identical sums.
        let forward = parse_dataset(&testdata::three_range_json()).unwrap();
        let mut reordered = serde_json::Map::new();
        let original: serde_json::Value =
            serde_json::from_str(&testdata::three_range_json()).unwrap();
        for dest in ["Brazil", "Japan"] {
            reordered.insert(dest.to_string(), original[dest].clone());
        }
        let shuffled = parse_dataset(&serde_json::Value::Object(reordered).to_string()).unwrap();

        assert_eq!(
            forward.sum(&Mask::all()).unwrap(),
            shuffled.sum(&Mask::all()).unwrap()
        );
        let mask = Mask::all()
            .month(MonthKey::All)
            .range(SfiRange { low: 20, high: 40 })
            .band(Band(10));
        assert_eq!(
            forward.sum(&mask).unwrap(),
            shuffled.sum(&mask).unwrap()
        );
    }

    #[test]
    fn missing_destination_is_a_hard_error() {
        let ds = parse_dataset(&testdata::minimal_json()).unwrap();
        let mask = Mask::all().destination("Atlantis");
        let err = ds.sum(&mask).unwrap_err();
        assert!(matches!(
            err,
            Error::KeyNotFound {
                level: "destination",
                ..
            }
        ));
    }

    #[test]
    fn missing_band_is_a_hard_error() {
        let ds = parse_dataset(&testdata::minimal_json()).unwrap();
        let mask = Mask::all().band(Band(15));
        assert!(matches!(
            ds.sum(&mask).unwrap_err(),
            Error::KeyNotFound { level: "band", .. }
        ));
    }

    #[test]
    fn missing_month_is_a_hard_error() {
        let ds = parse_dataset(&testdata::minimal_json()).unwrap();
        let mask = Mask::all().month(MonthKey::Month(6));
        assert!(matches!(
            ds.sum(&mask).unwrap_err(),
            Error::KeyNotFound { level: "month", .. }
        ));
    }
}
