//! Descriptive significance-vs-SFI trends.
//!
//! For each (destination, band) pair, fit OLS of the mean-rescaled
//! significance series against range midpoints. The slope describes how
//! strongly rising solar flux moves contacts toward that destination on that
//! band; it feeds display only, never the ranking.

use qp_common::{Band, Error, MonthKey, Result, SfiRange};
use qp_config::OVERLAPPING_LOW_BUCKET_INDEX;
use qp_math::{fit_line, mean_rescaled, FitError};
use serde::Serialize;

use crate::aggregate::{KeyFilter, Mask};
use crate::dataset::QsoDataset;

/// OLS coefficients for one (destination, band) pair.
#[derive(Debug, Clone, Serialize)]
pub struct TrendEntry {
    pub destination: String,
    pub band: Band,
    pub intercept: f64,
    pub slope: f64,
    pub intercept_se: f64,
    pub slope_se: f64,
}

/// The coefficient table plus the range actually excluded from the fits.
#[derive(Debug, Clone, Serialize)]
pub struct TrendTable {
    /// The overlapping low-end bucket dropped before fitting, if any.
    pub dropped_range: Option<SfiRange>,
    pub entries: Vec<TrendEntry>,
}

/// Compute trends over the "All" month and all hours.
///
/// `dest_filter` / `band_filter` restrict the output; an unknown key is a
/// hard error, consistent with the aggregator.
pub fn compute_trends(
    dataset: &QsoDataset,
    drop_overlap: bool,
    dest_filter: Option<&str>,
    band_filter: Option<Band>,
) -> Result<TrendTable> {
    if let Some(dest) = dest_filter {
        if !dataset.destinations().iter().any(|d| d == dest) {
            return Err(Error::KeyNotFound {
                level: "destination",
                key: dest.to_string(),
            });
        }
    }
    if let Some(band) = band_filter {
        if !dataset.bands().contains(&band) {
            return Err(Error::KeyNotFound {
                level: "band",
                key: band.key(),
            });
        }
    }

    let (ranges, dropped_range) = fit_ranges(dataset.ranges(), drop_overlap);
    let midpoints: Vec<f64> = ranges.iter().map(SfiRange::midpoint).collect();

    let mut entries = Vec::new();
    for dest in dataset.destinations() {
        if dest_filter.is_some_and(|f| f != dest) {
            continue;
        }
        for &band in dataset.bands() {
            if band_filter.is_some_and(|f| f != band) {
                continue;
            }

            let series = significance_series(dataset, dest, band, &ranges)?;
            let rescaled = mean_rescaled(&series);
            let fit = fit_line(&midpoints, &rescaled).map_err(|e| match e {
                FitError::TooFewPoints { n } => Error::InsufficientSeries { points: n },
                other => Error::DatasetInvalid(format!("trend fit failed: {other}")),
            })?;

            entries.push(TrendEntry {
                destination: dest.clone(),
                band,
                intercept: fit.intercept,
                slope: fit.slope,
                intercept_se: fit.intercept_se,
                slope_se: fit.slope_se,
            });
        }
    }

    Ok(TrendTable {
        dropped_range,
        entries,
    })
}

/// Range list used for fitting: the configured overlapping low-end bucket is
/// removed when enabled and present.
fn fit_ranges(ranges: &[SfiRange], drop_overlap: bool) -> (Vec<SfiRange>, Option<SfiRange>) {
    let mut ranges = ranges.to_vec();
    if drop_overlap && ranges.len() > OVERLAPPING_LOW_BUCKET_INDEX {
        let dropped = ranges.remove(OVERLAPPING_LOW_BUCKET_INDEX);
        return (ranges, Some(dropped));
    }
    (ranges, None)
}

/// Significance of `dest` on `band` per range, over month "All", all hours.
fn significance_series(
    dataset: &QsoDataset,
    dest: &str,
    band: Band,
    ranges: &[SfiRange],
) -> Result<Vec<f64>> {
    let mut series = Vec::with_capacity(ranges.len());
    for &range in ranges {
        let universe_mask = Mask::all()
            .month(MonthKey::All)
            .range(range)
            .band(band)
            .hours(KeyFilter::All);
        let universe = dataset.sum(&universe_mask)?;
        let count = dataset.sum(&universe_mask.clone().destination(dest))?;
        series.push(if universe == 0 {
            0.0
        } else {
            count as f64 / universe as f64
        });
    }
    Ok(series)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::{parse_dataset, testdata};

    #[test]
    fn drops_the_second_range_label() {
        let ds = parse_dataset(&testdata::three_range_json()).unwrap();
        let (ranges, dropped) = fit_ranges(ds.ranges(), true);
        assert_eq!(dropped, Some(SfiRange { low: 20, high: 40 }));
        assert_eq!(
            ranges,
            vec![SfiRange { low: 0, high: 20 }, SfiRange { low: 40, high: 60 }]
        );
    }

    #[test]
    fn keeps_all_ranges_when_disabled() {
        let ds = parse_dataset(&testdata::three_range_json()).unwrap();
        let (ranges, dropped) = fit_ranges(ds.ranges(), false);
        assert_eq!(ranges.len(), 3);
        assert_eq!(dropped, None);
    }

    #[test]
    fn fits_every_pair_with_overlap_kept() {
        let ds = parse_dataset(&testdata::three_range_json()).unwrap();
        let table = compute_trends(&ds, false, None, None).unwrap();
        assert_eq!(table.entries.len(), 2); // 2 destinations x 1 band
        for entry in &table.entries {
            assert!(entry.slope.is_finite());
            assert!(entry.slope_se.is_finite());
        }
        // Brazil's share rises with SFI, Japan's falls.
        let brazil = table
            .entries
            .iter()
            .find(|e| e.destination == "Brazil")
            .unwrap();
        let japan = table
            .entries
            .iter()
            .find(|e| e.destination == "Japan")
            .unwrap();
        assert!(brazil.slope > 0.0);
        assert!(japan.slope < 0.0);
    }

    #[test]
    fn too_few_ranges_after_drop_is_an_error() {
        let ds = parse_dataset(&testdata::three_range_json()).unwrap();
        // Dropping the overlap bucket leaves two points, below the minimum.
        let err = compute_trends(&ds, true, None, None).unwrap_err();
        assert!(matches!(err, Error::InsufficientSeries { points: 2 }));
    }

    #[test]
    fn filters_restrict_output() {
        let ds = parse_dataset(&testdata::three_range_json()).unwrap();
        let table = compute_trends(&ds, false, Some("Japan"), Some(Band(10))).unwrap();
        assert_eq!(table.entries.len(), 1);
        assert_eq!(table.entries[0].destination, "Japan");
    }

    #[test]
    fn unknown_filters_are_hard_errors() {
        let ds = parse_dataset(&testdata::three_range_json()).unwrap();
        assert!(matches!(
            compute_trends(&ds, false, Some("Atlantis"), None).unwrap_err(),
            Error::KeyNotFound {
                level: "destination",
                ..
            }
        ));
        assert!(matches!(
            compute_trends(&ds, false, None, Some(Band(15))).unwrap_err(),
            Error::KeyNotFound { level: "band", .. }
        ));
    }
}
