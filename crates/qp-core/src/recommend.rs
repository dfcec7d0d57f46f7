//! Range-smoothed recommendations.
//!
//! Given live solar conditions, pick the SFI bucket the current flux falls
//! into, optionally average it with its immediate neighbors (clamped at the
//! ends of the range list), and rank destinations or bands by the resulting
//! significance row.

use qp_common::{Band, Error, MonthKey, Result, SfiRange};
use serde::Serialize;
use std::collections::BTreeSet;
use tracing::debug;

use crate::aggregate::KeyFilter;
use crate::dataset::QsoDataset;
use crate::significance::{band_significance, destination_significance, SignificanceTable};
use crate::window::{covers_full_day, hours_near};

/// The query-time inputs a recommendation is computed from.
///
/// Immutable per call; a watch-mode refresh builds a fresh value instead of
/// mutating shared state.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct Conditions {
    pub month: MonthKey,
    /// Hour of day, 0..=23.
    pub hour: u8,
    /// ± hour tolerance for the time window.
    pub tolerance: u8,
    /// Current solar flux index.
    pub sfi: i64,
    /// Whether to average the matched bucket with its neighbors.
    pub smoothing: bool,
}

/// One ranked entry.
#[derive(Debug, Clone, Serialize)]
pub struct ScoredEntry {
    pub label: String,
    pub score: f64,
}

/// A completed ranking with the context it was computed under.
#[derive(Debug, Clone, Serialize)]
pub struct Recommendation {
    /// The bucket the live SFI fell into.
    pub matched_range: SfiRange,
    /// The buckets actually averaged (one entry when smoothing is off;
    /// boundary buckets repeat the matched range).
    pub smoothed_over: Vec<SfiRange>,
    /// The hour window applied, or None when it covered the whole day.
    pub window_hours: Option<Vec<u8>>,
    /// Entries in descending score order; ties keep canonical dataset order.
    pub entries: Vec<ScoredEntry>,
}

/// Locate the bucket satisfying `low < sfi <= high` by binary search.
///
/// The first bucket also accepts its own low bound. Anything outside the
/// covered span is reported, never clamped.
pub fn locate_range(ranges: &[SfiRange], sfi: i64) -> Result<usize> {
    let flux = u16::try_from(sfi).map_err(|_| Error::SfiOutOfRange { sfi })?;
    let idx = ranges.partition_point(|r| r.high < flux);
    match ranges.get(idx) {
        Some(range) if range.covers(flux) || (idx == 0 && flux == range.low) => Ok(idx),
        _ => Err(Error::SfiOutOfRange { sfi }),
    }
}

/// Best destinations to call on `band` under `conditions`.
///
/// Returns at most `top` entries.
pub fn best_destinations(
    dataset: &QsoDataset,
    band: Band,
    conditions: &Conditions,
    top: usize,
) -> Result<Recommendation> {
    let window = hours_near(conditions.hour, conditions.tolerance);
    let hours = hour_filter(&window);
    let table = destination_significance(dataset, conditions.month, band, &hours)?;
    let mut recommendation = rank(&table, conditions, &window)?;
    recommendation.entries.truncate(top);
    Ok(recommendation)
}

/// Full band ranking under `conditions`.
pub fn best_bands(dataset: &QsoDataset, conditions: &Conditions) -> Result<Recommendation> {
    let window = hours_near(conditions.hour, conditions.tolerance);
    let hours = hour_filter(&window);
    let table = band_significance(dataset, conditions.month, &hours)?;
    rank(&table, conditions, &window)
}

/// A full-day window is the same as no filter; skip the set in that case.
fn hour_filter(window: &BTreeSet<u8>) -> KeyFilter<u8> {
    if covers_full_day(window) {
        KeyFilter::All
    } else {
        KeyFilter::only(window.iter().copied())
    }
}

fn rank(
    table: &SignificanceTable,
    conditions: &Conditions,
    window: &BTreeSet<u8>,
) -> Result<Recommendation> {
    let idx = locate_range(&table.ranges, conditions.sfi)?;

    let (scores, smoothed_over) = if conditions.smoothing {
        // Neighbors clamp to the matched bucket at either end of the list.
        let below = idx.saturating_sub(1);
        let above = if idx + 1 < table.ranges.len() { idx + 1 } else { idx };
        let rows = [table.row(below), table.row(idx), table.row(above)];
        let averaged: Vec<f64> = (0..table.columns.len())
            .map(|col| (rows[0][col] + rows[1][col] + rows[2][col]) / 3.0)
            .collect();
        (
            averaged,
            vec![table.ranges[below], table.ranges[idx], table.ranges[above]],
        )
    } else {
        (table.row(idx), vec![table.ranges[idx]])
    };

    let mut entries: Vec<ScoredEntry> = table
        .columns
        .iter()
        .zip(&scores)
        .map(|(column, &score)| ScoredEntry {
            label: column.label.clone(),
            score,
        })
        .collect();
    // Stable sort: equal scores keep the canonical dataset order.
    entries.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(std::cmp::Ordering::Equal));

    debug!(
        matched_range = %table.ranges[idx],
        smoothing = conditions.smoothing,
        candidates = entries.len(),
        "ranking computed"
    );

    Ok(Recommendation {
        matched_range: table.ranges[idx],
        smoothed_over,
        window_hours: if covers_full_day(window) {
            None
        } else {
            Some(window.iter().copied().collect())
        },
        entries,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::{parse_dataset, testdata};

    fn ranges3() -> Vec<SfiRange> {
        vec![
            SfiRange { low: 0, high: 20 },
            SfiRange { low: 20, high: 40 },
            SfiRange { low: 40, high: 60 },
        ]
    }

    fn conditions(sfi: i64, smoothing: bool) -> Conditions {
        Conditions {
            month: MonthKey::All,
            hour: 12,
            tolerance: 12, // full-day window keeps fixtures simple
            sfi,
            smoothing,
        }
    }

    #[test]
    fn locates_bucket_open_low_closed_high() {
        let ranges = ranges3();
        // Exactly on an upper bound: belongs to that bucket.
        assert_eq!(locate_range(&ranges, 20).unwrap(), 0);
        assert_eq!(locate_range(&ranges, 40).unwrap(), 1);
        // Just above a bound: next bucket.
        assert_eq!(locate_range(&ranges, 21).unwrap(), 1);
        // The first bucket accepts its low bound.
        assert_eq!(locate_range(&ranges, 0).unwrap(), 0);
    }

    #[test]
    fn rejects_sfi_outside_buckets() {
        let ranges = ranges3();
        assert!(matches!(
            locate_range(&ranges, 61),
            Err(Error::SfiOutOfRange { sfi: 61 })
        ));
        assert!(matches!(
            locate_range(&ranges, -5),
            Err(Error::SfiOutOfRange { sfi: -5 })
        ));
    }

    #[test]
    fn worked_example_top_one_is_brazil() {
        let ds = parse_dataset(&testdata::minimal_json()).unwrap();
        let rec = best_destinations(&ds, Band(10), &conditions(10, false), 1).unwrap();
        assert_eq!(rec.entries.len(), 1);
        assert_eq!(rec.entries[0].label, "Brazil");
        assert_eq!(rec.entries[0].score, 0.75);
        assert_eq!(rec.matched_range, SfiRange { low: 0, high: 20 });
        assert!(rec.window_hours.is_none());
    }

    #[test]
    fn smoothing_clamps_at_the_top_of_the_range_list() {
        let ds = parse_dataset(&testdata::three_range_json()).unwrap();
        // SFI 50 lands in the last bucket (40,60): the successor clamps to
        // the bucket itself, so the average weights (40,60) twice.
        let rec = best_destinations(&ds, Band(10), &conditions(50, true), 10).unwrap();
        assert_eq!(
            rec.smoothed_over,
            vec![
                SfiRange { low: 20, high: 40 },
                SfiRange { low: 40, high: 60 },
                SfiRange { low: 40, high: 60 },
            ]
        );
        let brazil = rec.entries.iter().find(|e| e.label == "Brazil").unwrap();
        let japan = rec.entries.iter().find(|e| e.label == "Japan").unwrap();
        assert!((brazil.score - (0.5 + 0.9 + 0.9) / 3.0).abs() < 1e-12);
        assert!((japan.score - (0.5 + 0.1 + 0.1) / 3.0).abs() < 1e-12);
        assert_eq!(rec.entries[0].label, "Brazil");
    }

    #[test]
    fn smoothing_clamps_at_the_bottom_of_the_range_list() {
        let ds = parse_dataset(&testdata::three_range_json()).unwrap();
        let rec = best_destinations(&ds, Band(10), &conditions(5, true), 10).unwrap();
        assert_eq!(
            rec.smoothed_over,
            vec![
                SfiRange { low: 0, high: 20 },
                SfiRange { low: 0, high: 20 },
                SfiRange { low: 20, high: 40 },
            ]
        );
    }

    #[test]
    fn averaging_identical_rows_reproduces_the_row() {
        // One range: smoothing averages three copies of the same row, so the
        // ranking must match the unsmoothed one.
        let ds = parse_dataset(&testdata::minimal_json()).unwrap();
        let plain = best_destinations(&ds, Band(10), &conditions(10, false), 10).unwrap();
        let smoothed = best_destinations(&ds, Band(10), &conditions(10, true), 10).unwrap();
        let plain_scores: Vec<(String, f64)> = plain
            .entries
            .iter()
            .map(|e| (e.label.clone(), e.score))
            .collect();
        let smoothed_scores: Vec<(String, f64)> = smoothed
            .entries
            .iter()
            .map(|e| (e.label.clone(), e.score))
            .collect();
        assert_eq!(plain_scores, smoothed_scores);
    }

    #[test]
    fn ties_keep_canonical_band_order() {
        let ds = parse_dataset(&testdata::two_band_json()).unwrap();
        let rec = best_bands(&ds, &conditions(10, false)).unwrap();
        // Both bands score 0.5; document order ("20" first) must survive.
        assert_eq!(rec.entries[0].label, "20");
        assert_eq!(rec.entries[1].label, "10");
        assert_eq!(rec.entries[0].score, rec.entries[1].score);
    }

    #[test]
    fn top_is_clamped_to_candidate_count() {
        let ds = parse_dataset(&testdata::minimal_json()).unwrap();
        let rec = best_destinations(&ds, Band(10), &conditions(10, false), 99).unwrap();
        assert_eq!(rec.entries.len(), 2);
    }

    #[test]
    fn partial_window_is_reported() {
        let ds = parse_dataset(&testdata::minimal_json()).unwrap();
        let cond = Conditions {
            tolerance: 1,
            ..conditions(10, false)
        };
        let rec = best_destinations(&ds, Band(10), &cond, 10).unwrap();
        assert_eq!(rec.window_hours, Some(vec![11, 12, 13]));
    }
}
