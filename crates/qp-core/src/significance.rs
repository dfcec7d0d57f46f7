//! QSO count significance.
//!
//! The significance of a destination (or a band) at a given SFI range is the
//! fraction of all comparable contacts that went to it: a filtered count
//! divided by the count of the whole comparison universe at the same
//! (month, range, hour-window) slice. A universe with no contacts yields 0,
//! never a division error.

use qp_common::{Band, MonthKey, Result, SfiRange};
use serde::Serialize;

use crate::aggregate::{KeyFilter, Mask};
use crate::dataset::QsoDataset;

/// One ratio series, aligned to the table's range order.
#[derive(Debug, Clone, Serialize)]
pub struct SignificanceColumn {
    /// Destination name or band label, depending on the grouping.
    pub label: String,
    /// One ratio in [0, 1] per SFI range.
    pub values: Vec<f64>,
}

/// Significance series for every member of a comparison universe.
///
/// Rows are SFI ranges in ascending order; columns follow the dataset's
/// canonical destination (or band) order.
#[derive(Debug, Clone, Serialize)]
pub struct SignificanceTable {
    pub ranges: Vec<SfiRange>,
    pub columns: Vec<SignificanceColumn>,
}

impl SignificanceTable {
    /// The row of per-column values at one range index.
    pub fn row(&self, idx: usize) -> Vec<f64> {
        self.columns.iter().map(|c| c.values[idx]).collect()
    }
}

/// Per-destination significance: fix a band, vary the destination.
pub fn destination_significance(
    dataset: &QsoDataset,
    month: MonthKey,
    band: Band,
    hours: &KeyFilter<u8>,
) -> Result<SignificanceTable> {
    let mut columns: Vec<SignificanceColumn> = dataset
        .destinations()
        .iter()
        .map(|dest| SignificanceColumn {
            label: dest.clone(),
            values: Vec::with_capacity(dataset.ranges().len()),
        })
        .collect();

    for &range in dataset.ranges() {
        let universe_mask = Mask::all()
            .month(month)
            .range(range)
            .band(band)
            .hours(hours.clone());
        let universe = dataset.sum(&universe_mask)?;

        for column in &mut columns {
            let count = dataset.sum(&universe_mask.clone().destination(column.label.clone()))?;
            column.values.push(ratio(count, universe));
        }
    }

    Ok(SignificanceTable {
        ranges: dataset.ranges().to_vec(),
        columns,
    })
}

/// Per-band significance: vary the band over the all-bands universe.
pub fn band_significance(
    dataset: &QsoDataset,
    month: MonthKey,
    hours: &KeyFilter<u8>,
) -> Result<SignificanceTable> {
    let mut columns: Vec<SignificanceColumn> = dataset
        .bands()
        .iter()
        .map(|band| SignificanceColumn {
            label: band.key(),
            values: Vec::with_capacity(dataset.ranges().len()),
        })
        .collect();

    for &range in dataset.ranges() {
        let universe_mask = Mask::all().month(month).range(range).hours(hours.clone());
        let universe = dataset.sum(&universe_mask)?;

        for (column, &band) in columns.iter_mut().zip(dataset.bands()) {
            let count = dataset.sum(&universe_mask.clone().band(band))?;
            column.values.push(ratio(count, universe));
        }
    }

    Ok(SignificanceTable {
        ranges: dataset.ranges().to_vec(),
        columns,
    })
}

/// Zero-denominator slices contribute a significance of 0 by definition.
fn ratio(count: u64, universe: u64) -> f64 {
    if universe == 0 {
        0.0
    } else {
        count as f64 / universe as f64
    }
}
