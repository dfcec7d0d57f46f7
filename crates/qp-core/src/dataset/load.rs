//! Fail-fast dataset loading and schema validation.

use qp_common::{Band, Error, MonthKey, Result, SfiRange};
use serde_json::Value;
use std::collections::{HashMap, HashSet};
use std::path::Path;
use tracing::info;

use super::model::{HourCounts, QsoDataset};

/// Load and validate a dataset snapshot from disk.
///
/// Missing file and malformed content are distinct, user-facing errors;
/// there is no partial load.
pub fn load_dataset(path: &Path) -> Result<QsoDataset> {
    if !path.is_file() {
        return Err(Error::DatasetNotFound {
            path: path.display().to_string(),
        });
    }
    let content = std::fs::read_to_string(path)?;
    let dataset = parse_dataset(&content)?;
    info!(
        destinations = dataset.destinations.len(),
        ranges = dataset.ranges.len(),
        bands = dataset.bands.len(),
        "dataset loaded"
    );
    Ok(dataset)
}

/// Parse and validate a dataset from its JSON text.
pub fn parse_dataset(content: &str) -> Result<QsoDataset> {
    let root: Value = serde_json::from_str(content)
        .map_err(|e| Error::DatasetInvalid(format!("malformed JSON: {e}")))?;
    let root = root
        .as_object()
        .ok_or_else(|| invalid("top level must be an object keyed by destination"))?;
    if root.is_empty() {
        return Err(invalid("no destinations in dataset"));
    }

    let mut destinations = Vec::with_capacity(root.len());
    let mut months: Vec<MonthKey> = Vec::new();
    let mut ranges: Vec<SfiRange> = Vec::new();
    let mut bands: Vec<Band> = Vec::new();
    let mut counts = HashMap::with_capacity(root.len());

    for (dest, months_value) in root {
        let month_obj = months_value
            .as_object()
            .ok_or_else(|| invalid(&format!("destination {dest:?}: months must be an object")))?;

        let mut month_table = HashMap::with_capacity(month_obj.len());
        let mut dest_months = Vec::with_capacity(month_obj.len());

        for (month_label, ranges_value) in month_obj {
            let month = MonthKey::from_label(month_label).ok_or_else(|| {
                invalid(&format!("destination {dest:?}: unknown month key {month_label:?}"))
            })?;
            dest_months.push(month);

            let (range_table, dest_ranges, dest_bands) =
                parse_ranges(dest, month_label, ranges_value)?;

            if ranges.is_empty() {
                ranges = dest_ranges;
            } else if ranges != dest_ranges {
                return Err(invalid(&format!(
                    "destination {dest:?}, month {month_label:?}: SFI ranges differ from the rest of the dataset"
                )));
            }
            if bands.is_empty() {
                bands = dest_bands;
            } else if bands != dest_bands {
                return Err(invalid(&format!(
                    "destination {dest:?}, month {month_label:?}: bands differ from the rest of the dataset"
                )));
            }

            month_table.insert(month, range_table);
        }

        if months.is_empty() {
            months = dest_months;
        } else if months != dest_months {
            return Err(invalid(&format!(
                "destination {dest:?}: month set differs from the rest of the dataset"
            )));
        }

        destinations.push(dest.clone());
        counts.insert(dest.clone(), month_table);
    }

    validate_range_coverage(&ranges)?;

    Ok(QsoDataset {
        destinations,
        months,
        ranges,
        bands,
        counts,
    })
}

fn invalid(msg: &str) -> Error {
    Error::DatasetInvalid(msg.to_string())
}

#[allow(clippy::type_complexity)]
fn parse_ranges(
    dest: &str,
    month: &str,
    value: &Value,
) -> Result<(HashMap<SfiRange, HashMap<Band, HourCounts>>, Vec<SfiRange>, Vec<Band>)> {
    let range_obj = value.as_object().ok_or_else(|| {
        invalid(&format!(
            "destination {dest:?}, month {month:?}: SFI ranges must be an object"
        ))
    })?;
    if range_obj.is_empty() {
        return Err(invalid(&format!(
            "destination {dest:?}, month {month:?}: no SFI ranges"
        )));
    }

    let mut table = HashMap::with_capacity(range_obj.len());
    let mut ranges = Vec::with_capacity(range_obj.len());
    let mut bands: Vec<Band> = Vec::new();

    for (range_label, bands_value) in range_obj {
        let range = SfiRange::from_label(range_label).ok_or_else(|| {
            invalid(&format!(
                "destination {dest:?}, month {month:?}: invalid SFI range key {range_label:?}"
            ))
        })?;

        let (band_table, range_bands) = parse_bands(dest, month, range_label, bands_value)?;
        if bands.is_empty() {
            bands = range_bands;
        } else if bands != range_bands {
            return Err(invalid(&format!(
                "destination {dest:?}, month {month:?}, range {range_label}: bands differ from sibling ranges"
            )));
        }

        ranges.push(range);
        table.insert(range, band_table);
    }

    // Canonical range order is ascending by lower bound, whatever order the
    // document stores them in.
    ranges.sort();

    Ok((table, ranges, bands))
}

fn parse_bands(
    dest: &str,
    month: &str,
    range: &str,
    value: &Value,
) -> Result<(HashMap<Band, HourCounts>, Vec<Band>)> {
    let band_obj = value.as_object().ok_or_else(|| {
        invalid(&format!(
            "destination {dest:?}, month {month:?}, range {range}: bands must be an object"
        ))
    })?;
    if band_obj.is_empty() {
        return Err(invalid(&format!(
            "destination {dest:?}, month {month:?}, range {range}: no bands"
        )));
    }

    let mut table = HashMap::with_capacity(band_obj.len());
    let mut bands = Vec::with_capacity(band_obj.len());

    for (band_label, hours_value) in band_obj {
        let band: Band = band_label.parse().map_err(|e: String| {
            invalid(&format!(
                "destination {dest:?}, month {month:?}, range {range}: {e}"
            ))
        })?;
        let hours = parse_hours(dest, month, range, band_label, hours_value)?;
        bands.push(band);
        table.insert(band, hours);
    }

    Ok((table, bands))
}

fn parse_hours(
    dest: &str,
    month: &str,
    range: &str,
    band: &str,
    value: &Value,
) -> Result<HourCounts> {
    let hour_obj = value.as_object().ok_or_else(|| {
        invalid(&format!(
            "destination {dest:?}, month {month:?}, range {range}, band {band:?}: hours must be an object"
        ))
    })?;

    let mut counts: HourCounts = [0; 24];
    let mut seen: HashSet<u8> = HashSet::with_capacity(24);

    for (hour_label, count_value) in hour_obj {
        let hour: u8 = hour_label.parse().ok().filter(|h| *h < 24).ok_or_else(|| {
            invalid(&format!(
                "destination {dest:?}, month {month:?}, range {range}, band {band:?}: invalid hour key {hour_label:?}"
            ))
        })?;
        let count = count_value.as_u64().ok_or_else(|| {
            invalid(&format!(
                "destination {dest:?}, month {month:?}, range {range}, band {band:?}, hour {hour_label}: count must be a non-negative integer"
            ))
        })?;
        if !seen.insert(hour) {
            return Err(invalid(&format!(
                "destination {dest:?}, month {month:?}, range {range}, band {band:?}: duplicate hour key {hour_label:?}"
            )));
        }
        counts[usize::from(hour)] = count;
    }

    if seen.len() != 24 {
        return Err(invalid(&format!(
            "destination {dest:?}, month {month:?}, range {range}, band {band:?}: expected all 24 hour keys, found {}",
            seen.len()
        )));
    }

    Ok(counts)
}

/// Range-list shape checks: strictly ascending, contiguous, starting at 0,
/// uniform width. Coverage up to 300 is reported by `check`, not enforced
/// here, so trimmed test fixtures stay loadable.
fn validate_range_coverage(ranges: &[SfiRange]) -> Result<()> {
    let first = ranges.first().ok_or_else(|| invalid("no SFI ranges"))?;
    if first.low != 0 {
        return Err(invalid(&format!(
            "first SFI range {first} must start at 0"
        )));
    }
    let width = first.width();
    for pair in ranges.windows(2) {
        if pair[1].low != pair[0].high {
            return Err(invalid(&format!(
                "SFI ranges {} and {} are not contiguous",
                pair[0], pair[1]
            )));
        }
        if pair[1].width() != width {
            return Err(invalid(&format!(
                "SFI range {} has width {} but the dataset interval is {width}",
                pair[1],
                pair[1].width()
            )));
        }
    }
    Ok(())
}
