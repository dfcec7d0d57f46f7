//! Shared fixtures for qp-core integration tests.
#![allow(dead_code)] // not every test binary uses every fixture

use serde_json::{json, Value};
use std::path::PathBuf;
use tempfile::TempDir;

/// An hour map with all 24 keys, zero except the given (hour, count) pairs.
pub fn hours(counts: &[(u8, u64)]) -> Value {
    let mut map = serde_json::Map::new();
    for hour in 0u8..24 {
        let count = counts
            .iter()
            .find(|(h, _)| *h == hour)
            .map(|(_, c)| *c)
            .unwrap_or(0);
        map.insert(hour.to_string(), json!(count));
    }
    Value::Object(map)
}

/// The worked example: Japan 10 QSOs, Brazil 30, one range, one band.
pub fn minimal_dataset() -> String {
    json!({
        "Japan": { "All": { "(0,20)": { "10": hours(&[(12, 10)]) } } },
        "Brazil": { "All": { "(0,20)": { "10": hours(&[(12, 30)]) } } },
    })
    .to_string()
}

/// Three contiguous ranges, one band; shares per range:
/// (0,20) Japan 0.25 / Brazil 0.75, (20,40) 0.50/0.50, (40,60) 0.10/0.90.
pub fn three_range_dataset() -> String {
    json!({
        "Japan": { "All": {
            "(0,20)":  { "10": hours(&[(12, 10)]) },
            "(20,40)": { "10": hours(&[(12, 40)]) },
            "(40,60)": { "10": hours(&[(12, 10)]) },
        } },
        "Brazil": { "All": {
            "(0,20)":  { "10": hours(&[(12, 30)]) },
            "(20,40)": { "10": hours(&[(12, 40)]) },
            "(40,60)": { "10": hours(&[(12, 90)]) },
        } },
    })
    .to_string()
}

/// Two bands tied at 0.5/0.5, stored as "20" before "10".
pub fn two_band_dataset() -> String {
    json!({
        "Japan": { "All": { "(0,20)": {
            "20": hours(&[(12, 30)]),
            "10": hours(&[(12, 10)]),
        } } },
        "Brazil": { "All": { "(0,20)": {
            "20": hours(&[(12, 10)]),
            "10": hours(&[(12, 30)]),
        } } },
    })
    .to_string()
}

/// Write a dataset fixture into a temp dir and return its path.
pub fn write_dataset(dir: &TempDir, content: &str) -> PathBuf {
    let path = dir.path().join("qso_data_dump.json");
    std::fs::write(&path, content).expect("write dataset fixture");
    path
}
