//! Shared dataset fixtures for unit tests.

use serde_json::{json, Value};

/// An hour map with all 24 keys, zero except the given (hour, count) pairs.
pub(crate) fn hours(counts: &[(u8, u64)]) -> Value {
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

/// Two destinations, one month, one range, one band.
///
/// Japan 10 QSOs, Brazil 30, both at hour 12 — the worked significance
/// example: Japan 0.25, Brazil 0.75.
pub(crate) fn minimal_value() -> Value {
    json!({
        "Japan": { "All": { "(0,20)": { "10": hours(&[(12, 10)]) } } },
        "Brazil": { "All": { "(0,20)": { "10": hours(&[(12, 30)]) } } },
    })
}

pub(crate) fn minimal_json() -> String {
    minimal_value().to_string()
}

/// Two bands in non-numeric document order ("20" before "10"), one range.
///
/// Band shares are tied at 0.5/0.5, so rankings must preserve document
/// order; per-destination shares on band "10" are Japan 0.25, Brazil 0.75.
pub(crate) fn two_band_value() -> Value {
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
}

pub(crate) fn two_band_json() -> String {
    two_band_value().to_string()
}

/// Three contiguous ranges stored out of order, one band.
///
/// Per-destination significance on band "10":
///   (0,20):  Japan 0.25, Brazil 0.75
///   (20,40): Japan 0.50, Brazil 0.50
///   (40,60): Japan 0.10, Brazil 0.90
pub(crate) fn three_range_value() -> Value {
    json!({
        "Japan": { "All": {
            "(20,40)": { "10": hours(&[(12, 40)]) },
            "(0,20)":  { "10": hours(&[(12, 10)]) },
            "(40,60)": { "10": hours(&[(12, 10)]) },
        } },
        "Brazil": { "All": {
            "(20,40)": { "10": hours(&[(12, 40)]) },
            "(0,20)":  { "10": hours(&[(12, 30)]) },
            "(40,60)": { "10": hours(&[(12, 90)]) },
        } },
    })
}

pub(crate) fn three_range_json() -> String {
    three_range_value().to_string()
}

/// Two months (All and January), one range, one band; January counts sit at
/// different hours so time-window filtering is observable.
pub(crate) fn monthly_value() -> Value {
    json!({
        "Japan": { "All": { "(0,20)": { "10": hours(&[(3, 8), (12, 10)]) } },
                   "January": { "(0,20)": { "10": hours(&[(3, 8)]) } } },
        "Brazil": { "All": { "(0,20)": { "10": hours(&[(12, 30)]) } },
                    "January": { "(0,20)": { "10": hours(&[(12, 24)]) } } },
    })
}

pub(crate) fn monthly_json() -> String {
    monthly_value().to_string()
}
