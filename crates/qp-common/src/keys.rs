//! Strongly typed dataset keys.
//!
//! The QSO dataset is a fixed-depth nested table keyed by destination,
//! month, SFI range, band, and hour-of-day. Destinations stay plain strings
//! (they are free-form country names); the other levels get typed keys so
//! lookups and orderings cannot mix levels up.

use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// An amateur-radio band, identified by its wavelength in meters.
///
/// Dataset keys are the bare number ("10"); display adds the unit ("10m").
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Band(pub u16);

impl Band {
    /// Dataset key form: the bare meter count.
    pub fn key(&self) -> String {
        self.0.to_string()
    }
}

impl fmt::Display for Band {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}m", self.0)
    }
}

impl FromStr for Band {
    type Err = String;

    /// Accepts both the dataset key form ("10") and the display form ("10m").
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let digits = s.trim().trim_end_matches(['m', 'M']);
        let meters: u16 = digits
            .parse()
            .map_err(|_| format!("invalid band: {s:?} (expected e.g. \"20\" or \"20m\")"))?;
        if meters == 0 {
            return Err(format!("invalid band: {s:?} (meters must be nonzero)"));
        }
        Ok(Band(meters))
    }
}

/// Month names as they appear in dataset keys, January first.
const MONTH_NAMES: [&str; 12] = [
    "January",
    "February",
    "March",
    "April",
    "May",
    "June",
    "July",
    "August",
    "September",
    "October",
    "November",
    "December",
];

/// Dataset key for the aggregated bucket spanning all months.
const ALL_MONTHS_LABEL: &str = "All";

/// A month-level dataset key: either a named month or the "All" bucket.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum MonthKey {
    /// The aggregate bucket covering every month.
    All,
    /// A calendar month, 1 (January) through 12 (December).
    Month(u8),
}

impl MonthKey {
    /// Build from a 1-based month number.
    pub fn from_number(n: u8) -> Option<Self> {
        (1..=12).contains(&n).then_some(MonthKey::Month(n))
    }

    /// Parse a dataset key ("All", "January", ...). Case-insensitive.
    pub fn from_label(label: &str) -> Option<Self> {
        let label = label.trim();
        if label.eq_ignore_ascii_case(ALL_MONTHS_LABEL) {
            return Some(MonthKey::All);
        }
        MONTH_NAMES
            .iter()
            .position(|name| name.eq_ignore_ascii_case(label))
            .map(|idx| MonthKey::Month(idx as u8 + 1))
    }

    /// The dataset key for this month.
    pub fn label(&self) -> &'static str {
        match self {
            MonthKey::All => ALL_MONTHS_LABEL,
            MonthKey::Month(n) => MONTH_NAMES[usize::from(*n) - 1],
        }
    }
}

impl fmt::Display for MonthKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for MonthKey {
    type Err = String;

    /// Accepts "all", month names, and 1-12.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if let Some(month) = MonthKey::from_label(s) {
            return Ok(month);
        }
        if let Ok(n) = s.trim().parse::<u8>() {
            if let Some(month) = MonthKey::from_number(n) {
                return Ok(month);
            }
        }
        Err(format!(
            "invalid month: {s:?} (expected \"all\", a month name, or 1-12)"
        ))
    }
}

impl Serialize for MonthKey {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.label())
    }
}

impl<'de> Deserialize<'de> for MonthKey {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let label = String::deserialize(deserializer)?;
        MonthKey::from_label(&label)
            .ok_or_else(|| D::Error::custom(format!("unknown month key: {label:?}")))
    }
}

/// An SFI bucket covering `(low, high]`, encoded in dataset keys as
/// `"(low,high)"`.
///
/// A live SFI value belongs to the bucket with `low < sfi <= high`; the
/// first bucket in range order additionally accepts its own low bound, since
/// no flux reading is ever below 0.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SfiRange {
    pub low: u16,
    pub high: u16,
}

impl SfiRange {
    /// Parse a dataset key of the form `"(low,high)"`.
    pub fn from_label(label: &str) -> Option<Self> {
        let inner = label.trim().strip_prefix('(')?.strip_suffix(')')?;
        let (low, high) = inner.split_once(',')?;
        let low: u16 = low.trim().parse().ok()?;
        let high: u16 = high.trim().parse().ok()?;
        if low >= high {
            return None;
        }
        Some(SfiRange { low, high })
    }

    /// The dataset key for this range.
    pub fn label(&self) -> String {
        format!("({},{})", self.low, self.high)
    }

    /// Midpoint of the bucket, used as the regression predictor.
    pub fn midpoint(&self) -> f64 {
        f64::from(self.low + self.high) / 2.0
    }

    /// Open-low, closed-high membership test.
    pub fn covers(&self, sfi: u16) -> bool {
        self.low < sfi && sfi <= self.high
    }

    /// Bucket width.
    pub fn width(&self) -> u16 {
        self.high - self.low
    }
}

impl fmt::Display for SfiRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({},{})", self.low, self.high)
    }
}

impl Serialize for SfiRange {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.label())
    }
}

impl<'de> Deserialize<'de> for SfiRange {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let label = String::deserialize(deserializer)?;
        SfiRange::from_label(&label)
            .ok_or_else(|| D::Error::custom(format!("invalid SFI range key: {label:?}")))
    }
}
