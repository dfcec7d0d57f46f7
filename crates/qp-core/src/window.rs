//! Cyclic time-of-day windows.
//!
//! A query for "around 23:00 ± 2h" must wrap across midnight, so windows are
//! computed mod 24 and returned as sets.

use std::collections::BTreeSet;

/// Hours within `tolerance` of `center`, wrapping across the 0/23 boundary.
///
/// `center` is an hour of day (0..=23). A tolerance of 12 or more already
/// reaches every hour from both sides, so that case is answered directly
/// rather than letting wraparound duplicates collapse by accident.
pub fn hours_near(center: u8, tolerance: u8) -> BTreeSet<u8> {
    debug_assert!(center < 24, "hour of day must be 0..=23");
    if tolerance >= 12 {
        return (0..24).collect();
    }
    let mut hours = BTreeSet::new();
    for offset in 0..=tolerance {
        hours.insert((center + offset) % 24);
        hours.insert((center + 24 - offset) % 24);
    }
    hours
}

/// Whether a window covers the entire day, making the hour filter a no-op.
pub fn covers_full_day(hours: &BTreeSet<u8>) -> bool {
    hours.len() == 24
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_tolerance_is_singleton() {
        for center in 0u8..24 {
            let window = hours_near(center, 0);
            assert_eq!(window, BTreeSet::from_iter([center]));
        }
    }

    #[test]
    fn simple_window_without_wrap() {
        let window = hours_near(12, 2);
        assert_eq!(window, BTreeSet::from_iter([10, 11, 12, 13, 14]));
    }

    #[test]
    fn wraps_below_midnight() {
        let window = hours_near(1, 3);
        assert_eq!(window, BTreeSet::from_iter([22, 23, 0, 1, 2, 3, 4]));
    }

    #[test]
    fn wraps_above_midnight() {
        let window = hours_near(23, 2);
        assert_eq!(window, BTreeSet::from_iter([21, 22, 23, 0, 1]));
    }

    #[test]
    fn tolerance_twelve_and_up_is_full_day() {
        for center in 0u8..24 {
            for tolerance in [12u8, 13, 24, 200] {
                let window = hours_near(center, tolerance);
                assert_eq!(window.len(), 24, "center={center} tolerance={tolerance}");
                assert!(covers_full_day(&window));
            }
        }
    }

    #[test]
    fn window_size_matches_tolerance() {
        for tolerance in 0u8..12 {
            let window = hours_near(6, tolerance);
            assert_eq!(window.len(), usize::from(tolerance) * 2 + 1);
        }
    }

    #[test]
    fn partial_window_is_not_full_day() {
        assert!(!covers_full_day(&hours_near(5, 11)));
    }

    mod properties {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            /// The center is always in its own window.
            #[test]
            fn center_is_always_included(center in 0u8..24, tolerance in 0u8..48) {
                prop_assert!(hours_near(center, tolerance).contains(&center));
            }

            /// Window size is 2t+1, capped at the full day.
            #[test]
            fn window_size_is_capped(center in 0u8..24, tolerance in 0u8..48) {
                let expected = (2 * usize::from(tolerance) + 1).min(24);
                prop_assert_eq!(hours_near(center, tolerance).len(), expected);
            }

            /// Membership is symmetric around the center (mod 24).
            #[test]
            fn window_is_symmetric(center in 0u8..24, tolerance in 0u8..12, offset in 0u8..24) {
                let window = hours_near(center, tolerance);
                let ahead = (center + offset) % 24;
                let behind = (center + 24 - offset % 24) % 24;
                prop_assert_eq!(window.contains(&ahead), window.contains(&behind));
            }
        }
    }
}
