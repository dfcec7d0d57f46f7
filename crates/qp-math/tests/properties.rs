//! Property-based tests for qp-math numerical functions.
//!
//! Uses proptest to verify regression and series properties hold across many
//! random inputs.

use proptest::prelude::*;
use qp_math::{fit_line, mean, mean_rescaled};

/// Tolerance for floating point comparisons.
const TOL: f64 = 1e-8;

/// Helper to check approximate equality.
fn approx_eq(a: f64, b: f64, tol: f64) -> bool {
    (a - b).abs() <= tol.max(tol * a.abs().max(b.abs()))
}

/// Evenly spaced predictor values, the shape range midpoints take.
fn grid(n: usize, step: f64) -> Vec<f64> {
    (0..n).map(|i| 10.0 + step * i as f64).collect()
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(500))]

    /// Fitting points that lie exactly on a line recovers the line.
    #[test]
    fn exact_line_recovery(
        intercept in -10.0..10.0f64,
        slope in -1.0..1.0f64,
        n in 3usize..20,
    ) {
        let x = grid(n, 20.0);
        let y: Vec<f64> = x.iter().map(|xi| intercept + slope * xi).collect();
        let fit = fit_line(&x, &y).unwrap();
        prop_assert!(approx_eq(fit.intercept, intercept, TOL),
            "intercept {} != {}", fit.intercept, intercept);
        prop_assert!(approx_eq(fit.slope, slope, TOL),
            "slope {} != {}", fit.slope, slope);
        prop_assert!(fit.slope_se.abs() < 1e-5);
    }

    /// Translating y shifts the intercept and leaves the slope alone.
    #[test]
    fn y_translation_only_moves_intercept(
        shift in -100.0..100.0f64,
        n in 3usize..15,
        noise in prop::collection::vec(-0.5..0.5f64, 3..15),
    ) {
        let n = n.min(noise.len());
        let x = grid(n, 25.0);
        let y: Vec<f64> = x.iter().zip(&noise).map(|(xi, e)| 0.3 * xi + e).collect();
        let y_shifted: Vec<f64> = y.iter().map(|v| v + shift).collect();

        let base = fit_line(&x, &y).unwrap();
        let shifted = fit_line(&x, &y_shifted).unwrap();

        prop_assert!(approx_eq(base.slope, shifted.slope, TOL));
        prop_assert!(approx_eq(base.intercept + shift, shifted.intercept, TOL));
        prop_assert!(approx_eq(base.slope_se, shifted.slope_se, TOL));
    }

    /// The fit does not depend on observation order.
    #[test]
    fn fit_is_order_invariant(
        n in 3usize..15,
        noise in prop::collection::vec(-1.0..1.0f64, 3..15),
    ) {
        let n = n.min(noise.len());
        let x = grid(n, 30.0);
        let y: Vec<f64> = x.iter().zip(&noise).map(|(xi, e)| 1.0 - 0.01 * xi + e).collect();

        let forward = fit_line(&x, &y).unwrap();

        let mut x_rev = x.clone();
        let mut y_rev = y.clone();
        x_rev.reverse();
        y_rev.reverse();
        let reversed = fit_line(&x_rev, &y_rev).unwrap();

        prop_assert!(approx_eq(forward.intercept, reversed.intercept, TOL));
        prop_assert!(approx_eq(forward.slope, reversed.slope, TOL));
        prop_assert!(approx_eq(forward.slope_se, reversed.slope_se, TOL));
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(500))]

    /// A rescaled series with a nonzero mean always has mean 1.
    #[test]
    fn rescaled_mean_is_one(values in prop::collection::vec(0.001..1.0f64, 1..50)) {
        let rescaled = mean_rescaled(&values);
        prop_assert!(approx_eq(mean(&rescaled), 1.0, TOL));
    }

    /// Rescaling preserves ratios between entries.
    #[test]
    fn rescaling_preserves_ratios(values in prop::collection::vec(0.001..1.0f64, 2..50)) {
        let rescaled = mean_rescaled(&values);
        let ratio_before = values[0] / values[1];
        let ratio_after = rescaled[0] / rescaled[1];
        prop_assert!(approx_eq(ratio_before, ratio_after, TOL));
    }
}
