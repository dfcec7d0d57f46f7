//! Series helpers for significance curves.

/// Arithmetic mean. Returns 0.0 for an empty slice.
pub fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

/// Rescale a series by its own mean, so series on different scales expose
/// comparable regression slopes.
///
/// A series whose mean is exactly 0 is returned unchanged (every value is
/// already 0 for the non-negative series this is used on).
pub fn mean_rescaled(values: &[f64]) -> Vec<f64> {
    let m = mean(values);
    if m == 0.0 {
        return values.to_vec();
    }
    values.iter().map(|v| v / m).collect()
}
