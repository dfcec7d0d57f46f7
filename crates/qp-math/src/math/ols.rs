//! Closed-form ordinary least squares with an intercept term.
//!
//! Fits y = intercept + slope * x via the normal equations on the design
//! matrix [1, x], using centered sums so the 2x2 solve stays well
//! conditioned. Standard errors come from sigma^2 * (X'X)^-1 with
//! sigma^2 = SSR / (n - 2).

use serde::{Deserialize, Serialize};

/// Result of a single-predictor OLS fit.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct OlsFit {
    pub intercept: f64,
    pub slope: f64,
    pub intercept_se: f64,
    pub slope_se: f64,
    /// Number of observations the fit used.
    pub n: usize,
}

/// Reasons a fit cannot be produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FitError {
    /// x and y have different lengths.
    LengthMismatch { x: usize, y: usize },
    /// Fewer than three observations; standard errors need n - 2 >= 1.
    TooFewPoints { n: usize },
    /// All x values are identical; the slope is unidentifiable.
    DegenerateDesign,
    /// An input value is NaN or infinite.
    NonFinite,
}

impl std::fmt::Display for FitError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FitError::LengthMismatch { x, y } => {
                write!(f, "x has {x} observations but y has {y}")
            }
            FitError::TooFewPoints { n } => {
                write!(f, "need at least 3 observations, got {n}")
            }
            FitError::DegenerateDesign => write!(f, "all predictor values are identical"),
            FitError::NonFinite => write!(f, "inputs contain NaN or infinite values"),
        }
    }
}

impl std::error::Error for FitError {}

/// Fit y = intercept + slope * x by ordinary least squares.
pub fn fit_line(x: &[f64], y: &[f64]) -> Result<OlsFit, FitError> {
    if x.len() != y.len() {
        return Err(FitError::LengthMismatch {
            x: x.len(),
            y: y.len(),
        });
    }
    let n = x.len();
    if n < 3 {
        return Err(FitError::TooFewPoints { n });
    }
    if x.iter().chain(y.iter()).any(|v| !v.is_finite()) {
        return Err(FitError::NonFinite);
    }

    let n_f = n as f64;
    let mean_x = x.iter().sum::<f64>() / n_f;
    let mean_y = y.iter().sum::<f64>() / n_f;

    let mut sxx = 0.0;
    let mut sxy = 0.0;
    for (&xi, &yi) in x.iter().zip(y) {
        let dx = xi - mean_x;
        sxx += dx * dx;
        sxy += dx * (yi - mean_y);
    }
    if sxx == 0.0 {
        return Err(FitError::DegenerateDesign);
    }

    let slope = sxy / sxx;
    let intercept = mean_y - slope * mean_x;

    let mut ssr = 0.0;
    for (&xi, &yi) in x.iter().zip(y) {
        let resid = yi - (intercept + slope * xi);
        ssr += resid * resid;
    }
    // Exact fits can leave a tiny negative residual sum from rounding.
    let sigma2 = (ssr / (n_f - 2.0)).max(0.0);

    let slope_se = (sigma2 / sxx).sqrt();
    let intercept_se = (sigma2 * (1.0 / n_f + mean_x * mean_x / sxx)).sqrt();

    Ok(OlsFit {
        intercept,
        slope,
        intercept_se,
        slope_se,
        n,
    })
}
