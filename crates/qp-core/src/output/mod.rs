//! Report envelopes and renderers.
//!
//! Commands build a typed report and render it to the selected output
//! format. Payloads go to stdout; logs stay on stderr.

pub mod report;

pub use report::{
    render_check, render_recommendation, render_trend, CheckReport, DatasetSummary,
    RankedResult, RecommendationKind, RecommendationReport, TrendReport,
};
