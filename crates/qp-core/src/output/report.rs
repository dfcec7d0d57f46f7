//! Typed reports and their json/md/summary renderers.

use chrono::{DateTime, Utc};
use qp_common::{Band, MonthKey, OutputFormat, Result, SfiRange, SCHEMA_VERSION};
use qp_config::ConfigSnapshot;
use serde::Serialize;

use crate::conditions::SfiSource;
use crate::dataset::QsoDataset;
use crate::recommend::{Conditions, Recommendation};
use crate::trend::TrendTable;

/// Which comparison universe a recommendation ranked.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RecommendationKind {
    Destinations,
    Bands,
}

impl RecommendationKind {
    fn noun(self) -> &'static str {
        match self {
            RecommendationKind::Destinations => "destination",
            RecommendationKind::Bands => "band",
        }
    }
}

/// One row of a ranking.
#[derive(Debug, Clone, Serialize)]
pub struct RankedResult {
    pub rank: usize,
    pub label: String,
    pub score: f64,
}

/// Envelope for `dests` and `bands` output.
#[derive(Debug, Clone, Serialize)]
pub struct RecommendationReport {
    pub schema_version: &'static str,
    pub generated_at: DateTime<Utc>,
    pub kind: RecommendationKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub band: Option<Band>,
    pub month: MonthKey,
    pub hour: u8,
    pub tolerance: u8,
    pub sfi: i64,
    pub sfi_source: SfiSource,
    pub smoothing: bool,
    pub matched_range: SfiRange,
    pub smoothed_over: Vec<SfiRange>,
    /// Hours the query was restricted to; absent when the window covered the
    /// whole day and no filter applied.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub window_hours: Option<Vec<u8>>,
    pub results: Vec<RankedResult>,
}

impl RecommendationReport {
    pub fn destinations(
        band: Band,
        conditions: &Conditions,
        sfi_source: SfiSource,
        recommendation: Recommendation,
    ) -> Self {
        Self::from_parts(
            RecommendationKind::Destinations,
            Some(band),
            conditions,
            sfi_source,
            recommendation,
        )
    }

    pub fn bands(
        conditions: &Conditions,
        sfi_source: SfiSource,
        recommendation: Recommendation,
    ) -> Self {
        Self::from_parts(
            RecommendationKind::Bands,
            None,
            conditions,
            sfi_source,
            recommendation,
        )
    }

    fn from_parts(
        kind: RecommendationKind,
        band: Option<Band>,
        conditions: &Conditions,
        sfi_source: SfiSource,
        recommendation: Recommendation,
    ) -> Self {
        let results = recommendation
            .entries
            .into_iter()
            .enumerate()
            .map(|(i, entry)| RankedResult {
                rank: i + 1,
                label: entry.label,
                score: entry.score,
            })
            .collect();

        RecommendationReport {
            schema_version: SCHEMA_VERSION,
            generated_at: Utc::now(),
            kind,
            band,
            month: conditions.month,
            hour: conditions.hour,
            tolerance: conditions.tolerance,
            sfi: conditions.sfi,
            sfi_source,
            smoothing: conditions.smoothing,
            matched_range: recommendation.matched_range,
            smoothed_over: recommendation.smoothed_over,
            window_hours: recommendation.window_hours,
            results,
        }
    }

    /// Band labels read better with the unit in human output.
    fn display_label(&self, label: &str) -> String {
        match self.kind {
            RecommendationKind::Destinations => label.to_string(),
            RecommendationKind::Bands => format!("{label}m"),
        }
    }
}

/// Render a recommendation report in the requested format.
pub fn render_recommendation(report: &RecommendationReport, format: OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Json => Ok(serde_json::to_string_pretty(report)?),
        OutputFormat::Md => Ok(recommendation_md(report)),
        OutputFormat::Summary => Ok(recommendation_summary(report)),
    }
}

fn recommendation_md(report: &RecommendationReport) -> String {
    let mut out = String::new();
    match report.kind {
        RecommendationKind::Destinations => out.push_str("# Best destinations\n\n"),
        RecommendationKind::Bands => out.push_str("# Best bands\n\n"),
    }

    if let Some(band) = report.band {
        out.push_str(&format!("- Band: {band}\n"));
    }
    out.push_str(&format!("- Month: {}\n", report.month));
    out.push_str(&format!(
        "- SFI: {} ({}), matched range {}\n",
        report.sfi, report.sfi_source, report.matched_range
    ));
    if report.smoothing {
        let over: Vec<String> = report.smoothed_over.iter().map(|r| r.to_string()).collect();
        out.push_str(&format!("- Smoothing: averaged over {}\n", over.join(", ")));
    } else {
        out.push_str("- Smoothing: off\n");
    }
    match &report.window_hours {
        Some(hours) => {
            let hours: Vec<String> = hours.iter().map(|h| h.to_string()).collect();
            out.push_str(&format!(
                "- Hours: {} (hour {} ± {})\n",
                hours.join(", "),
                report.hour,
                report.tolerance
            ));
        }
        None => out.push_str("- Hours: all (window covers the whole day)\n"),
    }

    out.push_str(&format!(
        "\n| # | {} | QSO count significance |\n|---|---|---|\n",
        capitalize(report.kind.noun())
    ));
    for result in &report.results {
        out.push_str(&format!(
            "| {} | {} | {:.4} |\n",
            result.rank,
            report.display_label(&result.label),
            result.score
        ));
    }
    if report.results.is_empty() {
        out.push_str("\nNo candidates.\n");
    }
    out
}

fn recommendation_summary(report: &RecommendationReport) -> String {
    match report.results.first() {
        Some(best) => format!(
            "best {}{}: {} ({:.4}) [sfi {}, range {}, month {}]",
            report.kind.noun(),
            report
                .band
                .map(|b| format!(" on {b}"))
                .unwrap_or_default(),
            report.display_label(&best.label),
            best.score,
            report.sfi,
            report.matched_range,
            report.month
        ),
        None => format!(
            "no {} candidates [sfi {}, range {}, month {}]",
            report.kind.noun(),
            report.sfi,
            report.matched_range,
            report.month
        ),
    }
}

/// Envelope for `trend` output.
#[derive(Debug, Clone, Serialize)]
pub struct TrendReport {
    pub schema_version: &'static str,
    pub generated_at: DateTime<Utc>,
    /// Trends always describe the all-months slice.
    pub month: MonthKey,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dropped_range: Option<SfiRange>,
    pub entries: Vec<crate::trend::TrendEntry>,
}

impl TrendReport {
    pub fn new(table: TrendTable) -> Self {
        TrendReport {
            schema_version: SCHEMA_VERSION,
            generated_at: Utc::now(),
            month: MonthKey::All,
            dropped_range: table.dropped_range,
            entries: table.entries,
        }
    }
}

/// Render a trend report in the requested format.
pub fn render_trend(report: &TrendReport, format: OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Json => Ok(serde_json::to_string_pretty(report)?),
        OutputFormat::Md => Ok(trend_md(report)),
        OutputFormat::Summary => Ok(format!(
            "{} trend fit(s){}",
            report.entries.len(),
            report
                .dropped_range
                .map(|r| format!(" (dropped overlapping range {r})"))
                .unwrap_or_default()
        )),
    }
}

fn trend_md(report: &TrendReport) -> String {
    let mut out = String::from("# Significance vs SFI trends\n\n");
    if let Some(dropped) = report.dropped_range {
        out.push_str(&format!(
            "- Dropped overlapping low-end range: {dropped}\n"
        ));
    }
    out.push_str(
        "\n| Destination | Band | Intercept | Slope | SE(intercept) | SE(slope) |\n|---|---|---|---|---|---|\n",
    );
    for entry in &report.entries {
        out.push_str(&format!(
            "| {} | {} | {:.6} | {:+.6} | {:.6} | {:.6} |\n",
            entry.destination,
            entry.band,
            entry.intercept,
            entry.slope,
            entry.intercept_se,
            entry.slope_se
        ));
    }
    out
}

/// Dataset summary for `check` output.
#[derive(Debug, Clone, Serialize)]
pub struct DatasetSummary {
    pub path: String,
    pub destinations: Vec<String>,
    pub months: Vec<String>,
    pub ranges: Vec<String>,
    pub bands: Vec<String>,
    pub interval_size: u16,
    pub covered_to: u16,
    pub total_qsos: u64,
}

impl DatasetSummary {
    pub fn new(dataset: &QsoDataset, path: &str) -> Self {
        DatasetSummary {
            path: path.to_string(),
            destinations: dataset.destinations().to_vec(),
            months: dataset.months().iter().map(|m| m.label().to_string()).collect(),
            ranges: dataset.ranges().iter().map(|r| r.label()).collect(),
            bands: dataset.bands().iter().map(|b| b.key()).collect(),
            interval_size: dataset.interval_size(),
            covered_to: dataset.covered_to(),
            total_qsos: dataset.grand_total(),
        }
    }
}

/// Envelope for `check` output.
#[derive(Debug, Clone, Serialize)]
pub struct CheckReport {
    pub schema_version: &'static str,
    pub generated_at: DateTime<Utc>,
    pub config: ConfigSnapshot,
    pub dataset: DatasetSummary,
    pub warnings: Vec<String>,
}

/// Render a check report in the requested format.
pub fn render_check(report: &CheckReport, format: OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Json => Ok(serde_json::to_string_pretty(report)?),
        OutputFormat::Md => Ok(check_md(report)),
        OutputFormat::Summary => Ok(format!(
            "dataset ok: {} destinations, {} ranges, {} bands, {} QSOs{}",
            report.dataset.destinations.len(),
            report.dataset.ranges.len(),
            report.dataset.bands.len(),
            report.dataset.total_qsos,
            if report.warnings.is_empty() {
                String::new()
            } else {
                format!(" ({} warning(s))", report.warnings.len())
            }
        )),
    }
}

fn check_md(report: &CheckReport) -> String {
    let mut out = String::from("# Configuration and dataset check\n\n");
    out.push_str(&format!(
        "- Settings: {} ({})\n",
        report
            .config
            .settings_path
            .as_deref()
            .unwrap_or("<defaults>"),
        report.config.settings_source
    ));
    out.push_str(&format!(
        "- Dataset: {} ({})\n",
        report.dataset.path, report.config.dataset_source
    ));
    out.push_str(&format!(
        "- Destinations: {}\n- Months: {}\n- SFI ranges: {} ({} wide, covering 0 to {})\n- Bands: {}\n- Total QSOs: {}\n",
        report.dataset.destinations.len(),
        report.dataset.months.join(", "),
        report.dataset.ranges.len(),
        report.dataset.interval_size,
        report.dataset.covered_to,
        report
            .dataset
            .bands
            .iter()
            .map(|b| format!("{b}m"))
            .collect::<Vec<_>>()
            .join(", "),
        report.dataset.total_qsos
    ));
    if !report.warnings.is_empty() {
        out.push_str("\n## Warnings\n\n");
        for warning in &report.warnings {
            out.push_str(&format!("- {warning}\n"));
        }
    }
    out
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
        None => String::new(),
    }
}
