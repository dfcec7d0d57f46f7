//! Semantic validation of settings.

use qp_common::ALLOWED_INTERVAL_SIZES;

use crate::settings::Settings;

/// Issue severity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// The configuration cannot be used.
    Error,
    /// The configuration is usable but suspicious.
    Warning,
}

/// A single validation finding.
#[derive(Debug, Clone)]
pub struct ValidationIssue {
    pub severity: Severity,
    pub field: &'static str,
    pub message: String,
}

/// Outcome of a validation pass.
#[derive(Debug, Clone, Default)]
pub struct ValidationResult {
    pub issues: Vec<ValidationIssue>,
}

impl ValidationResult {
    /// True when no error-severity issues were found.
    pub fn is_valid(&self) -> bool {
        self.issues
            .iter()
            .all(|issue| issue.severity != Severity::Error)
    }

    pub fn errors(&self) -> impl Iterator<Item = &ValidationIssue> {
        self.issues
            .iter()
            .filter(|issue| issue.severity == Severity::Error)
    }

    pub fn warnings(&self) -> impl Iterator<Item = &ValidationIssue> {
        self.issues
            .iter()
            .filter(|issue| issue.severity == Severity::Warning)
    }

    fn error(&mut self, field: &'static str, message: String) {
        self.issues.push(ValidationIssue {
            severity: Severity::Error,
            field,
            message,
        });
    }

    fn warning(&mut self, field: &'static str, message: String) {
        self.issues.push(ValidationIssue {
            severity: Severity::Warning,
            field,
            message,
        });
    }
}

/// Validate settings semantics.
pub fn validate_settings(settings: &Settings) -> ValidationResult {
    let mut result = ValidationResult::default();

    if !ALLOWED_INTERVAL_SIZES.contains(&settings.sfi_interval) {
        result.error(
            "sfi_interval",
            format!(
                "{} is not a width the report source supports (allowed: {:?})",
                settings.sfi_interval, ALLOWED_INTERVAL_SIZES
            ),
        );
    }

    if settings.default_top == 0 {
        result.error("default_top", "must be at least 1".to_string());
    }

    if settings.default_tolerance >= 12 {
        result.warning(
            "default_tolerance",
            format!(
                "±{} hours covers the whole day; the time filter will be a no-op",
                settings.default_tolerance
            ),
        );
    }

    if !settings.sfi_source_url.starts_with("http://")
        && !settings.sfi_source_url.starts_with("https://")
    {
        result.error(
            "sfi_source_url",
            format!("{:?} is not an http(s) URL", settings.sfi_source_url),
        );
    }

    result
}
