//! Exit codes for the qp-core CLI.
//!
//! Exit codes communicate operation outcome without requiring output
//! parsing.
//!
//! Exit code ranges:
//! - 0: Success
//! - 10-19: User/environment errors (recoverable by user action)
//! - 20-29: Internal errors (bugs, should be reported)

use qp_common::error::ErrorCategory;
use qp_common::Error;

/// Exit codes for qp-core operations.
///
/// These codes are a stable contract for automation. Changes require a
/// major version bump.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(i32)]
pub enum ExitCode {
    /// Success: query answered / check passed
    Clean = 0,

    // ========================================================================
    // User / Environment Errors (10-19)
    // ========================================================================
    /// Invalid arguments
    ArgsError = 10,

    /// Settings missing or invalid
    ConfigError = 11,

    /// Dataset missing, invalid, or missing a queried key
    DatasetError = 12,

    /// SFI outside every bucket, or too little data to analyze
    AnalysisError = 13,

    /// Live conditions unavailable and no fallback supplied
    ConditionsError = 14,

    // ========================================================================
    // Internal Errors (20-29)
    // ========================================================================
    /// Internal error (bug - please report)
    InternalError = 20,

    /// I/O error
    IoError = 21,
}

impl ExitCode {
    /// Convert to i32 for process exit.
    pub fn as_i32(self) -> i32 {
        self as i32
    }

    /// Check if this exit code indicates success.
    pub fn is_success(self) -> bool {
        matches!(self, ExitCode::Clean)
    }

    /// Check if this exit code is a user/environment error (codes 10-19).
    /// These can be resolved by user action.
    pub fn is_user_error(self) -> bool {
        let code = self as i32;
        (10..20).contains(&code)
    }

    /// Check if this exit code is an internal error (codes 20-29).
    /// These indicate bugs and should be reported.
    pub fn is_internal_error(self) -> bool {
        (self as i32) >= 20
    }

    /// Get the error code name as a string constant (for JSON output).
    pub fn code_name(&self) -> &'static str {
        match self {
            ExitCode::Clean => "clean",
            ExitCode::ArgsError => "args_error",
            ExitCode::ConfigError => "config_error",
            ExitCode::DatasetError => "dataset_error",
            ExitCode::AnalysisError => "analysis_error",
            ExitCode::ConditionsError => "conditions_error",
            ExitCode::InternalError => "internal_error",
            ExitCode::IoError => "io_error",
        }
    }
}

impl From<&Error> for ExitCode {
    fn from(err: &Error) -> Self {
        match err.category() {
            ErrorCategory::Config => ExitCode::ConfigError,
            ErrorCategory::Dataset => ExitCode::DatasetError,
            ErrorCategory::Analysis => ExitCode::AnalysisError,
            ErrorCategory::Conditions => ExitCode::ConditionsError,
            ErrorCategory::Io => ExitCode::IoError,
        }
    }
}
