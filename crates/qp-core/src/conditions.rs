//! Live solar conditions.
//!
//! The current solar flux index comes from a third-party solar-data page.
//! The fetch is expected to fail now and then (the page updates hourly and
//! layouts drift), so callers resolve an effective SFI through a fallback
//! chain: explicit value → live fetch → manual entry on a TTY.

use qp_common::{Error, Result};
use regex::Regex;
use std::io::{BufRead, IsTerminal, Write};
use std::sync::OnceLock;
use std::time::Duration;
use tracing::{info, warn};

/// Where the effective SFI value came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SfiSource {
    /// Passed explicitly by the caller.
    Explicit,
    /// Scraped from the live conditions page.
    Live,
    /// Typed in after the live fetch failed.
    Manual,
}

impl std::fmt::Display for SfiSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SfiSource::Explicit => write!(f, "explicit"),
            SfiSource::Live => write!(f, "live"),
            SfiSource::Manual => write!(f, "manual"),
        }
    }
}

/// Fetch the current solar flux index from the conditions page.
pub fn fetch_current_sfi(url: &str) -> Result<u16> {
    let client = reqwest::blocking::Client::builder()
        .timeout(Duration::from_secs(10))
        .build()
        .map_err(|e| Error::SfiFetch(e.to_string()))?;
    let response = client
        .get(url)
        .send()
        .map_err(|e| Error::SfiFetch(e.to_string()))?;
    if !response.status().is_success() {
        return Err(Error::SfiFetch(format!("HTTP {}", response.status())));
    }
    let body = response.text().map_err(|e| Error::SfiFetch(e.to_string()))?;
    let sfi = extract_sfi(&body)?;
    info!(sfi, url, "fetched live solar flux index");
    Ok(sfi)
}

/// Pull the flux value out of the page body.
///
/// The page announces it as "solar flux: NNN" (markup varies); anything we
/// cannot find or parse is a page-structure error the caller can fall back
/// from.
pub fn extract_sfi(body: &str) -> Result<u16> {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    let pattern = PATTERN.get_or_init(|| {
        Regex::new(r"(?i)solar\s*flux(?:\s*index)?[^0-9]{0,64}(\d{1,4})")
            .expect("built-in SFI pattern must compile")
    });

    let capture = pattern
        .captures(body)
        .and_then(|c| c.get(1))
        .ok_or_else(|| Error::SfiParse("no solar flux figure on page".to_string()))?;
    capture
        .as_str()
        .parse::<u16>()
        .map_err(|e| Error::SfiParse(format!("unparseable flux value: {e}")))
}

/// Resolve the effective SFI for a query.
///
/// Order: explicit value, then the live fetch, then manual entry when stdin
/// is a terminal. A fetch failure only surfaces as an error when no fallback
/// remains, so the recommendation path never crashes on a flaky page.
pub fn resolve_sfi(explicit: Option<i64>, url: &str) -> Result<(i64, SfiSource)> {
    if let Some(sfi) = explicit {
        return Ok((sfi, SfiSource::Explicit));
    }

    match fetch_current_sfi(url) {
        Ok(sfi) => Ok((i64::from(sfi), SfiSource::Live)),
        Err(err) => {
            warn!(%err, "live SFI fetch failed");
            if std::io::stdin().is_terminal() {
                let sfi = prompt_manual_sfi(&mut std::io::stdin().lock())?;
                Ok((sfi, SfiSource::Manual))
            } else {
                Err(Error::SfiUnavailable)
            }
        }
    }
}

/// Ask the operator for a value, allowing a few typos before giving up.
fn prompt_manual_sfi(input: &mut impl BufRead) -> Result<i64> {
    let mut stderr = std::io::stderr();
    for _ in 0..3 {
        write!(
            stderr,
            "Failed to fetch the current SFI (the page may be updating). Enter it manually: "
        )?;
        stderr.flush()?;

        let mut line = String::new();
        if input.read_line(&mut line)? == 0 {
            break; // EOF
        }
        if let Ok(sfi) = line.trim().parse::<i64>() {
            return Ok(sfi);
        }
        writeln!(stderr, "Not a number: {}", line.trim())?;
    }
    Err(Error::SfiUnavailable)
}
