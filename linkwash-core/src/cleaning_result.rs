// linkwash-core/src/cleaning_result.rs
//! Result types of a `clean` call, plus the debug logging helpers the engine
//! uses to trace rule applications.

use log::debug;
use serde::{Deserialize, Serialize};

/// What happened to one URL occurrence during cleaning.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct UrlReport {
    /// The URL as found in the input text.
    pub original_url: String,
    /// The URL after the fixed-point loop, before any whole-text decoding.
    pub cleaned_url: String,
    /// Byte offset of the occurrence in the input text.
    pub start: usize,
    /// Loop iterations run, between 1 and the iteration cap.
    pub iterations: usize,
    /// Rules whose transform changed the URL, in application order. A rule
    /// appears once per change.
    pub applied_rules: Vec<String>,
    /// Rules skipped after failing with `MalformedInput`.
    #[serde(default)]
    pub skipped_rules: Vec<String>,
}

impl UrlReport {
    pub fn was_modified(&self) -> bool {
        self.original_url != self.cleaned_url
    }
}

/// Output of one `clean` call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CleaningResult {
    pub original_text: String,
    pub cleaned_text: String,
    /// Cleaned URLs in order of appearance, one per occurrence.
    pub urls: Vec<String>,
    /// One report per entry of `urls`.
    #[serde(default)]
    pub reports: Vec<UrlReport>,
}

impl CleaningResult {
    pub fn is_modified(&self) -> bool {
        self.original_text != self.cleaned_text
    }
}

pub fn log_rule_applied_debug(module_path: &str, rule_id: &str, before: &str, after: &str) {
    debug!("{} Rule '{}' rewrote '{}' -> '{}'", module_path, rule_id, before, after);
}

pub fn log_url_cleaned_debug(module_path: &str, report: &UrlReport) {
    debug!(
        "{} Cleaned URL in {} iteration(s): '{}' -> '{}' (applied: {:?}, skipped: {:?})",
        module_path,
        report.iterations,
        report.original_url,
        report.cleaned_url,
        report.applied_rules,
        report.skipped_rules
    );
}
