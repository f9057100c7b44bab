// linkwash-core/src/engine.rs
//! The cleaning engine.
//!
//! `CleaningEngine::clean` finds every `http://` / `https://` token in a
//! piece of text, runs each one through the enabled rules that match it until
//! the URL stops changing (at most `MAX_ITERATIONS` passes), splices the
//! results back into the text and optionally percent-decodes the whole thing.
//!
//! A rule that fails with `MalformedInput` is skipped for that pass; the other
//! rules still run. Only an empty input or a failed decode aborts the call.
//!
//! License: MIT OR APACHE 2.0

use lazy_static::lazy_static;
use log::{debug, info, warn};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::cleaning_result::{log_rule_applied_debug, log_url_cleaned_debug, CleaningResult, UrlReport};
use crate::config::CleanerConfig;
use crate::decode::percent_decode;
use crate::errors::CleanerError;
use crate::repository::{RuleRepository, RuleSettings};
use crate::rule_set::RuleSet;
use crate::rules::compiler::get_or_compile_rules;
use crate::rules::catalog;

/// Upper bound on rule passes per URL. Guards against rules that undo each other.
pub const MAX_ITERATIONS: usize = 5;

lazy_static! {
    static ref URL_REGEX: Regex = Regex::new(r"https?://\S+").expect("URL regex is valid");
}

/// Per-call options.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CleanOptions {
    /// Percent-decode the cleaned text as a final step.
    pub decode_url: bool,
}

/// Applies a rule set to URLs embedded in text.
///
/// Cheap to clone; clones share the rule set and the repository, so one engine
/// can serve concurrent `clean` calls from several threads.
#[derive(Clone)]
pub struct CleaningEngine {
    rule_set: Arc<RuleSet>,
    repository: Arc<dyn RuleRepository>,
}

impl std::fmt::Debug for CleaningEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CleaningEngine")
            .field("rules", &self.rule_set.len())
            .finish_non_exhaustive()
    }
}

impl CleaningEngine {
    pub fn new(rule_set: RuleSet, repository: Arc<dyn RuleRepository>) -> Self {
        Self::with_shared_rules(Arc::new(rule_set), repository)
    }

    pub fn with_shared_rules(rule_set: Arc<RuleSet>, repository: Arc<dyn RuleRepository>) -> Self {
        Self { rule_set, repository }
    }

    /// Builds an engine from settings: the built-in catalog followed by the
    /// configured custom rules, with enablement taken from the settings lists.
    pub fn from_config(config: &CleanerConfig) -> Result<Self, CleanerError> {
        let mut builder = RuleSet::builder();
        builder.register_all(catalog::default_rules()?)?;
        let custom = get_or_compile_rules(&config.custom_rules)?;
        builder.register_all(custom.iter().cloned())?;
        let rule_set = builder.build();

        let settings = RuleSettings::from_config(config);
        settings.unknown_ids(&rule_set);

        info!(
            "Cleaning engine ready with {} rules ({} custom).",
            rule_set.len(),
            custom.len()
        );
        Ok(Self::new(rule_set, Arc::new(settings)))
    }

    pub fn rule_set(&self) -> &RuleSet {
        &self.rule_set
    }

    /// Cleans every URL in `text`.
    pub fn clean(&self, text: &str, options: CleanOptions) -> Result<CleaningResult, CleanerError> {
        if text.is_empty() {
            return Err(CleanerError::EmptyInput);
        }

        let mut cleaned = String::with_capacity(text.len());
        let mut urls = Vec::new();
        let mut reports = Vec::new();
        let mut last_end = 0usize;

        for found in URL_REGEX.find_iter(text) {
            let report = self.clean_url(found.as_str(), found.start());
            log_url_cleaned_debug(module_path!(), &report);

            cleaned.push_str(&text[last_end..found.start()]);
            cleaned.push_str(&report.cleaned_url);
            last_end = found.end();

            urls.push(report.cleaned_url.clone());
            reports.push(report);
        }
        cleaned.push_str(&text[last_end..]);

        let cleaned_text = if options.decode_url {
            percent_decode(&cleaned, true).map_err(CleanerError::DecodeFailure)?
        } else {
            cleaned
        };

        debug!("Cleaned {} URL(s) in {} bytes of text.", urls.len(), text.len());

        Ok(CleaningResult {
            original_text: text.to_string(),
            cleaned_text,
            urls,
            reports,
        })
    }

    /// Runs the fixed-point loop for one URL.
    fn clean_url(&self, url: &str, start: usize) -> UrlReport {
        let mut report = UrlReport {
            original_url: url.to_string(),
            start,
            ..Default::default()
        };

        let mut current = url.to_string();
        loop {
            let next = self.apply_rules(&current, &mut report);
            report.iterations += 1;
            let changed = next != current;
            current = next;
            if !changed || report.iterations >= MAX_ITERATIONS {
                break;
            }
        }

        if report.iterations >= MAX_ITERATIONS {
            debug!("URL '{}' hit the iteration cap of {}.", url, MAX_ITERATIONS);
        }
        report.cleaned_url = current;
        report
    }

    /// One pass: folds every enabled, matching rule over `url`.
    fn apply_rules(&self, url: &str, report: &mut UrlReport) -> String {
        let matching = self.rule_set.enabled_matching(url, self.repository.as_ref());

        let mut current = url.to_string();
        for rule in matching {
            match rule.transform(&current) {
                Ok(next) => {
                    if next != current {
                        log_rule_applied_debug(module_path!(), rule.id(), &current, &next);
                        report.applied_rules.push(rule.id().to_string());
                    }
                    current = next;
                }
                Err(e) => {
                    warn!("Skipping rule '{}': {}", rule.id(), e);
                    report.skipped_rules.push(rule.id().to_string());
                }
            }
        }

        repair_query_separator(current)
    }
}

/// Turns the first `&` into `?` when stripping removed the parameter that
/// followed the original `?`. The fragment is left alone.
fn repair_query_separator(url: String) -> String {
    let head_end = url.find('#').unwrap_or(url.len());
    let head = &url[..head_end];
    match (head.find('?'), head.find('&')) {
        (None, Some(amp)) => {
            let mut repaired = url;
            repaired.replace_range(amp..amp + 1, "?");
            repaired
        }
        _ => url,
    }
}
