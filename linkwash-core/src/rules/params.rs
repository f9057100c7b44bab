//! Query parameter strippers.
//!
//! A `ParameterStripper` removes every `[?&]key=value` segment whose key
//! matches its pattern. The delimiter goes with the pair, so removing the first
//! parameter of `?a=1&b=2` leaves `&b=2`; the engine turns that leading `&`
//! back into `?` after each pass. Only the part before `#` is searched; it
//! need not contain a `?`.

use regex::Regex;

use crate::errors::{CleanerError, RuleError};
use crate::rule::Rule;
use crate::rules::{compile_pattern, DomainMatcher};

/// Result of a strip pass, with the number of removed parameters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StripOutcome {
    pub output: String,
    pub artifacts_removed: usize,
}

#[derive(Debug)]
pub struct ParameterStripper {
    id: String,
    name: String,
    domain: DomainMatcher,
    regex: Regex,
}

impl ParameterStripper {
    /// Strips parameters whose key starts with one of `prefixes`.
    ///
    /// `prefixes` is a regex alternation such as `utm_|ga_`.
    pub fn with_prefixes(
        id: &str,
        name: &str,
        domain: DomainMatcher,
        prefixes: &str,
    ) -> Result<Self, CleanerError> {
        let pattern = format!(r"[?&](?:{})[^=&#]*=[^&#]*", prefixes);
        Self::build(id, name, domain, &pattern, false)
    }

    /// Strips the exactly named parameters.
    pub fn with_names(
        id: &str,
        name: &str,
        domain: DomainMatcher,
        names: &[&str],
    ) -> Result<Self, CleanerError> {
        Self::build(id, name, domain, &names_pattern(names), false)
    }

    /// Same as [`ParameterStripper::with_names`], comparing keys case-insensitively.
    pub fn with_names_ignore_case(
        id: &str,
        name: &str,
        domain: DomainMatcher,
        names: &[&str],
    ) -> Result<Self, CleanerError> {
        Self::build(id, name, domain, &names_pattern(names), true)
    }

    fn build(
        id: &str,
        name: &str,
        domain: DomainMatcher,
        pattern: &str,
        case_insensitive: bool,
    ) -> Result<Self, CleanerError> {
        Ok(Self {
            id: id.to_string(),
            name: name.to_string(),
            domain,
            regex: compile_pattern(id, pattern, case_insensitive)?,
        })
    }

    /// Removes matching parameters and counts them. The fragment is never
    /// searched.
    pub fn strip(&self, url: &str) -> StripOutcome {
        let (head, fragment) = url.split_at(url.find('#').unwrap_or(url.len()));
        let artifacts_removed = self.regex.find_iter(head).count();
        if artifacts_removed == 0 {
            return StripOutcome {
                output: url.to_string(),
                artifacts_removed,
            };
        }

        let mut output = self.regex.replace_all(head, "").into_owned();
        output.push_str(fragment);
        StripOutcome {
            output,
            artifacts_removed,
        }
    }
}

fn names_pattern(names: &[&str]) -> String {
    let alternation = names
        .iter()
        .map(|n| regex::escape(n))
        .collect::<Vec<_>>()
        .join("|");
    format!(r"[?&](?:{})=[^&#]*", alternation)
}

impl Rule for ParameterStripper {
    fn id(&self) -> &str {
        &self.id
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn matches_domain(&self, url: &str) -> bool {
        self.domain.is_match(url)
    }

    fn transform(&self, url: &str) -> Result<String, RuleError> {
        Ok(self.strip(url).output)
    }
}
