//! Host rewriting.

use regex::Regex;

use crate::errors::{CleanerError, RuleError};
use crate::rule::Rule;
use crate::rules::compile_pattern;

/// Replaces the span of capture group 1 of `pattern` with a fixed host.
///
/// The pattern doubles as the domain predicate; the rest of the URL is left
/// byte-for-byte intact.
#[derive(Debug)]
pub struct DomainRewriter {
    id: String,
    name: String,
    pattern: Regex,
    replacement: String,
}

impl DomainRewriter {
    pub fn new(id: &str, name: &str, pattern: &str, replacement: &str) -> Result<Self, CleanerError> {
        Ok(Self {
            id: id.to_string(),
            name: name.to_string(),
            pattern: compile_pattern(id, pattern, true)?,
            replacement: replacement.to_string(),
        })
    }
}

impl Rule for DomainRewriter {
    fn id(&self) -> &str {
        &self.id
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn matches_domain(&self, url: &str) -> bool {
        self.pattern.is_match(url)
    }

    fn transform(&self, url: &str) -> Result<String, RuleError> {
        let Some(group) = self.pattern.captures(url).and_then(|caps| caps.get(1)) else {
            return Ok(url.to_string());
        };

        let mut out = String::with_capacity(url.len());
        out.push_str(&url[..group.start()]);
        out.push_str(&self.replacement);
        out.push_str(&url[group.end()..]);
        Ok(out)
    }
}
