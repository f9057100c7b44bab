//! Short-link expansion into canonical long-form URLs.

use regex::Regex;

use crate::errors::{CleanerError, RuleError};
use crate::rule::Rule;
use crate::rules::{compile_pattern, split_url, DomainMatcher};

/// Captures identifier segments with `pattern` and renders them into
/// `template` (`$1`, `${2}`, ...).
///
/// Every capture group must participate in the match; a URL on the right
/// domain whose identifier cannot be isolated is `MalformedInput`.
///
/// By default the rendered template is the whole result. With
/// [`ShortLinkExpander::keeping_query`] the short link's query and fragment
/// are appended to it, so later rules can filter them.
#[derive(Debug)]
pub struct ShortLinkExpander {
    id: String,
    name: String,
    domain: DomainMatcher,
    pattern: Regex,
    template: String,
    keep_query: bool,
}

impl ShortLinkExpander {
    pub fn new(
        id: &str,
        name: &str,
        domain: DomainMatcher,
        pattern: &str,
        template: &str,
    ) -> Result<Self, CleanerError> {
        Ok(Self {
            id: id.to_string(),
            name: name.to_string(),
            domain,
            pattern: compile_pattern(id, pattern, false)?,
            template: template.to_string(),
            keep_query: false,
        })
    }

    pub fn keeping_query(mut self) -> Self {
        self.keep_query = true;
        self
    }
}

impl Rule for ShortLinkExpander {
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
        let caps = self
            .pattern
            .captures(url)
            .ok_or_else(|| RuleError::malformed(&self.id, "could not extract identifier from URL"))?;

        if caps.iter().skip(1).any(|group| group.map_or(true, |m| m.as_str().is_empty())) {
            return Err(RuleError::malformed(&self.id, "identifier segment is empty"));
        }

        let mut out = String::with_capacity(self.template.len() + url.len());
        caps.expand(&self.template, &mut out);

        if self.keep_query {
            let parts = split_url(url);
            if let Some(query) = parts.query.filter(|q| !q.is_empty()) {
                out.push(if out.contains('?') { '&' } else { '?' });
                out.push_str(query);
            }
            if let Some(fragment) = parts.fragment {
                out.push('#');
                out.push_str(fragment);
            }
        }
        Ok(out)
    }
}
