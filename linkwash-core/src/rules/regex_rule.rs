//! Generic regex substitution rule.

use regex::Regex;

use crate::errors::RuleError;
use crate::rule::Rule;
use crate::rules::DomainMatcher;

/// Replaces every match of `pattern` with `replace_with`, which may reference
/// capture groups as `$1`, `${name}`.
#[derive(Debug)]
pub struct RegexRule {
    pub(crate) id: String,
    pub(crate) name: String,
    pub(crate) domain: DomainMatcher,
    pub(crate) pattern: Regex,
    pub(crate) replace_with: String,
}

impl RegexRule {
    pub fn new(id: &str, name: &str, domain: DomainMatcher, pattern: Regex, replace_with: &str) -> Self {
        Self {
            id: id.to_string(),
            name: name.to_string(),
            domain,
            pattern,
            replace_with: replace_with.to_string(),
        }
    }
}

impl Rule for RegexRule {
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
        Ok(self.pattern.replace_all(url, self.replace_with.as_str()).into_owned())
    }
}
