//! Removes query parameters that carry no value (`key=`), on every domain.

use crate::errors::RuleError;
use crate::rule::Rule;
use crate::rules::{join_url, split_url};

#[derive(Debug, Clone)]
pub struct EmptyParameterStripper {
    id: String,
    name: String,
}

impl EmptyParameterStripper {
    pub fn new(id: &str, name: &str) -> Self {
        Self {
            id: id.to_string(),
            name: name.to_string(),
        }
    }
}

// `key=` only; `=` inside a value (base64 padding) does not count.
fn is_empty_pair(pair: &str) -> bool {
    matches!(pair.find('='), Some(i) if i + 1 == pair.len())
}

impl Rule for EmptyParameterStripper {
    fn id(&self) -> &str {
        &self.id
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn matches_domain(&self, _url: &str) -> bool {
        true
    }

    fn transform(&self, url: &str) -> Result<String, RuleError> {
        let parts = split_url(url);
        let Some(query) = parts.query else {
            return Ok(url.to_string());
        };

        let pairs: Vec<&str> = query.split('&').collect();
        let kept: Vec<&str> = pairs.iter().copied().filter(|p| !is_empty_pair(p)).collect();
        if kept.len() == pairs.len() {
            return Ok(url.to_string());
        }

        Ok(join_url(parts.base, &kept, parts.fragment))
    }
}
