//! Redirect-target extraction.
//!
//! Search engines and affiliate networks wrap the real destination in a
//! percent-encoded parameter or path segment. The extractor's target regex
//! captures that value in group 1; the first capture that decodes to an
//! `http`/`https` URL replaces the whole URL.

use regex::Regex;

use crate::decode::percent_decode;
use crate::errors::{CleanerError, RuleError};
use crate::rule::Rule;
use crate::rules::{compile_pattern, DomainMatcher};

#[derive(Debug)]
pub struct RedirectExtractor {
    id: String,
    name: String,
    domain: DomainMatcher,
    target: Regex,
}

impl RedirectExtractor {
    /// `target_pattern` must have one capture group holding the encoded target.
    pub fn new(
        id: &str,
        name: &str,
        domain: DomainMatcher,
        target_pattern: &str,
    ) -> Result<Self, CleanerError> {
        Ok(Self {
            id: id.to_string(),
            name: name.to_string(),
            domain,
            target: compile_pattern(id, target_pattern, false)?,
        })
    }

    /// Extracts from a query parameter, e.g. `url` for `?url=https%3A%2F%2F...`.
    pub fn for_parameter(
        id: &str,
        name: &str,
        domain: DomainMatcher,
        parameter: &str,
    ) -> Result<Self, CleanerError> {
        let pattern = format!(r"[?&](?:{})=([^&#]+)", parameter);
        Self::new(id, name, domain, &pattern)
    }
}

impl Rule for RedirectExtractor {
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
        let mut last_error = None;
        for encoded in self.target.captures_iter(url).filter_map(|caps| caps.get(1)) {
            match percent_decode(encoded.as_str(), false) {
                Ok(target) if is_web_url(&target) => return Ok(target),
                Ok(_) => last_error = Some("redirect target is not an http(s) URL".to_string()),
                Err(reason) => last_error = Some(reason),
            }
        }

        Err(RuleError::malformed(
            &self.id,
            last_error.unwrap_or_else(|| "redirect target parameter is missing".to_string()),
        ))
    }
}

fn is_web_url(target: &str) -> bool {
    let scheme = target.get(..8).unwrap_or(target).to_ascii_lowercase();
    scheme.starts_with("http://") || scheme.starts_with("https://")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn jdoqocy() -> RedirectExtractor {
        RedirectExtractor::for_parameter(
            "jdoqocy",
            "Jdoqocy",
            DomainMatcher::host_path("jdoqocy", r"jdoqocy\.com", "click-").unwrap(),
            "url",
        )
        .unwrap()
    }

    #[test]
    fn test_extracts_target_url() {
        let url = "https://www.jdoqocy.com/click-7988170-15232592?SID=11003b6m4t07&url=https%3A%2F%2Fwww.gog.com%2Fde%2Fgame%2Falwas_awakening";
        assert!(jdoqocy().matches_domain(url));
        assert_eq!(
            jdoqocy().transform(url).unwrap(),
            "https://www.gog.com/de/game/alwas_awakening"
        );
    }

    #[test]
    fn test_missing_target_is_malformed() {
        let err = jdoqocy()
            .transform("https://www.jdoqocy.com/click-1-2?SID=abc")
            .unwrap_err();
        assert!(matches!(err, RuleError::MalformedInput { ref rule, .. } if rule == "jdoqocy"));
    }

    #[test]
    fn test_undecodable_target_is_malformed() {
        assert!(jdoqocy()
            .transform("https://www.jdoqocy.com/click-1-2?url=https%3A%2F%2Fx.com%ZZ")
            .is_err());
    }

    #[test]
    fn test_plain_text_target_is_malformed() {
        let err = jdoqocy()
            .transform("https://www.jdoqocy.com/click-1-2?url=just+some+words")
            .unwrap_err();
        assert!(matches!(err, RuleError::MalformedInput { ref reason, .. } if reason.contains("not an http(s) URL")));
    }

    #[test]
    fn test_later_candidate_wins_over_plain_text() {
        let rule = RedirectExtractor::for_parameter("google_search", "Google", DomainMatcher::Any, "url|q").unwrap();
        assert_eq!(
            rule.transform("https://www.google.com/url?q=rust&url=HTTPS%3A%2F%2Fdocs.rs%2F").unwrap(),
            "HTTPS://docs.rs/"
        );
    }

    #[test]
    fn test_path_segment_target() {
        let rule = RedirectExtractor::new(
            "yahoo_search",
            "Yahoo search",
            DomainMatcher::host("yahoo_search", r"search\.yahoo\.com").unwrap(),
            r"/RU=([^/]+)/",
        )
        .unwrap();
        assert_eq!(
            rule.transform("https://r.search.yahoo.com/_ylt=Awr;_ylu=Y29s/RV=2/RE=1/RO=10/RU=https%3a%2f%2fwww.rust-lang.org%2f/RK=2/RS=abc-")
                .unwrap(),
            "https://www.rust-lang.org/"
        );
    }
}
