//! Concrete rule behaviors.
//!
//! Every variant here implements the [`Rule`](crate::rule::Rule) trait. Each is
//! a small pair of pure functions: a domain predicate and a transform. The
//! built-in catalog in `catalog` instantiates these variants for specific
//! services; `compiler` turns user-defined regex rules from configuration into
//! [`RegexRule`]s.
//!
//! Shared plumbing lives in this file: pattern compilation with the same
//! limits everywhere, the domain predicate type, and helpers that split a URL
//! into base, query and fragment.

pub mod allow_list;
pub mod catalog;
pub mod compiler;
pub mod domain;
pub mod empty_params;
pub mod params;
pub mod redirect;
pub mod regex_rule;
pub mod short_link;

pub use allow_list::QueryAllowList;
pub use domain::DomainRewriter;
pub use empty_params::EmptyParameterStripper;
pub use params::{ParameterStripper, StripOutcome};
pub use redirect::RedirectExtractor;
pub use regex_rule::RegexRule;
pub use short_link::ShortLinkExpander;

use log::debug;
use regex::{Regex, RegexBuilder};

use crate::config::MAX_PATTERN_LENGTH;
use crate::errors::CleanerError;

/// Compiled regex size limit, shared by built-in and user-defined rules.
const REGEX_SIZE_LIMIT: usize = 10 * (1 << 20);

/// Compiles `pattern` on behalf of rule `id`.
pub(crate) fn compile_pattern(
    id: &str,
    pattern: &str,
    case_insensitive: bool,
) -> Result<Regex, CleanerError> {
    if pattern.len() > MAX_PATTERN_LENGTH {
        return Err(CleanerError::PatternLengthExceeded(
            id.to_string(),
            pattern.len(),
            MAX_PATTERN_LENGTH,
        ));
    }

    let regex = RegexBuilder::new(pattern)
        .case_insensitive(case_insensitive)
        .size_limit(REGEX_SIZE_LIMIT)
        .build()
        .map_err(|e| CleanerError::RuleCompilationError(id.to_string(), e))?;

    debug!(target: "linkwash_core::rules", "Rule '{}' compiled pattern {:?}.", id, pattern);
    Ok(regex)
}

/// The domain predicate of a rule.
#[derive(Debug, Clone)]
pub enum DomainMatcher {
    /// Matches every input, including the empty string.
    Any,
    /// Matches when the regex finds a match anywhere in the input.
    Pattern(Regex),
}

impl DomainMatcher {
    /// Matches URLs whose host is `host_pattern`, optionally preceded by any
    /// subdomain, with or without an `http`/`https` scheme.
    ///
    /// `host_pattern` is a regex fragment, e.g. `spotify\.com` or `ebay\.[a-z.]+`.
    pub fn host(id: &str, host_pattern: &str) -> Result<Self, CleanerError> {
        let pattern = format!(
            r"^(?:https?://)?(?:[^/?#\s]*\.)?(?:{})(?::\d+)?(?:[/?#]|$)",
            host_pattern
        );
        Ok(DomainMatcher::Pattern(compile_pattern(id, &pattern, true)?))
    }

    /// Like [`DomainMatcher::host`], but the path must also start with `path_pattern`.
    pub fn host_path(id: &str, host_pattern: &str, path_pattern: &str) -> Result<Self, CleanerError> {
        let pattern = format!(
            r"^(?:https?://)?(?:[^/?#\s]*\.)?(?:{})(?::\d+)?/(?:{})",
            host_pattern, path_pattern
        );
        Ok(DomainMatcher::Pattern(compile_pattern(id, &pattern, true)?))
    }

    /// Uses `pattern` as-is, unanchored.
    pub fn regex(id: &str, pattern: &str) -> Result<Self, CleanerError> {
        Ok(DomainMatcher::Pattern(compile_pattern(id, pattern, false)?))
    }

    pub fn is_match(&self, url: &str) -> bool {
        match self {
            DomainMatcher::Any => true,
            DomainMatcher::Pattern(regex) => regex.is_match(url),
        }
    }
}

/// A URL split at its query and fragment delimiters.
///
/// `query` is `None` when the URL has no `?` before its fragment; a URL with a
/// bare trailing `?` has `Some("")`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct UrlParts<'a> {
    pub base: &'a str,
    pub query: Option<&'a str>,
    pub fragment: Option<&'a str>,
}

pub(crate) fn split_url(url: &str) -> UrlParts<'_> {
    let (head, fragment) = match url.find('#') {
        Some(i) => (&url[..i], Some(&url[i + 1..])),
        None => (url, None),
    };
    let (base, query) = match head.find('?') {
        Some(i) => (&head[..i], Some(&head[i + 1..])),
        None => (head, None),
    };
    UrlParts { base, query, fragment }
}

/// Reassembles a URL from its base, the surviving query pairs and the fragment.
/// The `?` is dropped when no pairs survive.
pub(crate) fn join_url(base: &str, pairs: &[&str], fragment: Option<&str>) -> String {
    let mut out = String::with_capacity(base.len() + 64);
    out.push_str(base);
    if !pairs.is_empty() {
        out.push('?');
        out.push_str(&pairs.join("&"));
    }
    if let Some(fragment) = fragment {
        out.push('#');
        out.push_str(fragment);
    }
    out
}

/// Key of a `key=value` pair; the whole pair when it has no `=`.
pub(crate) fn pair_key(pair: &str) -> &str {
    pair.split_once('=').map_or(pair, |(key, _)| key)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_url_parts() {
        let parts = split_url("https://example.com/a?x=1&y=2#top");
        assert_eq!(parts.base, "https://example.com/a");
        assert_eq!(parts.query, Some("x=1&y=2"));
        assert_eq!(parts.fragment, Some("top"));

        let parts = split_url("https://example.com/a#frag?notquery");
        assert_eq!(parts.query, None);
        assert_eq!(parts.fragment, Some("frag?notquery"));
    }

    #[test]
    fn test_join_url_drops_separator_without_pairs() {
        assert_eq!(join_url("https://example.com/", &[], None), "https://example.com/");
        assert_eq!(
            join_url("https://example.com/", &["a=1", "b=2"], Some("x")),
            "https://example.com/?a=1&b=2#x"
        );
    }

    #[test]
    fn test_host_matcher_ignores_scheme_and_www() {
        let matcher = DomainMatcher::host("t", r"spotify\.com").unwrap();
        assert!(matcher.is_match("https://open.spotify.com/album/1"));
        assert!(matcher.is_match("http://www.spotify.com"));
        assert!(matcher.is_match("spotify.com/track"));
        assert!(!matcher.is_match("https://notspotify.community/"));
        assert!(!matcher.is_match("https://example.com/?u=spotify.com"));
        assert!(!matcher.is_match(""));
    }

    #[test]
    fn test_host_path_matcher() {
        let matcher = DomainMatcher::host_path("t", r"ebay\.[a-z.]+", "itm/").unwrap();
        assert!(matcher.is_match("https://www.ebay.de/itm/1234?hash=1"));
        assert!(!matcher.is_match("https://www.ebay.de/sch/i.html"));
    }

    #[test]
    fn test_pattern_length_is_limited() {
        let long = "a".repeat(MAX_PATTERN_LENGTH + 1);
        assert!(matches!(
            compile_pattern("long", &long, false),
            Err(CleanerError::PatternLengthExceeded(_, _, _))
        ));
    }
}
