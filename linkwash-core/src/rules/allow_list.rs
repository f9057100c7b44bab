//! Keeps only allow-listed query parameters.
//!
//! An empty allow-list drops the whole query string, which is how services
//! whose URLs never need parameters (Threads, IKEA, Substack) are handled.

use crate::errors::RuleError;
use crate::rule::Rule;
use crate::rules::{join_url, pair_key, split_url, DomainMatcher};

#[derive(Debug)]
pub struct QueryAllowList {
    id: String,
    name: String,
    domain: DomainMatcher,
    allowed: Vec<String>,
}

impl QueryAllowList {
    pub fn new(id: &str, name: &str, domain: DomainMatcher, allowed: &[&str]) -> Self {
        Self {
            id: id.to_string(),
            name: name.to_string(),
            domain,
            allowed: allowed.iter().map(|k| k.to_string()).collect(),
        }
    }

    /// Drops every query parameter.
    pub fn strip_all(id: &str, name: &str, domain: DomainMatcher) -> Self {
        Self::new(id, name, domain, &[])
    }

    pub fn allowed(&self) -> &[String] {
        &self.allowed
    }

    fn is_allowed(&self, pair: &str) -> bool {
        let key = pair_key(pair);
        self.allowed.iter().any(|k| k == key)
    }
}

impl Rule for QueryAllowList {
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
        let parts = split_url(url);
        let Some(query) = parts.query else {
            return Ok(url.to_string());
        };

        let pairs: Vec<&str> = query.split('&').filter(|p| !p.is_empty()).collect();
        let kept: Vec<&str> = pairs.iter().copied().filter(|p| self.is_allowed(p)).collect();
        if kept.len() == pairs.len() && !query.is_empty() && !query.contains("&&") {
            return Ok(url.to_string());
        }

        Ok(join_url(parts.base, &kept, parts.fragment))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn youtube() -> QueryAllowList {
        QueryAllowList::new(
            "youtube",
            "YouTube",
            DomainMatcher::host_path("youtube", r"youtube\.com", "(?:watch|results)").unwrap(),
            &["v", "search_query"],
        )
    }

    #[test]
    fn test_keeps_only_video_id() {
        assert_eq!(
            youtube()
                .transform("https://m.youtube.com/watch?v=CvFH_6DNRCY&pp=ygUHZGVidXNzeQ%3D%3D")
                .unwrap(),
            "https://m.youtube.com/watch?v=CvFH_6DNRCY"
        );
    }

    #[test]
    fn test_kept_parameter_moves_behind_question_mark() {
        assert_eq!(
            youtube()
                .transform("https://m.youtube.com/results?sp=mAEA&search_query=funny+dog+video")
                .unwrap(),
            "https://m.youtube.com/results?search_query=funny+dog+video"
        );
    }

    #[test]
    fn test_strip_all_removes_query_keeps_fragment() {
        let rule = QueryAllowList::strip_all(
            "threads",
            "Threads",
            DomainMatcher::host("threads", r"threads\.(?:net|com)").unwrap(),
        );
        assert_eq!(
            rule.transform("https://www.threads.net/t/CufR4M8yNdJ/?igshid=NTc4MTIwNjQ2YQ==")
                .unwrap(),
            "https://www.threads.net/t/CufR4M8yNdJ/"
        );
        assert_eq!(
            rule.transform("https://www.threads.com/@x/post/1?xmt=abc#reply").unwrap(),
            "https://www.threads.com/@x/post/1#reply"
        );
    }

    #[test]
    fn test_clean_url_is_unchanged() {
        let url = "https://www.youtube.com/watch?v=abc123";
        assert_eq!(youtube().transform(url).unwrap(), url);
        assert!(!youtube().matches_domain("https://www.youtube.com/redirect?q=x"));
    }
}
