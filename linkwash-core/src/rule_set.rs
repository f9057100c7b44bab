// linkwash-core/src/rule_set.rs
//! The ordered, immutable collection of registered rules.
//!
//! Registration order is significant: when several rules match one URL they
//! are applied first-registered-first. The set is assembled once through
//! [`RuleSetBuilder`] and never changes afterwards.

use log::debug;
use std::collections::HashSet;
use std::sync::Arc;

use crate::errors::CleanerError;
use crate::repository::RuleRepository;
use crate::rule::{Rule, RuleInfo};
use crate::rules::catalog;

#[derive(Debug, Clone)]
pub struct RuleSet {
    rules: Vec<Arc<dyn Rule>>,
}

/// Collects rules in order, rejecting duplicate ids.
#[derive(Debug, Default)]
pub struct RuleSetBuilder {
    rules: Vec<Arc<dyn Rule>>,
    ids: HashSet<String>,
}

impl RuleSetBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, rule: Arc<dyn Rule>) -> Result<(), CleanerError> {
        if !self.ids.insert(rule.id().to_string()) {
            return Err(CleanerError::DuplicateRuleId(rule.id().to_string()));
        }
        debug!("Registered rule '{}' at position {}.", rule.id(), self.rules.len());
        self.rules.push(rule);
        Ok(())
    }

    pub fn register_all<I>(&mut self, rules: I) -> Result<(), CleanerError>
    where
        I: IntoIterator<Item = Arc<dyn Rule>>,
    {
        rules.into_iter().try_for_each(|rule| self.register(rule))
    }

    pub fn build(self) -> RuleSet {
        RuleSet { rules: self.rules }
    }
}

impl RuleSet {
    pub fn builder() -> RuleSetBuilder {
        RuleSetBuilder::new()
    }

    /// Builds a set from `rules` in iteration order.
    pub fn from_rules<I>(rules: I) -> Result<Self, CleanerError>
    where
        I: IntoIterator<Item = Arc<dyn Rule>>,
    {
        let mut builder = RuleSetBuilder::new();
        builder.register_all(rules)?;
        Ok(builder.build())
    }

    /// The built-in catalog.
    pub fn with_default_rules() -> Result<Self, CleanerError> {
        Self::from_rules(catalog::default_rules()?)
    }

    /// Rules that are enabled in `repository` and whose domain predicate
    /// accepts `url`, in registration order.
    pub fn enabled_matching<'a>(&'a self, url: &str, repository: &dyn RuleRepository) -> Vec<&'a dyn Rule> {
        self.rules
            .iter()
            .map(|rule| rule.as_ref())
            .filter(|rule| repository.is_enabled(rule.id()) && rule.matches_domain(url))
            .collect()
    }

    pub fn get(&self, id: &str) -> Option<&dyn Rule> {
        self.rules.iter().map(|r| r.as_ref()).find(|r| r.id() == id)
    }

    pub fn ids(&self) -> impl Iterator<Item = &str> + '_ {
        self.rules.iter().map(|r| r.id())
    }

    pub fn infos(&self) -> Vec<RuleInfo> {
        self.rules.iter().map(|r| RuleInfo::of(r.as_ref())).collect()
    }

    pub fn rules(&self) -> &[Arc<dyn Rule>] {
        &self.rules
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::AllEnabled;
    use crate::rules::{DomainMatcher, EmptyParameterStripper, ParameterStripper};

    fn spotify() -> Arc<dyn Rule> {
        Arc::new(
            ParameterStripper::with_names(
                "spotify",
                "Spotify",
                DomainMatcher::host("spotify", r"spotify\.com").unwrap(),
                &["si"],
            )
            .unwrap(),
        )
    }

    fn empty() -> Arc<dyn Rule> {
        Arc::new(EmptyParameterStripper::new("empty_parameters", "Empty parameters"))
    }

    #[test]
    fn test_duplicate_ids_are_rejected() {
        let mut builder = RuleSet::builder();
        builder.register(spotify()).unwrap();
        match builder.register(spotify()) {
            Err(CleanerError::DuplicateRuleId(id)) => assert_eq!(id, "spotify"),
            other => panic!("expected DuplicateRuleId, got {:?}", other),
        }
    }

    #[test]
    fn test_enabled_matching_keeps_registration_order() {
        let set = RuleSet::from_rules(vec![empty(), spotify()]).unwrap();
        let ids: Vec<&str> = set
            .enabled_matching("https://open.spotify.com/track/1?si=x", &AllEnabled)
            .iter()
            .map(|r| r.id())
            .collect();
        assert_eq!(ids, vec!["empty_parameters", "spotify"]);
    }

    #[test]
    fn test_enabled_matching_filters_domain_and_enablement() {
        let set = RuleSet::from_rules(vec![spotify(), empty()]).unwrap();
        let only_spotify = |id: &str| id == "spotify";

        let matched = set.enabled_matching("https://example.com/?a=", &only_spotify);
        assert!(matched.is_empty());

        let matched = set.enabled_matching("https://open.spotify.com/", &only_spotify);
        assert_eq!(matched.len(), 1);
        assert_eq!(matched[0].id(), "spotify");
    }

    #[test]
    fn test_default_rule_set_lookup() {
        let set = RuleSet::with_default_rules().unwrap();
        assert!(!set.is_empty());
        assert_eq!(set.len(), set.infos().len());
        assert_eq!(set.get("youtube_short_url").map(|r| r.name()), Some("YouTube short URL"));
        assert!(set.ids().any(|id| id == "empty_parameters"));
    }
}
