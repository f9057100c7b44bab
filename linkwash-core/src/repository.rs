// linkwash-core/src/repository.rs
//! Rule enablement lookups.
//!
//! The engine never stores which rules are on. It asks a `RuleRepository`
//! on every pass, so a repository backed by user settings can change between
//! two `clean` calls and the next call sees the new state.

use log::{debug, warn};
use std::collections::{HashMap, HashSet};
use std::sync::RwLock;

use crate::config::CleanerConfig;
use crate::rule_set::RuleSet;

/// Read-only query answering whether a rule is currently enabled.
///
/// Called once per rule per URL per loop iteration, so it must be cheap.
pub trait RuleRepository: Send + Sync {
    fn is_enabled(&self, rule_id: &str) -> bool;
}

impl<F> RuleRepository for F
where
    F: Fn(&str) -> bool + Send + Sync,
{
    fn is_enabled(&self, rule_id: &str) -> bool {
        self(rule_id)
    }
}

/// Every rule is enabled.
#[derive(Debug, Clone, Copy, Default)]
pub struct AllEnabled;

impl RuleRepository for AllEnabled {
    fn is_enabled(&self, _rule_id: &str) -> bool {
        true
    }
}

/// Enablement derived from settings: explicit disables win over explicit
/// enables, anything else falls back to the default.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuleSettings {
    default_enabled: bool,
    enabled: HashSet<String>,
    disabled: HashSet<String>,
}

impl RuleSettings {
    pub fn new(default_enabled: bool, enable_rules: &[String], disable_rules: &[String]) -> Self {
        Self {
            default_enabled,
            enabled: enable_rules.iter().cloned().collect(),
            disabled: disable_rules.iter().cloned().collect(),
        }
    }

    pub fn from_config(config: &CleanerConfig) -> Self {
        Self::new(config.default_enabled(), &config.enable_rules, &config.disable_rules)
    }

    /// Logs a warning for every listed id the rule set does not know and
    /// returns those ids.
    pub fn unknown_ids(&self, rule_set: &RuleSet) -> Vec<String> {
        let mut unknown: Vec<String> = self
            .enabled
            .iter()
            .chain(self.disabled.iter())
            .filter(|id| rule_set.get(id).is_none())
            .cloned()
            .collect();
        unknown.sort();
        unknown.dedup();

        for id in &unknown {
            warn!("Rule '{}' in settings does not exist.", id);
        }
        unknown
    }
}

impl RuleRepository for RuleSettings {
    fn is_enabled(&self, rule_id: &str) -> bool {
        if self.disabled.contains(rule_id) {
            false
        } else if self.enabled.contains(rule_id) {
            true
        } else {
            self.default_enabled
        }
    }
}

/// Mutable enablement flags, for hosts that toggle rules at runtime.
#[derive(Debug, Default)]
pub struct InMemoryRuleRepository {
    default_enabled: bool,
    flags: RwLock<HashMap<String, bool>>,
}

impl InMemoryRuleRepository {
    pub fn new(default_enabled: bool) -> Self {
        Self {
            default_enabled,
            flags: RwLock::new(HashMap::new()),
        }
    }

    pub fn set_enabled(&self, rule_id: &str, enabled: bool) {
        debug!("Setting rule '{}' enabled={}", rule_id, enabled);
        let mut flags = self.flags.write().unwrap_or_else(|poisoned| poisoned.into_inner());
        flags.insert(rule_id.to_string(), enabled);
    }
}

impl RuleRepository for InMemoryRuleRepository {
    fn is_enabled(&self, rule_id: &str) -> bool {
        let flags = self.flags.read().unwrap_or_else(|poisoned| poisoned.into_inner());
        flags.get(rule_id).copied().unwrap_or(self.default_enabled)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_disable_wins_over_enable() {
        let settings = RuleSettings::new(
            false,
            &["spotify".to_string(), "youtube".to_string()],
            &["youtube".to_string()],
        );
        assert!(settings.is_enabled("spotify"));
        assert!(!settings.is_enabled("youtube"));
        assert!(!settings.is_enabled("ebay"));
    }

    #[test]
    fn test_closure_repository() {
        let only_spotify = |id: &str| id == "spotify";
        assert!(only_spotify.is_enabled("spotify"));
        assert!(!RuleRepository::is_enabled(&only_spotify, "ebay"));
    }

    #[test]
    fn test_in_memory_toggle() {
        let repo = InMemoryRuleRepository::new(true);
        assert!(repo.is_enabled("spotify"));
        repo.set_enabled("spotify", false);
        assert!(!repo.is_enabled("spotify"));
        assert!(repo.is_enabled("ebay"));
    }

    #[test]
    fn test_unknown_ids_are_reported() {
        let rule_set = RuleSet::with_default_rules().unwrap();
        let settings = RuleSettings::new(true, &["no_such_rule".to_string()], &["spotify".to_string()]);
        assert_eq!(settings.unknown_ids(&rule_set), vec!["no_such_rule".to_string()]);
    }
}
