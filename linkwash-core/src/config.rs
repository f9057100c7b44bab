//! Configuration management for `linkwash-core`.
//!
//! This module defines the settings that sit around the engine: which rules
//! are enabled, whether cleaned text is percent-decoded, and user-defined
//! regex rules. It handles serialization/deserialization of YAML settings and
//! provides utilities for loading, merging, and validating them.
//!
//! License: MIT OR Apache-2.0

use anyhow::{anyhow, Context, Result};
use log::{debug, info};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::Path;

use crate::engine::CleanOptions;
use crate::rules::catalog::BUILT_IN_IDS;

/// Maximum allowed length for a regex pattern string.
pub const MAX_PATTERN_LENGTH: usize = 500;

/// A user-defined regex substitution rule.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct CustomRule {
    /// Unique identifier; must not collide with a built-in rule id.
    pub id: String,
    /// Display name. Falls back to the id.
    pub name: Option<String>,
    /// Unanchored regex the URL must match for the rule to apply. Missing means every URL.
    pub domain_pattern: Option<String>,
    /// Regex whose matches are replaced.
    pub pattern: String,
    /// Replacement text, may reference capture groups as `$1`.
    pub replace_with: String,
    /// Compile `pattern` case-insensitively.
    pub case_insensitive: bool,
}

impl CustomRule {
    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or(&self.id)
    }
}

/// Top-level settings document.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct CleanerConfig {
    /// Percent-decode the cleaned text. Defaults to `false`.
    pub decode_url: Option<bool>,
    /// Enablement of rules named in neither list. Defaults to `true`.
    pub default_enabled: Option<bool>,
    /// Rules forced on.
    pub enable_rules: Vec<String>,
    /// Rules forced off; wins over `enable_rules`.
    pub disable_rules: Vec<String>,
    /// Regex rules registered after the built-in catalog.
    pub custom_rules: Vec<CustomRule>,
}

impl CleanerConfig {
    /// Loads settings from a YAML file and validates them.
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        info!("Loading cleaner settings from: {}", path.display());
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read settings file {}", path.display()))?;
        let config = Self::from_yaml(&text)
            .with_context(|| format!("Failed to load settings file {}", path.display()))?;

        info!(
            "Loaded {} custom rules from file {}.",
            config.custom_rules.len(),
            path.display()
        );
        Ok(config)
    }

    /// Parses and validates a YAML settings document.
    pub fn from_yaml(text: &str) -> Result<Self> {
        let config: CleanerConfig = serde_yml::from_str(text).context("Failed to parse settings")?;
        config.validate()?;
        Ok(config)
    }

    /// Loads the settings embedded in the library.
    pub fn load_default() -> Result<Self> {
        debug!("Loading default settings from embedded string...");
        let default_yaml = include_str!("../config/default_settings.yaml");
        let config: CleanerConfig =
            serde_yml::from_str(default_yaml).context("Failed to parse default settings")?;
        debug!("Loaded default settings with {} custom rules.", config.custom_rules.len());
        Ok(config)
    }

    pub fn decode_url(&self) -> bool {
        self.decode_url.unwrap_or(false)
    }

    pub fn default_enabled(&self) -> bool {
        self.default_enabled.unwrap_or(true)
    }

    pub fn options(&self) -> CleanOptions {
        CleanOptions {
            decode_url: self.decode_url(),
        }
    }

    /// Checks every custom rule and rule list, reporting all problems at once.
    pub fn validate(&self) -> Result<()> {
        let mut errors = validate_custom_rules(&self.custom_rules);

        for id in self.enable_rules.iter().chain(self.disable_rules.iter()) {
            if id.trim().is_empty() {
                errors.push("An `enable_rules`/`disable_rules` entry is empty.".to_string());
            }
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(anyhow!("Settings validation failed:\n{}", errors.join("\n")))
        }
    }
}

/// Merges user settings over defaults.
///
/// Rule lists are concatenated, user scalars win when set, and user custom
/// rules replace default ones with the same id.
pub fn merge_settings(default_config: CleanerConfig, user_config: Option<CleanerConfig>) -> CleanerConfig {
    let Some(user) = user_config else {
        debug!("merge_settings called without user settings.");
        return default_config;
    };

    debug!(
        "Merging user settings: {} enabled, {} disabled, {} custom rules.",
        user.enable_rules.len(),
        user.disable_rules.len(),
        user.custom_rules.len()
    );

    let mut custom_rules: Vec<CustomRule> = default_config
        .custom_rules
        .into_iter()
        .filter(|d| !user.custom_rules.iter().any(|u| u.id == d.id))
        .collect();
    custom_rules.extend(user.custom_rules);

    let mut enable_rules = default_config.enable_rules;
    enable_rules.extend(user.enable_rules);
    let mut disable_rules = default_config.disable_rules;
    disable_rules.extend(user.disable_rules);

    CleanerConfig {
        decode_url: user.decode_url.or(default_config.decode_url),
        default_enabled: user.default_enabled.or(default_config.default_enabled),
        enable_rules,
        disable_rules,
        custom_rules,
    }
}

/// Validates custom rule integrity (ids, regex compilation, capture groups).
fn validate_custom_rules(rules: &[CustomRule]) -> Vec<String> {
    let mut ids = HashSet::new();
    let mut errors = Vec::new();

    for rule in rules {
        if rule.id.trim().is_empty() {
            errors.push("A custom rule has an empty `id` field.".to_string());
        } else if !ids.insert(rule.id.as_str()) {
            errors.push(format!("Duplicate custom rule id found: '{}'.", rule.id));
        } else if BUILT_IN_IDS.contains(rule.id.as_str()) {
            errors.push(format!("Custom rule id '{}' is already used by a built-in rule.", rule.id));
        }

        if let Some(domain) = &rule.domain_pattern {
            check_pattern(&rule.id, "domain_pattern", domain, &mut errors);
        }

        if rule.pattern.is_empty() {
            errors.push(format!("Rule '{}' has an empty `pattern` field.", rule.id));
            continue;
        }
        let Some(regex) = check_pattern(&rule.id, "pattern", &rule.pattern, &mut errors) else {
            continue;
        };

        // captures_len counts the implicit whole-match group 0.
        let group_count = regex.captures_len() - 1;
        for group_num in replacement_references(&rule.replace_with) {
            if group_num > group_count {
                errors.push(format!(
                    "Rule '{}': replacement references non-existent capture group '${}'.",
                    rule.id, group_num
                ));
            }
        }
    }

    errors
}

fn check_pattern(id: &str, field: &str, pattern: &str, errors: &mut Vec<String>) -> Option<Regex> {
    if pattern.len() > MAX_PATTERN_LENGTH {
        errors.push(format!(
            "Rule '{}': `{}` length ({}) exceeds maximum allowed ({}).",
            id,
            field,
            pattern.len(),
            MAX_PATTERN_LENGTH
        ));
        return None;
    }
    match Regex::new(pattern) {
        Ok(regex) => Some(regex),
        Err(e) => {
            errors.push(format!("Rule '{}' has an invalid `{}` regex: {}", id, field, e));
            None
        }
    }
}

/// Numeric `$n` / `${n}` references in a replacement string.
fn replacement_references(replace_with: &str) -> Vec<usize> {
    let bytes = replace_with.as_bytes();
    let mut refs = Vec::new();
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] != b'$' {
            i += 1;
            continue;
        }
        if bytes.get(i + 1) == Some(&b'$') {
            i += 2;
            continue;
        }
        let braced = bytes.get(i + 1) == Some(&b'{');
        let start = if braced { i + 2 } else { i + 1 };
        let end = start + bytes[start.min(bytes.len())..].iter().take_while(|b| b.is_ascii_digit()).count();
        if end > start {
            if let Ok(n) = replace_with[start..end].parse::<usize>() {
                refs.push(n);
            }
        }
        i = end.max(i + 1);
    }
    refs
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_replacement_references() {
        assert_eq!(replacement_references("$1/x/${2}"), vec![1, 2]);
        assert_eq!(replacement_references("$$1 and $name"), Vec::<usize>::new());
        assert_eq!(replacement_references("trailing $"), Vec::<usize>::new());
    }

    #[test]
    fn test_defaults_when_unset() {
        let config = CleanerConfig::default();
        assert!(!config.decode_url());
        assert!(config.default_enabled());
        assert!(!config.options().decode_url);
    }
}
