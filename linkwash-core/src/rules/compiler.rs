//! compiler.rs - Compiles and caches user-defined rules.
//!
//! This module turns the `custom_rules` of a `CleanerConfig` into
//! [`RegexRule`]s. Compiled sets are kept in a global, thread-safe cache
//! keyed by a hash of the rule definitions, so engines rebuilt from the same
//! settings share one compilation.
//!
//! License: MIT OR APACHE 2.0

use lazy_static::lazy_static;
use log::debug;
use std::collections::hash_map::DefaultHasher;
use std::collections::HashMap;
use std::hash::{Hash, Hasher};
use std::sync::{Arc, RwLock};

use crate::config::CustomRule;
use crate::errors::CleanerError;
use crate::rule::Rule;
use crate::rules::{compile_pattern, DomainMatcher, RegexRule};

/// A compiled set of custom rules, in configuration order.
pub type CompiledRules = Vec<Arc<dyn Rule>>;

lazy_static! {
    static ref COMPILED_RULES_CACHE: RwLock<HashMap<u64, Arc<CompiledRules>>> = RwLock::new(HashMap::new());
}

fn hash_rules(rules: &[CustomRule]) -> u64 {
    let mut hasher = DefaultHasher::new();
    rules.hash(&mut hasher);
    hasher.finish()
}

/// Compiles custom rules into regex substitution rules.
///
/// All failures are collected and reported together as one `Fatal` error.
pub fn compile_rules(rules: &[CustomRule]) -> Result<CompiledRules, CleanerError> {
    debug!("Starting compilation of {} custom rules.", rules.len());

    let mut compiled: CompiledRules = Vec::with_capacity(rules.len());
    let mut compilation_errors = Vec::new();

    for rule in rules {
        match compile_rule(rule) {
            Ok(regex_rule) => {
                debug!(target: "linkwash_core::compiler", "Custom rule '{}' compiled successfully.", rule.id);
                compiled.push(Arc::new(regex_rule));
            }
            Err(e) => compilation_errors.push(e),
        }
    }

    if !compilation_errors.is_empty() {
        let error_message = compilation_errors
            .iter()
            .map(|e| e.to_string())
            .collect::<Vec<String>>()
            .join("\n");
        return Err(CleanerError::Fatal(format!(
            "Failed to compile {} rule(s):\n{}",
            compilation_errors.len(),
            error_message
        )));
    }

    debug!("Finished compiling custom rules. Total compiled: {}.", compiled.len());
    Ok(compiled)
}

fn compile_rule(rule: &CustomRule) -> Result<RegexRule, CleanerError> {
    let domain = match &rule.domain_pattern {
        Some(pattern) => DomainMatcher::regex(&rule.id, pattern)?,
        None => DomainMatcher::Any,
    };
    let pattern = compile_pattern(&rule.id, &rule.pattern, rule.case_insensitive)?;
    Ok(RegexRule::new(&rule.id, rule.display_name(), domain, pattern, &rule.replace_with))
}

/// Returns the compiled form of `rules`, compiling on a cache miss.
pub fn get_or_compile_rules(rules: &[CustomRule]) -> Result<Arc<CompiledRules>, CleanerError> {
    let cache_key = hash_rules(rules);

    {
        let cache = COMPILED_RULES_CACHE
            .read()
            .map_err(|_| CleanerError::Fatal("compiled rules cache lock poisoned".to_string()))?;
        if let Some(compiled) = cache.get(&cache_key) {
            debug!("Serving compiled custom rules from cache for key: {}", cache_key);
            return Ok(Arc::clone(compiled));
        }
    }

    debug!("Compiled custom rules not found in cache. Compiling now.");
    let compiled = Arc::new(compile_rules(rules)?);

    COMPILED_RULES_CACHE
        .write()
        .map_err(|_| CleanerError::Fatal("compiled rules cache lock poisoned".to_string()))?
        .insert(cache_key, Arc::clone(&compiled));

    debug!("Successfully compiled and cached custom rules for key: {}", cache_key);
    Ok(compiled)
}
