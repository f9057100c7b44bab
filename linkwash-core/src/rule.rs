// linkwash-core/src/rule.rs
//! Defines the core `Rule` trait and related data structures.
//!
//! A rule is a single, stateless URL transformation scoped to the domains its
//! predicate accepts. Concrete behaviors live in the `rules` module; the
//! engine only ever talks to this trait.
//!
//! License: MIT OR APACHE 2.0

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::errors::RuleError;

/// A trait that defines a single URL cleaning rule.
///
/// Implementations must be pure: the same input always yields the same output
/// and no state is touched. Re-applying `transform` to its own output must be
/// a no-op or converge quickly, since the engine loops until the URL is stable.
pub trait Rule: Send + Sync {
    /// Stable, unique identifier (e.g. `"amazon_smile"`).
    fn id(&self) -> &str;

    /// Human-readable display name. Opaque to the engine.
    fn name(&self) -> &str;

    /// Returns `true` if this rule applies to `url`.
    ///
    /// Never fails; empty or malformed input simply does not match.
    fn matches_domain(&self, url: &str) -> bool;

    /// Rewrites `url`. Only called when `matches_domain` returned `true`.
    fn transform(&self, url: &str) -> Result<String, RuleError>;
}

impl fmt::Debug for dyn Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Rule")
            .field("id", &self.id())
            .field("name", &self.name())
            .finish()
    }
}

/// Catalog entry describing a registered rule, for settings listings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuleInfo {
    pub id: String,
    pub name: String,
}

impl RuleInfo {
    pub fn of(rule: &dyn Rule) -> Self {
        Self {
            id: rule.id().to_string(),
            name: rule.name().to_string(),
        }
    }
}
