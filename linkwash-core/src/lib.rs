// linkwash-core/src/lib.rs
//! # linkwash Core Library
//!
//! `linkwash-core` removes tracking parameters, redirect wrappers and
//! platform-specific cruft from URLs embedded in free-form text. It defines the
//! `Rule` abstraction, a catalog of concrete rules, the ordered `RuleSet` they
//! are registered in, and the `CleaningEngine` that applies them.
//!
//! The library is pure and in-memory: no network access, no redirect
//! following, no persistence. Which rules are enabled is asked of an external
//! `RuleRepository` on every call.
//!
//! ## Modules
//!
//! * `rule`: Defines the `Rule` trait every transformation implements.
//! * `rules`: Concrete rule variants, the built-in catalog and the custom-rule compiler.
//! * `rule_set`: The ordered, immutable collection of registered rules.
//! * `repository`: Rule enablement lookups.
//! * `engine`: The `CleaningEngine` and its fixed-point loop.
//! * `cleaning_result`: Result and per-URL report types.
//! * `config`: YAML settings, validation and merging.
//! * `decode`: Strict percent-decoding.
//! * `headless`: One-shot and background convenience wrappers.
//!
//! ## Usage Example
//!
//! ```rust
//! use std::sync::Arc;
//! use linkwash_core::{AllEnabled, CleanOptions, CleaningEngine, RuleSet};
//!
//! fn main() -> Result<(), linkwash_core::CleanerError> {
//!     let engine = CleaningEngine::new(RuleSet::with_default_rules()?, Arc::new(AllEnabled));
//!
//!     let input = "Listen: https://open.spotify.com/album/5N2BIKomahKMAAirp8tiBN?si=BICcHVzTTqmqt82Y6f2e_A";
//!     let result = engine.clean(input, CleanOptions::default())?;
//!
//!     assert_eq!(result.cleaned_text, "Listen: https://open.spotify.com/album/5N2BIKomahKMAAirp8tiBN");
//!     assert_eq!(result.urls.len(), 1);
//!     Ok(())
//! }
//! ```
//!
//! ## Error Handling
//!
//! Cleaning and rule-set construction return the typed `CleanerError`. A rule
//! that cannot handle a URL returns `RuleError::MalformedInput`, which the
//! engine logs and skips. Settings loading uses `anyhow::Error` with context.
//!
//! ---
//! License: MIT OR Apache-2.0

pub mod cleaning_result;
pub mod config;
pub mod decode;
pub mod engine;
pub mod errors;
pub mod headless;
pub mod repository;
pub mod rule;
pub mod rule_set;
pub mod rules;

/// Re-exports the settings types and helpers.
pub use config::{merge_settings, CleanerConfig, CustomRule, MAX_PATTERN_LENGTH};

/// Re-exports the error types.
pub use errors::{CleanerError, RuleError};

/// Re-exports the rule abstraction and rule set.
pub use rule::{Rule, RuleInfo};
pub use rule_set::{RuleSet, RuleSetBuilder};

/// Re-exports enablement repositories.
pub use repository::{AllEnabled, InMemoryRuleRepository, RuleRepository, RuleSettings};

/// Re-exports the engine and its results.
pub use cleaning_result::{CleaningResult, UrlReport};
pub use engine::{CleanOptions, CleaningEngine, MAX_ITERATIONS};

/// Re-exports types and functions for one-shot and background use.
pub use headless::{clean_in_background, headless_clean_string};

/// Re-exports the concrete rule variants for hosts assembling their own catalog.
pub use rules::{
    DomainMatcher, DomainRewriter, EmptyParameterStripper, ParameterStripper, QueryAllowList,
    RedirectExtractor, RegexRule, ShortLinkExpander, StripOutcome,
};
