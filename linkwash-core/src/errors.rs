//! errors.rs - Custom error types for the linkwash-core library.
//!
//! This module defines structured error enums for the library, providing
//! specific, actionable error types that can be handled programmatically.
//!
//! `CleanerError` covers failures of a whole `clean` call or of rule-set
//! construction. `RuleError` is what a single rule returns when it cannot
//! rewrite a URL it claimed to match; the engine contains those locally.
//!
//! License: MIT OR APACHE 2.0

use thiserror::Error;

/// This enum represents all possible error types in the `linkwash-core` library.
///
/// By using `#[non_exhaustive]`, we signal to consumers of this library that
/// new variants may be added in future versions.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum CleanerError {
    #[error("Input text is empty")]
    EmptyInput,

    #[error("Failed to percent-decode cleaned text: {0}")]
    DecodeFailure(String),

    #[error("Rule id '{0}' is registered more than once")]
    DuplicateRuleId(String),

    #[error("Failed to compile rule '{0}': {1}")]
    RuleCompilationError(String, regex::Error),

    #[error("Rule '{0}': pattern length ({1}) exceeds maximum allowed ({2})")]
    PatternLengthExceeded(String, usize, usize),

    #[error("An unexpected I/O error occurred: {0}")]
    IoError(#[from] std::io::Error),

    #[error("A fatal error occurred: {0}")]
    Fatal(String),
}

/// Failure of a single rule transform.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum RuleError {
    #[error("Rule '{rule}' cannot handle input: {reason}")]
    MalformedInput { rule: String, reason: String },
}

impl RuleError {
    pub fn malformed(rule: &str, reason: impl Into<String>) -> Self {
        RuleError::MalformedInput {
            rule: rule.to_string(),
            reason: reason.into(),
        }
    }
}
