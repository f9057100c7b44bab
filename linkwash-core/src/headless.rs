// File: linkwash-core/src/headless.rs

//! `headless.rs`
//! Convenience wrappers for using the engine without a host application.
//!
//! `headless_clean_string` does a full one-shot clean from settings.
//! `clean_in_background` moves a `clean` call onto tokio's blocking pool so an
//! async caller (a UI event loop, a server handler) is not stalled by regex
//! work on long text.

use anyhow::Result;
use log::debug;

use crate::cleaning_result::CleaningResult;
use crate::config::CleanerConfig;
use crate::engine::{CleanOptions, CleaningEngine};
use crate::errors::CleanerError;

/// Cleans `content` with the built-in catalog plus the custom rules and
/// enablement of `config`, returning only the cleaned text.
///
/// # Arguments
///
/// * `config` - Settings, usually `merge_settings(defaults, user)`.
/// * `content` - The text to clean.
pub fn headless_clean_string(config: &CleanerConfig, content: &str) -> Result<String> {
    let engine = CleaningEngine::from_config(config)?;
    let result = engine.clean(content, config.options())?;
    debug!("Headless clean processed {} URL(s).", result.urls.len());
    Ok(result.cleaned_text)
}

/// Runs `engine.clean` on a blocking worker thread.
///
/// The engine holds no per-call state, so callers may fire several of these
/// concurrently and drop results that have gone stale.
pub async fn clean_in_background(
    engine: CleaningEngine,
    text: String,
    options: CleanOptions,
) -> Result<CleaningResult, CleanerError> {
    tokio::task::spawn_blocking(move || engine.clean(&text, options))
        .await
        .map_err(|e| CleanerError::Fatal(format!("background clean task failed: {}", e)))?
}
