// linkwash-core/tests/config_tests.rs
use anyhow::Result;
use std::fs;
use tempfile::tempdir;

use linkwash_core::{
    headless_clean_string, merge_settings, CleanOptions, CleanerConfig, CleanerError, CleaningEngine,
    CustomRule,
};

#[test_log::test]
fn test_load_from_file_and_clean() -> Result<()> {
    let dir = tempdir()?;
    let path = dir.path().join("settings.yaml");
    fs::write(
        &path,
        r#"
decode_url: true
disable_rules:
  - youtube_short_url
custom_rules:
  - id: example_tracker
    domain_pattern: "example\\.org"
    pattern: "[?&]track=[^&#]*"
    replace_with: ""
"#,
    )?;

    let config = CleanerConfig::load_from_file(&path)?;
    assert!(config.decode_url());
    assert_eq!(config.custom_rules.len(), 1);
    assert_eq!(config.custom_rules[0].display_name(), "example_tracker");

    let engine = CleaningEngine::from_config(&config)?;
    let result = engine.clean(
        "https://example.org/a%20b?track=1 https://youtu.be/abc123",
        config.options(),
    )?;
    assert_eq!(result.cleaned_text, "https://example.org/a b https://youtu.be/abc123");
    Ok(())
}

#[test]
fn test_missing_file_is_an_error() {
    let dir = tempdir().unwrap();
    let err = CleanerConfig::load_from_file(dir.path().join("missing.yaml")).unwrap_err();
    assert!(err.to_string().contains("Failed to read settings file"));
}

#[test]
fn test_validation_reports_every_problem() {
    let yaml = r#"
custom_rules:
  - id: broken
    pattern: "([unclosed"
  - id: broken
    pattern: "a"
  - id: bad_group
    pattern: "(x)"
    replace_with: "$2"
  - id: ""
    pattern: "y"
"#;
    let err = CleanerConfig::from_yaml(yaml).unwrap_err();
    let message = format!("{:#}", err);
    assert!(message.contains("invalid `pattern` regex"), "{}", message);
    assert!(message.contains("Duplicate custom rule id found: 'broken'"), "{}", message);
    assert!(message.contains("non-existent capture group '$2'"), "{}", message);
    assert!(message.contains("empty `id` field"), "{}", message);
}

#[test]
fn test_overlong_pattern_is_rejected() {
    let config = CleanerConfig {
        custom_rules: vec![CustomRule {
            id: "long".to_string(),
            pattern: "a".repeat(linkwash_core::MAX_PATTERN_LENGTH + 1),
            ..Default::default()
        }],
        ..Default::default()
    };
    let err = config.validate().unwrap_err();
    assert!(err.to_string().contains("exceeds maximum allowed"));
}

#[test]
fn test_merge_settings() -> Result<()> {
    let defaults = CleanerConfig::load_default()?;
    let user = CleanerConfig::from_yaml(
        r#"
decode_url: true
disable_rules: [spotify]
custom_rules:
  - id: amazon_ref_path
    pattern: "/ref=.*$"
    replace_with: ""
  - id: extra
    pattern: "x"
    replace_with: "y"
"#,
    )?;

    let merged = merge_settings(defaults.clone(), Some(user));
    assert!(merged.decode_url());
    assert!(merged.default_enabled());
    assert_eq!(merged.disable_rules, vec!["spotify".to_string()]);
    let ids: Vec<&str> = merged.custom_rules.iter().map(|r| r.id.as_str()).collect();
    assert_eq!(ids, vec!["amazon_ref_path", "extra"]);
    assert_eq!(merged.custom_rules[0].pattern, "/ref=.*$");

    assert_eq!(merge_settings(defaults.clone(), None), defaults);
    Ok(())
}

#[test]
fn test_default_settings_enable_everything() -> Result<()> {
    let config = CleanerConfig::load_default()?;
    config.validate()?;
    let engine = CleaningEngine::from_config(&config)?;
    assert!(engine.rule_set().get("amazon_ref_path").is_some());

    let result = engine.clean(
        "https://www.amazon.de/gp/help/ref=footer_help",
        CleanOptions::default(),
    )?;
    assert_eq!(result.cleaned_text, "https://www.amazon.de/gp/help");
    Ok(())
}

#[test]
fn test_custom_rule_cannot_shadow_built_in() {
    let config = CleanerConfig {
        custom_rules: vec![CustomRule {
            id: "spotify".to_string(),
            pattern: "si=".to_string(),
            ..Default::default()
        }],
        ..Default::default()
    };
    match CleaningEngine::from_config(&config) {
        Err(CleanerError::DuplicateRuleId(id)) => assert_eq!(id, "spotify"),
        other => panic!("expected DuplicateRuleId, got {:?}", other),
    }
}

#[test]
fn test_validation_flags_built_in_id_collision() {
    let err = CleanerConfig::from_yaml(
        r#"
custom_rules:
  - id: youtube
    pattern: "x"
"#,
    )
    .unwrap_err();
    assert!(err.to_string().contains("already used by a built-in rule"));
}

#[test]
fn test_invalid_custom_rule_fails_engine_construction() {
    let config = CleanerConfig {
        custom_rules: vec![CustomRule {
            id: "bad".to_string(),
            pattern: "(".to_string(),
            ..Default::default()
        }],
        ..Default::default()
    };
    assert!(matches!(CleaningEngine::from_config(&config), Err(CleanerError::Fatal(_))));
}

#[test]
fn test_default_disabled_with_explicit_enable() -> Result<()> {
    let config = CleanerConfig::from_yaml(
        r#"
default_enabled: false
enable_rules: [instagram]
"#,
    )?;
    let cleaned = headless_clean_string(
        &config,
        "https://www.instagram.com/p/Ceeg-VgI4yF/?igshid=abc&utm_source=ig",
    )?;
    assert_eq!(cleaned, "https://www.instagram.com/p/Ceeg-VgI4yF/?utm_source=ig");
    Ok(())
}
