// filescrub-core/tests/config_integration_tests.rs
use anyhow::Result;
use std::io::Write;
use tempfile::{Builder, NamedTempFile};

use filescrub_core::{
    sanitize, PatternConfig, PatternFlags, PatternRegistry, PatternSpec, RedactionPolicy, RegistrationMode,
    ScrubError, Validator,
};

fn temp_with_suffix(suffix: &str, content: &str) -> Result<NamedTempFile> {
    let mut file = Builder::new().suffix(suffix).tempfile()?;
    file.write_all(content.as_bytes())?;
    Ok(file)
}

#[test]
fn test_load_builtin_patterns() {
    let config = PatternConfig::load_builtin().unwrap();
    assert_eq!(config.patterns.len(), 3);
    assert!(config.patterns.iter().all(|p| !p.description.is_empty()));
    let ssn = config.patterns.iter().find(|p| p.id == "us_ssn").unwrap();
    assert_eq!(ssn.validator, Some(Validator::UsSsn));
    assert_eq!(ssn.preserve_suffix, Some(4));
}

#[test]
fn test_load_yaml_file_with_flags_and_hints() -> Result<()> {
    let yaml_content = r#"
patterns:
  - id: employee_id
    expression: 'emp-[0-9]{6}'
    description: "Internal employee number"
    case_insensitive: true
    preserve_suffix: 2
  - id: api_key
    expression: 'sk_live_[A-Za-z0-9]{8,}'
"#;
    let file = temp_with_suffix(".yaml", yaml_content)?;
    let config = PatternConfig::load_from_file(file.path())?;

    assert_eq!(config.patterns.len(), 2);
    assert_eq!(config.patterns[0].id, "employee_id");
    assert!(config.patterns[0].flags.case_insensitive);
    assert!(!config.patterns[0].flags.multiline);
    assert_eq!(config.patterns[0].preserve_suffix, Some(2));
    assert_eq!(config.patterns[1].description, "");
    assert_eq!(config.patterns[1].flags, PatternFlags::default());
    assert_eq!(config.patterns[1].validator, None);
    Ok(())
}

#[test]
fn test_load_tsv_file() -> Result<()> {
    let file = temp_with_suffix(
        ".tsv",
        "# id\texpression\tdescription\nticket\tTCK-[0-9]{4}\tSupport ticket\n\nhost\tsrv[0-9]{2}\\.corp\n",
    )?;
    let config = PatternConfig::load_from_file(file.path())?;

    assert_eq!(
        config.patterns,
        vec![
            PatternSpec::new("ticket", "TCK-[0-9]{4}", "Support ticket"),
            PatternSpec::new("host", "srv[0-9]{2}\\.corp", ""),
        ]
    );
    Ok(())
}

#[test]
fn test_missing_file_error_names_the_path() {
    let err = PatternConfig::load_from_file("/definitely/not/here/patterns.yaml").unwrap_err();
    let message = format!("{:#}", err);
    assert!(message.contains("Failed to read pattern file"), "{}", message);
    assert!(message.contains("patterns.yaml"), "{}", message);
}

#[test]
fn test_bad_tsv_line_is_reported_with_line_number() -> Result<()> {
    let file = temp_with_suffix(".txt", "ok\tabc\nbroken_without_expression\n")?;
    let err = PatternConfig::load_from_file(file.path()).unwrap_err();

    let scrub = err.downcast_ref::<ScrubError>().expect("root cause is a ScrubError");
    assert!(matches!(scrub, ScrubError::PatternFile { line: 2, .. }), "{:?}", scrub);
    assert!(format!("{:#}", err).contains("Failed to parse pattern file"));
    Ok(())
}

#[test]
fn test_malformed_yaml_is_an_error() -> Result<()> {
    let file = temp_with_suffix(".yml", "patterns:\n  - id: [unclosed\n")?;
    assert!(PatternConfig::load_from_file(file.path()).is_err());
    Ok(())
}

#[test]
fn test_user_file_overwrites_builtin_in_place() -> Result<()> {
    let file = temp_with_suffix(".yaml", "patterns:\n  - id: email\n    expression: '[a-z]+@corp\\.example'\n")?;
    let config = PatternConfig::load_from_file(file.path())?;

    let mut registry = PatternRegistry::with_builtins()?;
    let skipped = registry.register_all(config.patterns, RegistrationMode::FailFast, true)?;
    assert!(skipped.is_empty());

    let ids: Vec<&str> = registry.ids().collect();
    assert_eq!(ids, vec!["credit_card", "email", "us_ssn"]);
    assert!(!registry.get("email").unwrap().is_builtin());

    let result = sanitize(
        "jo@corp.example and jo@other.org",
        &registry,
        &["email"],
        &RedactionPolicy::token("[E]"),
    )?;
    assert_eq!(result.output_text, "[E] and jo@other.org");
    Ok(())
}

#[test]
fn test_user_file_collision_without_overwrite_fails() -> Result<()> {
    let file = temp_with_suffix(".tsv", "us_ssn\t[0-9]{9}\n")?;
    let config = PatternConfig::load_from_file(file.path())?;

    let mut registry = PatternRegistry::with_builtins()?;
    let err = registry
        .register_all(config.patterns, RegistrationMode::FailFast, false)
        .unwrap_err();
    assert_eq!(err, ScrubError::DuplicateId("us_ssn".into()));
    Ok(())
}

#[test]
fn test_skip_invalid_keeps_the_good_patterns() -> Result<()> {
    let file = temp_with_suffix(".tsv", "first\tAAA[0-9]+\nempty_capable\tb*\nbroken\t(unclosed\nlast\tZZZ\n")?;
    let config = PatternConfig::load_from_file(file.path())?;

    let mut registry = PatternRegistry::new();
    let skipped = registry.register_all(config.patterns, RegistrationMode::SkipInvalid, false)?;

    assert_eq!(skipped.len(), 2);
    assert_eq!(skipped[0].pattern_id(), Some("empty_capable"));
    assert_eq!(skipped[1].pattern_id(), Some("broken"));
    let ids: Vec<&str> = registry.ids().collect();
    assert_eq!(ids, vec!["first", "last"]);
    Ok(())
}
