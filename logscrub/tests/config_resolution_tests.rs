// logscrub/tests/config_resolution_tests.rs
use anyhow::Result;
use std::io::Write;
use tempfile::NamedTempFile;

use logscrub::resolve_config;
use logscrub_core::{MatchMode, OutputFormat};

fn config_file(yaml: &str) -> Result<NamedTempFile> {
    let mut file = NamedTempFile::new()?;
    file.write_all(yaml.as_bytes())?;
    Ok(file)
}

#[test_log::test]
fn test_file_values_are_used_as_is() -> Result<()> {
    let file = config_file("sensitive_keys: [email]\noutput_format: json_array\n")?;
    let config = resolve_config(Some(file.path()), &[], None)?;
    assert_eq!(config.sensitive_keys, vec!["email"]);
    assert_eq!(config.output_format, OutputFormat::JsonArray);
    assert_eq!(config.match_mode, MatchMode::Substring);
    Ok(())
}

#[test_log::test]
fn test_flags_override_file() -> Result<()> {
    let file = config_file("sensitive_keys: [email]\n")?;
    let keys = vec!["^ip$".to_string(), "user".to_string()];
    let config = resolve_config(Some(file.path()), &keys, Some(MatchMode::Regex))?;
    assert_eq!(config.sensitive_keys, keys);
    assert_eq!(config.match_mode, MatchMode::Regex);
    Ok(())
}

#[test_log::test]
fn test_invalid_override_is_rejected() -> Result<()> {
    let file = config_file("sensitive_keys: [email]\n")?;
    let keys = vec!["(unclosed".to_string()];
    assert!(resolve_config(Some(file.path()), &keys, Some(MatchMode::Regex)).is_err());
    Ok(())
}
