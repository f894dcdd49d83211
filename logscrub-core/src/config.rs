//! Configuration management for `logscrub-core`.
//!
//! A [`ScrubConfig`] names the sensitive keys to null out, how they are matched,
//! how the cleaned batch is re-encoded and where it is written. Configurations are
//! YAML documents; a built-in default is embedded in the library and environment
//! variables may override the key list and match mode at startup.
//!
//! License: MIT OR Apache-2.0

use std::collections::HashSet;
use std::path::Path;

use anyhow::{Context, Result};
use log::{debug, info};
use serde::{Deserialize, Serialize};

use crate::codec::OutputFormat;
use crate::errors::ScrubError;
use crate::pattern::{MatchMode, SensitiveKeyPattern};

/// Path of a YAML configuration file to load instead of the embedded defaults.
pub const CONFIG_PATH_ENV: &str = "LOGSCRUB_CONFIG";
/// Comma-separated list overriding `sensitive_keys`.
pub const SENSITIVE_KEYS_ENV: &str = "LOGSCRUB_SENSITIVE_KEYS";
/// Overrides `match_mode` (`substring`, `exact` or `regex`).
pub const MATCH_MODE_ENV: &str = "LOGSCRUB_MATCH_MODE";

/// Rewrites the trailing `from` of an object key to `to`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct SuffixRewrite {
    pub from: String,
    pub to: String,
}

impl SuffixRewrite {
    /// Applies the rewrite; keys not ending in `from` are returned unchanged.
    pub fn apply(&self, key: &str) -> String {
        match key.strip_suffix(self.from.as_str()) {
            Some(stem) => format!("{}{}", stem, self.to),
            None => key.to_string(),
        }
    }
}

/// Top-level scrubbing configuration shared by both invocation protocols.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct ScrubConfig {
    /// Key names whose values are nulled, one full pass per entry, in order.
    pub sensitive_keys: Vec<String>,
    pub match_mode: MatchMode,
    pub output_format: OutputFormat,
    /// Destination key rewrite. `None` overwrites the source object.
    pub destination_suffix: Option<SuffixRewrite>,
    /// Delete the source object after writing a differently named destination.
    pub delete_source: bool,
}

impl Default for ScrubConfig {
    fn default() -> Self {
        Self {
            sensitive_keys: vec!["ip".to_string()],
            match_mode: MatchMode::Substring,
            output_format: OutputFormat::JsonLines,
            destination_suffix: None,
            delete_source: false,
        }
    }
}

impl ScrubConfig {
    /// Loads the configuration embedded in the library.
    pub fn load_default() -> Result<Self> {
        debug!("Loading default scrub configuration from embedded string...");
        let default_yaml = include_str!("../config/default_scrub.yaml");
        let config: ScrubConfig =
            serde_yml::from_str(default_yaml).context("Failed to parse default scrub configuration")?;
        config.validate()?;
        Ok(config)
    }

    /// Loads and validates a configuration from a YAML file.
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        info!("Loading scrub configuration from: {}", path.display());
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        let config: ScrubConfig = serde_yml::from_str(&text)
            .with_context(|| format!("Failed to parse config file {}", path.display()))?;
        config
            .validate()
            .with_context(|| format!("Invalid config file {}", path.display()))?;
        info!(
            "Loaded {} sensitive key(s) from file {}.",
            config.sensitive_keys.len(),
            path.display()
        );
        Ok(config)
    }

    /// Resolves the configuration from the process environment.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Same as [`ScrubConfig::from_env`] with an injectable variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = match lookup(CONFIG_PATH_ENV).filter(|p| !p.trim().is_empty()) {
            Some(path) => Self::load_from_file(path)?,
            None => Self::load_default()?,
        };

        if let Some(keys) = lookup(SENSITIVE_KEYS_ENV) {
            config.sensitive_keys = keys
                .split(',')
                .map(str::trim)
                .filter(|k| !k.is_empty())
                .map(String::from)
                .collect();
            debug!("Overriding sensitive keys from {}: {:?}", SENSITIVE_KEYS_ENV, config.sensitive_keys);
        }

        if let Some(mode) = lookup(MATCH_MODE_ENV) {
            config.match_mode = mode.parse()?;
            debug!("Overriding match mode from {}: {:?}", MATCH_MODE_ENV, config.match_mode);
        }

        config.validate()?;
        Ok(config)
    }

    /// Checks key names, patterns and the suffix rewrite. All problems are reported at once.
    pub fn validate(&self) -> Result<(), ScrubError> {
        let mut errors = Vec::new();
        let mut seen = HashSet::new();

        if self.sensitive_keys.is_empty() {
            errors.push("`sensitive_keys` must list at least one key.".to_string());
        }

        for key in &self.sensitive_keys {
            if key.trim().is_empty() {
                errors.push("A sensitive key is empty.".to_string());
                continue;
            }
            if !seen.insert(key.to_lowercase()) {
                errors.push(format!("Duplicate sensitive key found: '{key}'."));
            }
            if let Err(e) = SensitiveKeyPattern::new(key, self.match_mode) {
                errors.push(e.to_string());
            }
        }

        if let Some(rewrite) = &self.destination_suffix {
            if rewrite.from.is_empty() {
                errors.push("`destination_suffix.from` cannot be empty.".to_string());
            }
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(ScrubError::Config(errors.join(" ")))
        }
    }

    /// Compiles the configured keys into matchers, preserving order.
    pub fn compile_patterns(&self) -> Result<Vec<SensitiveKeyPattern>, ScrubError> {
        self.sensitive_keys
            .iter()
            .map(|key| SensitiveKeyPattern::new(key, self.match_mode))
            .collect()
    }

    /// Destination key for a cleaned copy of `source_key`.
    pub fn destination_key(&self, source_key: &str) -> String {
        match &self.destination_suffix {
            Some(rewrite) => rewrite.apply(source_key),
            None => source_key.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_embedded_defaults() {
        let config = ScrubConfig::load_default().unwrap();
        assert_eq!(config, ScrubConfig::default());
    }

    #[test]
    fn test_destination_key_same_by_default() {
        let config = ScrubConfig::default();
        assert_eq!(config.destination_key("logs/a.gz"), "logs/a.gz");
    }

    #[test]
    fn test_suffix_rewrite() {
        let rewrite = SuffixRewrite {
            from: ".gz".to_string(),
            to: ".gzip".to_string(),
        };
        assert_eq!(rewrite.apply("logs/a.json.gz"), "logs/a.json.gzip");
        assert_eq!(rewrite.apply("logs/a.gz.bak"), "logs/a.gz.bak");
    }

    #[test]
    fn test_validate_collects_errors() {
        let config = ScrubConfig {
            sensitive_keys: vec!["ip".into(), "IP".into(), " ".into()],
            ..ScrubConfig::default()
        };
        let message = config.validate().unwrap_err().to_string();
        assert!(message.contains("Duplicate sensitive key"));
        assert!(message.contains("empty"));
    }

    #[test]
    fn test_validate_rejects_bad_regex() {
        let config = ScrubConfig {
            sensitive_keys: vec!["(ip".into()],
            match_mode: MatchMode::Regex,
            ..ScrubConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_env_overrides() {
        let env: HashMap<&str, &str> = HashMap::from([
            (SENSITIVE_KEYS_ENV, "ip, email ,,account"),
            (MATCH_MODE_ENV, "exact"),
        ]);
        let config = ScrubConfig::from_lookup(|name| env.get(name).map(|v| v.to_string())).unwrap();
        assert_eq!(config.sensitive_keys, vec!["ip", "email", "account"]);
        assert_eq!(config.match_mode, MatchMode::Exact);
        let patterns = config.compile_patterns().unwrap();
        assert_eq!(patterns.len(), 3);
        assert_eq!(patterns[1].name(), "email");
    }

    #[test]
    fn test_env_override_with_no_keys_is_rejected() {
        let config = ScrubConfig::from_lookup(|name| (name == SENSITIVE_KEYS_ENV).then(|| " , ".to_string()));
        assert!(config.is_err());
    }
}
