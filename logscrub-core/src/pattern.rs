// logscrub-core/src/pattern.rs
//! Sensitive-key matching.
//!
//! A [`SensitiveKeyPattern`] decides whether a mapping key names a PII field.
//! Matching is always case-insensitive. The default mode is substring matching,
//! so the pattern `ip` catches `ip`, `Source_IP` and `ip_address` alike.
//!
//! License: MIT OR APACHE 2.0

use std::fmt;

use log::debug;
use regex::{Regex, RegexBuilder};
use serde::{Deserialize, Serialize};

use crate::errors::ScrubError;

/// Maximum allowed length for a key pattern string.
pub const MAX_PATTERN_LENGTH: usize = 500;

/// How a configured key name is compared against mapping keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchMode {
    /// The key contains the pattern.
    #[default]
    Substring,
    /// The key equals the pattern.
    Exact,
    /// The key matches the pattern as a regular expression.
    Regex,
}

impl std::str::FromStr for MatchMode {
    type Err = ScrubError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "substring" => Ok(MatchMode::Substring),
            "exact" => Ok(MatchMode::Exact),
            "regex" => Ok(MatchMode::Regex),
            other => Err(ScrubError::Config(format!("unknown match mode '{other}'"))),
        }
    }
}

#[derive(Debug, Clone)]
enum Matcher {
    Substring(String),
    Exact(String),
    Regex(Regex),
}

/// A compiled, case-insensitive matcher for one configured sensitive key.
#[derive(Debug, Clone)]
pub struct SensitiveKeyPattern {
    name: String,
    matcher: Matcher,
}

impl SensitiveKeyPattern {
    /// Builds a substring pattern. This is the matching policy used by the log cleaners.
    pub fn substring(name: &str) -> Self {
        Self {
            name: name.to_string(),
            matcher: Matcher::Substring(name.to_lowercase()),
        }
    }

    pub fn exact(name: &str) -> Self {
        Self {
            name: name.to_string(),
            matcher: Matcher::Exact(name.to_lowercase()),
        }
    }

    /// Compiles `pattern` as a case-insensitive regular expression.
    pub fn regex(pattern: &str) -> Result<Self, ScrubError> {
        if pattern.len() > MAX_PATTERN_LENGTH {
            return Err(ScrubError::Config(format!(
                "key pattern length ({}) exceeds maximum allowed ({})",
                pattern.len(),
                MAX_PATTERN_LENGTH
            )));
        }
        let regex = RegexBuilder::new(pattern)
            .case_insensitive(true)
            .size_limit(1 << 20)
            .build()
            .map_err(|e| ScrubError::Config(format!("invalid key pattern '{pattern}': {e}")))?;
        debug!("Key pattern '{}' compiled as regex.", pattern);
        Ok(Self {
            name: pattern.to_string(),
            matcher: Matcher::Regex(regex),
        })
    }

    pub fn new(name: &str, mode: MatchMode) -> Result<Self, ScrubError> {
        match mode {
            MatchMode::Substring => Ok(Self::substring(name)),
            MatchMode::Exact => Ok(Self::exact(name)),
            MatchMode::Regex => Self::regex(name),
        }
    }

    /// The key name (or expression) this pattern was built from.
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn mode(&self) -> MatchMode {
        match self.matcher {
            Matcher::Substring(_) => MatchMode::Substring,
            Matcher::Exact(_) => MatchMode::Exact,
            Matcher::Regex(_) => MatchMode::Regex,
        }
    }

    /// Returns true when `key` names a sensitive field.
    pub fn matches(&self, key: &str) -> bool {
        match &self.matcher {
            Matcher::Substring(needle) => key.to_lowercase().contains(needle.as_str()),
            Matcher::Exact(needle) => key.to_lowercase() == *needle,
            Matcher::Regex(regex) => regex.is_match(key),
        }
    }
}

impl fmt::Display for SensitiveKeyPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({:?})", self.name, self.mode())
    }
}
