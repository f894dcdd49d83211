// logscrub/src/lib.rs
//! # logscrub Application
//!
//! Entry points around `logscrub-core`: the `logscrub` command-line tool for local
//! files and event replay, the Lambda handler binary, and the scheduled sample writer.

pub mod cli;
pub mod commands;
pub mod logger;
pub mod s3_store;

pub use s3_store::S3Store;

use anyhow::{Context, Result};
use std::path::Path;

use logscrub_core::{MatchMode, ScrubConfig};

/// Resolves the configuration for a command: an explicit file wins over the
/// environment, then explicit keys and match mode override whatever was loaded.
pub fn resolve_config(
    config_path: Option<&Path>,
    keys: &[String],
    match_mode: Option<MatchMode>,
) -> Result<ScrubConfig> {
    let mut config = match config_path {
        Some(path) => ScrubConfig::load_from_file(path)?,
        None => ScrubConfig::from_env().context("Failed to load configuration from environment")?,
    };
    if !keys.is_empty() {
        config.sensitive_keys = keys.to_vec();
    }
    if let Some(mode) = match_mode {
        config.match_mode = mode;
    }
    config.validate()?;
    Ok(config)
}
