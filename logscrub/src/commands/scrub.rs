// logscrub/src/commands/scrub.rs
//! `logscrub scrub`: redact one local gzip NDJSON file.

use anyhow::{Context, Result};
use log::info;
use serde::Serialize;
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use logscrub_core::{ScrubEngine, ScrubOutcome};

use crate::cli::ScrubCommand;
use crate::resolve_config;

#[derive(Debug, Serialize)]
struct LocalScrubReport<'a> {
    input: &'a Path,
    output: &'a Path,
    #[serde(flatten)]
    outcome: &'a ScrubOutcome,
}

pub fn run(cmd: &ScrubCommand) -> Result<()> {
    let mut config = resolve_config(
        cmd.config.config.as_deref(),
        &cmd.config.keys,
        cmd.config.match_mode.map(Into::into),
    )?;
    if let Some(format) = cmd.format {
        config.output_format = format.into();
    }
    let engine = ScrubEngine::new(&config)?;

    let body = fs::read(&cmd.input)
        .with_context(|| format!("Failed to read input file: {}", cmd.input.display()))?;
    let (cleaned, outcome) = engine
        .scrub_bytes(&body)
        .with_context(|| format!("Failed to scrub {}", cmd.input.display()))?;

    let output: PathBuf = cmd.output.clone().unwrap_or_else(|| cmd.input.clone());
    fs::write(&output, cleaned)
        .with_context(|| format!("Failed to write output file: {}", output.display()))?;
    info!(
        "Scrubbed {} record(s) from {} into {} ({} field(s) nulled)",
        outcome.records,
        cmd.input.display(),
        output.display(),
        outcome.total_nulled()
    );

    let stdout = io::stdout();
    let mut writer = stdout.lock();
    if cmd.json {
        let report = LocalScrubReport {
            input: &cmd.input,
            output: &output,
            outcome: &outcome,
        };
        serde_json::to_writer_pretty(&mut writer, &report)?;
        writeln!(writer)?;
    } else {
        writeln!(
            writer,
            "{}: {} record(s), {} field(s) nulled",
            output.display(),
            outcome.records,
            outcome.total_nulled()
        )?;
        for item in &outcome.redactions {
            writeln!(writer, "  {}: {}", item.pattern, item.nulled_fields)?;
        }
    }
    Ok(())
}
