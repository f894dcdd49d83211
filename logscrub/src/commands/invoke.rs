// logscrub/src/commands/invoke.rs
//! `logscrub invoke`: run the Lambda handler once against a local directory.

use anyhow::{bail, Context, Result};
use std::fs;
use std::io::{self, Write};
use std::sync::Arc;

use logscrub_core::{FsStore, GenericValue, Scrubber};

use crate::cli::InvokeCommand;
use crate::resolve_config;

pub async fn run(cmd: &InvokeCommand) -> Result<()> {
    let config = resolve_config(
        cmd.config.config.as_deref(),
        &cmd.config.keys,
        cmd.config.match_mode.map(Into::into),
    )?;

    let raw = fs::read_to_string(&cmd.event)
        .with_context(|| format!("Failed to read event file: {}", cmd.event.display()))?;
    let event: GenericValue = serde_json::from_str(&raw)
        .with_context(|| format!("Event file is not valid JSON: {}", cmd.event.display()))?;

    let store = Arc::new(FsStore::new(&cmd.root));
    let scrubber = Scrubber::new(store, config)?;
    let result = scrubber.handle_event(&event).await;

    let stdout = io::stdout();
    let mut writer = stdout.lock();
    serde_json::to_writer_pretty(&mut writer, &result)?;
    writeln!(writer)?;

    if !result.is_success() {
        bail!("Invocation did not succeed for {}", cmd.event.display());
    }
    Ok(())
}
