// logscrub/src/commands/search.rs
//! `logscrub search`: list sensitive fields in a gzip NDJSON file.
//!
//! Matched values are masked in both the table and the JSON output unless
//! `LOGSCRUB_ALLOW_DEBUG_PII=true`.

use anyhow::{bail, Context, Result};
use comfy_table::presets::UTF8_FULL;
use comfy_table::{Cell, ContentArrangement, Table};
use serde::Serialize;
use std::fs;
use std::io::{self, Write};

use logscrub_core::redactor::redact_for_log;
use logscrub_core::{PatternHits, ScrubEngine};

use crate::cli::SearchCommand;
use crate::resolve_config;

/// One row of search output.
#[derive(Debug, Serialize, PartialEq, Eq)]
pub struct HitRow {
    pub pattern: String,
    pub record: usize,
    pub key: String,
    pub path: String,
    pub value: String,
}

pub fn rows(results: &[PatternHits]) -> Vec<HitRow> {
    results
        .iter()
        .flat_map(|p| {
            p.hits.iter().map(move |h| HitRow {
                pattern: p.pattern.clone(),
                record: h.record,
                key: h.hit.key.clone(),
                path: h.hit.path.clone(),
                value: redact_for_log(&h.hit.value),
            })
        })
        .collect()
}

pub fn render_table(rows: &[HitRow]) -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec!["Pattern", "Record", "Key", "Path", "Value"]);
    for row in rows {
        table.add_row(vec![
            Cell::new(&row.pattern),
            Cell::new(row.record),
            Cell::new(&row.key),
            Cell::new(&row.path),
            Cell::new(&row.value),
        ]);
    }
    table
}

pub fn run(cmd: &SearchCommand) -> Result<()> {
    let config = resolve_config(
        cmd.config.config.as_deref(),
        &cmd.config.keys,
        cmd.config.match_mode.map(Into::into),
    )?;
    let engine = ScrubEngine::new(&config)?;

    let body = fs::read(&cmd.input)
        .with_context(|| format!("Failed to read input file: {}", cmd.input.display()))?;
    let results = engine
        .search_bytes(&body)
        .with_context(|| format!("Failed to search {}", cmd.input.display()))?;
    let rows = rows(&results);

    let stdout = io::stdout();
    let mut writer = stdout.lock();
    if cmd.json {
        serde_json::to_writer_pretty(&mut writer, &rows)?;
        writeln!(writer)?;
    } else if rows.is_empty() {
        writeln!(writer, "No sensitive keys found in {}.", cmd.input.display())?;
    } else {
        writeln!(writer, "{}", render_table(&rows))?;
        writeln!(writer, "{} hit(s) in {}.", rows.len(), cmd.input.display())?;
    }

    if cmd.fail_on_hit && !rows.is_empty() {
        bail!("{} sensitive field(s) found in {}", rows.len(), cmd.input.display());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use logscrub_core::{RecordBatch, SensitiveKeyPattern};
    use serde_json::json;

    #[test]
    fn test_rows_flatten_hits_and_mask_values() {
        let batch = RecordBatch::new(vec![json!({"a": 1}), json!({"ctx": {"ip": "10.0.0.1"}})]);
        let pattern = SensitiveKeyPattern::substring("ip");
        let results = vec![PatternHits {
            pattern: "ip".into(),
            hits: batch.search(&pattern),
        }];
        let rows = rows(&results);
        assert_eq!(
            rows,
            vec![HitRow {
                pattern: "ip".into(),
                record: 1,
                key: "ip".into(),
                path: "/ctx/ip".into(),
                value: "[REDACTED]".into(),
            }]
        );
        let rendered = render_table(&rows).to_string();
        assert!(rendered.contains("/ctx/ip"));
        assert!(!rendered.contains("10.0.0.1"));
    }
}
