// logscrub-core/src/engine.rs
//! The synchronous decode → redact → encode core shared by every entry point.
//!
//! `ScrubEngine` performs no I/O. It turns one compressed object body into a cleaned
//! compressed body plus a report, which is all the invocation adapters and the CLI
//! need from it.
//!
//! License: MIT OR APACHE 2.0

use log::debug;
use serde::Serialize;
use sha2::{Digest, Sha256};

use crate::batch::{BatchSearchHit, RecordBatch, RedactionSummaryItem};
use crate::codec::{self, OutputFormat};
use crate::config::ScrubConfig;
use crate::errors::ScrubError;
use crate::pattern::SensitiveKeyPattern;

/// What one pass of the engine did to one object body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScrubOutcome {
    pub records: usize,
    pub redactions: Vec<RedactionSummaryItem>,
    /// Hex SHA-256 of the decompressed input.
    pub input_sha256: String,
}

impl ScrubOutcome {
    pub fn total_nulled(&self) -> usize {
        self.redactions.iter().map(|r| r.nulled_fields).sum()
    }
}

/// Diagnostic search results for one pattern.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PatternHits {
    pub pattern: String,
    pub hits: Vec<BatchSearchHit>,
}

#[derive(Debug, Clone)]
pub struct ScrubEngine {
    patterns: Vec<SensitiveKeyPattern>,
    output_format: OutputFormat,
}

impl ScrubEngine {
    /// Validates `config` and compiles its key patterns.
    pub fn new(config: &ScrubConfig) -> Result<Self, ScrubError> {
        config.validate()?;
        Ok(Self {
            patterns: config.compile_patterns()?,
            output_format: config.output_format,
        })
    }

    pub fn patterns(&self) -> &[SensitiveKeyPattern] {
        &self.patterns
    }

    /// Redacts a decoded batch in place, one full pass per pattern.
    pub fn scrub_batch(&self, batch: &mut RecordBatch) -> Vec<RedactionSummaryItem> {
        batch.redact_all(&self.patterns)
    }

    /// Decompresses, decodes, redacts, re-encodes and recompresses one object body.
    pub fn scrub_bytes(&self, bytes: &[u8]) -> Result<(Vec<u8>, ScrubOutcome), ScrubError> {
        let text = codec::decompress(bytes)?;
        let input_sha256 = hex::encode(Sha256::digest(text.as_bytes()));
        let mut batch = codec::decode_lines(&text)?;
        debug!("Decoded {} record(s), input sha256 {}", batch.len(), input_sha256);

        let redactions = self.scrub_batch(&mut batch);
        let encoded = codec::encode_batch(&batch, self.output_format)?;
        debug!("Encoded {} record(s) into {} compressed bytes", batch.len(), encoded.len());

        Ok((
            encoded,
            ScrubOutcome {
                records: batch.len(),
                redactions,
                input_sha256,
            },
        ))
    }

    /// Decodes one object body and reports where each pattern matches, without redacting.
    pub fn search_bytes(&self, bytes: &[u8]) -> Result<Vec<PatternHits>, ScrubError> {
        let batch = codec::decode_batch(bytes)?;
        Ok(self
            .patterns
            .iter()
            .map(|pattern| PatternHits {
                pattern: pattern.name().to_string(),
                hits: batch.search(pattern),
            })
            .collect())
    }
}
