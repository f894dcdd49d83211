// logscrub-core/src/codec.rs
//! Gzip newline-delimited JSON decoding and encoding.
//!
//! Decoding is all-or-nothing: one malformed line fails the whole batch, and the
//! error names the offending 1-based line number. Empty and whitespace-only lines
//! are skipped.
//!
//! License: MIT OR APACHE 2.0

use std::io::{Read, Write};

use flate2::read::MultiGzDecoder;
use flate2::write::GzEncoder;
use flate2::Compression;
use log::debug;
use serde::{Deserialize, Serialize};

use crate::batch::RecordBatch;
use crate::errors::ScrubError;
use crate::GenericValue;

/// Deepest nesting accepted by the decoder (serde_json's recursion limit).
pub const MAX_NESTING_DEPTH: usize = 128;

/// Layout of the re-encoded object.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OutputFormat {
    /// One compact JSON document per line, same layout as the input.
    #[default]
    JsonLines,
    /// The whole batch as a single JSON array.
    JsonArray,
}

/// Inflates a gzip blob (multi-member streams included) into UTF-8 text.
pub fn decompress(bytes: &[u8]) -> Result<String, ScrubError> {
    let mut raw = Vec::new();
    MultiGzDecoder::new(bytes)
        .read_to_end(&mut raw)
        .map_err(|e| ScrubError::decode(None, format!("gzip decompression failed: {e}")))?;
    String::from_utf8(raw)
        .map_err(|e| ScrubError::decode(None, format!("payload is not valid UTF-8: {e}")))
}

/// Parses newline-delimited JSON text into a batch, failing on the first bad line.
pub fn decode_lines(text: &str) -> Result<RecordBatch, ScrubError> {
    let mut records = Vec::new();
    for (index, line) in text.split('\n').enumerate() {
        if line.trim().is_empty() {
            continue;
        }
        let value: GenericValue = serde_json::from_str(line)
            .map_err(|e| ScrubError::decode(Some(index + 1), e.to_string()))?;
        records.push(value);
    }
    debug!("Decoded {} record(s).", records.len());
    Ok(RecordBatch::new(records))
}

/// Decompresses and parses one object's content.
pub fn decode_batch(bytes: &[u8]) -> Result<RecordBatch, ScrubError> {
    decode_lines(&decompress(bytes)?)
}

/// Serializes a batch to text without compressing it.
pub fn encode_text(batch: &RecordBatch, format: OutputFormat) -> Result<String, ScrubError> {
    match format {
        OutputFormat::JsonLines => {
            let mut out = String::new();
            for record in batch.records() {
                out.push_str(&serde_json::to_string(record)?);
                out.push('\n');
            }
            Ok(out)
        }
        OutputFormat::JsonArray => Ok(serde_json::to_string(batch.records())?),
    }
}

/// Serializes and gzips a batch.
pub fn encode_batch(batch: &RecordBatch, format: OutputFormat) -> Result<Vec<u8>, ScrubError> {
    let text = encode_text(batch, format)?;
    compress(text.as_bytes())
}

/// Gzips raw bytes.
pub fn compress(bytes: &[u8]) -> Result<Vec<u8>, ScrubError> {
    let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
    encoder.write_all(bytes)?;
    Ok(encoder.finish()?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_decode_skips_blank_lines() {
        let blob = compress(b"{\"a\":1}\n\n  \n{\"b\":2}\n").unwrap();
        let batch = decode_batch(&blob).unwrap();
        assert_eq!(batch.records(), &[json!({"a": 1}), json!({"b": 2})]);
    }

    #[test]
    fn test_decode_tolerates_crlf() {
        let batch = decode_lines("{\"a\":1}\r\n{\"b\":2}\r\n").unwrap();
        assert_eq!(batch.len(), 2);
    }

    #[test]
    fn test_malformed_line_fails_whole_batch() {
        let err = decode_lines("{\"a\":1}\n{not json}\n{\"c\":3}").unwrap_err();
        match err {
            ScrubError::Decode { line, .. } => assert_eq!(line, Some(2)),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_non_gzip_input_is_decode_error() {
        let err = decode_batch(b"plain text, not gzip").unwrap_err();
        assert_eq!(err.kind(), "DecodeError");
    }

    #[test]
    fn test_invalid_utf8_is_decode_error() {
        let blob = compress(&[0xff, 0xfe, b'\n']).unwrap();
        assert!(matches!(decode_batch(&blob), Err(ScrubError::Decode { line: None, .. })));
    }

    #[test]
    fn test_nesting_beyond_limit_is_rejected() {
        let deep = format!("{}{}", "[".repeat(MAX_NESTING_DEPTH + 1), "]".repeat(MAX_NESTING_DEPTH + 1));
        assert!(decode_lines(&deep).is_err());
        let ok = format!("{}{}", "[".repeat(MAX_NESTING_DEPTH - 1), "]".repeat(MAX_NESTING_DEPTH - 1));
        assert!(decode_lines(&ok).is_ok());
    }

    #[test]
    fn test_multi_member_gzip() {
        let mut blob = compress(b"{\"a\":1}\n").unwrap();
        blob.extend(compress(b"{\"b\":2}\n").unwrap());
        assert_eq!(decode_batch(&blob).unwrap().len(), 2);
    }

    #[test]
    fn test_json_lines_preserves_order_and_unicode() {
        let batch = RecordBatch::new(vec![json!({"n": 1, "city": "Zürich"}), json!({"n": 2})]);
        let text = encode_text(&batch, OutputFormat::JsonLines).unwrap();
        assert_eq!(text, "{\"n\":1,\"city\":\"Zürich\"}\n{\"n\":2}\n");
    }

    #[test]
    fn test_json_array_format() {
        let batch = RecordBatch::new(vec![json!({"n": 1}), json!(null)]);
        let text = encode_text(&batch, OutputFormat::JsonArray).unwrap();
        assert_eq!(text, "[{\"n\":1},null]");
    }
}
