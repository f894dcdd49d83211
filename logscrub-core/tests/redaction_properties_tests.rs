// logscrub-core/tests/redaction_properties_tests.rs
//! Structural properties of redaction over a handful of representative trees.

use serde_json::{json, Value};

use logscrub_core::codec::{decode_batch, encode_batch};
use logscrub_core::{redact, search, OutputFormat, RecordBatch, SensitiveKeyPattern};

fn samples() -> Vec<Value> {
    vec![
        json!(null),
        json!("ip"),
        json!([]),
        json!({}),
        json!({ "ip": "1.2.3.4" }),
        json!({ "IP": [1, 2, 3], "zip_code": "75001", "city": "Paris" }),
        json!([{ "a": { "b": { "client_ip": "x", "c": [ { "ip": null } ] } } }, "tail"]),
        json!({ "description": "mentions ip in a value only", "nested": { "list": [ {}, [], { "Source_IP": true } ] } }),
    ]
}

/// Same keys in the same order and same sequence lengths, everywhere.
fn same_shape(a: &Value, b: &Value) -> bool {
    match (a, b) {
        (Value::Object(x), Value::Object(y)) => {
            x.len() == y.len()
                && x.iter().zip(y.iter()).all(|((ka, va), (kb, vb))| {
                    ka == kb && (vb.is_null() || same_shape(va, vb))
                })
        }
        (Value::Array(x), Value::Array(y)) => {
            x.len() == y.len() && x.iter().zip(y.iter()).all(|(va, vb)| same_shape(va, vb))
        }
        (x, y) => x == y,
    }
}

#[test]
fn test_redaction_is_idempotent() {
    let pattern = SensitiveKeyPattern::substring("ip");
    for sample in samples() {
        let once = redact(&pattern, sample);
        assert_eq!(redact(&pattern, once.clone()), once);
    }
}

#[test]
fn test_redaction_preserves_shape() {
    let pattern = SensitiveKeyPattern::substring("ip");
    for sample in samples() {
        let redacted = redact(&pattern, sample.clone());
        assert!(same_shape(&sample, &redacted), "shape changed: {sample} -> {redacted}");
    }
}

#[test]
fn test_only_matched_values_become_null() {
    let pattern = SensitiveKeyPattern::substring("ip");
    for sample in samples() {
        let redacted = redact(&pattern, sample.clone());
        assert!(search(&pattern, &redacted).iter().all(|hit| hit.value.is_null()));
        // Values that were not matched are unchanged: redacting with a pattern that
        // matches nothing is the identity.
        let none = SensitiveKeyPattern::exact("no-such-key");
        assert_eq!(redact(&none, sample.clone()), sample);
    }
}

#[test]
fn test_substring_match_covers_embedded_occurrences() {
    let pattern = SensitiveKeyPattern::substring("ip");
    let value = json!({ "description": "no pii here", "summary": "ip", "host": "h1" });
    assert_eq!(
        redact(&pattern, value),
        json!({ "description": null, "summary": "ip", "host": "h1" })
    );
}

#[test]
fn test_round_trip_preserves_line_order() {
    let records: Vec<Value> = (0..50).map(|i| json!({ "seq": i, "ip": format!("10.0.0.{i}") })).collect();
    let mut batch = RecordBatch::new(records);
    batch.redact(&SensitiveKeyPattern::substring("ip"));

    let decoded = decode_batch(&encode_batch(&batch, OutputFormat::JsonLines).unwrap()).unwrap();
    let sequence: Vec<i64> = decoded
        .records()
        .iter()
        .map(|r| r["seq"].as_i64().unwrap())
        .collect();
    assert_eq!(sequence, (0..50).collect::<Vec<i64>>());
    assert!(decoded.records().iter().all(|r| r["ip"].is_null()));
}
