// logscrub-core/src/redactor.rs
//! Key-based redaction of generic JSON trees.
//!
//! Both walks below use an explicit, heap-allocated work stack instead of
//! recursion, so a deeply nested record can never exhaust the thread stack.
//! Decoding already caps nesting at [`MAX_NESTING_DEPTH`](crate::codec::MAX_NESTING_DEPTH),
//! the walks themselves impose no limit.
//!
//! License: MIT OR APACHE 2.0

use lazy_static::lazy_static;
use log::debug;
use serde::Serialize;
use serde_json::Value;

use crate::pattern::SensitiveKeyPattern;
use crate::GenericValue;

lazy_static! {
    /// Whether matched values may be printed verbatim in debug logs.
    static ref PII_DEBUG_ALLOWED: bool = {
        std::env::var("LOGSCRUB_ALLOW_DEBUG_PII")
            .map(|s| s.eq_ignore_ascii_case("true"))
            .unwrap_or(false)
    };
}

/// One sensitive field located by [`search`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SearchHit {
    /// The mapping key that matched.
    pub key: String,
    /// JSON Pointer (RFC 6901) of the matched value within the searched tree.
    pub path: String,
    /// The value stored under the key.
    pub value: GenericValue,
}

/// Nulls, in place, the value of every mapping key matched by `pattern`, at any depth.
///
/// Matched values are replaced without being descended into. Returns the number of
/// fields that were nulled (a field that was already null still counts).
pub fn redact_in_place(pattern: &SensitiveKeyPattern, value: &mut GenericValue) -> usize {
    let mut nulled = 0;
    let mut stack: Vec<&mut Value> = vec![value];

    while let Some(node) = stack.pop() {
        match node {
            Value::Object(map) => {
                for (key, child) in map.iter_mut() {
                    if pattern.matches(key) {
                        *child = Value::Null;
                        nulled += 1;
                    } else {
                        stack.push(child);
                    }
                }
            }
            Value::Array(items) => stack.extend(items.iter_mut()),
            Value::Null | Value::Bool(_) | Value::Number(_) | Value::String(_) => {}
        }
    }

    nulled
}

/// Returns `value` with every matching key set to null. Shape and order are untouched.
pub fn redact(pattern: &SensitiveKeyPattern, value: GenericValue) -> GenericValue {
    let mut value = value;
    redact_in_place(pattern, &mut value);
    value
}

enum Frame<'a> {
    Node { value: &'a Value, path: String },
    Entry { key: &'a str, value: &'a Value, path: String },
}

/// Collects every value stored under a key matched by `pattern`, in document order.
///
/// Unlike [`redact`], a matched value is still descended into, so sensitive keys nested
/// below a sensitive key are reported as well.
pub fn search(pattern: &SensitiveKeyPattern, value: &GenericValue) -> Vec<SearchHit> {
    let mut hits = Vec::new();
    let mut stack = vec![Frame::Node {
        value,
        path: String::new(),
    }];

    while let Some(frame) = stack.pop() {
        match frame {
            Frame::Entry { key, value, path } => {
                if pattern.matches(key) {
                    debug!(
                        "Key '{}' matched pattern '{}' at '{}': {}",
                        key,
                        pattern.name(),
                        path,
                        redact_for_log(value)
                    );
                    hits.push(SearchHit {
                        key: key.to_string(),
                        path: path.clone(),
                        value: value.clone(),
                    });
                }
                stack.push(Frame::Node { value, path });
            }
            Frame::Node { value, path } => match value {
                Value::Object(map) => {
                    for (key, child) in map.iter().rev() {
                        stack.push(Frame::Entry {
                            key,
                            value: child,
                            path: format!("{path}/{}", escape_pointer_token(key)),
                        });
                    }
                }
                Value::Array(items) => {
                    for (index, child) in items.iter().enumerate().rev() {
                        stack.push(Frame::Node {
                            value: child,
                            path: format!("{path}/{index}"),
                        });
                    }
                }
                Value::Null | Value::Bool(_) | Value::Number(_) | Value::String(_) => {}
            },
        }
    }

    hits
}

fn escape_pointer_token(token: &str) -> String {
    token.replace('~', "~0").replace('/', "~1")
}

/// Masks a value for log output unless `LOGSCRUB_ALLOW_DEBUG_PII=true`.
pub fn redact_for_log(value: &GenericValue) -> String {
    if *PII_DEBUG_ALLOWED {
        return value.to_string();
    }
    match value {
        Value::Null => "null".to_string(),
        Value::String(s) => mask_len(s.chars().count()),
        Value::Array(items) => format!("[REDACTED: {} items]", items.len()),
        Value::Object(map) => format!("[REDACTED: {} fields]", map.len()),
        other => mask_len(other.to_string().len()),
    }
}

fn mask_len(len: usize) -> String {
    const MAX_LEN: usize = 8;
    if len <= MAX_LEN {
        "[REDACTED]".to_string()
    } else {
        format!("[REDACTED: {} chars]", len)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn ip() -> SensitiveKeyPattern {
        SensitiveKeyPattern::substring("ip")
    }

    #[test]
    fn test_redacts_top_level_and_nested_keys() {
        let input = json!({
            "ip": "1.2.3.4",
            "context": { "Source_IP": "5.6.7.8", "page": "/home" },
            "events": [ { "ip_address": "9.9.9.9", "kind": "click" }, 42, null ]
        });
        let expected = json!({
            "ip": null,
            "context": { "Source_IP": null, "page": "/home" },
            "events": [ { "ip_address": null, "kind": "click" }, 42, null ]
        });
        assert_eq!(redact(&ip(), input), expected);
    }

    #[test]
    fn test_matched_mapping_is_nulled_whole() {
        let mut value = json!({ "ip_info": { "v4": "1.2.3.4", "ip": "x" }, "note": "n" });
        let nulled = redact_in_place(&ip(), &mut value);
        assert_eq!(value, json!({ "ip_info": null, "note": "n" }));
        assert_eq!(nulled, 1);
    }

    #[test]
    fn test_redaction_is_idempotent() {
        let input = json!({ "a": [ { "IP": 1 }, { "b": { "ip": [1, 2] } } ] });
        let once = redact(&ip(), input);
        let twice = redact(&ip(), once.clone());
        assert_eq!(once, twice);
    }

    #[test]
    fn test_key_order_is_preserved() {
        let input: Value = serde_json::from_str(r#"{"zeta":1,"ip":"x","alpha":{"y":2,"client_ip":"z"}}"#).unwrap();
        let output = redact(&ip(), input);
        assert_eq!(
            serde_json::to_string(&output).unwrap(),
            r#"{"zeta":1,"ip":null,"alpha":{"y":2,"client_ip":null}}"#
        );
    }

    #[test]
    fn test_scalars_are_leaves() {
        assert_eq!(redact(&ip(), json!("ip")), json!("ip"));
        assert_eq!(redact(&ip(), json!(null)), json!(null));
        assert_eq!(redact(&ip(), json!([1, "ip", true])), json!([1, "ip", true]));
    }

    #[test]
    fn test_deep_nesting_does_not_overflow() {
        let mut value = json!({ "ip": "deep" });
        for _ in 0..100_000 {
            value = Value::Array(vec![value]);
        }
        let nulled = redact_in_place(&ip(), &mut value);
        assert_eq!(nulled, 1);
        // Unwind iteratively so the drop of the tree does not recurse either.
        let mut cursor = value;
        while let Value::Array(mut items) = cursor {
            cursor = items.pop().unwrap_or(Value::Null);
        }
        assert_eq!(cursor, json!({ "ip": null }));
    }

    #[test]
    fn test_search_reports_document_order_and_nested_hits() {
        let value = json!({
            "ip": { "inner_ip": "a" },
            "list": [ { "Source_IP": "b" } ],
            "zip": "c"
        });
        let hits = search(&ip(), &value);
        let paths: Vec<&str> = hits.iter().map(|h| h.path.as_str()).collect();
        assert_eq!(paths, vec!["/ip", "/ip/inner_ip", "/list/0/Source_IP", "/zip"]);
        assert_eq!(hits[2].value, json!("b"));
        assert_eq!(hits[2].key, "Source_IP");
    }

    #[test]
    fn test_search_uses_fresh_accumulator() {
        let value = json!({ "ip": 1 });
        assert_eq!(search(&ip(), &value).len(), 1);
        assert_eq!(search(&ip(), &value).len(), 1);
    }

    #[test]
    fn test_search_escapes_pointer_tokens() {
        let value = json!({ "a/b": { "ip~1": 0 } });
        let hits = search(&ip(), &value);
        assert_eq!(hits[0].path, "/a~1b/ip~01");
    }

    #[test]
    fn test_redact_for_log_masks_by_default() {
        assert_eq!(redact_for_log(&json!("1.2.3.4")), "[REDACTED]");
        assert_eq!(redact_for_log(&json!("255.255.255.255")), "[REDACTED: 15 chars]");
        assert_eq!(redact_for_log(&json!({"a": 1, "b": 2})), "[REDACTED: 2 fields]");
    }
}
