// logscrub-core/src/batch.rs
//! The in-memory record batch handled by one invocation.

use log::{debug, info};
use serde::Serialize;

use crate::pattern::SensitiveKeyPattern;
use crate::redactor::{redact_in_place, search, SearchHit};
use crate::GenericValue;

/// Ordered sequence of decoded records, one per input line.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RecordBatch {
    records: Vec<GenericValue>,
}

/// Per-pattern outcome of a redaction pass.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RedactionSummaryItem {
    pub pattern: String,
    pub nulled_fields: usize,
}

/// A search hit together with the index of the record it was found in.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BatchSearchHit {
    pub record: usize,
    #[serde(flatten)]
    pub hit: SearchHit,
}

impl RecordBatch {
    pub fn new(records: Vec<GenericValue>) -> Self {
        Self { records }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn records(&self) -> &[GenericValue] {
        &self.records
    }

    /// Runs one full pass over every record for `pattern`. Returns the number of nulled fields.
    pub fn redact(&mut self, pattern: &SensitiveKeyPattern) -> usize {
        let nulled: usize = self
            .records
            .iter_mut()
            .map(|record| redact_in_place(pattern, record))
            .sum();
        debug!(
            "Pattern '{}' nulled {} field(s) across {} record(s).",
            pattern.name(),
            nulled,
            self.records.len()
        );
        nulled
    }

    /// Runs [`RecordBatch::redact`] once per pattern, in order. Later passes observe
    /// the redactions made by earlier ones.
    pub fn redact_all(&mut self, patterns: &[SensitiveKeyPattern]) -> Vec<RedactionSummaryItem> {
        let summary: Vec<RedactionSummaryItem> = patterns
            .iter()
            .map(|pattern| RedactionSummaryItem {
                pattern: pattern.name().to_string(),
                nulled_fields: self.redact(pattern),
            })
            .collect();
        info!(
            "Redacted {} record(s) with {} pattern(s): {}",
            self.records.len(),
            patterns.len(),
            summary
                .iter()
                .map(|s| format!("{}={}", s.pattern, s.nulled_fields))
                .collect::<Vec<_>>()
                .join(", ")
        );
        summary
    }

    /// Diagnostic search across every record.
    pub fn search(&self, pattern: &SensitiveKeyPattern) -> Vec<BatchSearchHit> {
        self.records
            .iter()
            .enumerate()
            .flat_map(|(record, value)| {
                search(pattern, value)
                    .into_iter()
                    .map(move |hit| BatchSearchHit { record, hit })
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_multi_key_sequential_passes() {
        let mut batch = RecordBatch::new(vec![json!({
            "ip": "1.2.3.4",
            "account": { "account_id": 7 },
            "note": "x"
        })]);
        let patterns = vec![
            SensitiveKeyPattern::substring("ip"),
            SensitiveKeyPattern::substring("account"),
        ];
        let summary = batch.redact_all(&patterns);
        assert_eq!(
            batch.records()[0],
            json!({ "ip": null, "account": null, "note": "x" })
        );
        assert_eq!(summary[0].nulled_fields, 1);
        assert_eq!(summary[1].nulled_fields, 1);
    }

    #[test]
    fn test_later_pass_sees_earlier_redaction() {
        // The first pass nulls "account" whole, so the nested "ip" is gone before pass two.
        let mut batch = RecordBatch::new(vec![json!({ "account": { "ip": "1.1.1.1" } })]);
        let summary = batch.redact_all(&[
            SensitiveKeyPattern::substring("account"),
            SensitiveKeyPattern::substring("ip"),
        ]);
        assert_eq!(summary[1].nulled_fields, 0);
        assert_eq!(batch.records()[0], json!({ "account": null }));
    }

    #[test]
    fn test_search_tags_record_index() {
        let batch = RecordBatch::new(vec![json!({ "a": 1 }), json!({ "ip": "x" })]);
        let hits = batch.search(&SensitiveKeyPattern::substring("ip"));
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].record, 1);
        assert_eq!(hits[0].hit.path, "/ip");
    }
}
