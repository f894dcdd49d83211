// logscrub-core/src/scheduled.rs
//! Scheduled sample writer.
//!
//! A scheduled function that drops a small JSON record into a bucket, used to check
//! that the function's role can write to storage. Unless asked to replace, each run
//! writes a new object whose name carries the execution timestamp.

use chrono::{NaiveDateTime, Utc};
use log::info;
use serde::{Deserialize, Serialize};

use crate::errors::ScrubError;
use crate::store::ObjectStore;

/// Timestamp layout used in generated object names.
pub const KEY_TIMESTAMP_FORMAT: &str = "%Y-%m-%d_%H:%M:%S";

/// Base object name of the scheduled sample; each run stamps it with its own time.
pub const SAMPLE_PATH: &str = "test.json";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SampleRecord {
    pub this_is_a_test: String,
    pub inserted_at: NaiveDateTime,
}

impl SampleRecord {
    pub fn generate(now: NaiveDateTime) -> Self {
        Self {
            this_is_a_test: "for writing to S3 with lambda".to_string(),
            inserted_at: now,
        }
    }
}

/// Inserts `-<timestamp>` before the final extension of `path`.
///
/// `test.json` becomes `test-2024-01-31_08:15:00.json`. A path without an extension
/// in its last segment gets the suffix appended.
pub fn timestamped_key(path: &str, now: NaiveDateTime) -> String {
    let stamp = now.format(KEY_TIMESTAMP_FORMAT);
    let file_start = path.rfind('/').map(|i| i + 1).unwrap_or(0);
    match path[file_start..].rfind('.') {
        Some(dot) if dot > 0 => {
            let (stem, ext) = path.split_at(file_start + dot);
            format!("{stem}-{stamp}{ext}")
        }
        _ => format!("{path}-{stamp}"),
    }
}

/// Writes `record` as JSON. Returns the key written.
pub async fn write_sample(
    store: &dyn ObjectStore,
    bucket: &str,
    path: &str,
    record: &SampleRecord,
    replace: bool,
    now: NaiveDateTime,
) -> Result<String, ScrubError> {
    let key = if replace {
        path.to_string()
    } else {
        timestamped_key(path, now)
    };
    let body = serde_json::to_vec(record)?;
    store.put(bucket, &key, body).await?;
    info!("Wrote sample record to s3://{}/{}", bucket, key);
    Ok(key)
}

/// Current UTC time without offset, as used in generated names.
pub fn utc_now() -> NaiveDateTime {
    Utc::now().naive_utc()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;
    use chrono::NaiveDate;

    fn at() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 1, 31)
            .and_then(|d| d.and_hms_opt(8, 15, 0))
            .unwrap()
    }

    #[test]
    fn test_timestamped_key_before_extension() {
        assert_eq!(timestamped_key("test.json", at()), "test-2024-01-31_08:15:00.json");
        assert_eq!(
            timestamped_key("exports/v1.2/data.tar.gz", at()),
            "exports/v1.2/data.tar-2024-01-31_08:15:00.gz"
        );
    }

    #[test]
    fn test_timestamped_key_without_extension() {
        assert_eq!(timestamped_key("dir.v2/README", at()), "dir.v2/README-2024-01-31_08:15:00");
        assert_eq!(timestamped_key(".env", at()), ".env-2024-01-31_08:15:00");
    }

    #[tokio::test]
    async fn test_write_sample_keeps_history_unless_replacing() {
        let store = MemoryStore::new();
        let record = SampleRecord::generate(at());
        let key = write_sample(&store, "b", SAMPLE_PATH, &record, false, at()).await.unwrap();
        assert_eq!(key, "test-2024-01-31_08:15:00.json");
        write_sample(&store, "b", "test.json", &record, true, at()).await.unwrap();
        assert_eq!(store.keys("b").await, vec!["test-2024-01-31_08:15:00.json", "test.json"]);

        let stored: SampleRecord = serde_json::from_slice(&store.object("b", "test.json").await.unwrap()).unwrap();
        assert_eq!(stored, record);
    }
}
