// logscrub-core/src/invocation.rs
//! Invocation payloads and results for the two supported entry protocols.
//!
//! * Event notification: `{"Records": [{"s3": {"bucket": {"name"}, "object": {"key"}}}]}`,
//!   answered with a bare boolean.
//! * Batch job: `{"invocationSchemaVersion", "invocationId", "tasks": [{"taskId", "s3Key",
//!   "s3BucketArn"}]}`, answered with a result envelope carrying one task result.

use serde::{Deserialize, Serialize};

use crate::errors::ScrubError;
use crate::GenericValue;

/// Location of one object in the store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ObjectRef {
    pub bucket: String,
    pub key: String,
}

#[derive(Debug, Deserialize)]
struct NotificationPayload {
    #[serde(rename = "Records")]
    records: Vec<NotificationRecord>,
}

#[derive(Debug, Deserialize)]
struct NotificationRecord {
    s3: S3Entity,
}

#[derive(Debug, Deserialize)]
struct S3Entity {
    bucket: BucketEntity,
    object: ObjectEntity,
}

#[derive(Debug, Deserialize)]
struct BucketEntity {
    name: String,
}

#[derive(Debug, Deserialize)]
struct ObjectEntity {
    key: String,
}

/// One task of a batch-job invocation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchJobTask {
    pub task_id: String,
    pub s3_key: String,
    pub s3_bucket_arn: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub s3_version_id: Option<String>,
}

impl BatchJobTask {
    /// Object addressed by the task: leading `/` stripped from the key, ARN prefix
    /// stripped from the bucket.
    pub fn object_ref(&self) -> ObjectRef {
        ObjectRef {
            bucket: bucket_from_arn(&self.s3_bucket_arn).to_string(),
            key: self.s3_key.strip_prefix('/').unwrap_or(&self.s3_key).to_string(),
        }
    }
}

/// `arn:aws:s3:::mybucket` → `mybucket`. Plain bucket names pass through.
pub fn bucket_from_arn(arn: &str) -> &str {
    if arn.starts_with("arn:") {
        arn.rsplit(':').next().unwrap_or(arn)
    } else {
        arn
    }
}

/// A batch-job invocation. Schema version and id are kept verbatim for the response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchJobRequest {
    pub invocation_schema_version: GenericValue,
    pub invocation_id: GenericValue,
    pub tasks: Vec<BatchJobTask>,
}

/// A recognized invocation.
#[derive(Debug, Clone, PartialEq)]
pub enum InvocationEvent {
    Notification(ObjectRef),
    BatchJob(BatchJobRequest),
}

impl InvocationEvent {
    /// Classifies a raw payload. `Records` selects the notification protocol;
    /// `invocationSchemaVersion` or `tasks` selects the batch-job protocol.
    pub fn from_value(value: &GenericValue) -> Result<Self, ScrubError> {
        let object = value.as_object().ok_or(ScrubError::UnrecognizedEvent)?;

        if object.contains_key("Records") {
            let payload: NotificationPayload = serde_json::from_value(value.clone())
                .map_err(|e| ScrubError::Event(format!("malformed event notification: {e}")))?;
            let record = payload
                .records
                .into_iter()
                .next()
                .ok_or_else(|| ScrubError::Event("event notification has no records".to_string()))?;
            return Ok(InvocationEvent::Notification(ObjectRef {
                bucket: record.s3.bucket.name,
                key: record.s3.object.key,
            }));
        }

        if object.contains_key("invocationSchemaVersion") || object.contains_key("tasks") {
            let request: BatchJobRequest = serde_json::from_value(value.clone())
                .map_err(|e| ScrubError::Event(format!("malformed batch job: {e}")))?;
            if request.tasks.is_empty() {
                return Err(ScrubError::Event("batch job has no tasks".to_string()));
            }
            return Ok(InvocationEvent::BatchJob(request));
        }

        Err(ScrubError::UnrecognizedEvent)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ResultCode {
    Succeeded,
    PermanentFailure,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskResult {
    pub task_id: String,
    pub result_code: ResultCode,
    pub result_string: String,
}

impl TaskResult {
    pub fn succeeded(task_id: &str, key: &str) -> Self {
        Self {
            task_id: task_id.to_string(),
            result_code: ResultCode::Succeeded,
            result_string: format!("Successfully parsed object {key}"),
        }
    }

    pub fn permanent_failure(task_id: &str, error: &ScrubError) -> Self {
        Self {
            task_id: task_id.to_string(),
            result_code: ResultCode::PermanentFailure,
            result_string: error.to_string(),
        }
    }
}

/// Batch-job response envelope.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchJobResponse {
    pub invocation_schema_version: GenericValue,
    pub treat_missing_keys_as: ResultCode,
    pub invocation_id: GenericValue,
    pub results: Vec<TaskResult>,
}

impl BatchJobResponse {
    pub fn new(request: &BatchJobRequest, result: TaskResult) -> Self {
        Self {
            invocation_schema_version: request.invocation_schema_version.clone(),
            treat_missing_keys_as: ResultCode::PermanentFailure,
            invocation_id: request.invocation_id.clone(),
            results: vec![result],
        }
    }
}

/// What an invocation returns to its caller. Serializes as a bare boolean or as the
/// batch-job envelope.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum InvocationResult {
    Status(bool),
    BatchJob(BatchJobResponse),
}

impl InvocationResult {
    /// True for `Status(true)` and for envelopes whose tasks all succeeded.
    pub fn is_success(&self) -> bool {
        match self {
            InvocationResult::Status(ok) => *ok,
            InvocationResult::BatchJob(response) => response
                .results
                .iter()
                .all(|r| r.result_code == ResultCode::Succeeded),
        }
    }
}
